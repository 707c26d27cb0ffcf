use std::rc::Rc;

use crate::expr::Expr;
use crate::token::Token;

/// A function declaration: name, parameter tokens, and body.
///
/// Shared behind an `Rc` between the [`Stmt::Function`] node that declared
/// it and every callable value adapted from it, so the body is never cloned.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Token,

    /// Parameter name tokens (arity <= 255).
    pub params: Vec<Token>,

    /// Statements executed when the function is called.
    pub body: Vec<Stmt>,
}

/// AST node for *statements*. A program is a sequence of these, as returned
/// by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Stand-alone expression terminated by a semicolon.
    Expression(Expr),

    /// `print` statement; the only built-in side effect.
    Print(Expr),

    /// Variable declaration: `"var" IDENT ("=" initializer)? ";"`.
    Var(Token, Option<Expr>),

    /// Braced scope containing zero or more declarations/statements.
    Block(Vec<Stmt>),

    /// `if` / `else` conditional.
    If(Expr, Box<Stmt>, Option<Box<Stmt>>),

    /// `while` loop; runs until the condition is falsy, with no iteration
    /// cap.
    While(Expr, Box<Stmt>),

    /// Function declaration; becomes a first-class callable value when
    /// executed.
    Function(Rc<FunctionDecl>),

    /// `return` statement inside a function body. Carries the `return`
    /// keyword token for runtime error locations; an absent value means
    /// `nil` is returned.
    Return(Token, Option<Expr>),
}
