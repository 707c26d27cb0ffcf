//! Parenthesised prefix rendering of the AST, used by the `parse`
//! subcommand and the parser tests.

use crate::expr::{Expr, LiteralValue};
use crate::stmt::Stmt;

pub struct AstPrinter;

impl AstPrinter {
    pub fn print(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(literal) => match literal {
                LiteralValue::Number(n) => {
                    if n.fract() == 0.0 {
                        format!("{:.1}", n)
                    } else {
                        n.to_string()
                    }
                }

                LiteralValue::Str(s) => s.clone(),

                LiteralValue::Bool(b) => b.to_string(),

                LiteralValue::Nil => "nil".to_string(),
            },

            Expr::Grouping(inner) => format!("(group {})", self.print(inner)),

            Expr::Unary(operator, right) => {
                format!("({} {})", operator.lexeme, self.print(right))
            }

            Expr::Binary(left, operator, right) | Expr::Logical(left, operator, right) => {
                format!(
                    "({} {} {})",
                    operator.lexeme,
                    self.print(left),
                    self.print(right)
                )
            }

            Expr::Variable(name) => name.lexeme.clone(),

            Expr::Assign(name, value) => {
                format!("(assign {} {})", name.lexeme, self.print(value))
            }

            Expr::Call(callee, _paren, arguments) => {
                let mut out = format!("(call {}", self.print(callee));

                for argument in arguments {
                    out.push(' ');
                    out.push_str(&self.print(argument));
                }

                out.push(')');
                out
            }
        }
    }

    pub fn print_stmt(&self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(expr) => format!("(expr {})", self.print(expr)),

            Stmt::Print(expr) => format!("(print {})", self.print(expr)),

            Stmt::Var(name, initializer) => match initializer {
                Some(expr) => format!("(var {} {})", name.lexeme, self.print(expr)),
                None => format!("(var {})", name.lexeme),
            },

            Stmt::Block(statements) => {
                let mut out = String::from("(block");

                for statement in statements {
                    out.push(' ');
                    out.push_str(&self.print_stmt(statement));
                }

                out.push(')');
                out
            }

            Stmt::If(condition, then_branch, else_branch) => match else_branch {
                Some(else_branch) => format!(
                    "(if {} {} {})",
                    self.print(condition),
                    self.print_stmt(then_branch),
                    self.print_stmt(else_branch)
                ),
                None => format!(
                    "(if {} {})",
                    self.print(condition),
                    self.print_stmt(then_branch)
                ),
            },

            Stmt::While(condition, body) => format!(
                "(while {} {})",
                self.print(condition),
                self.print_stmt(body)
            ),

            Stmt::Function(declaration) => {
                let mut out = format!("(fun {} (", declaration.name.lexeme);

                for (i, param) in declaration.params.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    out.push_str(&param.lexeme);
                }

                out.push(')');

                for statement in &declaration.body {
                    out.push(' ');
                    out.push_str(&self.print_stmt(statement));
                }

                out.push(')');
                out
            }

            Stmt::Return(_keyword, value) => match value {
                Some(expr) => format!("(return {})", self.print(expr)),
                None => "(return)".to_string(),
            },
        }
    }
}
