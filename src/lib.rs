pub mod ast_printer;
pub mod callable;
pub mod environment;
pub mod error;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod value;

use crate::error::QuillError;
use crate::parser::Parser;
use crate::scanner::Scanner;
use crate::stmt::Stmt;
use crate::token::Token;

/// Scans `source` into a token sequence terminated by `EOF`.
///
/// Pure: no side effects beyond logging. Scanning continues past bad
/// characters, so a failure reports *every* lexical error found in one pass.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Vec<QuillError>> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut errors: Vec<QuillError> = Vec::new();

    for result in Scanner::new(source) {
        match result {
            Ok(token) => tokens.push(token),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}

/// Parses a token sequence into a program, or reports every syntax error
/// found in one pass. A program with any syntax error yields no statements.
pub fn parse(tokens: &[Token]) -> Result<Vec<Stmt>, Vec<QuillError>> {
    Parser::new(tokens).parse()
}
