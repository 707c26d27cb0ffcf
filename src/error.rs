//! Centralised error hierarchy for the **Quill** script engine.
//!
//! Every subsystem (scanner, parser, runtime, CLI) converts its internal
//! failure modes into one of the variants defined here, giving the crate a
//! uniform `Result<T>` alias and clean inter-operation with `anyhow` in the
//! binary, while preserving the source line of every failure.
//!
//! The module itself never prints diagnostics.

use std::io;

use log::info;
use thiserror::Error;

use crate::token::{Token, TokenType};

/// Canonical error type used throughout the engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuillError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human-readable description.
        message: String,

        /// 1-based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error, bound to the offending token.
    #[error("[line {line}] Error at '{found}': {message}")]
    Parse {
        message: String,

        /// Lexeme of the token that broke the production, or `end` at EOF.
        found: String,

        line: usize,
    },

    /// Runtime evaluation error.
    #[error("[line {line}] Runtime error: {message}")]
    Runtime { message: String, line: usize },

    /// Wrapper around `std::io::Error` (transparent). Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF-8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),
}

impl QuillError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        QuillError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();
        let found: String = match token.token_type {
            TokenType::EOF => "end".to_string(),
            _ => token.lexeme.clone(),
        };

        info!(
            "Creating Parse error: line={}, at='{}', msg={}",
            token.line, found, message
        );

        QuillError::Parse {
            message,
            found,
            line: token.line,
        }
    }

    /// Helper constructor for the **runtime**.
    pub fn runtime<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!(
            "Creating Runtime error: line={}, msg={}",
            token.line, message
        );

        QuillError::Runtime {
            message,
            line: token.line,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, QuillError>;
