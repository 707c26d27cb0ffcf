//! Module `scanner` implements a one-pass, streaming lexer for Quill source
//! text.
//!
//! It transforms a source string into a sequence of [`Token`]s, skipping
//! whitespace and `//` comments, and emitting exactly one `EOF` token at the
//! end. The scanner is a [`FusedIterator`] over `Result<Token, QuillError>`:
//! an `Err` item reports a lexical error with its line, and scanning keeps
//! going afterwards so a single pass can surface every bad character in the
//! input. A malformed region never produces a token.
//!
//! Lexeme recognition:
//! - single-character punctuators: `( ) { } , - + ; *`
//! - one-or-two character operators: `! != = == < <= > >=`
//! - `/` or a `//` comment running to end of line (skipped via `memchr`)
//! - string literals `" … "`, multi-line allowed; an unterminated string is
//!   a lexical error on the line where scanning stopped
//! - numeric literals with an optional fractional part
//! - identifiers and keywords, resolved through a compile-time perfect-hash
//!   map
//!
//! The scanner is not restartable: create a new one to rescan.

use std::iter::FusedIterator;

use log::{debug, info};
use memchr::memchr;
use phf::phf_map;

use crate::error::{QuillError, Result};
use crate::token::{Token, TokenType};

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile-time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"and"    => TokenType::AND,
    b"else"   => TokenType::ELSE,
    b"false"  => TokenType::FALSE,
    b"fun"    => TokenType::FUN,
    b"if"     => TokenType::IF,
    b"nil"    => TokenType::NIL,
    b"or"     => TokenType::OR,
    b"print"  => TokenType::PRINT,
    b"return" => TokenType::RETURN,
    b"true"   => TokenType::TRUE,
    b"var"    => TokenType::VAR,
    b"while"  => TokenType::WHILE,
};

/// A single-pass **scanner / lexer** that converts source text into a
/// sequence of [`Token`]s. Operates on the underlying bytes; every lexeme
/// boundary falls on an ASCII byte, so slicing back to `&str` is sound.
pub struct Scanner<'a> {
    src: &'a [u8],  // entire source text
    start: usize,   // index of the *first* byte of the current lexeme
    current: usize, // index *one past* the last byte examined
    line: usize,    // 1-based line counter (\n increments)
}

impl<'a> Scanner<'a> {
    /// Create a new scanner over `source`.
    #[inline]
    pub fn new(source: &'a str) -> Self {
        info!("Scanner created over {} bytes", source.len());

        Self {
            src: source.as_bytes(),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    /// Are we at (or past) the end of input?
    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.current >= self.src.len()
    }

    /// Advance one byte and return it. Callers guard with [`Self::is_at_end`].
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let byte = self.src[self.current];
        self.current += 1;
        byte
    }

    /// Peek at the current byte without consuming it. Returns `0` past EOF
    /// to avoid branching at call sites.
    #[inline(always)]
    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.src[self.current]
        }
    }

    /// Peek one byte beyond [`Self::peek`]. Safe at EOF.
    #[inline(always)]
    fn peek_next(&self) -> u8 {
        if self.current + 1 >= self.src.len() {
            0
        } else {
            self.src[self.current + 1]
        }
    }

    /// Conditionally consume a byte **iff** it matches `expected`.
    #[inline(always)]
    fn match_byte(&mut self, expected: u8) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// The lexeme currently delimited by `start..current`.
    #[inline(always)]
    fn lexeme(&self) -> &'a str {
        let slice: &[u8] = &self.src[self.start..self.current];

        // SAFETY: the source is a valid `&str` and lexeme boundaries always
        // fall on ASCII bytes, so the slice is valid UTF-8.
        unsafe { std::str::from_utf8_unchecked(slice) }
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* lexeme starting at `self.start`. Returns `Ok(None)`
    /// for whitespace and comments, `Ok(Some(kind))` for a recognised token,
    /// and `Err` for an unexpected byte or unterminated string.
    fn scan_token(&mut self) -> Result<Option<TokenType>> {
        let byte = self.advance();

        let token_type = match byte {
            // ── single-character punctuators ──────────────────────────────
            b'(' => TokenType::LEFT_PAREN,
            b')' => TokenType::RIGHT_PAREN,
            b'{' => TokenType::LEFT_BRACE,
            b'}' => TokenType::RIGHT_BRACE,
            b',' => TokenType::COMMA,
            b'-' => TokenType::MINUS,
            b'+' => TokenType::PLUS,
            b';' => TokenType::SEMICOLON,
            b'*' => TokenType::STAR,

            // ── one-or-two character operators ───────────────────────────
            b'!' => {
                if self.match_byte(b'=') {
                    TokenType::BANG_EQUAL
                } else {
                    TokenType::BANG
                }
            }

            b'=' => {
                if self.match_byte(b'=') {
                    TokenType::EQUAL_EQUAL
                } else {
                    TokenType::EQUAL
                }
            }

            b'<' => {
                if self.match_byte(b'=') {
                    TokenType::LESS_EQUAL
                } else {
                    TokenType::LESS
                }
            }

            b'>' => {
                if self.match_byte(b'=') {
                    TokenType::GREATER_EQUAL
                } else {
                    TokenType::GREATER
                }
            }

            // ── whitespace / newline ─────────────────────────────────────
            b' ' | b'\r' | b'\t' => return Ok(None),

            b'\n' => {
                self.line += 1; // track for diagnostics
                return Ok(None);
            }

            // ── comments (// … until newline) ────────────────────────────
            b'/' => {
                if self.match_byte(b'/') {
                    // Fast-forward to the next newline; the newline itself is
                    // left for the next scan so the line counter stays right.
                    match memchr(b'\n', &self.src[self.current..]) {
                        Some(offset) => self.current += offset,
                        None => self.current = self.src.len(),
                    }

                    return Ok(None);
                }

                TokenType::SLASH
            }

            // ── string literal " … " ─────────────────────────────────────
            b'"' => return self.string().map(Some),

            // ── number literal (digit-leading) ───────────────────────────
            b'0'..=b'9' => self.number(),

            // ── identifiers / keywords (alpha or underscore-leading) ─────
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(),

            // ── unexpected character ─────────────────────────────────────
            _ => {
                return Err(QuillError::lex(
                    self.line,
                    format!("Unexpected character: {}", byte as char),
                ));
            }
        };

        Ok(Some(token_type))
    }

    /// Scan a double-quoted string literal.
    ///
    /// `self.start` still points at the opening `"`. On success
    /// `self.current` points past the closing `"` and the payload excludes
    /// both quotes. Newlines inside the literal are allowed and counted.
    fn string(&mut self) -> Result<TokenType> {
        while !self.is_at_end() && self.peek() != b'"' {
            if self.advance() == b'\n' {
                self.line += 1;
            }
        }

        if self.is_at_end() {
            return Err(QuillError::lex(self.line, "Unterminated string."));
        }

        self.advance(); // consume closing quote

        let slice: &[u8] = &self.src[self.start + 1..self.current - 1];

        // SAFETY: both delimiters are ASCII quotes inside a valid `&str`.
        let contents: &str = unsafe { std::str::from_utf8_unchecked(slice) };

        Ok(TokenType::STRING(contents.to_owned()))
    }

    /// Scan a numeric literal (`123`, `3.14`). The fraction is optional and
    /// a trailing `.` without digits is not consumed.
    fn number(&mut self) -> TokenType {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance(); // consume '.'

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        // The lexeme is all ASCII digits with at most one interior dot, so
        // parsing cannot fail.
        let value: f64 = self.lexeme().parse::<f64>().unwrap_or(0.0);

        TokenType::NUMBER(value)
    }

    /// Scan an identifier and decide whether it is a **keyword** or a
    /// generic `IDENTIFIER`.
    fn identifier(&mut self) -> TokenType {
        while {
            let byte: u8 = self.peek();
            byte.is_ascii_alphanumeric() || byte == b'_'
        } {
            self.advance();
        }

        KEYWORDS
            .get(&self.src[self.start..self.current])
            .cloned()
            .unwrap_or(TokenType::IDENTIFIER)
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        // Loop until we emit a token, hit EOF, or see an error.
        while self.current <= self.src.len() {
            // EOF guard: emit exactly one EOF token, then terminate.
            if self.current == self.src.len() {
                self.current += 1; // fused semantics
                return Some(Ok(Token::new(TokenType::EOF, String::new(), self.line)));
            }

            self.start = self.current;

            match self.scan_token() {
                Err(e) => return Some(Err(e)),

                Ok(Some(token_type)) => {
                    debug!("Scanned {:?} on line {}", token_type, self.line);

                    return Some(Ok(Token::new(
                        token_type,
                        self.lexeme().to_owned(),
                        self.line,
                    )));
                }

                // Whitespace or comment: keep scanning.
                Ok(None) => {}
            }
        }

        None // already yielded EOF
    }
}

impl<'a> FusedIterator for Scanner<'a> {}
