#[cfg(test)]
mod scanner_tests {
    use quill_script as quill;

    use quill::scanner::*;
    use quill::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn test_scanner_symbols() {
        assert_token_sequence(
            "({*,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_operators() {
        assert_token_sequence(
            "! != = == < <= > >= / -",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::SLASH, "/"),
                (TokenType::MINUS, "-"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_keywords_and_identifiers() {
        assert_token_sequence(
            "var count = nil; while fun printer returning",
            &[
                (TokenType::VAR, "var"),
                (TokenType::IDENTIFIER, "count"),
                (TokenType::EQUAL, "="),
                (TokenType::NIL, "nil"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::WHILE, "while"),
                (TokenType::FUN, "fun"),
                (TokenType::IDENTIFIER, "printer"),
                (TokenType::IDENTIFIER, "returning"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_string_literal_payload() {
        let scanner = Scanner::new("\"hello quill\"");
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].lexeme, "\"hello quill\"");

        match &tokens[0].token_type {
            TokenType::STRING(s) => assert_eq!(s, "hello quill"),
            other => panic!("Expected STRING, got {:?}", other),
        }
    }

    #[test]
    fn test_scanner_multiline_string_tracks_lines() {
        let scanner = Scanner::new("\"one\ntwo\"\nvar");
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        // String token reports the line where it *ends*.
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[1].token_type, TokenType::VAR);
        assert_eq!(tokens[1].line, 3);
    }

    #[test]
    fn test_scanner_unterminated_string() {
        let scanner = Scanner::new("\"never closed");
        let results: Vec<_> = scanner.collect();

        let errors: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();

        assert_eq!(errors.len(), 1);
        assert!(
            errors[0].to_string().contains("Unterminated string."),
            "got: {}",
            errors[0]
        );
    }

    #[test]
    fn test_scanner_numbers() {
        let scanner = Scanner::new("123 3.14 0.5");
        let numbers: Vec<f64> = scanner
            .filter_map(Result::ok)
            .filter_map(|token| match token.token_type {
                TokenType::NUMBER(n) => Some(n),
                _ => None,
            })
            .collect();

        assert_eq!(numbers, vec![123.0, 3.14, 0.5]);
    }

    #[test]
    fn test_scanner_number_with_trailing_dot() {
        // The dot is not part of the number and is itself not a valid token.
        let scanner = Scanner::new("3.");
        let results: Vec<_> = scanner.collect();

        assert_eq!(results.len(), 3);

        match &results[0] {
            Ok(token) => assert_eq!(token.token_type, TokenType::NUMBER(3.0)),
            Err(e) => panic!("Expected number token, got error: {}", e),
        }

        assert!(results[1].is_err());
        assert!(matches!(
            &results[2],
            Ok(token) if token.token_type == TokenType::EOF
        ));
    }

    #[test]
    fn test_scanner_comments_skipped() {
        assert_token_sequence(
            "var x; // trailing comment\n// full line\nprint x;",
            &[
                (TokenType::VAR, "var"),
                (TokenType::IDENTIFIER, "x"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::PRINT, "print"),
                (TokenType::IDENTIFIER, "x"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_line_numbers() {
        let scanner = Scanner::new("var a;\nvar b;\n\nvar c;");
        let lines: Vec<usize> = scanner
            .filter_map(Result::ok)
            .filter(|token| token.token_type == TokenType::VAR)
            .map(|token| token.line)
            .collect();

        assert_eq!(lines, vec![1, 2, 4]);
    }

    #[test]
    fn test_scanner_recovers_past_unexpected_chars() {
        let source = ",$(#";
        let scanner = Scanner::new(source);

        let results: Vec<_> = scanner.collect();

        // Expected sequence: COMMA, error for '$', LEFT_PAREN, error for '#',
        // then EOF. Scanning continues past each bad byte.
        assert_eq!(results.len(), 5, "Expected 5 items in result");

        assert_token_matches(&results[0], TokenType::COMMA, ",");
        assert_token_matches(&results[2], TokenType::LEFT_PAREN, "(");
        assert_token_matches(&results[4], TokenType::EOF, "");

        let error_count = results.iter().filter(|r| r.is_err()).count();
        assert_eq!(error_count, 2, "Expected 2 error messages");

        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(
                err.to_string().contains("Unexpected character"),
                "Error message should contain 'Unexpected character', got: {}",
                err
            );
        }

        fn assert_token_matches(
            result: &Result<Token, quill::error::QuillError>,
            expected_type: TokenType,
            expected_lexeme: &str,
        ) {
            match result {
                Ok(token) => {
                    assert_eq!(
                        token.token_type, expected_type,
                        "Expected token type {:?}, got {:?}",
                        expected_type, token.token_type
                    );
                    assert_eq!(
                        token.lexeme, expected_lexeme,
                        "Expected lexeme '{}', got '{}'",
                        expected_lexeme, token.lexeme
                    );
                }
                Err(e) => panic!("Expected token but got error: {}", e),
            }
        }
    }

    #[test]
    fn test_scanner_emits_single_eof() {
        let mut scanner = Scanner::new("");

        match scanner.next() {
            Some(Ok(token)) => assert_eq!(token.token_type, TokenType::EOF),
            other => panic!("Expected EOF token, got {:?}", other),
        }

        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none()); // fused
    }
}
