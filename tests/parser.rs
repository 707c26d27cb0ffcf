#[cfg(test)]
mod parser_tests {
    use quill_script as quill;

    use quill::ast_printer::AstPrinter;
    use quill::error::QuillError;
    use quill::expr::Expr;
    use quill::stmt::Stmt;

    fn parse_source(source: &str) -> Vec<Stmt> {
        let tokens = quill::tokenize(source).expect("tokenize failed");
        quill::parse(&tokens).expect("parse failed")
    }

    fn parse_errors(source: &str) -> Vec<QuillError> {
        let tokens = quill::tokenize(source).expect("tokenize failed");
        quill::parse(&tokens).expect_err("parse unexpectedly succeeded")
    }

    /// Renders the expression of a single expression statement.
    fn render_expression(source: &str) -> String {
        let statements = parse_source(source);

        assert_eq!(statements.len(), 1);

        match &statements[0] {
            Stmt::Expression(expr) => AstPrinter.print(expr),
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_parser_binary_precedence() {
        assert_eq!(render_expression("1 + 2 * 3;"), "(+ 1.0 (* 2.0 3.0))");
        assert_eq!(render_expression("1 * 2 + 3;"), "(+ (* 1.0 2.0) 3.0)");
        assert_eq!(render_expression("1 + 2 < 3 + 4;"), "(< (+ 1.0 2.0) (+ 3.0 4.0))");
        assert_eq!(render_expression("1 < 2 == true;"), "(== (< 1.0 2.0) true)");
    }

    #[test]
    fn test_parser_left_associativity() {
        assert_eq!(render_expression("1 - 2 - 3;"), "(- (- 1.0 2.0) 3.0)");
        assert_eq!(render_expression("8 / 4 / 2;"), "(/ (/ 8.0 4.0) 2.0)");
    }

    #[test]
    fn test_parser_grouping_overrides_precedence() {
        assert_eq!(render_expression("(1 + 2) * 3;"), "(* (group (+ 1.0 2.0)) 3.0)");
    }

    #[test]
    fn test_parser_unary_nesting() {
        assert_eq!(render_expression("!!true;"), "(! (! true))");
        assert_eq!(render_expression("-1 + 2;"), "(+ (- 1.0) 2.0)");
    }

    #[test]
    fn test_parser_logical_precedence() {
        // `or` binds looser than `and`.
        assert_eq!(
            render_expression("a or b and c;"),
            "(or a (and b c))"
        );
    }

    #[test]
    fn test_parser_assignment_is_right_associative() {
        assert_eq!(
            render_expression("a = b = 1;"),
            "(assign a (assign b 1.0))"
        );
    }

    #[test]
    fn test_parser_invalid_assignment_target() {
        let errors = parse_errors("1 + 2 = 3;");

        assert_eq!(errors.len(), 1);
        assert!(
            errors[0].to_string().contains("Invalid assignment target"),
            "got: {}",
            errors[0]
        );
    }

    #[test]
    fn test_parser_call_chains() {
        assert_eq!(render_expression("f(1)(2, 3);"), "(call (call f 1.0) 2.0 3.0)");
        assert_eq!(render_expression("clock();"), "(call clock)");
    }

    #[test]
    fn test_parser_statement_forms() {
        let statements = parse_source(
            "var x = 1;\n\
             print x;\n\
             { var y = 2; }\n\
             if (x > 0) print x; else print 0;\n\
             while (x > 0) x = x - 1;\n\
             fun add(a, b) { return a + b; }",
        );

        assert_eq!(statements.len(), 6);

        assert!(matches!(&statements[0], Stmt::Var(name, Some(_)) if name.lexeme == "x"));
        assert!(matches!(&statements[1], Stmt::Print(_)));
        assert!(matches!(&statements[2], Stmt::Block(inner) if inner.len() == 1));
        assert!(matches!(&statements[3], Stmt::If(_, _, Some(_))));
        assert!(matches!(&statements[4], Stmt::While(_, _)));

        match &statements[5] {
            Stmt::Function(declaration) => {
                assert_eq!(declaration.name.lexeme, "add");
                assert_eq!(declaration.params.len(), 2);
                assert_eq!(declaration.body.len(), 1);
                assert!(matches!(&declaration.body[0], Stmt::Return(_, Some(_))));
            }
            other => panic!("Expected function declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parser_var_without_initializer() {
        let statements = parse_source("var x;");

        assert!(matches!(&statements[0], Stmt::Var(_, None)));
    }

    #[test]
    fn test_parser_return_without_value() {
        let statements = parse_source("fun f() { return; }");

        match &statements[0] {
            Stmt::Function(declaration) => {
                assert!(matches!(&declaration.body[0], Stmt::Return(_, None)));
            }
            other => panic!("Expected function declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parser_reports_multiple_errors_in_one_pass() {
        // Two malformed statements with a healthy one in between: the parser
        // must resynchronize after the first error and find the second.
        let errors = parse_errors("var = 1;\nprint 2;\nvar y 3;");

        assert_eq!(errors.len(), 2);

        for e in &errors {
            assert!(matches!(e, QuillError::Parse { .. }), "got: {:?}", e);
        }
    }

    #[test]
    fn test_parser_error_carries_offending_token_and_line() {
        let errors = parse_errors("print 1\nprint 2;");

        assert_eq!(errors.len(), 1);

        match &errors[0] {
            QuillError::Parse { found, line, .. } => {
                // The second `print` is where the missing ';' is noticed.
                assert_eq!(found, "print");
                assert_eq!(*line, 2);
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parser_failure_yields_no_statements() {
        let tokens = quill::tokenize("var x = ;").expect("tokenize failed");

        assert!(quill::parse(&tokens).is_err());
    }

    #[test]
    fn test_parser_error_at_eof_reports_end() {
        let errors = parse_errors("print 1 +");

        match &errors[0] {
            QuillError::Parse { found, .. } => assert_eq!(found, "end"),
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_is_idempotent() {
        let source = "var x = 1;\nfun inc(n) { return n + 1; }\nprint inc(x) * 2;";

        let first = parse_source(source);
        let second = parse_source(source);

        assert_eq!(first, second);
    }

    #[test]
    fn test_parser_nested_blocks() {
        let statements = parse_source("{ { var x = 1; } }");

        match &statements[0] {
            Stmt::Block(outer) => match &outer[0] {
                Stmt::Block(inner) => assert!(matches!(&inner[0], Stmt::Var(_, Some(_)))),
                other => panic!("Expected nested block, got {:?}", other),
            },
            other => panic!("Expected block, got {:?}", other),
        }
    }

    #[test]
    fn test_parser_keeps_literal_values() {
        let statements = parse_source("print \"a\" + \"b\";");

        match &statements[0] {
            Stmt::Print(Expr::Binary(left, _, right)) => {
                assert_eq!(AstPrinter.print(left), "a");
                assert_eq!(AstPrinter.print(right), "b");
            }
            other => panic!("Expected print of a binary expression, got {:?}", other),
        }
    }
}
