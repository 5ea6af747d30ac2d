use minipy::{ExcType, Exception, Runner};
use pretty_assertions::assert_eq;

/// Helper to extract the exception from a parse error.
fn parse_err(code: &str) -> Exception {
    Runner::new(code.to_owned(), "test.py").expect_err("expected parse error")
}

#[test]
fn complex_numbers_compile_successfully() {
    let result = Runner::new("1 + 2j".to_owned(), "test.py");
    assert!(result.is_ok(), "complex literal expressions should parse successfully");
}

#[test]
fn original_script_form_compiles() {
    let code = "# comment\nx = complex(2,3)\n\n     \nvalue = {'id' : 17,\n         'name' : \"gulfem\"}\nprint(len(value)) # 2\n";
    assert!(Runner::new(code.to_owned(), "test.py").is_ok());
}

#[test]
fn legacy_print_statement_suggests_parentheses() {
    let exc = parse_err("str = \"gulfem\"\nit = iter(str)\nprint it.next()\nprint it.next()");
    assert_eq!(exc.exc_type(), ExcType::SyntaxError);
    assert_eq!(
        exc.to_string(),
        "Traceback (most recent call last):\n  File \"test.py\", line 3, in <module>\n    print it.next()\n\
         SyntaxError: Missing parentheses in call to 'print'. Did you mean print(...)?"
    );
}

#[test]
fn unsupported_syntax_returns_not_implemented_error() {
    for code in ["it.next()", "{1, 2}", "print(1, end='')", "for x in range(3): x", "x[0]", "x += 1", "a, b = 1, 2"] {
        let exc = parse_err(code);
        assert_eq!(exc.exc_type(), ExcType::NotImplementedError, "{code}");
        assert!(
            exc.message().is_some_and(|m| m.starts_with("The minipy parser does not yet support ")),
            "message should mention unsupported feature, got: {exc}"
        );
    }
}

#[test]
fn unsupported_operator_has_descriptive_message() {
    let exc = parse_err("1 / 2");
    assert_eq!(
        exc.summary(),
        "NotImplementedError: The minipy parser does not yet support the '/' operator"
    );
}

#[test]
fn syntax_errors() {
    assert_eq!(parse_err("print(1").summary(), "SyntaxError: '(' was never closed");
    assert_eq!(
        parse_err("x = (1]").summary(),
        "SyntaxError: closing parenthesis ']' does not match opening parenthesis '('"
    );
    for code in ["x = ", "f(1 2)", "x = 'abc"] {
        assert_eq!(parse_err(code).exc_type(), ExcType::SyntaxError, "{code}");
    }
    assert_eq!(
        parse_err("len(x) = 1").summary(),
        "SyntaxError: cannot assign to function call here. Maybe you meant '==' instead of '='?"
    );
}

#[test]
fn deeply_nested_brackets_are_rejected() {
    let code = format!("x = {}1{}\nprint(x)", "(".repeat(1000), ")".repeat(1000));
    let exc = parse_err(&code);
    assert_eq!(exc.summary(), "SyntaxError: too many nested parentheses");
    assert_eq!(exc.traceback().unwrap().start.line, 1);
}

#[test]
fn long_operator_chain_raises_recursion_error() {
    let exc = parse_err(&format!("x = 1{}\nprint(x)", "+1".repeat(200_000)));
    assert_eq!(
        exc.summary(),
        "RecursionError: maximum recursion depth exceeded during compilation"
    );
}

#[test]
fn operator_chain_within_limit_runs() {
    let code = format!("x = 1{}\nprint(x)", "+1".repeat(20));
    assert!(Runner::new(code, "test.py").is_ok());
}

#[test]
fn indentation_error() {
    let exc = parse_err("x = 1\n  print(x)");
    assert_eq!(exc.exc_type(), ExcType::IndentationError);
    assert_eq!(exc.traceback().unwrap().start.line, 2);
}

#[test]
fn error_location_points_at_token() {
    let exc = parse_err("x = 1\ny = (1 +\n     $)");
    let frame = exc.traceback().unwrap();
    assert_eq!((frame.start.line, frame.start.column), (3, 6));
    assert_eq!(frame.preview_line.as_deref(), Some("$)"));
}
