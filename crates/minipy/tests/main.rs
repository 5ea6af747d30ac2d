use indexmap::IndexMap;
use minipy::{
    CollectStringPrint, ExcType, LimitedTracker, MAX_DATA_RECURSION_DEPTH, NoLimitTracker, Object, ResourceLimits,
    Runner,
    scripts::{BUILTINS_TEST, BUILTINS_TEST_NAME, BUILTINS_TEST_OUTPUT},
};
use pretty_assertions::assert_eq;

#[test]
fn builtins_test_prints_expected_lines() {
    let runner = Runner::new(BUILTINS_TEST.to_owned(), BUILTINS_TEST_NAME).unwrap();
    let mut print = CollectStringPrint::new();
    let value = runner.run(NoLimitTracker, &mut print).unwrap();
    assert_eq!(value, Object::None);
    assert_eq!(print.output(), BUILTINS_TEST_OUTPUT);
    assert_eq!(print.output().lines().count(), 15);
}

#[test]
fn builtins_test_final_globals() {
    let runner = Runner::new(BUILTINS_TEST.to_owned(), BUILTINS_TEST_NAME).unwrap();
    let mut print = CollectStringPrint::new();
    let output = runner.run_with_globals(NoLimitTracker, &mut print).unwrap();
    let names: Vec<&str> = output.globals.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["x", "value", "str", "it"]);
    assert_eq!(output.globals["x"], Object::Complex { real: 2.0, imag: 3.0 });
    assert_eq!(
        output.globals["value"].to_string(),
        "{'id': 17, 'name': 'gulfem'}"
    );
    assert_eq!(output.globals["str"], Object::String("gulfem".to_owned()));
    assert_eq!(output.globals["it"], Object::Repr("<str_iterator object>".to_owned()));
}

/// Test we can reuse a runner; each run gets a fresh iterator.
#[test]
fn repeat_exec() {
    let runner = Runner::new("it = iter('gulfem')\nnext(it)\nnext(it)".to_owned(), "test.py").unwrap();

    let r = runner.run(NoLimitTracker, &mut CollectStringPrint::new()).unwrap();
    assert_eq!(r, Object::String("u".to_owned()));

    let r = runner.run(NoLimitTracker, &mut CollectStringPrint::new()).unwrap();
    assert_eq!(r, Object::String("u".to_owned()));
}

#[test]
fn last_expression_is_returned() {
    let runner = Runner::new("x = 41\nx + 1".to_owned(), "test.py").unwrap();
    assert_eq!(runner.run_no_limits().unwrap(), Object::Int(42));
    assert_eq!(runner.code(), "x = 41\nx + 1");

    let runner = Runner::new("x = 41".to_owned(), "test.py").unwrap();
    assert_eq!(runner.run_no_limits().unwrap(), Object::None);
}

#[test]
fn objects_snapshot_containers() {
    let code = "(1, 2.5, 'a', [None, True], {'k': 3j}, 99999999999999999999)";
    let runner = Runner::new(code.to_owned(), "test.py").unwrap();
    let value = runner.run_no_limits().unwrap();
    assert_eq!(
        value,
        Object::Tuple(vec![
            Object::Int(1),
            Object::Float(2.5),
            Object::String("a".to_owned()),
            Object::List(vec![Object::None, Object::Bool(true)]),
            Object::Dict(vec![(
                Object::String("k".to_owned()),
                Object::Complex { real: 0.0, imag: 3.0 }
            )]),
            Object::BigInt("99999999999999999999".parse().unwrap()),
        ])
    );
    assert_eq!(
        value.py_repr(),
        "(1, 2.5, 'a', [None, True], {'k': 3j}, 99999999999999999999)"
    );
}

#[test]
fn globals_skip_unexecuted_assignments() {
    let runner = Runner::new("a = 1\nb = missing\nc = 3".to_owned(), "test.py").unwrap();
    let err = runner
        .run_with_globals(NoLimitTracker, &mut CollectStringPrint::new())
        .unwrap_err();
    assert_eq!(err.exc_type(), ExcType::NameError);

    let runner = Runner::new("a = 1\nprint(a)".to_owned(), "test.py").unwrap();
    let output = runner
        .run_with_globals(NoLimitTracker, &mut CollectStringPrint::new())
        .unwrap();
    let mut expected = IndexMap::new();
    expected.insert("a".to_owned(), Object::Int(1));
    assert_eq!(output.globals, expected);
}

#[test]
fn runtime_error_has_traceback() {
    let code = "x = 1\nprint(x)\nlen(5)";
    let runner = Runner::new(code.to_owned(), "test.py").unwrap();
    let mut print = CollectStringPrint::new();
    let err = runner.run(NoLimitTracker, &mut print).unwrap_err();
    // output before the failing statement is kept
    assert_eq!(print.output(), "1\n");
    assert_eq!(err.exc_type(), ExcType::TypeError);
    assert_eq!(
        err.to_string(),
        "Traceback (most recent call last):\n  File \"test.py\", line 3, in <module>\n    len(5)\nTypeError: object of type 'int' has no len()"
    );
    let frame = err.traceback().unwrap();
    assert_eq!(frame.start.line, 3);
    assert_eq!(frame.start.column, 1);
}

/// Builds `depth` levels of `wrap` around `empty`, one assignment per line.
fn nested_script(empty: &str, wrap: &str, depth: usize, tail: &str) -> String {
    let mut code = format!("x = {empty}\n");
    for _ in 0..depth {
        code.push_str(wrap);
        code.push('\n');
    }
    code.push_str(tail);
    code
}

#[test]
fn deeply_nested_list_repr_is_truncated() {
    let code = nested_script("[]", "x = [x]", 200_000, "print(x)");
    let runner = Runner::new(code, "test.py").unwrap();
    let mut print = CollectStringPrint::new();
    let tracker = LimitedTracker::new(ResourceLimits::new().max_memory(100_000_000));
    runner.run(tracker, &mut print).unwrap();
    let output = print.into_output();
    let depth = usize::from(MAX_DATA_RECURSION_DEPTH);
    assert_eq!(output, format!("{}...{}\n", "[".repeat(depth), "]".repeat(depth)));
}

#[test]
fn deeply_nested_result_object_is_truncated() {
    let code = nested_script("[]", "x = [x]", 2_000, "x");
    let value = Runner::new(code, "test.py").unwrap().run_no_limits().unwrap();
    let mut innermost = &value;
    let mut levels = 0;
    while let Object::List(items) = innermost {
        innermost = &items[0];
        levels += 1;
    }
    assert_eq!(levels, usize::from(MAX_DATA_RECURSION_DEPTH));
    assert_eq!(innermost, &Object::Repr("...".to_owned()));
}

#[test]
fn hashing_deeply_nested_tuple_is_a_recursion_error() {
    let code = nested_script("()", "x = (x,)", 2_000, "d = {x: 1}");
    let err = Runner::new(code, "test.py").unwrap().run_no_limits().unwrap_err();
    assert_eq!(err.exc_type(), ExcType::RecursionError);
    assert_eq!(err.traceback().unwrap().start.line, 2_002);
}
