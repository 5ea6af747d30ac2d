//! Scripts bundled with the interpreter.

/// Smoke test for the `abs`, `complex`, `len`, `range` and `iter`/`next` builtins.
pub const BUILTINS_TEST: &str = include_str!("../scripts/builtins_test.py");

/// Script name used in tracebacks for [`BUILTINS_TEST`].
pub const BUILTINS_TEST_NAME: &str = "builtins_test.py";

/// Exact stdout of [`BUILTINS_TEST`].
pub const BUILTINS_TEST_OUTPUT: &str = "\
10
10.25
2.23606797749979
0j
(2+0j)
(2+3j)
5
3
4
2
[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]
[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]
[0, 5, 10, 15, 20, 25]
g
u
";
