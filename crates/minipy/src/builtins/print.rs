//! Implementation of the print() builtin function.

use crate::{
    args::ArgValues, exception_private::RunResult, heap::Heap, io::PrintWriter, resource::ResourceTracker,
    value::Value,
};

/// Implementation of the print() builtin function.
///
/// Writes `str()` of each argument separated by a space, then a newline.
/// Returns `None`.
pub fn builtin_print(
    heap: &mut Heap<impl ResourceTracker>,
    args: ArgValues,
    print: &mut impl PrintWriter,
) -> RunResult<Value> {
    for (i, value) in args.into_vec().into_iter().enumerate() {
        if i > 0 {
            print.stdout_push(' ')?;
        }
        print.stdout_write(value.py_str(heap).into())?;
    }
    print.stdout_push('\n')?;
    Ok(Value::None)
}
