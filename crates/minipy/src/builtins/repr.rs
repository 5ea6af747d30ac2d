//! Implementation of the repr() builtin function.

use crate::{
    args::ArgValues, exception_private::RunResult, heap::Heap, resource::ResourceTracker, types::str::allocate_str,
    value::Value,
};

/// Implementation of the repr() builtin function.
pub fn builtin_repr(heap: &mut Heap<impl ResourceTracker>, args: ArgValues) -> RunResult<Value> {
    let value = args.get_one_arg("repr")?;
    let repr = value.py_repr(heap);
    allocate_str(repr, heap)
}
