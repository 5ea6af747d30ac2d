//! Implementation of the len() builtin function.

use crate::{
    args::ArgValues,
    exception_private::{ExcType, RunError, RunResult},
    heap::{Heap, HeapData},
    resource::ResourceTracker,
    types::Type,
    value::Value,
};

/// Implementation of the len() builtin function.
///
/// Strings count code points. Ranges whose length does not fit an i64 raise
/// `OverflowError` as CPython does.
pub fn builtin_len(heap: &mut Heap<impl ResourceTracker>, args: ArgValues) -> RunResult<Value> {
    let value = args.get_one_arg("len")?;
    let len = match value {
        Value::Ref(id) => match heap.get(id) {
            HeapData::Str(s) => s.char_len(),
            HeapData::List(l) => l.len(),
            HeapData::Tuple(t) => t.len(),
            HeapData::Dict(d) => d.len(),
            HeapData::Range(r) => {
                return i64::try_from(r.len_i128())
                    .map(Value::Int)
                    .map_err(|_| ExcType::overflow_error("Python int too large to convert to C ssize_t"));
            }
            other => return Err(no_len(other.py_type())),
        },
        other => return Err(no_len(other.py_type(heap))),
    };
    i64::try_from(len)
        .map(Value::Int)
        .map_err(|_| ExcType::overflow_error("Python int too large to convert to C ssize_t"))
}

fn no_len(type_: Type) -> RunError {
    ExcType::type_error(format!("object of type '{type_}' has no len()"))
}
