//! Implementation of the next() builtin function.

use crate::{
    args::ArgValues,
    exception_private::{ExcType, RunResult},
    heap::Heap,
    resource::ResourceTracker,
    types::iter::next_value,
    value::Value,
};

/// Implementation of the next() builtin function.
///
/// `next(it)` raises `StopIteration` once the iterator is exhausted;
/// `next(it, default)` returns `default` instead.
pub fn builtin_next(heap: &mut Heap<impl ResourceTracker>, args: ArgValues) -> RunResult<Value> {
    let (iterator, default) = args.get_one_two_args("next")?;
    match (next_value(iterator, heap)?, default) {
        (Some(item), _) => Ok(item),
        (None, Some(default)) => Ok(default),
        (None, None) => Err(ExcType::stop_iteration()),
    }
}
