use std::fmt::{self, Write};

use crate::{
    args::ArgValues,
    exception_private::RunResult,
    heap::{Heap, HeapData},
    resource::ResourceTracker,
    types::{PyTrait, Type, iter::collect_iterable},
    value::Value,
};

/// Python `list`.
#[derive(Debug, Clone, Default)]
pub(crate) struct List(Vec<Value>);

impl List {
    #[must_use]
    pub fn new(items: Vec<Value>) -> Self {
        Self(items)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.get(index).copied()
    }

    /// Implements `list()` and `list(iterable)`.
    ///
    /// Materialising an iterator consumes it: afterwards `next(it)` raises `StopIteration`.
    pub fn init(heap: &mut Heap<impl ResourceTracker>, args: ArgValues) -> RunResult<Value> {
        let items = match args.get_zero_one_arg("list")? {
            None => Vec::new(),
            Some(iterable) => collect_iterable(iterable, heap)?,
        };
        allocate_list(items, heap)
    }
}

impl PyTrait for List {
    fn py_type(&self) -> Type {
        Type::List
    }

    fn py_estimate_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.0.len() * std::mem::size_of::<Value>()
    }

    fn py_repr_fmt(&self, f: &mut impl Write, heap: &Heap<impl ResourceTracker>) -> fmt::Result {
        f.write_char('[')?;
        sequence_items_fmt(&self.0, f, heap)?;
        f.write_char(']')
    }
}

pub(crate) fn allocate_list(items: Vec<Value>, heap: &mut Heap<impl ResourceTracker>) -> RunResult<Value> {
    let id = heap.allocate(HeapData::List(List::new(items)))?;
    Ok(Value::Ref(id))
}

/// Writes `repr()` of each item separated by `", "`.
pub(crate) fn sequence_items_fmt(items: &[Value], f: &mut impl Write, heap: &Heap<impl ResourceTracker>) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item.py_repr_fmt(f, heap)?;
    }
    Ok(())
}
