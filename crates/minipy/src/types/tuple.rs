use std::fmt::{self, Write};

use smallvec::SmallVec;

use crate::{
    args::ArgValues,
    exception_private::RunResult,
    heap::{Heap, HeapData},
    resource::ResourceTracker,
    types::{PyTrait, Type, iter::collect_iterable, list::sequence_items_fmt},
    value::Value,
};

/// Python `tuple`.
///
/// Most tuples in scripts are short, so items are stored inline up to three.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tuple(SmallVec<[Value; 3]>);

impl Tuple {
    #[must_use]
    pub fn new(items: SmallVec<[Value; 3]>) -> Self {
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

    /// Implements `tuple()` and `tuple(iterable)`.
    pub fn init(heap: &mut Heap<impl ResourceTracker>, args: ArgValues) -> RunResult<Value> {
        match args.get_zero_one_arg("tuple")? {
            None => allocate_tuple(SmallVec::new(), heap),
            Some(Value::Ref(id)) if matches!(heap.get(id), HeapData::Tuple(_)) => Ok(Value::Ref(id)),
            Some(iterable) => {
                let items = collect_iterable(iterable, heap)?;
                allocate_tuple(SmallVec::from_vec(items), heap)
            }
        }
    }
}

impl PyTrait for Tuple {
    fn py_type(&self) -> Type {
        Type::Tuple
    }

    fn py_estimate_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.0.len() * std::mem::size_of::<Value>()
    }

    fn py_repr_fmt(&self, f: &mut impl Write, heap: &Heap<impl ResourceTracker>) -> fmt::Result {
        f.write_char('(')?;
        sequence_items_fmt(&self.0, f, heap)?;
        // a 1-tuple needs the trailing comma to round-trip
        if self.0.len() == 1 {
            f.write_char(',')?;
        }
        f.write_char(')')
    }
}

pub(crate) fn allocate_tuple(items: SmallVec<[Value; 3]>, heap: &mut Heap<impl ResourceTracker>) -> RunResult<Value> {
    let id = heap.allocate(HeapData::Tuple(Tuple::new(items)))?;
    Ok(Value::Ref(id))
}
