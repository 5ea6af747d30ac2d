//! Iterator objects returned by `iter()` and consumed by `next()`.
//!
//! An iterator lives on the heap so every name bound to it shares the same
//! position: `it = iter("gulfem"); next(it); next(it)` yields `'g'` then `'u'`.
//! Materialising an iterator with `list()` or `tuple()` consumes it.

use std::fmt::{self, Write};

use crate::{
    args::ArgValues,
    exception_private::{ExcType, RunResult},
    heap::{Heap, HeapData, HeapId},
    resource::{LARGE_RESULT_THRESHOLD, ResourceTracker},
    types::{PyTrait, Range, Type, str::allocate_char},
    value::Value,
};

/// What an iterator walks over.
#[derive(Debug, Clone)]
pub(crate) enum IterSource {
    /// A snapshot of the string; the iterator index is a byte offset.
    Str(String),
    Range(Range),
    List(HeapId),
    Tuple(HeapId),
    DictKeys(HeapId),
}

/// A Python iterator: a source and a position within it.
#[derive(Debug, Clone)]
pub(crate) struct PyIter {
    index: usize,
    source: IterSource,
    /// Once set, the iterator yields nothing more even if the source grows.
    exhausted: bool,
}

/// An item peeked from an iterator before the position is committed.
///
/// Characters are kept unallocated so the peek only needs shared heap access.
enum IterItem {
    Value(Value),
    Char(char),
}

impl IterItem {
    fn into_value(self, heap: &mut Heap<impl ResourceTracker>) -> RunResult<Value> {
        match self {
            Self::Value(value) => Ok(value),
            Self::Char(c) => allocate_char(c, heap),
        }
    }
}

impl PyIter {
    fn new(source: IterSource) -> Self {
        Self {
            index: 0,
            source,
            exhausted: false,
        }
    }

    /// Builds a fresh iterator over an iterable that is not itself an iterator.
    fn from_iterable(value: Value, heap: &Heap<impl ResourceTracker>) -> RunResult<Self> {
        let Value::Ref(id) = value else {
            return Err(ExcType::type_error_not_iterable(value.py_type(heap)));
        };
        let source = match heap.get(id) {
            HeapData::Str(s) => IterSource::Str(s.as_str().to_owned()),
            HeapData::Range(r) => IterSource::Range(*r),
            HeapData::List(_) => IterSource::List(id),
            HeapData::Tuple(_) => IterSource::Tuple(id),
            HeapData::Dict(_) => IterSource::DictKeys(id),
            other => return Err(ExcType::type_error_not_iterable(other.py_type())),
        };
        Ok(Self::new(source))
    }

    /// Implements `iter(iterable)`.
    ///
    /// Calling `iter()` on an iterator returns that same iterator.
    pub fn init(heap: &mut Heap<impl ResourceTracker>, args: ArgValues) -> RunResult<Value> {
        let value = args.get_one_arg("iter")?;
        if let Value::Ref(id) = value
            && matches!(heap.get(id), HeapData::Iter(_))
        {
            return Ok(value);
        }
        let iter = Self::from_iterable(value, heap)?;
        let id = heap.allocate(HeapData::Iter(iter))?;
        Ok(Value::Ref(id))
    }

    /// Looks at the next item without moving.
    ///
    /// Returns the item and how far the index must advance to consume it.
    fn peek(&self, heap: &Heap<impl ResourceTracker>) -> Option<(IterItem, usize)> {
        if self.exhausted {
            return None;
        }
        match &self.source {
            IterSource::Str(s) => s[self.index..]
                .chars()
                .next()
                .map(|c| (IterItem::Char(c), c.len_utf8())),
            IterSource::Range(r) => i128::try_from(self.index)
                .ok()
                .and_then(|index| r.get(index))
                .map(|v| (IterItem::Value(Value::Int(v)), 1)),
            IterSource::List(id) => match heap.get(*id) {
                HeapData::List(list) => list.get(self.index).map(|v| (IterItem::Value(v), 1)),
                _ => None,
            },
            IterSource::Tuple(id) => match heap.get(*id) {
                HeapData::Tuple(tuple) => tuple.get(self.index).map(|v| (IterItem::Value(v), 1)),
                _ => None,
            },
            IterSource::DictKeys(id) => match heap.get(*id) {
                HeapData::Dict(dict) => dict.key_at(self.index).map(|v| (IterItem::Value(v), 1)),
                _ => None,
            },
        }
    }

    fn commit(&mut self, step: Option<usize>) {
        match step {
            Some(n) => self.index += n,
            None => self.exhausted = true,
        }
    }

    /// Items left, when the source knows its length up front.
    fn remaining_hint(&self) -> Option<i128> {
        match &self.source {
            IterSource::Range(r) if !self.exhausted => {
                i128::try_from(self.index).ok().map(|index| (r.len_i128() - index).max(0))
            }
            _ => None,
        }
    }
}

/// Advances the heap iterator `id`, returning `None` once it is exhausted.
///
/// The caller must have checked that `id` refers to an iterator.
fn advance(id: HeapId, heap: &mut Heap<impl ResourceTracker>) -> RunResult<Option<Value>> {
    let peeked = match heap.get(id) {
        HeapData::Iter(iter) => iter.peek(heap),
        other => return Err(ExcType::type_error_not_iterator(other.py_type())),
    };
    if let HeapData::Iter(iter) = heap.get_mut(id) {
        iter.commit(peeked.as_ref().map(|(_, step)| *step));
    }
    peeked.map(|(item, _)| item.into_value(heap)).transpose()
}

/// Implements `next(iterator)`, returning `None` once it is exhausted.
///
/// Raises `TypeError` when `value` is not an iterator; iterables like lists
/// must go through `iter()` first.
pub(crate) fn next_value(value: Value, heap: &mut Heap<impl ResourceTracker>) -> RunResult<Option<Value>> {
    match value {
        Value::Ref(id) if matches!(heap.get(id), HeapData::Iter(_)) => advance(id, heap),
        _ => Err(ExcType::type_error_not_iterator(value.py_type(heap))),
    }
}

/// Collects every item of an iterable into a vector.
///
/// Iterators are drained in place. Each item is charged as a container insert
/// and a time check, and ranges are size-checked before anything is produced.
pub(crate) fn collect_iterable(value: Value, heap: &mut Heap<impl ResourceTracker>) -> RunResult<Vec<Value>> {
    let shared = match value {
        Value::Ref(id) if matches!(heap.get(id), HeapData::Iter(_)) => Some(id),
        _ => None,
    };
    let mut local = match shared {
        Some(_) => None,
        None => Some(PyIter::from_iterable(value, heap)?),
    };

    let hint = match (&local, shared) {
        (Some(iter), _) => iter.remaining_hint(),
        (None, Some(id)) => match heap.get(id) {
            HeapData::Iter(iter) => iter.remaining_hint(),
            _ => None,
        },
        (None, None) => None,
    };
    let mut items = Vec::new();
    if let Some(len) = hint {
        let len = usize::try_from(len).unwrap_or(usize::MAX);
        let estimated = len.saturating_mul(std::mem::size_of::<Value>());
        if estimated > LARGE_RESULT_THRESHOLD {
            heap.tracker().check_large_result(estimated)?;
        }
        items.reserve(len.min(LARGE_RESULT_THRESHOLD));
    }

    loop {
        let next = match (&mut local, shared) {
            (Some(iter), _) => {
                let peeked = iter.peek(heap);
                iter.commit(peeked.as_ref().map(|(_, step)| *step));
                peeked.map(|(item, _)| item.into_value(heap)).transpose()?
            }
            (None, Some(id)) => advance(id, heap)?,
            (None, None) => None,
        };
        let Some(item) = next else { break };
        heap.tracker_mut().check_time()?;
        heap.tracker_mut().on_container_insert()?;
        items.push(item);
    }
    Ok(items)
}

impl PyTrait for PyIter {
    fn py_type(&self) -> Type {
        match self.source {
            IterSource::Str(_) => Type::StrIterator,
            IterSource::Range(_) => Type::RangeIterator,
            IterSource::List(_) => Type::ListIterator,
            IterSource::Tuple(_) => Type::TupleIterator,
            IterSource::DictKeys(_) => Type::DictKeyIterator,
        }
    }

    fn py_estimate_size(&self) -> usize {
        let extra = match &self.source {
            IterSource::Str(s) => s.len(),
            _ => 0,
        };
        std::mem::size_of::<Self>() + extra
    }

    fn py_repr_fmt(&self, f: &mut impl Write, _heap: &Heap<impl ResourceTracker>) -> fmt::Result {
        write!(f, "<{} object>", self.py_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        resource::{LimitedTracker, NoLimitTracker, ResourceLimits},
        types::str::allocate_str,
    };

    fn str_value(heap: &mut Heap<NoLimitTracker>, s: &str) -> Value {
        allocate_str(s.to_owned(), heap).unwrap()
    }

    fn as_string(value: Value, heap: &Heap<NoLimitTracker>) -> String {
        value.py_str(heap)
    }

    #[test]
    fn string_iterator_yields_characters_in_order() {
        let mut heap = Heap::new(8, NoLimitTracker);
        let s = str_value(&mut heap, "gulfem");
        let it = PyIter::init(&mut heap, ArgValues::One(s)).unwrap();
        let first = next_value(it, &mut heap).unwrap().unwrap();
        let second = next_value(it, &mut heap).unwrap().unwrap();
        assert_eq!(as_string(first, &heap), "g");
        assert_eq!(as_string(second, &heap), "u");
    }

    #[test]
    fn iter_of_iterator_is_identity() {
        let mut heap = Heap::new(8, NoLimitTracker);
        let s = str_value(&mut heap, "ab");
        let it = PyIter::init(&mut heap, ArgValues::One(s)).unwrap();
        let again = PyIter::init(&mut heap, ArgValues::One(it)).unwrap();
        assert_eq!(it, again);
    }

    #[test]
    fn exhausted_iterator_stays_exhausted() {
        let mut heap = Heap::new(8, NoLimitTracker);
        let s = str_value(&mut heap, "é");
        let it = PyIter::init(&mut heap, ArgValues::One(s)).unwrap();
        let only = next_value(it, &mut heap).unwrap().unwrap();
        assert_eq!(as_string(only, &heap), "é");
        assert!(next_value(it, &mut heap).unwrap().is_none());
        assert!(next_value(it, &mut heap).unwrap().is_none());
    }

    #[test]
    fn collecting_an_iterator_consumes_it() {
        let mut heap = Heap::new(8, NoLimitTracker);
        let s = str_value(&mut heap, "abc");
        let it = PyIter::init(&mut heap, ArgValues::One(s)).unwrap();
        next_value(it, &mut heap).unwrap();
        let rest = collect_iterable(it, &mut heap).unwrap();
        let rest: Vec<_> = rest.into_iter().map(|v| as_string(v, &heap)).collect();
        assert_eq!(rest, vec!["b", "c"]);
        assert!(next_value(it, &mut heap).unwrap().is_none());
    }

    #[test]
    fn non_iterables_are_rejected() {
        let mut heap = Heap::new(8, NoLimitTracker);
        let err = PyIter::init(&mut heap, ArgValues::One(Value::Int(5))).unwrap_err();
        let exc = err.into_python_exception("test.py", "");
        assert_eq!(exc.summary(), "TypeError: 'int' object is not iterable");

        let s = str_value(&mut heap, "abc");
        let exc = next_value(s, &mut heap).unwrap_err().into_python_exception("test.py", "");
        assert_eq!(exc.summary(), "TypeError: 'str' object is not an iterator");
    }

    #[test]
    fn huge_range_fails_before_materialising() {
        let mut heap = Heap::new(8, LimitedTracker::new(ResourceLimits::new().max_memory(1_000_000)));
        let id = heap
            .allocate(HeapData::Range(Range::new(0, 1 << 40, 1).unwrap()))
            .unwrap();
        let exc = collect_iterable(Value::Ref(id), &mut heap)
            .unwrap_err()
            .into_python_exception("test.py", "");
        assert_eq!(exc.exc_type(), ExcType::MemoryError);
    }
}
