use std::cell::Cell;

use crate::{
    resource::{MAX_DATA_RECURSION_DEPTH, ResourceError, ResourceTracker},
    types::{Complex, Dict, List, LongInt, PyIter, PyTrait, Range, Str, Tuple, Type},
};

/// Index of an object in the [`Heap`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct HeapId(usize);

impl HeapId {
    /// Returns the raw index value.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Objects that live on the heap rather than inline in a [`crate::value::Value`].
///
/// Immutable scalars that do not fit a machine word (big ints, complex numbers)
/// are heap objects too, so `Value` stays `Copy`.
#[derive(Debug)]
pub(crate) enum HeapData {
    Str(Str),
    Tuple(Tuple),
    List(List),
    Dict(Dict),
    Range(Range),
    Iter(PyIter),
    LongInt(LongInt),
    Complex(Complex),
}

impl HeapData {
    pub fn py_type(&self) -> Type {
        match self {
            Self::Str(s) => s.py_type(),
            Self::Tuple(t) => t.py_type(),
            Self::List(l) => l.py_type(),
            Self::Dict(d) => d.py_type(),
            Self::Range(r) => r.py_type(),
            Self::Iter(i) => i.py_type(),
            Self::LongInt(li) => li.py_type(),
            Self::Complex(c) => c.py_type(),
        }
    }

    fn py_estimate_size(&self) -> usize {
        match self {
            Self::Str(s) => s.py_estimate_size(),
            Self::Tuple(t) => t.py_estimate_size(),
            Self::List(l) => l.py_estimate_size(),
            Self::Dict(d) => d.py_estimate_size(),
            Self::Range(r) => r.py_estimate_size(),
            Self::Iter(i) => i.py_estimate_size(),
            Self::LongInt(li) => li.py_estimate_size(),
            Self::Complex(c) => c.py_estimate_size(),
        }
    }
}

/// Arena holding every object allocated during one run.
///
/// Objects are never freed individually: a run is short-lived and the whole
/// arena is dropped when it finishes, so there is no reference counting and
/// `HeapId`s stay valid for the lifetime of the heap.
#[derive(Debug)]
pub(crate) struct Heap<T: ResourceTracker> {
    entries: Vec<HeapData>,
    tracker: T,
    /// Remaining budget for recursive walks over nested containers.
    ///
    /// A `Cell` so walks that only hold `&Heap` (repr, hashing) can use it.
    data_depth_remaining: Cell<u16>,
}

impl<T: ResourceTracker> Heap<T> {
    pub fn new(capacity: usize, tracker: T) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            tracker,
            data_depth_remaining: Cell::new(MAX_DATA_RECURSION_DEPTH),
        }
    }

    /// Allocates a new object, charging it to the resource tracker first.
    pub fn allocate(&mut self, data: HeapData) -> Result<HeapId, ResourceError> {
        self.tracker.on_allocate(|| data.py_estimate_size())?;
        let id = HeapId(self.entries.len());
        self.entries.push(data);
        Ok(id)
    }

    /// Returns the object stored at `id`.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this heap.
    pub fn get(&self, id: HeapId) -> &HeapData {
        &self.entries[id.index()]
    }

    /// Returns the object stored at `id` mutably.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this heap.
    pub fn get_mut(&mut self, id: HeapId) -> &mut HeapData {
        &mut self.entries[id.index()]
    }

    /// Number of objects allocated so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut T {
        &mut self.tracker
    }

    /// Attempts to enter one level of data structure recursion.
    ///
    /// Returns `false` once the depth limit is reached; the budget is then left
    /// untouched and [`Self::data_depth_exit`] must not be called. After `true`
    /// the caller must call `data_depth_exit` exactly once.
    #[inline]
    pub fn data_depth_enter(&self) -> bool {
        let remaining = self.data_depth_remaining.get();
        if remaining == 0 {
            false
        } else {
            self.data_depth_remaining.set(remaining - 1);
            true
        }
    }

    /// Exits one level of data structure recursion.
    #[inline]
    pub fn data_depth_exit(&self) {
        self.data_depth_remaining.set(self.data_depth_remaining.get() + 1);
    }
}
