use std::fmt::{self, Write};

use crate::{
    args::ArgValues,
    exception_private::{ExcType, RunResult},
    heap::{Heap, HeapData},
    resource::ResourceTracker,
    types::{PyTrait, Type},
    value::Value,
};

/// Python `range`: a lazy arithmetic progression.
///
/// Bounds are limited to i64; an argument that does not fit raises `OverflowError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Range {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl Range {
    /// Creates a range, rejecting a zero step.
    pub fn new(start: i64, stop: i64, step: i64) -> RunResult<Self> {
        if step == 0 {
            return Err(ExcType::value_error("range() arg 3 must not be zero"));
        }
        Ok(Self { start, stop, step })
    }

    /// Implements `range(stop)`, `range(start, stop)` and `range(start, stop, step)`.
    pub fn init(heap: &mut Heap<impl ResourceTracker>, args: ArgValues) -> RunResult<Value> {
        let values = args.into_vec();
        let range = match values.as_slice() {
            [] => return Err(ExcType::type_error_at_least("range", 1, 0)),
            [stop] => Self::new(0, stop.as_index(heap)?, 1)?,
            [start, stop] => Self::new(start.as_index(heap)?, stop.as_index(heap)?, 1)?,
            [start, stop, step] => Self::new(start.as_index(heap)?, stop.as_index(heap)?, step.as_index(heap)?)?,
            _ => return Err(ExcType::type_error_at_most("range", 3, values.len())),
        };
        let id = heap.allocate(HeapData::Range(range))?;
        Ok(Value::Ref(id))
    }

    /// Number of items, computed without overflow.
    ///
    /// `range(-2**63, 2**63 - 1)` has more items than an i64 can count, so the
    /// result is an i128 and `len()` checks it separately.
    #[must_use]
    pub fn len_i128(&self) -> i128 {
        let (start, stop, step) = (i128::from(self.start), i128::from(self.stop), i128::from(self.step));
        if step > 0 && start < stop {
            (stop - start + step - 1) / step
        } else if step < 0 && start > stop {
            (start - stop - step - 1) / -step
        } else {
            0
        }
    }

    /// Item at `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: i128) -> Option<i64> {
        if index < 0 || index >= self.len_i128() {
            return None;
        }
        i64::try_from(i128::from(self.start) + index * i128::from(self.step)).ok()
    }
}

impl PyTrait for Range {
    fn py_type(&self) -> Type {
        Type::Range
    }

    fn py_estimate_size(&self) -> usize {
        std::mem::size_of::<Self>()
    }

    fn py_repr_fmt(&self, f: &mut impl Write, _heap: &Heap<impl ResourceTracker>) -> fmt::Result {
        if self.step == 1 {
            write!(f, "range({}, {})", self.start, self.stop)
        } else {
            write!(f, "range({}, {}, {})", self.start, self.stop, self.step)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: i64, stop: i64, step: i64) -> Range {
        Range::new(start, stop, step).unwrap()
    }

    #[test]
    fn length_follows_python() {
        assert_eq!(range(0, 10, 1).len_i128(), 10);
        assert_eq!(range(1, 11, 1).len_i128(), 10);
        assert_eq!(range(0, 30, 5).len_i128(), 6);
        assert_eq!(range(0, 31, 5).len_i128(), 7);
        assert_eq!(range(10, 0, -3).len_i128(), 4);
        assert_eq!(range(5, 5, 1).len_i128(), 0);
        assert_eq!(range(5, 0, 1).len_i128(), 0);
        assert_eq!(range(i64::MIN, i64::MAX, 1).len_i128(), i128::from(u64::MAX));
    }

    #[test]
    fn items_by_index() {
        let r = range(0, 30, 5);
        assert_eq!(r.get(0), Some(0));
        assert_eq!(r.get(5), Some(25));
        assert_eq!(r.get(6), None);
        assert_eq!(r.get(-1), None);
        assert_eq!(range(10, 0, -3).get(3), Some(1));
    }

    #[test]
    fn zero_step_is_rejected() {
        let Err(crate::exception_private::RunError::Exc(raise)) = Range::new(0, 10, 0) else {
            panic!("expected ValueError");
        };
        assert_eq!(raise.exc.to_string(), "ValueError: range() arg 3 must not be zero");
    }
}
