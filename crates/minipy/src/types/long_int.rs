//! Arbitrary precision integers.
//!
//! Python has one `int` type; we use `Value::Int(i64)` while values fit and
//! promote to `LongInt` on overflow (`abs(i64::MIN)`, large literals,
//! overflowing `+ - *`).

use std::fmt::{self, Write};

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};

use crate::{
    exception_private::{ExcType, RunResult},
    heap::{Heap, HeapData},
    resource::ResourceTracker,
    types::{PyTrait, Type},
    value::Value,
};

/// Wrapper around `num_bigint::BigInt`, named to avoid confusion with the external type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LongInt(BigInt);

impl LongInt {
    #[must_use]
    pub fn new(bi: BigInt) -> Self {
        Self(bi)
    }

    #[must_use]
    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }

    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Converts to a `Value`, demoting to `Value::Int` if it fits in an i64.
    pub fn into_value(self, heap: &mut Heap<impl ResourceTracker>) -> RunResult<Value> {
        if let Some(i) = self.0.to_i64() {
            Ok(Value::Int(i))
        } else {
            let heap_id = heap.allocate(HeapData::LongInt(self))?;
            Ok(Value::Ref(heap_id))
        }
    }

    /// Estimates the size of `a * b` in bytes from the operands' bit lengths.
    ///
    /// Returns `None` when the estimate itself overflows.
    #[must_use]
    pub fn estimate_mult_bytes(a_bits: u64, b_bits: u64) -> Option<usize> {
        let result_bits = a_bits.checked_add(b_bits)?;
        usize::try_from(result_bits.div_ceil(8)).ok()
    }

    /// Converts to a float, raising `OverflowError` like `float(10**400)` does.
    pub fn to_f64(&self) -> RunResult<f64> {
        match self.0.to_f64() {
            Some(f) if f.is_finite() => Ok(f),
            _ => Err(ExcType::overflow_error("int too large to convert to float")),
        }
    }
}

impl PyTrait for LongInt {
    fn py_type(&self) -> Type {
        Type::Int
    }

    fn py_estimate_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.0.bits().div_ceil(8) as usize
    }

    fn py_repr_fmt(&self, f: &mut impl Write, _heap: &Heap<impl ResourceTracker>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
