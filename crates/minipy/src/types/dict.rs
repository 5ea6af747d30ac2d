use std::fmt::{self, Write};

use ahash::RandomState;
use indexmap::IndexMap;
use num_bigint::BigInt;

use crate::{
    exception_private::{ExcType, RunResult},
    heap::{Heap, HeapData},
    resource::ResourceTracker,
    types::{PyTrait, Type},
    value::Value,
};

/// Hashable identity of a dict key.
///
/// Values that compare equal in Python map to the same key: `True`, `1` and
/// `1.0` are all `Int(1)`, and `complex(2, 0)` is `Int(2)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum DictKey {
    None,
    Int(i64),
    BigInt(BigInt),
    /// Bit pattern of a non-integral float.
    Float(u64),
    /// Bit patterns of a complex number with a non-zero imaginary part.
    Complex(u64, u64),
    Str(String),
    Tuple(Vec<DictKey>),
}

impl DictKey {
    /// Computes the key for `value`, raising `TypeError` for unhashable types.
    pub fn from_value(value: Value, heap: &Heap<impl ResourceTracker>) -> RunResult<Self> {
        match value {
            Value::None => Ok(Self::None),
            Value::Bool(b) => Ok(Self::Int(i64::from(b))),
            Value::Int(i) => Ok(Self::Int(i)),
            Value::Float(f) => Ok(Self::from_float(f)),
            Value::Builtin(_) => Err(ExcType::type_error_unhashable(value.py_type(heap))),
            Value::Ref(id) => match heap.get(id) {
                HeapData::Str(s) => Ok(Self::Str(s.as_str().to_owned())),
                HeapData::LongInt(li) => Ok(Self::BigInt(li.as_bigint().clone())),
                HeapData::Complex(c) if c.imag == 0.0 => Ok(Self::from_float(c.real)),
                HeapData::Complex(c) => Ok(Self::Complex(c.real.to_bits(), c.imag.to_bits())),
                HeapData::Tuple(t) => {
                    if !heap.data_depth_enter() {
                        return Err(ExcType::recursion_error("maximum recursion depth exceeded while hashing"));
                    }
                    let items = t
                        .as_slice()
                        .iter()
                        .map(|item| Self::from_value(*item, heap))
                        .collect::<RunResult<Vec<_>>>();
                    heap.data_depth_exit();
                    items.map(Self::Tuple)
                }
                other => Err(ExcType::type_error_unhashable(other.py_type())),
            },
        }
    }

    fn from_float(f: f64) -> Self {
        if f.fract() == 0.0 && f >= -9.223_372_036_854_775_808e18 && f < 9.223_372_036_854_775_808e18 {
            Self::Int(f as i64)
        } else {
            Self::Float(f.to_bits())
        }
    }
}

/// Python `dict`: insertion ordered, keyed by [`DictKey`].
///
/// The original key object is kept alongside the value so `repr()` and
/// iteration return what the script inserted first (`{1: 'a', True: 'b'}` is
/// `{1: 'b'}`).
#[derive(Debug, Clone, Default)]
pub(crate) struct Dict {
    entries: IndexMap<DictKey, (Value, Value), RandomState>,
}

impl Dict {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `d[key] = value`.
    pub fn set(&mut self, key: Value, value: Value, heap: &Heap<impl ResourceTracker>) -> RunResult<()> {
        let dict_key = DictKey::from_value(key, heap)?;
        self.entries
            .entry(dict_key)
            .and_modify(|entry| entry.1 = value)
            .or_insert((key, value));
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Key at insertion position `index`, used by dict iterators.
    #[must_use]
    pub fn key_at(&self, index: usize) -> Option<Value> {
        self.entries.get_index(index).map(|(_, (key, _))| *key)
    }

    /// `(key, value)` pairs in insertion order.
    pub fn items(&self) -> impl Iterator<Item = (Value, Value)> + '_ {
        self.entries.values().copied()
    }
}

impl PyTrait for Dict {
    fn py_type(&self) -> Type {
        Type::Dict
    }

    fn py_estimate_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.entries.len() * std::mem::size_of::<(DictKey, Value, Value)>()
    }

    fn py_repr_fmt(&self, f: &mut impl Write, heap: &Heap<impl ResourceTracker>) -> fmt::Result {
        f.write_char('{')?;
        for (i, (key, value)) in self.items().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            key.py_repr_fmt(f, heap)?;
            f.write_str(": ")?;
            value.py_repr_fmt(f, heap)?;
        }
        f.write_char('}')
    }
}
