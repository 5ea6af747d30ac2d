use std::fmt::{self, Write};

use num_bigint::BigInt;

use crate::{
    heap::{Heap, HeapData},
    resource::ResourceTracker,
    types::{complex::complex_repr_fmt, str::string_repr_fmt},
    value::{Value, float_repr},
};

/// A Python value returned from the interpreter.
///
/// This is the public-facing type for Python values. It owns all its data and can be
/// freely cloned, serialized, or stored. Unlike the internal `Value` type, `Object`
/// does not require a heap for operations.
///
/// Values without a natural mapping (builtins, ranges, iterators) are returned
/// as `Repr`, holding the Python `repr()` of the value.
///
/// # JSON Serialization
///
/// `Object` derives `Serialize` with serde's externally tagged layout, e.g.
/// `{"Int": 10}` or `{"Complex": {"real": 2.0, "imag": 3.0}}`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Object {
    /// Python's `None` singleton.
    None,
    /// Python boolean (`True` or `False`).
    Bool(bool),
    /// Python integer (64-bit signed).
    Int(i64),
    /// Python arbitrary-precision integer (larger than i64).
    BigInt(BigInt),
    /// Python float (64-bit IEEE 754).
    Float(f64),
    /// Python complex number.
    Complex { real: f64, imag: f64 },
    /// Python string (UTF-8).
    String(String),
    /// Python tuple (immutable sequence).
    Tuple(Vec<Self>),
    /// Python list (mutable sequence).
    List(Vec<Self>),
    /// Python dictionary as `(key, value)` pairs in insertion order.
    Dict(Vec<(Self, Self)>),
    /// Fallback for values that cannot be represented as other variants.
    ///
    /// Contains the `repr()` string of the original value.
    Repr(String),
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Repr(s) => f.write_str(s),
            _ => self.repr_fmt(f),
        }
    }
}

impl Object {
    /// Snapshots a runtime value.
    ///
    /// Containers nested deeper than [`crate::MAX_DATA_RECURSION_DEPTH`] are
    /// cut off as `Repr("...")`, matching how `repr()` truncates them.
    pub(crate) fn from_value(value: Value, heap: &Heap<impl ResourceTracker>) -> Self {
        match value {
            Value::None => Self::None,
            Value::Bool(b) => Self::Bool(b),
            Value::Int(i) => Self::Int(i),
            Value::Float(f) => Self::Float(f),
            Value::Builtin(_) => Self::Repr(value.py_repr(heap)),
            Value::Ref(id) => match heap.get(id) {
                HeapData::Str(s) => Self::String(s.as_str().to_owned()),
                HeapData::LongInt(li) => Self::BigInt(li.as_bigint().clone()),
                HeapData::Complex(c) => Self::Complex {
                    real: c.real,
                    imag: c.imag,
                },
                HeapData::Tuple(_) | HeapData::List(_) | HeapData::Dict(_) if !heap.data_depth_enter() => {
                    Self::Repr("...".to_owned())
                }
                HeapData::Tuple(t) => {
                    let items = Self::from_values(t.as_slice(), heap);
                    heap.data_depth_exit();
                    Self::Tuple(items)
                }
                HeapData::List(l) => {
                    let items = Self::from_values(l.as_slice(), heap);
                    heap.data_depth_exit();
                    Self::List(items)
                }
                HeapData::Dict(d) => {
                    let items = d
                        .items()
                        .map(|(key, value)| (Self::from_value(key, heap), Self::from_value(value, heap)))
                        .collect();
                    heap.data_depth_exit();
                    Self::Dict(items)
                }
                HeapData::Range(_) | HeapData::Iter(_) => Self::Repr(value.py_repr(heap)),
            },
        }
    }

    fn from_values(values: &[Value], heap: &Heap<impl ResourceTracker>) -> Vec<Self> {
        values.iter().map(|value| Self::from_value(*value, heap)).collect()
    }

    /// Returns the Python `repr()` of this object.
    #[must_use]
    pub fn py_repr(&self) -> String {
        let mut s = String::new();
        // writing to a String never fails
        let _ = self.repr_fmt(&mut s);
        s
    }

    /// Returns the Python type name of this object (e.g. `"int"`, `"complex"`).
    ///
    /// `Repr` objects report `"object"` since the original type is gone.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "NoneType",
            Self::Bool(_) => "bool",
            Self::Int(_) | Self::BigInt(_) => "int",
            Self::Float(_) => "float",
            Self::Complex { .. } => "complex",
            Self::String(_) => "str",
            Self::Tuple(_) => "tuple",
            Self::List(_) => "list",
            Self::Dict(_) => "dict",
            Self::Repr(_) => "object",
        }
    }

    fn repr_fmt(&self, f: &mut impl Write) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(v) => write!(f, "{v}"),
            Self::BigInt(v) => write!(f, "{v}"),
            Self::Float(v) => f.write_str(&float_repr(*v)),
            Self::Complex { real, imag } => complex_repr_fmt(*real, *imag, f),
            Self::String(s) => string_repr_fmt(s, f),
            Self::List(l) => {
                f.write_char('[')?;
                Self::items_fmt(l, f)?;
                f.write_char(']')
            }
            Self::Tuple(t) => {
                f.write_char('(')?;
                Self::items_fmt(t, f)?;
                if t.len() == 1 {
                    f.write_char(',')?;
                }
                f.write_char(')')
            }
            Self::Dict(d) => {
                f.write_char('{')?;
                for (i, (k, v)) in d.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    k.repr_fmt(f)?;
                    f.write_str(": ")?;
                    v.repr_fmt(f)?;
                }
                f.write_char('}')
            }
            Self::Repr(s) => f.write_str(s),
        }
    }

    fn items_fmt(items: &[Self], f: &mut impl Write) -> fmt::Result {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            item.repr_fmt(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_str_and_py_repr_quotes() {
        let s = Object::String("g".to_owned());
        assert_eq!(s.to_string(), "g");
        assert_eq!(s.py_repr(), "'g'");
        let t = Object::Tuple(vec![Object::Int(1)]);
        assert_eq!(t.to_string(), "(1,)");
        let d = Object::Dict(vec![(Object::String("a".to_owned()), Object::Float(10.25))]);
        assert_eq!(d.to_string(), "{'a': 10.25}");
    }

    #[test]
    fn complex_repr() {
        let z = Object::Complex { real: 2.0, imag: 3.0 };
        assert_eq!(z.to_string(), "(2+3j)");
        assert_eq!(z.type_name(), "complex");
        assert_eq!(Object::Complex { real: 0.0, imag: 0.0 }.to_string(), "0j");
    }

    #[test]
    fn serializes_externally_tagged() {
        let json = serde_json::to_string(&Object::List(vec![Object::Int(1), Object::None])).unwrap();
        assert_eq!(json, r#"{"List":[{"Int":1},"None"]}"#);
    }
}
