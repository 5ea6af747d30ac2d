use std::fmt::{self, Write};

use crate::{
    builtins::Builtins,
    exception_private::{ExcType, RunResult},
    heap::{Heap, HeapData, HeapId},
    resource::ResourceTracker,
    types::{PyTrait, Type},
};

/// Primary value type representing Python objects at runtime.
///
/// Small immutable values (`None`, bools, machine-sized ints, floats, builtins)
/// are stored inline; everything else lives on the [`Heap`] and is referenced
/// by `Ref`. The heap is an arena, so `Value` is `Copy` and needs no reference
/// counting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Builtin(Builtins),
    Ref(HeapId),
}

impl Value {
    pub fn py_type(self, heap: &Heap<impl ResourceTracker>) -> Type {
        match self {
            Self::None => Type::NoneType,
            Self::Bool(_) => Type::Bool,
            Self::Int(_) => Type::Int,
            Self::Float(_) => Type::Float,
            Self::Builtin(b) => b.py_type(),
            Self::Ref(id) => heap.get(id).py_type(),
        }
    }

    /// Writes `repr(self)`.
    pub fn py_repr_fmt(self, f: &mut impl Write, heap: &Heap<impl ResourceTracker>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => f.write_str(&float_repr(v)),
            Self::Builtin(b) => b.py_repr_fmt(f),
            Self::Ref(id) => match heap.get(id) {
                HeapData::Str(s) => s.py_repr_fmt(f, heap),
                HeapData::Tuple(_) | HeapData::List(_) | HeapData::Dict(_) if !heap.data_depth_enter() => {
                    // nesting too deep to walk: truncate
                    f.write_str("...")
                }
                HeapData::Tuple(t) => {
                    let result = t.py_repr_fmt(f, heap);
                    heap.data_depth_exit();
                    result
                }
                HeapData::List(l) => {
                    let result = l.py_repr_fmt(f, heap);
                    heap.data_depth_exit();
                    result
                }
                HeapData::Dict(d) => {
                    let result = d.py_repr_fmt(f, heap);
                    heap.data_depth_exit();
                    result
                }
                HeapData::Range(r) => r.py_repr_fmt(f, heap),
                HeapData::Iter(i) => i.py_repr_fmt(f, heap),
                HeapData::LongInt(li) => li.py_repr_fmt(f, heap),
                HeapData::Complex(c) => c.py_repr_fmt(f, heap),
            },
        }
    }

    #[must_use]
    pub fn py_repr(self, heap: &Heap<impl ResourceTracker>) -> String {
        let mut s = String::new();
        // writing to a String cannot fail
        let _ = self.py_repr_fmt(&mut s, heap);
        s
    }

    /// `str(self)`: the raw text for strings, `repr()` for everything else.
    #[must_use]
    pub fn py_str(self, heap: &Heap<impl ResourceTracker>) -> String {
        match self.as_str(heap) {
            Some(s) => s.to_owned(),
            None => self.py_repr(heap),
        }
    }

    /// Borrows the text of a `str` object.
    #[must_use]
    pub fn as_str(self, heap: &Heap<impl ResourceTracker>) -> Option<&str> {
        match self {
            Self::Ref(id) => match heap.get(id) {
                HeapData::Str(s) => Some(s.as_str()),
                _ => None,
            },
            _ => None,
        }
    }

    /// Converts to an integer index the way `range()` arguments are converted.
    ///
    /// Bools count as ints, big ints raise `OverflowError` and everything else
    /// (floats included) raises `TypeError`.
    pub fn as_index(self, heap: &Heap<impl ResourceTracker>) -> RunResult<i64> {
        match self {
            Self::Int(i) => Ok(i),
            Self::Bool(b) => Ok(i64::from(b)),
            Self::Ref(id) if matches!(heap.get(id), HeapData::LongInt(_)) => Err(ExcType::overflow_error(
                "Python int too large to convert to C ssize_t",
            )),
            other => Err(ExcType::type_error_not_integer(other.py_type(heap))),
        }
    }
}

/// Formats a float the way CPython's `repr()` does.
///
/// ryu produces the shortest digits that round-trip; they are re-laid out with
/// CPython's rules: positional notation when the decimal exponent is in
/// `-4..16`, scientific otherwise, and always a `.0` on integral values.
#[must_use]
pub(crate) fn float_repr(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_owned();
    }

    let mut buffer = ryu::Buffer::new();
    let formatted = buffer.format_finite(value.abs());
    let (mantissa, exponent) = match formatted.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (formatted, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = format!("{int_part}{frac_part}");
    let significant = all_digits.trim_start_matches('0');
    let leading_zeros = all_digits.len() - significant.len();
    let digits = significant.trim_end_matches('0');

    // value == 0.<digits> * 10**point
    let point = len_i32(int_part) + exponent - len_i32(&all_digits[..leading_zeros]);
    let exp10 = point - 1;

    let mut out = String::with_capacity(digits.len() + 8);
    if value < 0.0 {
        out.push('-');
    }
    if (-4..16).contains(&exp10) {
        if point <= 0 {
            out.push_str("0.");
            out.extend(std::iter::repeat_n('0', point.unsigned_abs() as usize));
            out.push_str(digits);
        } else {
            let point = point.unsigned_abs() as usize;
            if point >= digits.len() {
                out.push_str(digits);
                out.extend(std::iter::repeat_n('0', point - digits.len()));
                out.push_str(".0");
            } else {
                out.push_str(&digits[..point]);
                out.push('.');
                out.push_str(&digits[point..]);
            }
        }
    } else {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let sign = if exp10 < 0 { '-' } else { '+' };
        let _ = write!(out, "e{sign}{:02}", exp10.unsigned_abs());
    }
    out
}

fn len_i32(s: &str) -> i32 {
    i32::try_from(s.len()).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builtins::BuiltinsFunctions, resource::NoLimitTracker, types::str::allocate_str};

    #[test]
    fn float_repr_matches_cpython() {
        let cases = [
            (10.25, "10.25"),
            (5.0_f64.sqrt(), "2.23606797749979"),
            (5.0, "5.0"),
            (-1.5, "-1.5"),
            (0.1, "0.1"),
            (0.001, "0.001"),
            (0.0001, "0.0001"),
            (0.00001, "1e-05"),
            (1.5e-7, "1.5e-07"),
            (1e15, "1000000000000000.0"),
            (1e16, "1e+16"),
            (1.2345678901234568e17, "1.2345678901234568e+17"),
            (123_456.789, "123456.789"),
            (1e300, "1e+300"),
            (0.0, "0.0"),
            (-0.0, "-0.0"),
            (f64::INFINITY, "inf"),
            (f64::NEG_INFINITY, "-inf"),
            (f64::NAN, "nan"),
        ];
        for (value, expected) in cases {
            assert_eq!(float_repr(value), expected, "repr of {value:?}");
        }
    }

    #[test]
    fn str_and_repr_differ_only_for_strings() {
        let mut heap = Heap::new(4, NoLimitTracker);
        let s = allocate_str("gulfem".to_owned(), &mut heap).unwrap();
        assert_eq!(s.py_str(&heap), "gulfem");
        assert_eq!(s.py_repr(&heap), "'gulfem'");
        assert_eq!(Value::Int(-10).py_str(&heap), "-10");
        assert_eq!(Value::Bool(true).py_repr(&heap), "True");
        assert_eq!(Value::None.py_str(&heap), "None");
        assert_eq!(
            Value::Builtin(Builtins::Function(BuiltinsFunctions::Len)).py_repr(&heap),
            "<built-in function len>"
        );
    }

    #[test]
    fn index_conversion() {
        let heap = Heap::new(0, NoLimitTracker);
        assert_eq!(Value::Int(7).as_index(&heap).unwrap(), 7);
        assert_eq!(Value::Bool(true).as_index(&heap).unwrap(), 1);
        let exc = Value::Float(1.0)
            .as_index(&heap)
            .unwrap_err()
            .into_python_exception("test.py", "");
        assert_eq!(
            exc.summary(),
            "TypeError: 'float' object cannot be interpreted as an integer"
        );
    }
}
