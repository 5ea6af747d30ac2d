use std::fmt::{self, Write};

use crate::{
    args::ArgValues,
    exception_private::{ExcType, RunResult},
    heap::{Heap, HeapData},
    resource::ResourceTracker,
    types::{PyTrait, Type},
    value::{Value, float_repr},
};

/// Python `complex`: a pair of f64 components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Complex {
    pub real: f64,
    pub imag: f64,
}

impl Complex {
    #[must_use]
    pub fn new(real: f64, imag: f64) -> Self {
        Self { real, imag }
    }

    /// Euclidean modulus, `abs(z)`.
    #[must_use]
    pub fn abs(self) -> f64 {
        self.real.hypot(self.imag)
    }

    pub fn into_value(self, heap: &mut Heap<impl ResourceTracker>) -> RunResult<Value> {
        let id = heap.allocate(HeapData::Complex(self))?;
        Ok(Value::Ref(id))
    }

    /// Widens any numeric value to a complex number.
    ///
    /// Returns `Ok(None)` for non-numeric values so callers can raise their own
    /// `TypeError`.
    pub fn from_number(value: Value, heap: &Heap<impl ResourceTracker>) -> RunResult<Option<Self>> {
        match value {
            Value::Bool(b) => Ok(Some(Self::new(f64::from(u8::from(b)), 0.0))),
            Value::Int(i) => Ok(Some(Self::new(i as f64, 0.0))),
            Value::Float(f) => Ok(Some(Self::new(f, 0.0))),
            Value::Ref(id) => match heap.get(id) {
                HeapData::Complex(c) => Ok(Some(*c)),
                HeapData::LongInt(li) => Ok(Some(Self::new(li.to_f64()?, 0.0))),
                _ => Ok(None),
            },
            Value::None | Value::Builtin(_) => Ok(None),
        }
    }

    /// Implements `complex()`, `complex(real)` and `complex(real, imag)`.
    ///
    /// The result is `real + imag*1j`, so a complex `imag` rotates into the real part.
    pub fn init(heap: &mut Heap<impl ResourceTracker>, args: ArgValues) -> RunResult<Value> {
        let count = args.count();
        if count > 2 {
            return Err(ExcType::type_error(format!(
                "complex() takes at most 2 arguments ({count} given)"
            )));
        }
        let complex = match args.get_zero_one_two_args("complex")? {
            (None, _) => Self::new(0.0, 0.0),
            (Some(real), None) => {
                if let Some(s) = real.as_str(heap) {
                    Self::parse_str(s)
                        .ok_or_else(|| ExcType::value_error("complex() arg is a malformed string"))?
                } else {
                    Self::from_number(real, heap)?.ok_or_else(|| {
                        ExcType::type_error(format!(
                            "complex() first argument must be a string or a number, not '{}'",
                            real.py_type(heap)
                        ))
                    })?
                }
            }
            (Some(real), Some(imag)) => {
                if real.as_str(heap).is_some() {
                    return Err(ExcType::type_error("complex() can't take second arg if first is a string"));
                }
                if imag.as_str(heap).is_some() {
                    return Err(ExcType::type_error("complex() second arg can't be a string"));
                }
                let re = Self::from_number(real, heap)?.ok_or_else(|| {
                    ExcType::type_error(format!(
                        "complex() first argument must be a string or a number, not '{}'",
                        real.py_type(heap)
                    ))
                })?;
                let im = Self::from_number(imag, heap)?.ok_or_else(|| {
                    ExcType::type_error(format!(
                        "complex() second argument must be a number, not '{}'",
                        imag.py_type(heap)
                    ))
                })?;
                Self::new(re.real - im.imag, re.imag + im.real)
            }
        };
        complex.into_value(heap)
    }

    /// Parses the string forms accepted by `complex(str)`.
    ///
    /// Accepts `"2.5"`, `"3j"`, `"1+2j"`, `"1-j"`, `"-j"` and any of these in
    /// parentheses, with surrounding whitespace. Returns `None` when malformed.
    #[must_use]
    pub fn parse_str(s: &str) -> Option<Self> {
        let mut s = s.trim();
        if let Some(inner) = s.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
            s = inner.trim();
        }
        if s.is_empty() {
            return None;
        }
        let Some(body) = s.strip_suffix(['j', 'J']) else {
            return Some(Self::new(parse_component(s)?, 0.0));
        };
        let bytes = body.as_bytes();
        let split = (1..bytes.len())
            .rev()
            .find(|&i| matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E'));
        match split {
            Some(i) => Some(Self::new(parse_component(&body[..i])?, parse_imag(&body[i..])?)),
            None => Some(Self::new(0.0, parse_imag(body)?)),
        }
    }
}

fn parse_imag(s: &str) -> Option<f64> {
    match s {
        "" | "+" => Some(1.0),
        "-" => Some(-1.0),
        _ => parse_component(s),
    }
}

fn parse_component(s: &str) -> Option<f64> {
    if s.is_empty() || s.chars().any(char::is_whitespace) {
        return None;
    }
    s.parse().ok()
}

impl PyTrait for Complex {
    fn py_type(&self) -> Type {
        Type::Complex
    }

    fn py_estimate_size(&self) -> usize {
        std::mem::size_of::<Self>()
    }

    fn py_repr_fmt(&self, f: &mut impl Write, _heap: &Heap<impl ResourceTracker>) -> fmt::Result {
        complex_repr_fmt(self.real, self.imag, f)
    }
}

/// CPython's complex repr omits the trailing `.0` of integral components.
fn complex_component_repr(value: f64) -> String {
    let repr = float_repr(value);
    match repr.strip_suffix(".0") {
        Some(stripped) => stripped.to_owned(),
        None => repr,
    }
}

/// Writes `repr()` of a complex number: `0j`, `-2j`, `(2+3j)`, `(1.5-0.5j)`.
pub(crate) fn complex_repr_fmt(real: f64, imag: f64, f: &mut impl Write) -> fmt::Result {
    let imag_abs = complex_component_repr(imag.abs());
    let sign = if imag.is_sign_negative() { '-' } else { '+' };
    if real == 0.0 && real.is_sign_positive() {
        if sign == '-' {
            f.write_char('-')?;
        }
        write!(f, "{imag_abs}j")
    } else {
        write!(f, "({}{sign}{imag_abs}j)", complex_component_repr(real))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repr(real: f64, imag: f64) -> String {
        let mut s = String::new();
        complex_repr_fmt(real, imag, &mut s).unwrap();
        s
    }

    #[test]
    fn repr_matches_cpython() {
        assert_eq!(repr(0.0, 0.0), "0j");
        assert_eq!(repr(2.0, 0.0), "(2+0j)");
        assert_eq!(repr(2.0, 3.0), "(2+3j)");
        assert_eq!(repr(0.0, -2.0), "-2j");
        assert_eq!(repr(1.5, -0.5), "(1.5-0.5j)");
        assert_eq!(repr(-0.0, 1.0), "(-0+1j)");
        assert_eq!(repr(1.0, 1e20), "(1+1e+20j)");
    }

    #[test]
    fn parse_accepts_python_forms() {
        assert_eq!(Complex::parse_str("1+2j"), Some(Complex::new(1.0, 2.0)));
        assert_eq!(Complex::parse_str(" (1-j) "), Some(Complex::new(1.0, -1.0)));
        assert_eq!(Complex::parse_str("3J"), Some(Complex::new(0.0, 3.0)));
        assert_eq!(Complex::parse_str("-j"), Some(Complex::new(0.0, -1.0)));
        assert_eq!(Complex::parse_str("2.5"), Some(Complex::new(2.5, 0.0)));
        assert_eq!(Complex::parse_str("1e-3j"), Some(Complex::new(0.0, 1e-3)));
        assert_eq!(Complex::parse_str("1e+3+1e-3j"), Some(Complex::new(1e3, 1e-3)));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert_eq!(Complex::parse_str(""), None);
        assert_eq!(Complex::parse_str("1 + 2j"), None);
        assert_eq!(Complex::parse_str("abc"), None);
        assert_eq!(Complex::parse_str("1+2"), None);
    }

    #[test]
    fn modulus_is_euclidean() {
        assert_eq!(Complex::new(3.0, 4.0).abs(), 5.0);
        assert_eq!(Complex::new(1.0, 2.0).abs(), 5.0_f64.sqrt());
    }
}
