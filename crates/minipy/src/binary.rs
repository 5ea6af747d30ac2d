//! Binary and unary operators.
//!
//! Numbers follow Python's tower: `bool` → `int` → big int → `float` →
//! `complex`, with the result in the wider of the two operand kinds.
//! `str`, `list` and `tuple` concatenate with `+` and repeat with `* int`.

use num_bigint::BigInt;
use smallvec::SmallVec;

use crate::{
    exception_private::{ExcType, RunError, RunResult},
    expressions::{Operator, UnaryOperator},
    heap::{Heap, HeapData, HeapId},
    resource::{LARGE_RESULT_THRESHOLD, ResourceTracker},
    types::{Complex, LongInt, list::allocate_list, str::allocate_str, tuple::allocate_tuple},
    value::Value,
};

/// A numeric operand widened out of its `Value`.
#[derive(Debug, Clone)]
enum Number {
    Int(i64),
    Big(BigInt),
    Float(f64),
    Complex(Complex),
}

impl Number {
    fn from_value(value: Value, heap: &Heap<impl ResourceTracker>) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Int(i64::from(b))),
            Value::Int(i) => Some(Self::Int(i)),
            Value::Float(f) => Some(Self::Float(f)),
            Value::Ref(id) => match heap.get(id) {
                HeapData::LongInt(li) => Some(Self::Big(li.as_bigint().clone())),
                HeapData::Complex(c) => Some(Self::Complex(*c)),
                _ => None,
            },
            Value::None | Value::Builtin(_) => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Int(_) => 0,
            Self::Big(_) => 1,
            Self::Float(_) => 2,
            Self::Complex(_) => 3,
        }
    }

    fn to_big(&self) -> BigInt {
        match self {
            Self::Int(i) => BigInt::from(*i),
            Self::Big(b) => b.clone(),
            // only called when neither operand is float or complex
            Self::Float(_) | Self::Complex(_) => BigInt::default(),
        }
    }

    fn to_f64(&self) -> RunResult<f64> {
        match self {
            Self::Int(i) => Ok(*i as f64),
            Self::Big(b) => LongInt::new(b.clone()).to_f64(),
            Self::Float(f) => Ok(*f),
            Self::Complex(c) => Ok(c.real),
        }
    }

    fn to_complex(&self) -> RunResult<Complex> {
        match self {
            Self::Complex(c) => Ok(*c),
            other => Ok(Complex::new(other.to_f64()?, 0.0)),
        }
    }
}

/// Evaluates `left <op> right`.
pub(crate) fn binary_op(
    op: Operator,
    left: Value,
    right: Value,
    heap: &mut Heap<impl ResourceTracker>,
) -> RunResult<Value> {
    if let (Some(l), Some(r)) = (Number::from_value(left, heap), Number::from_value(right, heap)) {
        return numeric_op(op, &l, &r, heap);
    }
    match op {
        Operator::Add => concat(left, right, heap),
        Operator::Mult => repeat(left, right, heap),
        Operator::Sub => Err(unsupported(op, left, right, heap)),
    }
}

fn unsupported(op: Operator, left: Value, right: Value, heap: &Heap<impl ResourceTracker>) -> RunError {
    ExcType::type_error_unsupported_operands(op, left.py_type(heap), right.py_type(heap))
}

fn numeric_op(op: Operator, l: &Number, r: &Number, heap: &mut Heap<impl ResourceTracker>) -> RunResult<Value> {
    match l.rank().max(r.rank()) {
        0 => {
            let (Number::Int(a), Number::Int(b)) = (l, r) else {
                return big_op(op, l, r, heap);
            };
            let checked = match op {
                Operator::Add => a.checked_add(*b),
                Operator::Sub => a.checked_sub(*b),
                Operator::Mult => a.checked_mul(*b),
            };
            match checked {
                Some(v) => Ok(Value::Int(v)),
                None => big_op(op, l, r, heap),
            }
        }
        1 => big_op(op, l, r, heap),
        2 => {
            let (a, b) = (l.to_f64()?, r.to_f64()?);
            Ok(Value::Float(match op {
                Operator::Add => a + b,
                Operator::Sub => a - b,
                Operator::Mult => a * b,
            }))
        }
        _ => {
            let (a, b) = (l.to_complex()?, r.to_complex()?);
            let result = match op {
                Operator::Add => Complex::new(a.real + b.real, a.imag + b.imag),
                Operator::Sub => Complex::new(a.real - b.real, a.imag - b.imag),
                Operator::Mult => Complex::new(
                    a.real * b.real - a.imag * b.imag,
                    a.real * b.imag + a.imag * b.real,
                ),
            };
            result.into_value(heap)
        }
    }
}

fn big_op(op: Operator, l: &Number, r: &Number, heap: &mut Heap<impl ResourceTracker>) -> RunResult<Value> {
    let (a, b) = (l.to_big(), r.to_big());
    if op == Operator::Mult {
        // size the product before computing it
        let estimated = LongInt::estimate_mult_bytes(a.bits(), b.bits()).unwrap_or(usize::MAX);
        if estimated > LARGE_RESULT_THRESHOLD {
            heap.tracker().check_large_result(estimated)?;
        }
    }
    let result = match op {
        Operator::Add => a + b,
        Operator::Sub => a - b,
        Operator::Mult => a * b,
    };
    LongInt::new(result).into_value(heap)
}

fn concat(left: Value, right: Value, heap: &mut Heap<impl ResourceTracker>) -> RunResult<Value> {
    if let (Value::Ref(l), Value::Ref(r)) = (left, right) {
        match (heap.get(l), heap.get(r)) {
            (HeapData::Str(a), HeapData::Str(b)) => {
                let joined = format!("{}{}", a.as_str(), b.as_str());
                return allocate_str(joined, heap);
            }
            (HeapData::List(a), HeapData::List(b)) => {
                let items = [a.as_slice(), b.as_slice()].concat();
                return allocate_list(items, heap);
            }
            (HeapData::Tuple(a), HeapData::Tuple(b)) => {
                let items: SmallVec<[Value; 3]> = a.as_slice().iter().chain(b.as_slice()).copied().collect();
                return allocate_tuple(items, heap);
            }
            _ => {}
        }
    }
    Err(unsupported(Operator::Add, left, right, heap))
}

/// `seq * n` and `n * seq`; a negative count gives an empty sequence.
fn repeat(left: Value, right: Value, heap: &mut Heap<impl ResourceTracker>) -> RunResult<Value> {
    let (id, count) = match (left, right) {
        (Value::Ref(id), count) if is_sequence(id, heap) => (id, count),
        (count, Value::Ref(id)) if is_sequence(id, heap) => (id, count),
        _ => return Err(unsupported(Operator::Mult, left, right, heap)),
    };
    let count = match count {
        Value::Int(n) => n,
        Value::Bool(b) => i64::from(b),
        Value::Ref(count_id) if matches!(heap.get(count_id), HeapData::LongInt(_)) => {
            return Err(ExcType::overflow_error("cannot fit 'int' into an index-sized integer"));
        }
        _ => return Err(unsupported(Operator::Mult, left, right, heap)),
    };
    let count = usize::try_from(count).unwrap_or(0);
    let unit_len = match heap.get(id) {
        HeapData::Str(s) => s.as_str().len(),
        HeapData::List(l) => l.len() * std::mem::size_of::<Value>(),
        HeapData::Tuple(t) => t.len() * std::mem::size_of::<Value>(),
        _ => return Err(unsupported(Operator::Mult, left, right, heap)),
    };
    let estimated = unit_len.saturating_mul(count);
    if estimated > LARGE_RESULT_THRESHOLD {
        heap.tracker().check_large_result(estimated)?;
    }
    match heap.get(id) {
        HeapData::Str(s) => {
            let repeated = s.as_str().repeat(count);
            allocate_str(repeated, heap)
        }
        HeapData::List(l) => {
            let items = l.as_slice().repeat(count);
            allocate_list(items, heap)
        }
        HeapData::Tuple(t) => {
            let items = SmallVec::from_vec(t.as_slice().repeat(count));
            allocate_tuple(items, heap)
        }
        _ => Err(unsupported(Operator::Mult, left, right, heap)),
    }
}

fn is_sequence(id: HeapId, heap: &Heap<impl ResourceTracker>) -> bool {
    matches!(heap.get(id), HeapData::Str(_) | HeapData::List(_) | HeapData::Tuple(_))
}

/// Evaluates `-value` or `+value`.
pub(crate) fn unary_op(op: UnaryOperator, value: Value, heap: &mut Heap<impl ResourceTracker>) -> RunResult<Value> {
    let Some(number) = Number::from_value(value, heap) else {
        return Err(ExcType::type_error_bad_unary_operand(op, value.py_type(heap)));
    };
    match (op, number) {
        (UnaryOperator::Pos, Number::Int(i)) => Ok(Value::Int(i)),
        (UnaryOperator::Pos, _) => Ok(value),
        (UnaryOperator::Neg, Number::Int(i)) => match i.checked_neg() {
            Some(v) => Ok(Value::Int(v)),
            None => LongInt::new(-BigInt::from(i)).into_value(heap),
        },
        (UnaryOperator::Neg, Number::Big(b)) => LongInt::new(-b).into_value(heap),
        (UnaryOperator::Neg, Number::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOperator::Neg, Number::Complex(c)) => Complex::new(-c.real, -c.imag).into_value(heap),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{LimitedTracker, NoLimitTracker, ResourceError, ResourceLimits};

    fn repr(value: Value, heap: &Heap<NoLimitTracker>) -> String {
        value.py_repr(heap)
    }

    #[test]
    fn int_overflow_promotes_to_big_int() {
        let mut heap = Heap::new(4, NoLimitTracker);
        let sum = binary_op(Operator::Add, Value::Int(i64::MAX), Value::Int(1), &mut heap).unwrap();
        assert_eq!(repr(sum, &heap), "9223372036854775808");
        let back = binary_op(Operator::Sub, sum, Value::Int(1), &mut heap).unwrap();
        assert_eq!(back, Value::Int(i64::MAX));
        let neg = unary_op(UnaryOperator::Neg, Value::Int(i64::MIN), &mut heap).unwrap();
        assert_eq!(repr(neg, &heap), "9223372036854775808");
    }

    #[test]
    fn numeric_tower_widens() {
        let mut heap = Heap::new(4, NoLimitTracker);
        let f = binary_op(Operator::Mult, Value::Bool(true), Value::Float(2.5), &mut heap).unwrap();
        assert_eq!(f, Value::Float(2.5));
        let j = Complex::new(0.0, 1.0).into_value(&mut heap).unwrap();
        let three_j = binary_op(Operator::Mult, Value::Int(3), j, &mut heap).unwrap();
        let z = binary_op(Operator::Add, Value::Int(2), three_j, &mut heap).unwrap();
        assert_eq!(repr(z, &heap), "(2+3j)");
        let squared = binary_op(Operator::Mult, j, j, &mut heap).unwrap();
        assert_eq!(repr(squared, &heap), "(-1+0j)");
    }

    #[test]
    fn sequences_concatenate_and_repeat() {
        let mut heap = Heap::new(4, NoLimitTracker);
        let a = allocate_str("gul".to_owned(), &mut heap).unwrap();
        let b = allocate_str("fem".to_owned(), &mut heap).unwrap();
        let joined = binary_op(Operator::Add, a, b, &mut heap).unwrap();
        assert_eq!(joined.py_str(&heap), "gulfem");
        let list = allocate_list(vec![Value::Int(1)], &mut heap).unwrap();
        let tripled = binary_op(Operator::Mult, list, Value::Int(3), &mut heap).unwrap();
        assert_eq!(repr(tripled, &heap), "[1, 1, 1]");
        let empty = binary_op(Operator::Mult, Value::Int(-2), a, &mut heap).unwrap();
        assert_eq!(repr(empty, &heap), "''");
    }

    #[test]
    fn repeat_by_big_int_overflows() {
        let mut heap = Heap::new(4, NoLimitTracker);
        let s = allocate_str("a".to_owned(), &mut heap).unwrap();
        let big = LongInt::new(BigInt::from(10).pow(20)).into_value(&mut heap).unwrap();
        for (left, right) in [(s, big), (big, s)] {
            let exc = binary_op(Operator::Mult, left, right, &mut heap)
                .unwrap_err()
                .into_python_exception("test.py", "");
            assert_eq!(
                exc.summary(),
                "OverflowError: cannot fit 'int' into an index-sized integer"
            );
        }
    }

    #[test]
    fn big_product_is_sized_before_it_is_computed() {
        let limit = 200_000;
        let mut heap = Heap::new(4, LimitedTracker::new(ResourceLimits::new().max_memory(limit)));
        let x = LongInt::new(BigInt::from(1) << 500_000u32).into_value(&mut heap).unwrap();
        let before = heap.tracker().current_memory_bytes().unwrap();
        let err = binary_op(Operator::Mult, x, x, &mut heap).unwrap_err();
        let RunError::Resource(err) = err else {
            panic!("expected a resource error, got {err:?}");
        };
        // 500_001 bits each side, charged as the estimate and not the allocation
        let estimated = 1_000_002usize.div_ceil(8);
        assert_eq!(
            err,
            ResourceError::Memory {
                limit,
                used: before + estimated
            }
        );
        assert_eq!(heap.tracker().current_memory_bytes(), Some(before));
    }

    #[test]
    fn mismatched_operands_raise_type_error() {
        let mut heap = Heap::new(4, NoLimitTracker);
        let s = allocate_str("a".to_owned(), &mut heap).unwrap();
        let exc = binary_op(Operator::Add, Value::Int(1), s, &mut heap)
            .unwrap_err()
            .into_python_exception("test.py", "");
        assert_eq!(
            exc.summary(),
            "TypeError: unsupported operand type(s) for +: 'int' and 'str'"
        );
        let exc = unary_op(UnaryOperator::Neg, s, &mut heap)
            .unwrap_err()
            .into_python_exception("test.py", "");
        assert_eq!(exc.summary(), "TypeError: bad operand type for unary -: 'str'");
    }
}
