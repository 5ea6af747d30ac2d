//! Implementation of the abs() builtin function.

use num_bigint::BigInt;
use num_traits::Signed;

use crate::{
    args::ArgValues,
    exception_private::{ExcType, RunError, RunResult},
    heap::{Heap, HeapData},
    resource::ResourceTracker,
    types::{LongInt, Type},
    value::Value,
};

/// Implementation of the abs() builtin function.
///
/// Returns the absolute value of a number: ints stay ints, floats stay floats
/// and a complex number yields its modulus as a float.
/// For `i64::MIN`, which overflows on negation, promotes to LongInt.
pub fn builtin_abs(heap: &mut Heap<impl ResourceTracker>, args: ArgValues) -> RunResult<Value> {
    let value = args.get_one_arg("abs")?;

    match value {
        Value::Int(n) => {
            if let Some(abs_val) = n.checked_abs() {
                Ok(Value::Int(abs_val))
            } else {
                // i64::MIN.abs() overflows, promote to LongInt
                LongInt::new(BigInt::from(n).abs()).into_value(heap)
            }
        }
        Value::Float(f) => Ok(Value::Float(f.abs())),
        Value::Bool(b) => Ok(Value::Int(i64::from(b))),
        Value::Ref(id) => match heap.get(id) {
            HeapData::LongInt(li) => li.abs().into_value(heap),
            HeapData::Complex(c) => Ok(Value::Float(c.abs())),
            other => Err(bad_operand(other.py_type())),
        },
        other => Err(bad_operand(other.py_type(heap))),
    }
}

fn bad_operand(type_: Type) -> RunError {
    ExcType::type_error(format!("bad operand type for abs(): '{type_}'"))
}
