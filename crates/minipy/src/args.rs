use crate::{
    exception_private::{ExcType, RunResult},
    value::Value,
};

/// Positional arguments of a builtin call.
///
/// Uses specific variants for common cases (0-2 arguments).
/// Most builtin calls have at most 2 arguments, so this optimization
/// eliminates the Vec heap allocation overhead for the vast majority of calls.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ArgValues {
    Empty,
    One(Value),
    Two(Value, Value),
    Many(Vec<Value>),
}

impl ArgValues {
    /// Packs evaluated arguments into the smallest variant.
    #[must_use]
    pub fn from_vec(values: Vec<Value>) -> Self {
        match *values.as_slice() {
            [] => Self::Empty,
            [a] => Self::One(a),
            [a, b] => Self::Two(a, b),
            _ => Self::Many(values),
        }
    }

    /// Number of positional arguments.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::One(_) => 1,
            Self::Two(_, _) => 2,
            Self::Many(values) => values.len(),
        }
    }

    /// Checks that exactly one positional argument was passed, returning it.
    pub fn get_one_arg(self, name: &str) -> RunResult<Value> {
        match self {
            Self::One(a) => Ok(a),
            other => Err(ExcType::type_error_arg_count(name, 1, other.count())),
        }
    }

    /// Checks that zero or one positional arguments were passed.
    pub fn get_zero_one_arg(self, name: &str) -> RunResult<Option<Value>> {
        match self {
            Self::Empty => Ok(None),
            Self::One(a) => Ok(Some(a)),
            other => Err(ExcType::type_error_at_most(name, 1, other.count())),
        }
    }

    /// Checks that one or two positional arguments were passed.
    pub fn get_one_two_args(self, name: &str) -> RunResult<(Value, Option<Value>)> {
        match self {
            Self::One(a) => Ok((a, None)),
            Self::Two(a, b) => Ok((a, Some(b))),
            Self::Empty => Err(ExcType::type_error_at_least(name, 1, 0)),
            other => Err(ExcType::type_error_at_most(name, 2, other.count())),
        }
    }

    /// Checks that at most two positional arguments were passed.
    pub fn get_zero_one_two_args(self, name: &str) -> RunResult<(Option<Value>, Option<Value>)> {
        match self {
            Self::Empty => Ok((None, None)),
            Self::One(a) => Ok((Some(a), None)),
            Self::Two(a, b) => Ok((Some(a), Some(b))),
            other => Err(ExcType::type_error_at_most(name, 2, other.count())),
        }
    }

    /// All arguments in call order.
    #[must_use]
    pub fn into_vec(self) -> Vec<Value> {
        match self {
            Self::Empty => Vec::new(),
            Self::One(a) => vec![a],
            Self::Two(a, b) => vec![a, b],
            Self::Many(values) => values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_picks_smallest_variant() {
        assert_eq!(ArgValues::from_vec(vec![]), ArgValues::Empty);
        assert_eq!(ArgValues::from_vec(vec![Value::Int(1)]), ArgValues::One(Value::Int(1)));
        assert_eq!(
            ArgValues::from_vec(vec![Value::Int(1), Value::Int(2)]),
            ArgValues::Two(Value::Int(1), Value::Int(2))
        );
        let many = ArgValues::from_vec(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(many.count(), 3);
        assert_eq!(many.into_vec(), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn arity_errors() {
        let err = ArgValues::Two(Value::None, Value::None).get_one_arg("len").unwrap_err();
        assert_eq!(
            err.into_python_exception("test.py", "").summary(),
            "TypeError: len() takes exactly one argument (2 given)"
        );
        let err = ArgValues::Empty.get_one_two_args("next").unwrap_err();
        assert_eq!(
            err.into_python_exception("test.py", "").summary(),
            "TypeError: next expected at least 1 argument, got 0"
        );
    }
}
