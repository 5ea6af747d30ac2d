use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::{
    exception_public::{Exception, StackFrame},
    parse::CodeRange,
    resource::ResourceError,
    types::Type,
};

/// Result type alias for operations that can produce a runtime error.
pub type RunResult<T> = Result<T, RunError>;

/// Python exception types raised by the interpreter.
///
/// Uses strum derives for automatic `Display`, `FromStr`, and `Into<&'static str>` implementations.
/// The string representation matches the variant name exactly (e.g., `ValueError` -> "ValueError").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize, Deserialize)]
pub enum ExcType {
    /// Intermediate class for arithmetic errors.
    ArithmeticError,
    /// Subclass of ArithmeticError.
    OverflowError,

    // --- LookupError hierarchy ---
    LookupError,
    IndexError,
    KeyError,

    NameError,
    ValueError,
    TypeError,

    /// Raised by `next()` once an iterator has no more items.
    StopIteration,

    /// Raised when a resource limit on allocations or memory is hit.
    MemoryError,
    /// Raised when a resource limit on wall time is hit.
    TimeoutError,
    /// Raised when writing `print()` output fails.
    OSError,
    /// Raised when nested data or expressions are too deep to walk.
    RecursionError,

    /// Base class for parser failures.
    SyntaxError,
    /// Subclass of SyntaxError for unexpected indentation.
    IndentationError,
    /// Valid Python that the interpreter does not support.
    NotImplementedError,
}

impl ExcType {
    #[must_use]
    pub(crate) fn type_error(msg: impl Display) -> RunError {
        SimpleException::new_msg(Self::TypeError, msg).into()
    }

    #[must_use]
    pub(crate) fn value_error(msg: impl Display) -> RunError {
        SimpleException::new_msg(Self::ValueError, msg).into()
    }

    #[must_use]
    pub(crate) fn overflow_error(msg: impl Display) -> RunError {
        SimpleException::new_msg(Self::OverflowError, msg).into()
    }

    #[must_use]
    pub(crate) fn recursion_error(msg: impl Display) -> RunError {
        SimpleException::new_msg(Self::RecursionError, msg).into()
    }

    /// Creates a NameError for a name with no binding in globals or builtins.
    ///
    /// Matches CPython's format: `NameError: name 'x' is not defined`
    #[must_use]
    pub(crate) fn name_error(name: &str) -> RunError {
        SimpleException::new_msg(Self::NameError, format!("name '{name}' is not defined")).into()
    }

    /// `StopIteration` carries no message when raised by `next()`.
    #[must_use]
    pub(crate) fn stop_iteration() -> RunError {
        SimpleException::new(Self::StopIteration, None).into()
    }

    /// Creates a TypeError for a builtin that takes exactly `expected` arguments.
    ///
    /// # Arguments
    /// * `name` - The function name (e.g., "len", "abs")
    /// * `expected` - Number of arguments the function takes
    /// * `actual` - Number of arguments actually provided
    #[must_use]
    pub(crate) fn type_error_arg_count(name: &str, expected: usize, actual: usize) -> RunError {
        if expected == 1 {
            // CPython: "len() takes exactly one argument (2 given)"
            SimpleException::new_msg(
                Self::TypeError,
                format!("{name}() takes exactly one argument ({actual} given)"),
            )
            .into()
        } else {
            SimpleException::new_msg(
                Self::TypeError,
                format!("{name} expected {expected} arguments, got {actual}"),
            )
            .into()
        }
    }

    /// Creates a TypeError for when a function receives fewer arguments than required.
    ///
    /// Matches CPython's format: `{name} expected at least {min} argument, got {actual}`
    #[must_use]
    pub(crate) fn type_error_at_least(name: &str, min: usize, actual: usize) -> RunError {
        let plural = if min == 1 { "" } else { "s" };
        SimpleException::new_msg(
            Self::TypeError,
            format!("{name} expected at least {min} argument{plural}, got {actual}"),
        )
        .into()
    }

    /// Creates a TypeError for when a function receives more arguments than allowed.
    ///
    /// Matches CPython's format: `{name} expected at most {max} arguments, got {actual}`
    #[must_use]
    pub(crate) fn type_error_at_most(name: &str, max: usize, actual: usize) -> RunError {
        let plural = if max == 1 { "" } else { "s" };
        SimpleException::new_msg(
            Self::TypeError,
            format!("{name} expected at most {max} argument{plural}, got {actual}"),
        )
        .into()
    }

    #[must_use]
    pub(crate) fn type_error_not_iterable(type_: Type) -> RunError {
        SimpleException::new_msg(Self::TypeError, format!("'{type_}' object is not iterable")).into()
    }

    #[must_use]
    pub(crate) fn type_error_not_iterator(type_: Type) -> RunError {
        SimpleException::new_msg(Self::TypeError, format!("'{type_}' object is not an iterator")).into()
    }

    #[must_use]
    pub(crate) fn type_error_not_callable(type_: Type) -> RunError {
        SimpleException::new_msg(Self::TypeError, format!("'{type_}' object is not callable")).into()
    }

    /// Creates a TypeError for unhashable types used as dict keys.
    ///
    /// Matches CPython's format: `TypeError: unhashable type: 'list'`
    #[must_use]
    pub(crate) fn type_error_unhashable(type_: Type) -> RunError {
        SimpleException::new_msg(Self::TypeError, format!("unhashable type: '{type_}'")).into()
    }

    /// Creates a TypeError for values used where an integer index is required.
    ///
    /// Matches CPython's format: `TypeError: 'float' object cannot be interpreted as an integer`
    #[must_use]
    pub(crate) fn type_error_not_integer(type_: Type) -> RunError {
        SimpleException::new_msg(
            Self::TypeError,
            format!("'{type_}' object cannot be interpreted as an integer"),
        )
        .into()
    }

    /// Creates a TypeError for a binary operator applied to incompatible operands.
    ///
    /// Matches CPython's format: `TypeError: unsupported operand type(s) for +: 'int' and 'str'`
    #[must_use]
    pub(crate) fn type_error_unsupported_operands(op: impl Display, left: Type, right: Type) -> RunError {
        SimpleException::new_msg(
            Self::TypeError,
            format!("unsupported operand type(s) for {op}: '{left}' and '{right}'"),
        )
        .into()
    }

    /// Creates a TypeError for a unary operator applied to a non-numeric operand.
    ///
    /// Matches CPython's format: `TypeError: bad operand type for unary -: 'str'`
    #[must_use]
    pub(crate) fn type_error_bad_unary_operand(op: impl Display, type_: Type) -> RunError {
        SimpleException::new_msg(Self::TypeError, format!("bad operand type for unary {op}: '{type_}'")).into()
    }
}

/// Simple lightweight representation of an exception.
///
/// Holds the exception type and the optional message; the location is attached
/// separately by [`ExceptionRaise`] once the failing statement is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SimpleException {
    exc_type: ExcType,
    arg: Option<String>,
}

impl SimpleException {
    #[must_use]
    pub fn new(exc_type: ExcType, arg: Option<String>) -> Self {
        Self { exc_type, arg }
    }

    #[must_use]
    pub fn new_msg(exc_type: ExcType, arg: impl Display) -> Self {
        Self {
            exc_type,
            arg: Some(arg.to_string()),
        }
    }

    #[must_use]
    pub fn exc_type(&self) -> ExcType {
        self.exc_type
    }

    /// The message, `None` for the `StopIteration` raised by `next()`.
    #[must_use]
    pub fn arg(&self) -> Option<&str> {
        self.arg.as_deref()
    }
}

impl fmt::Display for SimpleException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arg {
            Some(arg) => write!(f, "{}: {arg}", self.exc_type),
            None => write!(f, "{}", self.exc_type),
        }
    }
}

/// Location of a raise before it is resolved against the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RawStackFrame {
    pub position: CodeRange,
}

impl RawStackFrame {
    #[must_use]
    pub fn new(position: CodeRange) -> Self {
        Self { position }
    }
}

/// An exception together with the frame that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ExceptionRaise {
    pub exc: SimpleException,
    /// `None` until the runner attaches the failing statement's position.
    pub frame: Option<RawStackFrame>,
}

impl From<SimpleException> for ExceptionRaise {
    fn from(exc: SimpleException) -> Self {
        Self { exc, frame: None }
    }
}

/// Error propagated out of builtins and evaluation.
///
/// `Resource` errors are kept apart from Python exceptions until they reach
/// the runner, which converts them with [`ResourceError::into_exception`].
#[derive(Debug, Clone)]
pub(crate) enum RunError {
    Exc(Box<ExceptionRaise>),
    Resource(ResourceError),
}

impl RunError {
    /// Records the statement position if no frame has been attached yet.
    #[must_use]
    pub fn with_position(self, position: CodeRange) -> Self {
        match self {
            Self::Exc(mut raise) => {
                if raise.frame.is_none() {
                    raise.frame = Some(RawStackFrame::new(position));
                }
                Self::Exc(raise)
            }
            Self::Resource(err) => Self::Exc(Box::new(err.into_exception(Some(RawStackFrame::new(position))))),
        }
    }

    /// Converts to the public exception, resolving the frame against the source.
    #[must_use]
    pub fn into_python_exception(self, script_name: &str, code: &str) -> Exception {
        let raise = match self {
            Self::Exc(raise) => *raise,
            Self::Resource(err) => err.into_exception(None),
        };
        let traceback = raise
            .frame
            .map(|frame| StackFrame::from_position(frame.position, script_name, code));
        Exception::new(raise.exc.exc_type(), raise.exc.arg().map(str::to_owned)).with_traceback(traceback)
    }
}

impl From<SimpleException> for RunError {
    fn from(exc: SimpleException) -> Self {
        Self::Exc(Box::new(exc.into()))
    }
}

impl From<Exception> for RunError {
    fn from(exc: Exception) -> Self {
        let exc_type = exc.exc_type();
        SimpleException::new(exc_type, exc.into_message()).into()
    }
}

impl From<ResourceError> for RunError {
    fn from(err: ResourceError) -> Self {
        Self::Resource(err)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn exc_type_round_trips_through_its_name() {
        assert_eq!(ExcType::from_str("StopIteration").unwrap(), ExcType::StopIteration);
        assert_eq!(ExcType::TypeError.to_string(), "TypeError");
    }

    #[test]
    fn arg_count_message_matches_cpython() {
        let RunError::Exc(raise) = ExcType::type_error_arg_count("len", 1, 2) else {
            panic!("expected exception");
        };
        assert_eq!(raise.exc.to_string(), "TypeError: len() takes exactly one argument (2 given)");
    }

    #[test]
    fn stop_iteration_has_no_message() {
        let RunError::Exc(raise) = ExcType::stop_iteration() else {
            panic!("expected exception");
        };
        assert_eq!(raise.exc.to_string(), "StopIteration");
        assert_eq!(raise.exc.arg(), None);
    }
}
