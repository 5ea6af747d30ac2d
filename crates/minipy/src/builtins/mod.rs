//! Python builtin functions and type constructors.
//!
//! Each builtin function has its own submodule; type constructors dispatch to
//! the `init` of the matching type in [`crate::types`].

mod abs;
mod len;
mod next;
mod print;
mod repr;

use std::{fmt::Write, str::FromStr};

use strum::{Display, EnumString, IntoStaticStr};

use crate::{
    args::ArgValues,
    exception_private::{ExcType, RunResult},
    heap::Heap,
    io::PrintWriter,
    resource::ResourceTracker,
    types::{Complex, List, PyIter, Range, Str, Tuple, Type},
    value::Value,
};

/// Every callable a script can reach by name without assigning it first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub(crate) enum Builtins {
    /// A builtin function like `print`, `len`, `next`.
    Function(BuiltinsFunctions),
    /// A type constructor like `complex`, `range`, `list`.
    Type(Type),
}

impl Builtins {
    /// Calls this builtin with the given arguments.
    ///
    /// # Arguments
    /// * `heap` - The heap for allocating objects
    /// * `args` - The arguments to pass to the callable
    /// * `print` - Destination for `print()` output
    pub fn call(
        self,
        heap: &mut Heap<impl ResourceTracker>,
        args: ArgValues,
        print: &mut impl PrintWriter,
    ) -> RunResult<Value> {
        match self {
            Self::Function(b) => b.call(heap, args, print),
            Self::Type(t) => t.call(heap, args),
        }
    }

    /// Writes the Python repr() string for this callable to a formatter.
    pub fn py_repr_fmt<W: Write>(self, f: &mut W) -> std::fmt::Result {
        match self {
            Self::Function(b) => write!(f, "<built-in function {b}>"),
            Self::Type(t) => write!(f, "<class '{t}'>"),
        }
    }

    /// Returns the type of this builtin.
    pub fn py_type(self) -> Type {
        match self {
            Self::Function(_) => Type::BuiltinFunction,
            Self::Type(_) => Type::Type,
        }
    }
}

impl FromStr for Builtins {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(b) = BuiltinsFunctions::from_str(s) {
            Ok(Self::Function(b))
        } else if let Some(t) = Type::constructor(s) {
            Ok(Self::Type(t))
        } else {
            Err(())
        }
    }
}

/// Enumerates the builtin functions the interpreter implements.
///
/// Note: Type constructors are handled by the `Type` enum, not here.
///
/// Uses strum derives for automatic `Display`, `FromStr`, and `IntoStaticStr` implementations.
/// All variants serialize to lowercase (e.g., `Print` -> "print").
#[derive(
    Debug,
    Clone,
    Copy,
    Display,
    EnumString,
    IntoStaticStr,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum BuiltinsFunctions {
    Abs,
    Iter,
    Len,
    Next,
    Print,
    Repr,
}

impl BuiltinsFunctions {
    /// Executes the builtin with the provided positional arguments.
    pub(crate) fn call(
        self,
        heap: &mut Heap<impl ResourceTracker>,
        args: ArgValues,
        print_writer: &mut impl PrintWriter,
    ) -> RunResult<Value> {
        match self {
            Self::Abs => abs::builtin_abs(heap, args),
            Self::Iter => PyIter::init(heap, args),
            Self::Len => len::builtin_len(heap, args),
            Self::Next => next::builtin_next(heap, args),
            Self::Print => print::builtin_print(heap, args, print_writer),
            Self::Repr => repr::builtin_repr(heap, args),
        }
    }
}

impl Type {
    /// Calls this type as a constructor (e.g., `complex(2, 3)`, `list(x)`).
    pub(crate) fn call(self, heap: &mut Heap<impl ResourceTracker>, args: ArgValues) -> RunResult<Value> {
        match self {
            Self::Complex => Complex::init(heap, args),
            Self::Range => Range::init(heap, args),
            Self::Str => Str::init(heap, args),
            Self::List => List::init(heap, args),
            Self::Tuple => Tuple::init(heap, args),
            other => Err(ExcType::type_error(format!(
                "cannot create '{other}' instances"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_to_builtins() {
        assert_eq!(Builtins::from_str("len"), Ok(Builtins::Function(BuiltinsFunctions::Len)));
        assert_eq!(Builtins::from_str("complex"), Ok(Builtins::Type(Type::Complex)));
        assert_eq!(Builtins::from_str("int"), Err(()));
        assert_eq!(Builtins::from_str("Len"), Err(()));
    }

    #[test]
    fn repr_of_builtins() {
        let mut s = String::new();
        Builtins::Type(Type::Range).py_repr_fmt(&mut s).unwrap();
        assert_eq!(s, "<class 'range'>");
    }
}
