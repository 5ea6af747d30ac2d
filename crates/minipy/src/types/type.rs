use strum::{Display, EnumString};

/// Runtime type tag of a Python value.
///
/// `Display` produces the name CPython reports for `type(x).__name__`, which is
/// what error messages embed (e.g. `object of type 'int' has no len()`).
/// Parsing goes the other way, from a builtin name to its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, serde::Serialize, serde::Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum Type {
    Type,
    #[strum(serialize = "NoneType")]
    NoneType,
    Bool,
    Int,
    Float,
    Complex,
    Range,
    Str,
    List,
    Tuple,
    Dict,
    #[strum(serialize = "builtin_function_or_method")]
    BuiltinFunction,
    #[strum(serialize = "str_iterator")]
    StrIterator,
    #[strum(serialize = "list_iterator")]
    ListIterator,
    #[strum(serialize = "tuple_iterator")]
    TupleIterator,
    #[strum(serialize = "range_iterator")]
    RangeIterator,
    #[strum(serialize = "dict_keyiterator")]
    DictKeyIterator,
}

impl Type {
    /// Resolves a builtin type name that can be called as a constructor.
    ///
    /// Only the constructors the interpreter implements are returned, so
    /// `Type::constructor("int")` is `None` and `int(...)` raises `NameError`.
    #[must_use]
    pub fn constructor(name: &str) -> Option<Self> {
        name.parse().ok().filter(|t: &Self| t.is_constructor())
    }

    fn is_constructor(self) -> bool {
        matches!(self, Self::Complex | Self::Range | Self::Str | Self::List | Self::Tuple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_cpython() {
        assert_eq!(Type::NoneType.to_string(), "NoneType");
        assert_eq!(Type::Int.to_string(), "int");
        assert_eq!(Type::BuiltinFunction.to_string(), "builtin_function_or_method");
        assert_eq!(Type::DictKeyIterator.to_string(), "dict_keyiterator");
    }

    #[test]
    fn only_implemented_constructors_resolve() {
        assert_eq!(Type::constructor("complex"), Some(Type::Complex));
        assert_eq!(Type::constructor("tuple"), Some(Type::Tuple));
        assert_eq!(Type::constructor("int"), None);
        assert_eq!(Type::constructor("dict"), None);
        assert_eq!(Type::constructor("str_iterator"), None);
        assert_eq!(Type::constructor("Str"), None);
    }
}
