/// Type definitions for Python runtime values.
///
/// This module contains the heap-allocated types (`str`, `tuple`, `list`,
/// `dict`, `range`, iterators, big ints and complex numbers) and the `Type`
/// tag used for `type()` names in error messages.
pub mod complex;
pub mod dict;
pub mod iter;
pub mod list;
pub mod long_int;
pub mod py_trait;
pub mod range;
pub mod str;
pub mod tuple;
pub mod r#type;

pub(crate) use complex::Complex;
pub(crate) use dict::{Dict, DictKey};
pub(crate) use iter::PyIter;
pub(crate) use list::List;
pub(crate) use long_int::LongInt;
pub(crate) use py_trait::PyTrait;
pub(crate) use range::Range;
pub(crate) use str::Str;
pub(crate) use tuple::Tuple;
pub(crate) use r#type::Type;
