use std::fmt::{self, Write};

use crate::{
    args::ArgValues,
    exception_private::RunResult,
    heap::{Heap, HeapData},
    resource::ResourceTracker,
    types::{PyTrait, Type},
    value::Value,
};

/// Python `str`, an immutable sequence of code points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Str(String);

impl Str {
    #[must_use]
    pub fn new(s: String) -> Self {
        Self(s)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `len(s)`: the number of code points, not bytes.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    /// Implements `str()` and `str(x)`.
    pub fn init(heap: &mut Heap<impl ResourceTracker>, args: ArgValues) -> RunResult<Value> {
        let text = match args.get_zero_one_arg("str")? {
            None => String::new(),
            Some(Value::Ref(id)) if matches!(heap.get(id), HeapData::Str(_)) => return Ok(Value::Ref(id)),
            Some(value) => value.py_str(heap),
        };
        allocate_str(text, heap)
    }
}

impl PyTrait for Str {
    fn py_type(&self) -> Type {
        Type::Str
    }

    fn py_estimate_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.0.len()
    }

    fn py_repr_fmt(&self, f: &mut impl Write, _heap: &Heap<impl ResourceTracker>) -> fmt::Result {
        string_repr_fmt(&self.0, f)
    }
}

/// Allocates a new `str` object on the heap.
pub(crate) fn allocate_str(s: String, heap: &mut Heap<impl ResourceTracker>) -> RunResult<Value> {
    let id = heap.allocate(HeapData::Str(Str::new(s)))?;
    Ok(Value::Ref(id))
}

/// Allocates a one-character `str`, as produced by iterating a string.
pub(crate) fn allocate_char(c: char, heap: &mut Heap<impl ResourceTracker>) -> RunResult<Value> {
    allocate_str(c.to_string(), heap)
}

/// Writes the CPython `repr()` of a string.
///
/// Single quotes are used unless the string contains a single quote and no
/// double quote. Backslashes, the chosen quote, `\t`, `\n`, `\r` and other
/// control characters are escaped.
pub(crate) fn string_repr_fmt(s: &str, f: &mut impl Write) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    f.write_char(quote)?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\t' => f.write_str("\\t")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            c if c == quote => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            c if (c as u32) < 0x20 || (0x7f..0xa0).contains(&(c as u32)) => write!(f, "\\x{:02x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

/// Display adapter writing the CPython `repr()` of a string.
pub(crate) struct StringRepr<'a>(pub &'a str);

impl fmt::Display for StringRepr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        string_repr_fmt(self.0, f)
    }
}
