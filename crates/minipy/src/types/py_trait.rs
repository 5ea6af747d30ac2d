use std::fmt::{self, Write};

use crate::{heap::Heap, resource::ResourceTracker, types::Type};

/// Behaviour shared by every heap-allocated Python type.
pub(crate) trait PyTrait {
    /// The Python type of this object, as reported by `type()`.
    fn py_type(&self) -> Type;

    /// Approximate size in bytes, charged to the resource tracker on allocation.
    fn py_estimate_size(&self) -> usize;

    /// Writes `repr(self)`.
    ///
    /// Containers need the heap to format their items.
    fn py_repr_fmt(&self, f: &mut impl Write, heap: &Heap<impl ResourceTracker>) -> fmt::Result;
}
