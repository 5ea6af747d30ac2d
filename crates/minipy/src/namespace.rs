use crate::value::Value;

/// Index of a module-level variable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NamespaceId(usize);

impl NamespaceId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index value.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Module globals, one slot per assigned name.
///
/// A slot is `None` until its first assignment runs, so lookups before that
/// point fall back to the builtin of the same name.
#[derive(Debug)]
pub(crate) struct Namespace(Vec<Option<Value>>);

impl Namespace {
    pub fn new(size: usize) -> Self {
        Self(vec![None; size])
    }

    pub fn get(&self, id: NamespaceId) -> Option<Value> {
        self.0.get(id.index()).copied().flatten()
    }

    pub fn set(&mut self, id: NamespaceId, value: Value) {
        if let Some(slot) = self.0.get_mut(id.index()) {
            *slot = Some(value);
        }
    }

    /// Bound slots in slot order.
    pub fn bound(&self) -> impl Iterator<Item = (NamespaceId, Value)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|value| (NamespaceId::new(index), value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_start_unbound() {
        let mut ns = Namespace::new(2);
        let a = NamespaceId::new(0);
        let b = NamespaceId::new(1);
        assert_eq!(ns.get(a), None);
        ns.set(b, Value::Int(3));
        assert_eq!(ns.get(b), Some(Value::Int(3)));
        assert_eq!(ns.bound().collect::<Vec<_>>(), vec![(b, Value::Int(3))]);
    }
}
