use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use crate::render::error::RenderError;

use super::Bindings;

/// Process-run identity of one drawable kind.
///
/// Assigned from a monotonically increasing counter the first time a kind is
/// seen; never persisted.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TypeKey(u32);

impl TypeKey {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type #{}", self.0)
    }
}

/// Hands out [`TypeKey`]s.
///
/// Rust types get one key each. Kinds parameterized at runtime (a mesh file
/// at some scale) are keyed by a caller-supplied name instead. Both draw from
/// the same counter, so keys never collide.
#[derive(Debug)]
pub struct TypeRegistry {
    next: u32,
    by_type: HashMap<TypeId, TypeKey>,
    by_name: HashMap<String, TypeKey>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self {
            next: 1,
            by_type: HashMap::new(),
            by_name: HashMap::new(),
        }
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_of<T: 'static>(&mut self) -> TypeKey {
        let id = TypeId::of::<T>();
        if let Some(&key) = self.by_type.get(&id) {
            return key;
        }
        let key = self.bump();
        self.by_type.insert(id, key);
        log::debug!("{key} assigned to {}", std::any::type_name::<T>());
        key
    }

    pub fn key_named(&mut self, name: &str) -> TypeKey {
        if let Some(&key) = self.by_name.get(name) {
            return key;
        }
        let key = self.bump();
        self.by_name.insert(name.to_string(), key);
        log::debug!("{key} assigned to `{name}`");
        key
    }

    pub fn len(&self) -> usize {
        self.by_type.len() + self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn bump(&mut self) -> TypeKey {
        let key = TypeKey(self.next);
        self.next += 1;
        key
    }
}

/// Per-kind shared binding lists. Each slot is written at most once.
#[derive(Debug, Default)]
pub struct SharedRegistry {
    slots: HashMap<TypeKey, Bindings>,
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: TypeKey, bindings: Bindings) -> Result<(), RenderError> {
        if self.slots.contains_key(&key) {
            return Err(RenderError::SharedSlotAlreadySet(key));
        }
        self.slots.insert(key, bindings);
        Ok(())
    }

    pub fn get(&self, key: TypeKey) -> Option<&Bindings> {
        self.slots.get(&key)
    }

    pub fn contains(&self, key: TypeKey) -> bool {
        self.slots.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Remove every slot, in key order.
    pub fn drain(&mut self) -> Vec<(TypeKey, Bindings)> {
        let mut slots: Vec<_> = self.slots.drain().collect();
        slots.sort_by_key(|(k, _)| *k);
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Alpha;
    struct Beta;

    #[test]
    fn keys_start_at_one_and_increase() {
        let mut types = TypeRegistry::new();
        assert_eq!(types.key_of::<Alpha>().get(), 1);
        assert_eq!(types.key_named("mesh:a").get(), 2);
        assert_eq!(types.key_of::<Beta>().get(), 3);
    }

    #[test]
    fn keys_are_stable_per_identity() {
        let mut types = TypeRegistry::new();
        let a = types.key_of::<Alpha>();
        let n = types.key_named("sphere:1");
        assert_eq!(types.key_of::<Alpha>(), a);
        assert_eq!(types.key_named("sphere:1"), n);
        assert_eq!(types.len(), 2);
    }

    #[test]
    fn shared_slot_is_set_once() {
        let mut types = TypeRegistry::new();
        let key = types.key_of::<Alpha>();
        let mut shared = SharedRegistry::new();
        shared.insert(key, Bindings::new()).unwrap();
        let err = shared.insert(key, Bindings::new()).unwrap_err();
        assert!(matches!(err, RenderError::SharedSlotAlreadySet(k) if k == key));
        assert_eq!(shared.len(), 1);
    }
}
