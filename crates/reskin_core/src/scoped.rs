//! Two-level identifier → scope maps.
//!
//! The replacement table, the name registry and the layout callback registry
//! all share the same shape: an outer map from [`ResId`] to an inner map from
//! [`Scope`] to a value. [`ScopedMap`] gives each identifier its own inner
//! lock so writers for different identifiers never contend, and the outer
//! lock is only taken for writing when an identifier is first seen.

use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::id::ResId;
use crate::scope::Scope;

/// The per-identifier inner map.
pub type ScopeSlot<T> = Arc<RwLock<HashMap<Scope, T>>>;

/// Identifier → scope → value map with per-identifier locking.
#[derive(Debug)]
pub struct ScopedMap<T> {
    slots: RwLock<HashMap<ResId, ScopeSlot<T>>>,
}

impl<T> Default for ScopedMap<T> {
    fn default() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> ScopedMap<T> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the inner map for `id`, if one was ever created.
    #[must_use]
    pub fn slot(&self, id: ResId) -> Option<ScopeSlot<T>> {
        self.slots.read().get(&id).cloned()
    }

    /// Returns the inner map for `id`, creating it on first use.
    pub fn slot_or_create(&self, id: ResId) -> ScopeSlot<T> {
        if let Some(slot) = self.slot(id) {
            return slot;
        }
        // Two racing creators both land on the same entry.
        self.slots.write().entry(id).or_default().clone()
    }

    /// Stores `value` under `(id, scope)` and returns the previous value.
    pub fn insert(&self, id: ResId, scope: Scope, value: T) -> Option<T> {
        self.slot_or_create(id).write().insert(scope, value)
    }

    /// Removes the value stored under `(id, scope)`.
    pub fn remove(&self, id: ResId, scope: &Scope) -> Option<T> {
        self.slot(id)?.write().remove(scope)
    }

    /// Removes `scope` from every identifier and returns the number of
    /// entries dropped.
    pub fn remove_scope(&self, scope: &Scope) -> usize {
        let slots = self.slots.read();
        slots
            .values()
            .filter(|slot| slot.write().remove(scope).is_some())
            .count()
    }

    /// Returns true if any entry exists for `(id, scope)`.
    #[must_use]
    pub fn contains(&self, id: ResId, scope: &Scope) -> bool {
        self.slot(id)
            .is_some_and(|slot| slot.read().contains_key(scope))
    }

    /// Returns the number of stored `(id, scope)` entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.read().values().map(|slot| slot.read().len()).sum()
    }

    /// Returns true if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> ScopedMap<T> {
    /// Returns the value stored under exactly `(id, scope)`.
    #[must_use]
    pub fn get(&self, id: ResId, scope: &Scope) -> Option<T> {
        self.slot(id)?.read().get(scope).cloned()
    }

    /// Returns the value for `(id, scope)`, falling back to the global entry
    /// when `scope` is an origin with no entry of its own.
    #[must_use]
    pub fn resolve(&self, id: ResId, scope: &Scope) -> Option<T> {
        let slot = self.slot(id)?;
        let inner = slot.read();
        let found = match scope {
            Scope::Global => inner.get(scope),
            Scope::Origin(_) => inner.get(scope).or_else(|| inner.get(&Scope::Global)),
        };
        found.cloned()
    }
}

impl<T: Default> ScopedMap<T> {
    /// Runs `f` on the value for `(id, scope)`, inserting a default first.
    pub fn update<R>(&self, id: ResId, scope: Scope, f: impl FnOnce(&mut T) -> R) -> R {
        let slot = self.slot_or_create(id);
        let mut inner = slot.write();
        f(inner.entry(scope).or_default())
    }
}
