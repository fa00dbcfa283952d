//! The replacement table.

use parking_lot::RwLock;
use tracing::trace;

use crate::error::InvalidIdentifier;
use crate::id::ResId;
use crate::scope::Scope;
use crate::scoped::ScopedMap;
use crate::value::Replacement;

/// Override storage keyed by identifier and scope.
///
/// Writers for different identifiers proceed in parallel. Purging an origin
/// excludes every writer so a purge never interleaves with a concurrent
/// registration for the same origin.
#[derive(Debug, Default)]
pub struct ReplacementTable {
    entries: ScopedMap<Replacement>,
    purge: RwLock<()>,
}

impl ReplacementTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` for `(id, scope)`, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Rejects [`ResId::NULL`], and app-private identifiers in the global
    /// scope. The table is left untouched in both cases.
    pub fn set(
        &self,
        id: ResId,
        scope: Scope,
        value: Replacement,
    ) -> Result<Option<Replacement>, InvalidIdentifier> {
        id.validate_for(&scope)?;
        let _writer = self.purge.read();
        trace!(%id, %scope, kind = value.kind(), "storing replacement");
        Ok(self.entries.insert(id, scope, value))
    }

    /// Looks up the replacement visible to `scope`.
    ///
    /// An origin's own entry wins over the global one. Identifiers that are
    /// not strictly positive never resolve.
    #[must_use]
    pub fn get(&self, id: ResId, scope: &Scope) -> Option<Replacement> {
        if !id.is_lookup_key() {
            return None;
        }
        self.entries.resolve(id, scope)
    }

    /// Removes the entry stored under exactly `(id, scope)`.
    pub fn remove(&self, id: ResId, scope: &Scope) -> Option<Replacement> {
        let _writer = self.purge.read();
        self.entries.remove(id, scope)
    }

    /// Drops every entry attributed to `scope` and returns how many were removed.
    pub fn purge(&self, scope: &Scope) -> usize {
        let _exclusive = self.purge.write();
        self.entries.remove_scope(scope)
    }

    /// Returns true if an entry is stored under exactly `(id, scope)`.
    #[must_use]
    pub fn contains(&self, id: ResId, scope: &Scope) -> bool {
        self.entries.contains(id, scope)
    }

    /// Number of stored entries across all scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
