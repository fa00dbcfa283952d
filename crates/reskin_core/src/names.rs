//! Resource names and the per-scope name cache.

use core::fmt;
use std::sync::Arc;

use crate::id::ResId;
use crate::scope::Scope;
use crate::scoped::ScopedMap;

/// The symbolic name of a resource.
///
/// `full_name` is always `package:type_name/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceNames {
    /// Identifier the names were looked up for.
    pub id: ResId,
    /// Owning package, e.g. `android` or `com.example.app`.
    pub package: String,
    /// Resource type, e.g. `layout`, `drawable`, `id`.
    pub type_name: String,
    /// Entry name within the type.
    pub name: String,
    /// `package:type_name/name`.
    pub full_name: String,
}

impl ResourceNames {
    /// Builds names from their parts.
    #[must_use]
    pub fn new(
        id: ResId,
        package: impl Into<String>,
        type_name: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let package = package.into();
        let type_name = type_name.into();
        let name = name.into();
        let full_name = format!("{package}:{type_name}/{name}");
        Self {
            id,
            package,
            type_name,
            name,
            full_name,
        }
    }

    /// Partial match. Every `None` argument is a wildcard.
    ///
    /// ```
    /// use reskin_core::{ResId, ResourceNames};
    ///
    /// let names = ResourceNames::new(ResId::new(0x7f03_0001), "com.app", "layout", "main");
    /// assert!(names.matches(None, Some("main"), Some("layout"), None));
    /// assert!(!names.matches(Some("android"), Some("main"), None, None));
    /// ```
    #[must_use]
    pub fn matches(
        &self,
        package: Option<&str>,
        name: Option<&str>,
        type_name: Option<&str>,
        id: Option<ResId>,
    ) -> bool {
        package.is_none_or(|p| p == self.package)
            && name.is_none_or(|n| n == self.name)
            && type_name.is_none_or(|t| t == self.type_name)
            && id.is_none_or(|i| i == self.id)
    }
}

impl fmt::Display for ResourceNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

/// Splits `package:type/name` (package optional) into its parts.
///
/// Returns `None` when the type separator is missing or a part is empty.
#[must_use]
pub fn split_full_name(full_name: &str) -> Option<(Option<&str>, &str, &str)> {
    let (package, rest) = match full_name.split_once(':') {
        Some((package, rest)) => (Some(package), rest),
        None => (None, full_name),
    };
    let (type_name, name) = rest.split_once('/')?;
    if type_name.is_empty() || name.is_empty() || package.is_some_and(str::is_empty) {
        return None;
    }
    Some((package, type_name, name))
}

/// Caches [`ResourceNames`] per identifier and scope.
///
/// Populated lazily by reverse lookups and eagerly when a layout callback is
/// registered, so dispatch never has to hit the provider again.
#[derive(Debug, Default)]
pub struct NameRegistry {
    names: ScopedMap<Arc<ResourceNames>>,
}

impl NameRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores names for `scope`, replacing any previous entry.
    pub fn insert(&self, scope: Scope, names: ResourceNames) -> Arc<ResourceNames> {
        let names = Arc::new(names);
        self.names.insert(names.id, scope, Arc::clone(&names));
        names
    }

    /// Returns names cached for exactly `scope`.
    #[must_use]
    pub fn get(&self, id: ResId, scope: &Scope) -> Option<Arc<ResourceNames>> {
        self.names.get(id, scope)
    }

    /// Returns names cached for `scope`, or the global entry.
    #[must_use]
    pub fn resolve(&self, id: ResId, scope: &Scope) -> Option<Arc<ResourceNames>> {
        self.names.resolve(id, scope)
    }

    /// Returns cached names, computing and caching them on a miss.
    ///
    /// # Errors
    ///
    /// Propagates the error of `compute`. Nothing is cached in that case.
    pub fn get_or_compute<E>(
        &self,
        id: ResId,
        scope: &Scope,
        compute: impl FnOnce() -> Result<ResourceNames, E>,
    ) -> Result<Arc<ResourceNames>, E> {
        if let Some(names) = self.get(id, scope) {
            return Ok(names);
        }
        let computed = compute()?;
        Ok(self.insert(scope.clone(), computed))
    }

    /// Returns the number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
