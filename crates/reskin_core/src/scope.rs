//! Override scopes.

use core::fmt;
use std::sync::Arc;

/// The origin an override, name cache entry, or callback is attributed to.
///
/// [`Scope::Global`] entries apply to every origin. [`Scope::Origin`] entries
/// apply only to resources loaded from that package path and take precedence
/// over global ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// System-wide scope, shared by all origins.
    #[default]
    Global,
    /// A single package, identified by its on-disk path.
    Origin(Arc<str>),
}

impl Scope {
    /// Creates an origin scope for a package path.
    #[must_use]
    pub fn origin(path: impl Into<Arc<str>>) -> Self {
        Self::Origin(path.into())
    }

    /// Returns true for [`Scope::Global`].
    #[must_use]
    pub const fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }

    /// Returns the package path of an origin scope.
    #[must_use]
    pub fn as_origin(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::Origin(path) => Some(path),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("<global>"),
            Self::Origin(path) => f.write_str(path),
        }
    }
}
