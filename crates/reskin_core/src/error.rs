//! Error types shared by every provider.

use thiserror::Error;

use crate::id::ResId;

/// Errors surfaced by resource lookups and override registration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResourceError {
    /// The resource does not exist, or has no value of the requested type.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The identifier may not be written in the requested scope.
    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdentifier),

    /// A forwarding target has been released.
    #[error("forwarding target for {0} is no longer available")]
    ProviderUnavailable(ResId),
}

impl ResourceError {
    /// Creates a [`ResourceError::NotFound`] for an identifier.
    #[must_use]
    pub fn missing(id: ResId) -> Self {
        Self::NotFound(format!("resource ID #{id}"))
    }

    /// Creates a [`ResourceError::NotFound`] for a named resource.
    #[must_use]
    pub fn missing_name(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }
}

/// Rejections raised when registering an override or callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidIdentifier {
    /// Zero is never a valid identifier.
    #[error("id 0 is not an allowed resource identifier")]
    Zero,

    /// App-private identifiers cannot be claimed system-wide.
    #[error("ids >= 0x7f000000 are app specific and cannot be set for the global scope ({0})")]
    AppPrivateInGlobalScope(ResId),
}
