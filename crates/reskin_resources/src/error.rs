use reskin_core::ResourceError;
use thiserror::Error;

/// Failure to map a foreign reference into an origin.
///
/// Never surfaced to callers of document loading: the reference keeps its
/// foreign identifier and the failure is logged.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// The foreign provider could not describe the reference.
    #[error("foreign resource lookup failed: {0}")]
    Foreign(#[source] ResourceError),

    /// The forwarding override could not be stored.
    #[error("could not register forwarder: {0}")]
    Register(#[source] ResourceError),
}
