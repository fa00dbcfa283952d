//! # Reskin Internal Library
//!
//! Re-exports the Reskin crates for convenience.

/// Layer 1: host, plugins and APIs.
pub use reskin_system;

/// Layer 1: identifiers, tables and provider contracts.
pub use reskin_core;

/// Layer 2: the resource overlay.
pub use reskin_resources;

/// Layer 2: infrastructure plugins.
pub use reskin_core_plugins;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use reskin_core::{
        Asset, AssetHandle, DocumentParser, Forwarder, InvalidIdentifier, LoadedDocument,
        Replacement, ResId, ResourceError, ResourceNames, ResourceProvider, Scope,
        StyledAttributes,
    };
    pub use reskin_core_plugins::{DefaultPlugins, MinimalPlugins, TracingPlugin};
    pub use reskin_resources::{
        LayoutCallback, LayoutHookHandle, LayoutInflated, Overlay, OverlayResources, ReskinPlugin,
    };
    pub use reskin_system::prelude::*;
}
