//! Infrastructure plugins for Reskin hosts.
//!
//! - [`TracingPlugin`] - installs a `tracing` subscriber
//! - [`DefaultPlugins`] - tracing plus the resource overlay
//! - [`MinimalPlugins`] - the resource overlay alone, for tests
//!
//! # Example
//!
//! ```
//! use reskin_core_plugins::DefaultPlugins;
//! use reskin_resources::Overlay;
//! use reskin_system::host::Host;
//! use reskin_system::plugin::PluginGroup;
//!
//! let mut host = Host::new();
//! host.add_plugins(DefaultPlugins.build());
//! host.finish();
//!
//! assert!(host.contains_api::<Overlay>());
//! ```

mod tracing_plugin;

pub use tracing_plugin::{TracingConfig, TracingFormat, TracingPlugin};

use reskin_resources::ReskinPlugin;
use reskin_system::plugin::{PluginGroup, PluginGroupBuilder};

/// Tracing and the resource overlay with default settings.
///
/// Swap in a configured overlay by disabling the default one:
///
/// ```
/// use reskin_core_plugins::DefaultPlugins;
/// use reskin_resources::ReskinPlugin;
/// use reskin_system::host::Host;
/// use reskin_system::plugin::PluginGroup;
///
/// let mut host = Host::new();
/// host.add_plugins(DefaultPlugins.build().disable::<ReskinPlugin>());
/// host.add_plugins(ReskinPlugin::default());
/// host.finish();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPlugins;

impl PluginGroup for DefaultPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::new()
            .add(TracingPlugin::default())
            .add(ReskinPlugin::default())
    }
}

/// The resource overlay without a subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimalPlugins;

impl PluginGroup for MinimalPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::new().add(ReskinPlugin::default())
    }
}
