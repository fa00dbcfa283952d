//! Module plugins and plugin groups.
//!
//! Every module that wants to override another component's resources is
//! delivered as a plugin. The host only orchestrates: it orders plugins by
//! their declared dependencies and walks them through `build`, `ready` and
//! `cleanup`.
//!
//! # Example
//!
//! ```
//! use reskin_system::host::Host;
//! use reskin_system::plugin::{Plugin, PluginId};
//!
//! struct RegistryPlugin;
//! impl Plugin for RegistryPlugin {
//!     fn build(&self, _host: &mut Host) {}
//! }
//!
//! struct DarkThemeModule;
//! impl Plugin for DarkThemeModule {
//!     fn build(&self, _host: &mut Host) {}
//!
//!     fn dependencies(&self) -> Vec<PluginId> {
//!         vec![PluginId::of::<RegistryPlugin>()]
//!     }
//! }
//!
//! let mut host = Host::new();
//! host.add_plugins(DarkThemeModule).add_plugins(RegistryPlugin);
//! host.finish();
//! ```

use core::any::{TypeId, type_name};

use crate::host::Host;

// ─────────────────────────────────────────────────────────────────────────────
// Identity
// ─────────────────────────────────────────────────────────────────────────────

/// Identifies a plugin by its concrete type.
///
/// Two registrations of the same type share a `PluginId`, which is how the
/// host spots duplicates and matches declared dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PluginId {
    type_id: TypeId,
    type_name: &'static str,
}

impl PluginId {
    /// The id of plugin type `P`.
    #[must_use]
    pub fn of<P: Plugin>() -> Self {
        Self {
            type_id: TypeId::of::<P>(),
            type_name: type_name::<P>(),
        }
    }

    /// The [`TypeId`] behind this id.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified type name, used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

/// A module loaded into the host.
///
/// `build` and `ready` run dependencies first. `cleanup` runs in the
/// opposite order.
pub trait Plugin: Send + Sync + 'static {
    /// Configures the host. Called once, in dependency order.
    fn build(&self, host: &mut Host);

    /// Called after every plugin has been built.
    ///
    /// Modules typically register their replacements here, once the
    /// registries inserted by their dependencies are guaranteed to exist.
    fn ready(&self, _host: &mut Host) {}

    /// Called when the host shuts down.
    fn cleanup(&self, _host: &mut Host) {}

    /// Label used in logs and panic messages.
    fn name(&self) -> &str {
        type_name::<Self>()
    }

    /// Plugins that must be built before this one.
    ///
    /// [`Host::finish`] panics if any of them was never added.
    fn dependencies(&self) -> Vec<PluginId> {
        Vec::new()
    }

    /// Whether adding this plugin type a second time is an error.
    fn is_unique(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Anything accepted by `Host::add_plugins`
// ─────────────────────────────────────────────────────────────────────────────

/// A single plugin or a [`PluginGroupBuilder`].
pub trait Plugins {
    /// Registers everything in `self` with `host`.
    fn add_to_host(self, host: &mut Host);
}

impl<P: Plugin> Plugins for P {
    fn add_to_host(self, host: &mut Host) {
        host.register(PluginId::of::<P>(), Box::new(self));
    }
}

impl Plugins for PluginGroupBuilder {
    fn add_to_host(self, host: &mut Host) {
        self.members
            .into_iter()
            .for_each(|(id, module)| host.register(id, module));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Groups
// ─────────────────────────────────────────────────────────────────────────────

/// A named bundle of plugins.
pub trait PluginGroup {
    /// Expands the bundle into a builder that can still be edited.
    fn build(self) -> PluginGroupBuilder;
}

/// Ordered, editable list of plugins produced by a [`PluginGroup`].
#[derive(Default)]
pub struct PluginGroupBuilder {
    members: Vec<(PluginId, Box<dyn Plugin>)>,
}

impl PluginGroupBuilder {
    /// An empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `plugin`.
    #[must_use]
    #[expect(
        clippy::should_implement_trait,
        reason = "builder-style append, unrelated to std::ops::Add"
    )]
    pub fn add<P: Plugin>(mut self, plugin: P) -> Self {
        self.members.push((PluginId::of::<P>(), Box::new(plugin)));
        self
    }

    /// Drops every member of type `P`. Does nothing if there is none.
    #[must_use]
    pub fn disable<P: Plugin>(mut self) -> Self {
        let unwanted = PluginId::of::<P>();
        self.members.retain(|(id, _)| *id != unwanted);
        self
    }

    /// Number of plugins in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no plugins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
