//! The overlay registry service.

use core::any::Any;
use core::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use reskin_core::{
    DocumentParser, ModificationSource, ModificationTracker, NameRegistry, Replacement,
    ReplacementTable, ResId, ResourceError, ResourceNames, ResourceProvider, Scope,
};
use reskin_system::api::API;
use tracing::debug;

use crate::hooks::{LayoutCallback, LayoutHookHandle, LayoutHooks};
use crate::resources::OverlayResources;

struct OverlayState {
    table: ReplacementTable,
    names: Arc<NameRegistry>,
    tracker: ModificationTracker,
    hooks: LayoutHooks,
    framework: RwLock<Option<Arc<dyn ResourceProvider>>>,
}

/// Shared registry of replacements, names and layout callbacks.
///
/// Cloning is cheap; every clone refers to the same registry. Install one
/// per host with [`ReskinPlugin`](crate::ReskinPlugin), or create isolated
/// instances directly in tests.
///
/// # Example
///
/// ```
/// use reskin_core::{ResId, Scope};
/// use reskin_resources::Overlay;
///
/// let overlay = Overlay::new();
/// overlay.set_system_wide_replacement(ResId::new(0x0101_0001), true).unwrap();
///
/// // App-private ids cannot be replaced system-wide.
/// assert!(overlay.set_system_wide_replacement(ResId::new(0x7f01_0001), true).is_err());
/// ```
#[derive(Clone)]
pub struct Overlay {
    state: Arc<OverlayState>,
}

impl API for Overlay {}

impl Default for Overlay {
    fn default() -> Self {
        Self::new()
    }
}

impl Overlay {
    /// Creates an overlay that tracks origins on the filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tracker(ModificationTracker::filesystem())
    }

    /// Creates an overlay reading modification times from `source`.
    #[must_use]
    pub fn with_modification_source(source: Arc<dyn ModificationSource>) -> Self {
        Self::with_tracker(ModificationTracker::new(source))
    }

    fn with_tracker(tracker: ModificationTracker) -> Self {
        let names = Arc::new(NameRegistry::new());
        Self {
            state: Arc::new(OverlayState {
                table: ReplacementTable::new(),
                hooks: LayoutHooks::new(Arc::clone(&names)),
                names,
                tracker,
                framework: RwLock::new(None),
            }),
        }
    }

    /// The replacement table.
    #[must_use]
    pub fn table(&self) -> &ReplacementTable {
        &self.state.table
    }

    /// The name registry.
    #[must_use]
    pub fn names(&self) -> &NameRegistry {
        &self.state.names
    }

    /// The modification tracker.
    #[must_use]
    pub fn tracker(&self) -> &ModificationTracker {
        &self.state.tracker
    }

    /// The layout callback registry.
    #[must_use]
    pub fn hooks(&self) -> &LayoutHooks {
        &self.state.hooks
    }

    /// Wraps `original` so lookups in `scope` honor overrides.
    #[must_use]
    pub fn resources_for(
        &self,
        scope: Scope,
        original: Arc<dyn ResourceProvider>,
    ) -> Arc<OverlayResources> {
        debug!(%scope, package = original.package_name(), "creating overlay resources");
        OverlayResources::new(self.clone(), scope, original)
    }

    /// Registers the framework provider and returns its global-scope wrapper.
    pub fn set_framework(&self, original: Arc<dyn ResourceProvider>) -> Arc<OverlayResources> {
        *self.state.framework.write() = Some(Arc::clone(&original));
        self.resources_for(Scope::Global, original)
    }

    /// Global-scope wrapper of the framework provider, if one is registered.
    #[must_use]
    pub fn framework(&self) -> Option<Arc<OverlayResources>> {
        let original = self.state.framework.read().clone()?;
        Some(OverlayResources::new(self.clone(), Scope::Global, original))
    }

    fn require_framework(&self) -> Result<Arc<dyn ResourceProvider>, ResourceError> {
        self.state
            .framework
            .read()
            .clone()
            .ok_or_else(|| ResourceError::missing_name("framework resources"))
    }

    /// Replaces `id` for every origin that has no replacement of its own.
    ///
    /// # Errors
    ///
    /// [`ResourceError::InvalidIdentifier`] for [`ResId::NULL`] and app-private ids.
    pub fn set_system_wide_replacement(
        &self,
        id: ResId,
        value: impl Into<Replacement>,
    ) -> Result<(), ResourceError> {
        self.state.table.set(id, Scope::Global, value.into())?;
        Ok(())
    }

    /// [`Overlay::set_system_wide_replacement`] by `package:type/name`,
    /// resolved against the framework.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] if no framework is registered or the name
    /// does not resolve.
    pub fn set_system_wide_replacement_by_name(
        &self,
        full_name: &str,
        value: impl Into<Replacement>,
    ) -> Result<(), ResourceError> {
        let id = self.require_framework()?.identifier_by_full_name(full_name);
        if id.is_null() {
            return Err(ResourceError::missing_name(full_name));
        }
        self.set_system_wide_replacement(id, value)
    }

    /// [`Overlay::set_system_wide_replacement`] by parts.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] if no framework is registered or the parts
    /// do not resolve.
    pub fn set_system_wide_replacement_by_parts(
        &self,
        package: &str,
        type_name: &str,
        name: &str,
        value: impl Into<Replacement>,
    ) -> Result<(), ResourceError> {
        let id = self.require_framework()?.identifier(name, type_name, package);
        if id.is_null() {
            return Err(ResourceError::missing_name(format!(
                "{package}:{type_name}/{name}"
            )));
        }
        self.set_system_wide_replacement(id, value)
    }

    /// Registers a callback for framework layout `id` in every origin.
    ///
    /// # Errors
    ///
    /// [`ResourceError::InvalidIdentifier`] for app-private ids,
    /// [`ResourceError::NotFound`] if no framework is registered or it has no such layout.
    pub fn hook_system_wide_layout(
        &self,
        id: ResId,
        callback: LayoutCallback,
    ) -> Result<LayoutHookHandle, ResourceError> {
        id.validate_for(&Scope::Global)?;
        let names = self.system_names(id)?;
        Ok(self.state.hooks.register(Scope::Global, (*names).clone(), callback)?)
    }

    /// [`Overlay::hook_system_wide_layout`] by `package:layout/name`.
    ///
    /// # Errors
    ///
    /// See [`Overlay::hook_system_wide_layout`].
    pub fn hook_system_wide_layout_by_name(
        &self,
        full_name: &str,
        callback: LayoutCallback,
    ) -> Result<LayoutHookHandle, ResourceError> {
        let id = self.require_framework()?.identifier_by_full_name(full_name);
        if id.is_null() {
            return Err(ResourceError::missing_name(full_name));
        }
        self.hook_system_wide_layout(id, callback)
    }

    /// [`Overlay::hook_system_wide_layout`] by parts.
    ///
    /// # Errors
    ///
    /// See [`Overlay::hook_system_wide_layout`].
    pub fn hook_system_wide_layout_by_parts(
        &self,
        package: &str,
        type_name: &str,
        name: &str,
        callback: LayoutCallback,
    ) -> Result<LayoutHookHandle, ResourceError> {
        let id = self.require_framework()?.identifier(name, type_name, package);
        if id.is_null() {
            return Err(ResourceError::missing_name(format!(
                "{package}:{type_name}/{name}"
            )));
        }
        self.hook_system_wide_layout(id, callback)
    }

    /// Names of framework resource `id`, cached in the global scope.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] if no framework is registered or it has no such id.
    pub fn system_names(&self, id: ResId) -> Result<Arc<ResourceNames>, ResourceError> {
        let framework = self.require_framework()?;
        self.state
            .names
            .get_or_compute(id, &Scope::Global, || framework.resource_names(id))
    }

    /// See [`ModificationTracker::check_first_load`].
    pub fn check_first_load(&self, scope: &Scope) -> bool {
        self.state.tracker.check_first_load(scope, &self.state.table)
    }

    /// See [`LayoutHooks::dispatch_inflated`].
    pub fn dispatch_inflated(&self, parser: &dyn DocumentParser, root: &dyn Any) -> usize {
        self.state.hooks.dispatch_inflated(parser, root)
    }
}

impl fmt::Debug for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("replacements", &self.state.table.len())
            .field("names", &self.state.names.len())
            .field("hooks", &self.state.hooks)
            .field("framework", &self.state.framework.read().is_some())
            .finish()
    }
}
