//! Override-aware resources for one origin.

use core::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use reskin_core::{
    AssetHandle, DocumentParser, FRAMEWORK_PACKAGE, Forwarder, LAYOUT_KIND, LoadedDocument,
    Replacement, ResId, ResourceError, ResourceNames, ResourceProvider, Scope, StyledAttributes,
    TypedValue,
};
use tracing::{debug, warn};

use crate::hooks::{LayoutCallback, LayoutHookHandle, PendingInflation};
use crate::overlay::Overlay;
use crate::styled::OverlayStyledAttributes;
use crate::translate::ReferenceTranslator;

/// Resources of one origin with overrides applied.
///
/// Lookups consult the overlay's replacement table first. A replacement of
/// the requested kind is returned directly, a forwarder re-dispatches to its
/// target, and anything else falls through to the original provider.
pub struct OverlayResources {
    overlay: Overlay,
    scope: Scope,
    original: Arc<dyn ResourceProvider>,
    package_name: OnceLock<String>,
    inited: AtomicBool,
    this: Weak<OverlayResources>,
}

impl OverlayResources {
    pub(crate) fn new(
        overlay: Overlay,
        scope: Scope,
        original: Arc<dyn ResourceProvider>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            overlay,
            scope,
            original,
            package_name: OnceLock::new(),
            inited: AtomicBool::new(false),
            this: this.clone(),
        })
    }

    /// Scope overrides registered through this instance are attributed to.
    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Package path of the origin, `None` for the framework.
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.scope.as_origin()
    }

    /// The wrapped provider.
    #[must_use]
    pub fn original(&self) -> &Arc<dyn ResourceProvider> {
        &self.original
    }

    /// The overlay this instance reads from.
    #[must_use]
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Returns true once [`OverlayResources::set_inited`] was called.
    #[must_use]
    pub fn is_inited(&self) -> bool {
        self.inited.load(Ordering::Acquire)
    }

    /// Marks the origin's one-time initialization as done.
    pub fn set_inited(&self, inited: bool) {
        self.inited.store(inited, Ordering::Release);
    }

    /// See [`ModificationTracker::check_first_load`](reskin_core::ModificationTracker::check_first_load).
    pub fn check_first_load(&self) -> bool {
        self.overlay.check_first_load(&self.scope)
    }

    /// Replacement visible to this origin for `id`.
    #[must_use]
    pub fn replacement(&self, id: ResId) -> Option<Replacement> {
        self.overlay.table().get(id, &self.scope)
    }

    /// Replaces `id` for this origin.
    ///
    /// # Errors
    ///
    /// [`ResourceError::InvalidIdentifier`] for [`ResId::NULL`], or for an
    /// app-private id on framework resources.
    pub fn set_replacement(
        &self,
        id: ResId,
        value: impl Into<Replacement>,
    ) -> Result<(), ResourceError> {
        self.overlay.table().set(id, self.scope.clone(), value.into())?;
        Ok(())
    }

    /// Replaces the resource called `package:type/name`.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] if the name does not resolve.
    pub fn set_replacement_by_name(
        &self,
        full_name: &str,
        value: impl Into<Replacement>,
    ) -> Result<(), ResourceError> {
        let id = self.resolve_name(full_name)?;
        self.set_replacement(id, value)
    }

    /// Replaces the resource identified by its parts.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] if the parts do not resolve.
    pub fn set_replacement_by_parts(
        &self,
        package: &str,
        type_name: &str,
        name: &str,
        value: impl Into<Replacement>,
    ) -> Result<(), ResourceError> {
        let id = self.resolve_parts(package, type_name, name)?;
        self.set_replacement(id, value)
    }

    /// Registers a callback fired after layout `id` is inflated in this origin.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] if the layout has no names, or
    /// [`ResourceError::InvalidIdentifier`] for rejected identifiers.
    pub fn hook_layout(
        &self,
        id: ResId,
        callback: LayoutCallback,
    ) -> Result<LayoutHookHandle, ResourceError> {
        id.validate_for(&self.scope)?;
        let names = self.original.resource_names(id)?;
        Ok(self.overlay.hooks().register(self.scope.clone(), names, callback)?)
    }

    /// [`OverlayResources::hook_layout`] by `package:layout/name`.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] if the name does not resolve.
    pub fn hook_layout_by_name(
        &self,
        full_name: &str,
        callback: LayoutCallback,
    ) -> Result<LayoutHookHandle, ResourceError> {
        let id = self.resolve_name(full_name)?;
        self.hook_layout(id, callback)
    }

    /// [`OverlayResources::hook_layout`] by parts.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] if the parts do not resolve.
    pub fn hook_layout_by_parts(
        &self,
        package: &str,
        type_name: &str,
        name: &str,
        callback: LayoutCallback,
    ) -> Result<LayoutHookHandle, ResourceError> {
        let id = self.resolve_parts(package, type_name, name)?;
        self.hook_layout(id, callback)
    }

    /// Names of `id`, cached per origin.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] if the original provider has no such id.
    pub fn cached_names(&self, id: ResId) -> Result<Arc<ResourceNames>, ResourceError> {
        self.overlay
            .names()
            .get_or_compute(id, &self.scope, || self.original.resource_names(id))
    }

    /// Maps `id` from `foreign` into this origin, registering a forwarder.
    pub fn translate_reference(&self, foreign: &Arc<dyn ResourceProvider>, id: ResId) -> ResId {
        ReferenceTranslator::new(self, foreign).translate_reference(id)
    }

    /// Wraps styled attributes so per-index getters honor overrides.
    pub fn styled<A: StyledAttributes>(&self, attributes: A) -> OverlayStyledAttributes<'_, A> {
        OverlayStyledAttributes::new(self, attributes)
    }

    fn resolve_name(&self, full_name: &str) -> Result<ResId, ResourceError> {
        let id = self.original.identifier_by_full_name(full_name);
        if id.is_null() {
            return Err(ResourceError::missing_name(full_name));
        }
        Ok(id)
    }

    fn resolve_parts(
        &self,
        package: &str,
        type_name: &str,
        name: &str,
    ) -> Result<ResId, ResourceError> {
        let id = self.original.identifier(name, type_name, package);
        if id.is_null() {
            return Err(ResourceError::missing_name(format!(
                "{package}:{type_name}/{name}"
            )));
        }
        Ok(id)
    }

    /// Target provider of a forwarder, or `None` (with a warning) if it was released.
    pub(crate) fn forward_target(
        &self,
        id: ResId,
        forwarder: &Forwarder,
    ) -> Option<Arc<dyn ResourceProvider>> {
        let target = forwarder.provider();
        if target.is_none() {
            warn!(
                %id,
                origin = %self.scope,
                "forwarding target released, using original value"
            );
        }
        target
    }

    fn resolve<T>(
        &self,
        id: ResId,
        direct: impl FnOnce(&Replacement) -> Option<T>,
        lookup: impl Fn(&dyn ResourceProvider, ResId) -> Result<T, ResourceError>,
    ) -> Result<T, ResourceError> {
        match self.replacement(id) {
            Some(Replacement::Forward(forwarder)) => match self.forward_target(id, &forwarder) {
                Some(target) => lookup(target.as_ref(), forwarder.id()),
                None => lookup(self.original.as_ref(), id),
            },
            Some(replacement) => match direct(&replacement) {
                Some(value) => Ok(value),
                None => lookup(self.original.as_ref(), id),
            },
            None => lookup(self.original.as_ref(), id),
        }
    }

    /// Forwarder-only accessors: direct replacements of any kind are ignored.
    fn resolve_forwarded<T>(
        &self,
        id: ResId,
        lookup: impl Fn(&dyn ResourceProvider, ResId) -> Result<T, ResourceError>,
    ) -> Result<T, ResourceError> {
        self.resolve(id, |_| None, lookup)
    }

    fn layout_variant(&self, id: ResId) -> String {
        match self.original.value(id, true) {
            Ok(TypedValue::Text(path)) => {
                let components: Vec<&str> = path.splitn(3, '/').collect();
                if let [_, variant, _] = components.as_slice() {
                    (*variant).to_owned()
                } else {
                    warn!(%id, %path, "unexpected resource path");
                    LAYOUT_KIND.to_owned()
                }
            }
            _ => {
                warn!(%id, "could not find file name for layout");
                LAYOUT_KIND.to_owned()
            }
        }
    }

    fn attach_layout_callbacks(&self, id: ResId, parser: &Arc<dyn DocumentParser>) {
        let hooks = self.overlay.hooks();
        let Some(callbacks) = hooks.callbacks_for(id, &self.scope) else {
            return;
        };
        let names = match self.overlay.names().resolve(id, &self.scope) {
            Some(names) => names,
            None => match self.cached_names(id) {
                Ok(names) => names,
                Err(err) => {
                    warn!(%id, %err, "layout has callbacks but no names");
                    return;
                }
            },
        };
        let Some(this) = self.this.upgrade() else {
            return;
        };
        let resources: Arc<dyn ResourceProvider> = this;
        let variant = self.layout_variant(id);
        hooks.attach(
            parser,
            PendingInflation {
                names,
                variant: variant.into(),
                callbacks,
                resources,
            },
        );
    }
}

impl ResourceProvider for OverlayResources {
    fn package_name(&self) -> &str {
        self.package_name.get_or_init(|| match self.scope {
            Scope::Global => FRAMEWORK_PACKAGE.to_owned(),
            Scope::Origin(_) => self.original.package_name().to_owned(),
        })
    }

    fn resource_names(&self, id: ResId) -> Result<ResourceNames, ResourceError> {
        self.original.resource_names(id)
    }

    fn identifier(&self, name: &str, type_name: &str, package: &str) -> ResId {
        self.original.identifier(name, type_name, package)
    }

    fn value(&self, id: ResId, resolve_refs: bool) -> Result<TypedValue, ResourceError> {
        self.original.value(id, resolve_refs)
    }

    fn boolean(&self, id: ResId) -> Result<bool, ResourceError> {
        self.resolve(id, Replacement::as_bool, |p, id| p.boolean(id))
    }

    fn color(&self, id: ResId) -> Result<i32, ResourceError> {
        self.resolve(id, Replacement::as_int, |p, id| p.color(id))
    }

    fn dimension(&self, id: ResId) -> Result<f32, ResourceError> {
        self.resolve_forwarded(id, |p, id| p.dimension(id))
    }

    fn dimension_pixel_offset(&self, id: ResId) -> Result<i32, ResourceError> {
        self.resolve_forwarded(id, |p, id| p.dimension_pixel_offset(id))
    }

    fn dimension_pixel_size(&self, id: ResId) -> Result<i32, ResourceError> {
        self.resolve_forwarded(id, |p, id| p.dimension_pixel_size(id))
    }

    fn drawable(&self, id: ResId) -> Result<AssetHandle, ResourceError> {
        self.resolve(id, Replacement::as_drawable, |p, id| p.drawable(id))
    }

    fn drawable_for_density(&self, id: ResId, density: u32) -> Result<AssetHandle, ResourceError> {
        self.resolve(id, Replacement::as_drawable, |p, id| {
            p.drawable_for_density(id, density)
        })
    }

    fn fraction(&self, id: ResId, base: i32, parent_base: i32) -> Result<f32, ResourceError> {
        self.resolve_forwarded(id, |p, id| p.fraction(id, base, parent_base))
    }

    fn integer(&self, id: ResId) -> Result<i32, ResourceError> {
        self.resolve(id, Replacement::as_int, |p, id| p.integer(id))
    }

    fn int_array(&self, id: ResId) -> Result<Arc<[i32]>, ResourceError> {
        self.resolve(id, Replacement::as_int_array, |p, id| p.int_array(id))
    }

    fn movie(&self, id: ResId) -> Result<AssetHandle, ResourceError> {
        self.resolve_forwarded(id, |p, id| p.movie(id))
    }

    fn quantity_text(&self, id: ResId, quantity: i32) -> Result<Arc<str>, ResourceError> {
        self.resolve_forwarded(id, |p, id| p.quantity_text(id, quantity))
    }

    fn string_array(&self, id: ResId) -> Result<Arc<[Arc<str>]>, ResourceError> {
        self.resolve(id, Replacement::as_string_array, |p, id| p.string_array(id))
    }

    fn text(&self, id: ResId) -> Result<Arc<str>, ResourceError> {
        self.resolve(id, Replacement::as_text, |p, id| p.text(id))
    }

    fn text_or(&self, id: ResId, default: Arc<str>) -> Arc<str> {
        match self.replacement(id) {
            Some(Replacement::Text(text)) => text,
            Some(Replacement::Forward(forwarder)) => match self.forward_target(id, &forwarder) {
                Some(target) => target.text_or(forwarder.id(), default),
                None => self.original.text_or(id, default),
            },
            _ => self.original.text_or(id, default),
        }
    }

    fn text_array(&self, id: ResId) -> Result<Arc<[Arc<str>]>, ResourceError> {
        self.resolve(id, Replacement::as_text_array, |p, id| p.text_array(id))
    }

    fn load_document(&self, id: ResId, kind: &str) -> Result<LoadedDocument, ResourceError> {
        let loaded = match self.replacement(id) {
            Some(Replacement::Forward(forwarder)) => match self.forward_target(id, &forwarder) {
                Some(foreign) => {
                    let loaded = foreign.load_document(forwarder.id(), kind)?;
                    if !loaded.cached {
                        debug!(%id, foreign = %forwarder.id(), "rewriting references of forwarded document");
                        let mut translator = ReferenceTranslator::new(self, &foreign);
                        loaded.parser.rewrite_references(&mut translator);
                    }
                    loaded
                }
                None => self.original.load_document(id, kind)?,
            },
            _ => self.original.load_document(id, kind)?,
        };

        if kind == LAYOUT_KIND {
            self.attach_layout_callbacks(id, &loaded.parser);
        }
        Ok(loaded)
    }
}

impl fmt::Debug for OverlayResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayResources")
            .field("scope", &self.scope)
            .field("package", &self.original.package_name())
            .field("inited", &self.is_inited())
            .finish_non_exhaustive()
    }
}
