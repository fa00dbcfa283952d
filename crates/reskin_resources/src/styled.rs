//! Override-aware styled attributes.

use std::sync::Arc;

use reskin_core::{AssetHandle, Replacement, ResId, ResourceError, ResourceProvider, StyledAttributes};
use tracing::warn;

use crate::resources::OverlayResources;

/// Wraps styled attributes obtained during inflation so that each per-index
/// getter consults the overlay for the identifier the value came from.
///
/// Direct replacements apply to the getters of their kind. Forwarders apply
/// to every getter; if the forwarded lookup fails the wrapped value is used.
pub struct OverlayStyledAttributes<'a, A> {
    resources: &'a OverlayResources,
    attributes: A,
}

impl<'a, A: StyledAttributes> OverlayStyledAttributes<'a, A> {
    /// Wraps `attributes` read through `resources`.
    #[must_use]
    pub fn new(resources: &'a OverlayResources, attributes: A) -> Self {
        Self {
            resources,
            attributes,
        }
    }

    /// Unwraps the inner attributes.
    pub fn into_inner(self) -> A {
        self.attributes
    }

    fn replacement(&self, index: usize) -> Option<(ResId, Replacement)> {
        let id = self.attributes.resource_id(index);
        self.resources.replacement(id).map(|r| (id, r))
    }

    /// Direct value of the requested kind, else the forwarded value, else `None`.
    fn overridden<T>(
        &self,
        index: usize,
        direct: impl FnOnce(&Replacement) -> Option<T>,
        lookup: impl FnOnce(&dyn ResourceProvider, ResId) -> Result<T, ResourceError>,
    ) -> Option<T> {
        let (id, replacement) = self.replacement(index)?;
        match &replacement {
            Replacement::Forward(forwarder) => {
                let target = self.resources.forward_target(id, forwarder)?;
                match lookup(target.as_ref(), forwarder.id()) {
                    Ok(value) => Some(value),
                    Err(err) => {
                        warn!(%id, index, %err, "forwarded attribute lookup failed");
                        None
                    }
                }
            }
            other => direct(other),
        }
    }
}

impl<A: StyledAttributes> StyledAttributes for OverlayStyledAttributes<'_, A> {
    fn len(&self) -> usize {
        self.attributes.len()
    }

    fn resource_id(&self, index: usize) -> ResId {
        self.attributes.resource_id(index)
    }

    fn boolean(&self, index: usize, default: bool) -> bool {
        self.overridden(index, Replacement::as_bool, |p, id| p.boolean(id))
            .unwrap_or_else(|| self.attributes.boolean(index, default))
    }

    fn color(&self, index: usize, default: i32) -> i32 {
        self.overridden(index, Replacement::as_int, |p, id| p.color(id))
            .unwrap_or_else(|| self.attributes.color(index, default))
    }

    fn dimension(&self, index: usize, default: f32) -> f32 {
        self.overridden(index, |_| None, |p, id| p.dimension(id))
            .unwrap_or_else(|| self.attributes.dimension(index, default))
    }

    fn dimension_pixel_offset(&self, index: usize, default: i32) -> i32 {
        self.overridden(index, |_| None, |p, id| p.dimension_pixel_offset(id))
            .unwrap_or_else(|| self.attributes.dimension_pixel_offset(index, default))
    }

    fn dimension_pixel_size(&self, index: usize, default: i32) -> i32 {
        self.overridden(index, |_| None, |p, id| p.dimension_pixel_size(id))
            .unwrap_or_else(|| self.attributes.dimension_pixel_size(index, default))
    }

    fn drawable(&self, index: usize) -> Option<AssetHandle> {
        self.overridden(index, Replacement::as_drawable, |p, id| p.drawable(id))
            .or_else(|| self.attributes.drawable(index))
    }

    fn float(&self, index: usize, default: f32) -> f32 {
        self.overridden(index, |_| None, |p, id| p.dimension(id))
            .unwrap_or_else(|| self.attributes.float(index, default))
    }

    fn fraction(&self, index: usize, base: i32, parent_base: i32, default: f32) -> f32 {
        self.overridden(index, |_| None, |p, id| p.fraction(id, base, parent_base))
            .unwrap_or_else(|| self.attributes.fraction(index, base, parent_base, default))
    }

    fn int(&self, index: usize, default: i32) -> i32 {
        self.overridden(index, Replacement::as_int, |p, id| p.integer(id))
            .unwrap_or_else(|| self.attributes.int(index, default))
    }

    fn integer(&self, index: usize, default: i32) -> i32 {
        self.overridden(index, Replacement::as_int, |p, id| p.integer(id))
            .unwrap_or_else(|| self.attributes.integer(index, default))
    }

    fn layout_dimension(&self, index: usize, default: i32) -> i32 {
        self.overridden(index, |_| None, |p, id| p.dimension_pixel_size(id))
            .unwrap_or_else(|| self.attributes.layout_dimension(index, default))
    }

    fn string(&self, index: usize) -> Option<Arc<str>> {
        self.overridden(index, Replacement::as_text, |p, id| p.text(id))
            .or_else(|| self.attributes.string(index))
    }

    fn text(&self, index: usize) -> Option<Arc<str>> {
        self.overridden(index, Replacement::as_text, |p, id| p.text(id))
            .or_else(|| self.attributes.text(index))
    }

    fn text_array(&self, index: usize) -> Option<Arc<[Arc<str>]>> {
        self.overridden(index, Replacement::as_text_array, |p, id| p.text_array(id))
            .or_else(|| self.attributes.text_array(index))
    }
}
