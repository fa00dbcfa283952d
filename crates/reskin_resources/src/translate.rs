//! Reference translation for forwarded documents.
//!
//! A document compiled inside a module embeds the module's own identifiers.
//! Before it is inflated in an origin, each reference is mapped to the
//! origin's identifier for the same `type/name`, or to a synthetic
//! identifier when the origin has no such entry. Defined module resources
//! get a forwarder registered under the new identifier so lookups from the
//! origin reach the module's value.

use std::sync::Arc;

use reskin_core::{
    ATTR_TYPE, Forwarder, ID_TYPE, ReferenceRewriter, Replacement, ResId, ResourceProvider,
    TypedValue,
};
use tracing::{debug, error, warn};

use crate::error::TranslationError;
use crate::resources::OverlayResources;

/// Maps references from a foreign provider into an origin.
pub struct ReferenceTranslator<'a> {
    origin: &'a OverlayResources,
    foreign: &'a Arc<dyn ResourceProvider>,
}

impl<'a> ReferenceTranslator<'a> {
    /// Translates from `foreign` into `origin`.
    #[must_use]
    pub fn new(origin: &'a OverlayResources, foreign: &'a Arc<dyn ResourceProvider>) -> Self {
        Self { origin, foreign }
    }

    /// Returns the origin identifier for foreign `id`.
    ///
    /// Returns [`ResId::NULL`] when the resource exists in neither package.
    /// On any lookup failure the foreign id is returned unchanged. A failure
    /// is deliberately not rewritten to [`ResId::NULL`]; keeping the foreign
    /// id is intended, not an oversight.
    pub fn translate_reference(&self, id: ResId) -> ResId {
        match self.try_translate(id) {
            Ok(translated) => translated,
            Err(err) => {
                error!(%id, %err, "failed to translate resource reference");
                id
            }
        }
    }

    /// Returns the origin identifier of the attribute `name`, or [`ResId::NULL`].
    pub fn translate_attribute(&self, name: &str) -> ResId {
        let id = self
            .origin
            .identifier(name, ATTR_TYPE, self.origin.package_name());
        if id.is_null() {
            warn!(attribute = name, "attribute not found in original resources");
        }
        id
    }

    fn try_translate(&self, id: ResId) -> Result<ResId, TranslationError> {
        let names = self
            .foreign
            .resource_names(id)
            .map_err(TranslationError::Foreign)?;
        let origin_id =
            self.origin
                .identifier(&names.name, &names.type_name, self.origin.package_name());
        let defined = self
            .foreign
            .value(id, false)
            .as_ref()
            .is_ok_and(TypedValue::is_defined);
        let is_id = names.type_name == ID_TYPE;

        if !defined && origin_id.is_null() && !is_id {
            warn!(
                resource = %names.full_name,
                "neither defined in module nor in original resources"
            );
            return Ok(ResId::NULL);
        }

        let translated = if origin_id.is_null() {
            ResId::synthetic(&names.full_name)
        } else {
            origin_id
        };

        // Identifiers are never loaded, so they need no forwarder.
        if defined && !is_id {
            self.origin
                .set_replacement(
                    translated,
                    Replacement::Forward(Forwarder::new(self.foreign, id)),
                )
                .map_err(TranslationError::Register)?;
        }

        debug!(foreign = %id, %translated, resource = %names.full_name, "translated reference");
        Ok(translated)
    }
}

impl ReferenceRewriter for ReferenceTranslator<'_> {
    fn rewrite_reference(&mut self, id: ResId) -> ResId {
        self.translate_reference(id)
    }

    fn rewrite_attribute(&mut self, name: &str) -> ResId {
        self.translate_attribute(name)
    }
}
