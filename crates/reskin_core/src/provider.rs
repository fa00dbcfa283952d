//! The resource provider contract.
//!
//! A [`ResourceProvider`] answers typed lookups for one package. The host
//! platform supplies providers for the framework, for each app and for each
//! module; the overlay layer wraps them and is itself a provider.

use std::sync::Arc;

use crate::document::LoadedDocument;
use crate::error::ResourceError;
use crate::id::ResId;
use crate::names::{ResourceNames, split_full_name};
use crate::value::{AssetHandle, TypedValue};

/// Typed resource lookups for a single package.
///
/// Every accessor returns [`ResourceError::NotFound`] when the identifier is
/// unknown or its value has another type.
pub trait ResourceProvider: Send + Sync + 'static {
    /// Package this provider serves.
    fn package_name(&self) -> &str;

    /// Reverse lookup of an identifier's names.
    fn resource_names(&self, id: ResId) -> Result<ResourceNames, ResourceError>;

    /// Forward lookup. Returns [`ResId::NULL`] when nothing matches.
    fn identifier(&self, name: &str, type_name: &str, package: &str) -> ResId;

    /// Forward lookup of `package:type/name`. The package defaults to
    /// [`ResourceProvider::package_name`].
    fn identifier_by_full_name(&self, full_name: &str) -> ResId {
        match split_full_name(full_name) {
            Some((package, type_name, name)) => {
                self.identifier(name, type_name, package.unwrap_or(self.package_name()))
            }
            None => ResId::NULL,
        }
    }

    /// Raw value of a resource. With `resolve_refs`, references are followed.
    fn value(&self, id: ResId, resolve_refs: bool) -> Result<TypedValue, ResourceError>;

    /// Boolean value.
    fn boolean(&self, id: ResId) -> Result<bool, ResourceError>;

    /// Color as packed ARGB.
    fn color(&self, id: ResId) -> Result<i32, ResourceError>;

    /// Dimension in pixels.
    fn dimension(&self, id: ResId) -> Result<f32, ResourceError>;

    /// Dimension truncated to whole pixels.
    fn dimension_pixel_offset(&self, id: ResId) -> Result<i32, ResourceError>;

    /// Dimension rounded to whole pixels.
    fn dimension_pixel_size(&self, id: ResId) -> Result<i32, ResourceError>;

    /// Drawable asset.
    fn drawable(&self, id: ResId) -> Result<AssetHandle, ResourceError>;

    /// Drawable asset for a screen density.
    fn drawable_for_density(&self, id: ResId, density: u32) -> Result<AssetHandle, ResourceError>;

    /// Fraction scaled by `base` or `parent_base`.
    fn fraction(&self, id: ResId, base: i32, parent_base: i32) -> Result<f32, ResourceError>;

    /// Integer value.
    fn integer(&self, id: ResId) -> Result<i32, ResourceError>;

    /// Integer array.
    fn int_array(&self, id: ResId) -> Result<Arc<[i32]>, ResourceError>;

    /// Movie asset.
    fn movie(&self, id: ResId) -> Result<AssetHandle, ResourceError>;

    /// Plural text for `quantity`.
    fn quantity_text(&self, id: ResId, quantity: i32) -> Result<Arc<str>, ResourceError>;

    /// String array.
    fn string_array(&self, id: ResId) -> Result<Arc<[Arc<str>]>, ResourceError>;

    /// Text value.
    fn text(&self, id: ResId) -> Result<Arc<str>, ResourceError>;

    /// Text value, or `default` when the lookup fails.
    fn text_or(&self, id: ResId, default: Arc<str>) -> Arc<str> {
        self.text(id).unwrap_or(default)
    }

    /// Text array.
    fn text_array(&self, id: ResId) -> Result<Arc<[Arc<str>]>, ResourceError>;

    /// Opens a compiled document of `kind` (e.g. `layout`).
    fn load_document(&self, id: ResId, kind: &str) -> Result<LoadedDocument, ResourceError>;
}
