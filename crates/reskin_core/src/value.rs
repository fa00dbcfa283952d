//! Replacement values.

use core::fmt;
use std::sync::{Arc, Weak};

use downcast_rs::{DowncastSync, impl_downcast};

use crate::error::ResourceError;
use crate::id::ResId;
use crate::provider::ResourceProvider;

/// An opaque loaded asset such as a drawable or a movie.
///
/// Consumers downcast to the concrete type their renderer understands:
///
/// ```
/// use std::sync::Arc;
/// use reskin_core::{Asset, AssetHandle};
///
/// #[derive(Debug)]
/// struct Solid(u32);
/// impl Asset for Solid {}
///
/// let handle: AssetHandle = Arc::new(Solid(0xff00_00ff));
/// assert_eq!(handle.downcast_arc::<Solid>().unwrap().0, 0xff00_00ff);
/// ```
pub trait Asset: DowncastSync + fmt::Debug {}
impl_downcast!(sync Asset);

/// Shared handle to an [`Asset`].
pub type AssetHandle = Arc<dyn Asset>;

/// A value substituted for a resource.
///
/// Each variant answers only the accessors of its own kind. A lookup whose
/// replacement has another kind falls through to the original value, except
/// [`Replacement::Forward`] which answers every accessor.
#[derive(Clone, Debug)]
pub enum Replacement {
    /// Answers `boolean`.
    Bool(bool),
    /// Answers `integer` and `color`.
    Int(i32),
    /// Answers `int_array`.
    IntArray(Arc<[i32]>),
    /// Answers `text`, `text_or` and `string`.
    Text(Arc<str>),
    /// Answers `string_array` and `text_array`.
    StringArray(Arc<[Arc<str>]>),
    /// Answers `text_array`.
    TextArray(Arc<[Arc<str>]>),
    /// Answers `drawable` and `drawable_for_density`.
    Drawable(AssetHandle),
    /// Re-dispatches every lookup to another provider.
    Forward(Forwarder),
}

impl Replacement {
    /// Returns the boolean payload.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer payload.
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer array payload.
    #[must_use]
    pub fn as_int_array(&self) -> Option<Arc<[i32]>> {
        match self {
            Self::IntArray(values) => Some(Arc::clone(values)),
            _ => None,
        }
    }

    /// Returns the text payload.
    #[must_use]
    pub fn as_text(&self) -> Option<Arc<str>> {
        match self {
            Self::Text(text) => Some(Arc::clone(text)),
            _ => None,
        }
    }

    /// Returns a string array payload.
    #[must_use]
    pub fn as_string_array(&self) -> Option<Arc<[Arc<str>]>> {
        match self {
            Self::StringArray(values) => Some(Arc::clone(values)),
            _ => None,
        }
    }

    /// Returns a string or text array payload.
    #[must_use]
    pub fn as_text_array(&self) -> Option<Arc<[Arc<str>]>> {
        match self {
            Self::StringArray(values) | Self::TextArray(values) => Some(Arc::clone(values)),
            _ => None,
        }
    }

    /// Returns the asset payload.
    #[must_use]
    pub fn as_drawable(&self) -> Option<AssetHandle> {
        match self {
            Self::Drawable(asset) => Some(Arc::clone(asset)),
            _ => None,
        }
    }

    /// Returns the forwarder, if this is a [`Replacement::Forward`].
    #[must_use]
    pub fn as_forwarder(&self) -> Option<&Forwarder> {
        match self {
            Self::Forward(forwarder) => Some(forwarder),
            _ => None,
        }
    }

    /// Short name of the variant, for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::IntArray(_) => "int-array",
            Self::Text(_) => "text",
            Self::StringArray(_) => "string-array",
            Self::TextArray(_) => "text-array",
            Self::Drawable(_) => "drawable",
            Self::Forward(_) => "forward",
        }
    }
}

impl From<bool> for Replacement {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Replacement {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<Vec<i32>> for Replacement {
    fn from(values: Vec<i32>) -> Self {
        Self::IntArray(values.into())
    }
}

impl From<&str> for Replacement {
    fn from(text: &str) -> Self {
        Self::Text(text.into())
    }
}

impl From<String> for Replacement {
    fn from(text: String) -> Self {
        Self::Text(text.into())
    }
}

impl From<Forwarder> for Replacement {
    fn from(forwarder: Forwarder) -> Self {
        Self::Forward(forwarder)
    }
}

/// Points a resource at an identifier inside another provider.
///
/// The provider is held weakly: releasing a module's resources must not be
/// blocked by overrides that still point into them.
#[derive(Clone)]
pub struct Forwarder {
    provider: Weak<dyn ResourceProvider>,
    id: ResId,
}

impl Forwarder {
    /// Forwards to `id` inside `provider`.
    #[must_use]
    pub fn new(provider: &Arc<dyn ResourceProvider>, id: ResId) -> Self {
        Self {
            provider: Arc::downgrade(provider),
            id,
        }
    }

    /// Identifier inside the target provider.
    #[must_use]
    pub const fn id(&self) -> ResId {
        self.id
    }

    /// Returns the target provider if it is still alive.
    #[must_use]
    pub fn provider(&self) -> Option<Arc<dyn ResourceProvider>> {
        self.provider.upgrade()
    }

    /// Returns true if both forwarders point at the same target.
    #[must_use]
    pub fn same_target(&self, other: &Self) -> bool {
        self.id == other.id && Weak::ptr_eq(&self.provider, &other.provider)
    }

    /// Runs `lookup` against the target provider and identifier.
    ///
    /// # Errors
    ///
    /// [`ResourceError::ProviderUnavailable`] if the target was released,
    /// otherwise whatever `lookup` returns.
    pub fn lookup<T>(
        &self,
        lookup: impl FnOnce(&dyn ResourceProvider, ResId) -> Result<T, ResourceError>,
    ) -> Result<T, ResourceError> {
        let provider = self
            .provider()
            .ok_or(ResourceError::ProviderUnavailable(self.id))?;
        lookup(provider.as_ref(), self.id)
    }
}

impl fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = self.provider().map(|p| p.package_name().to_owned());
        f.debug_struct("Forwarder")
            .field("provider", &target)
            .field("id", &self.id)
            .finish()
    }
}

/// Raw description of a resource value, as reported by a provider.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    /// `true` or `false`. Undefined `id` entries report `false`.
    Boolean(bool),
    /// Integer or color.
    Integer(i32),
    /// Float, dimension or fraction.
    Float(f32),
    /// A string, including file paths of file-backed resources.
    Text(Arc<str>),
    /// A reference to another resource.
    Reference(ResId),
}

impl TypedValue {
    /// Returns false only for [`TypedValue::Boolean`] `false`, the marker
    /// providers use for declared-but-undefined entries.
    #[must_use]
    pub const fn is_defined(&self) -> bool {
        !matches!(self, Self::Boolean(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_answer_their_own_accessors() {
        let text = Replacement::from("hello");
        assert_eq!(text.as_text().as_deref(), Some("hello"));
        assert_eq!(text.as_bool(), None);

        let int = Replacement::from(0x00ff_00ff);
        assert_eq!(int.as_int(), Some(0x00ff_00ff));
        assert!(int.as_text().is_none());
    }

    #[test]
    fn string_arrays_also_answer_text_arrays() {
        let strings = Replacement::StringArray(vec![Arc::from("a"), Arc::from("b")].into());
        assert_eq!(strings.as_text_array().map(|v| v.len()), Some(2));
        assert_eq!(strings.as_string_array().map(|v| v.len()), Some(2));

        let texts = Replacement::TextArray(vec![Arc::from("a")].into());
        assert!(texts.as_string_array().is_none());
        assert!(texts.as_text_array().is_some());
    }

    #[test]
    fn only_boolean_false_is_undefined() {
        assert!(!TypedValue::Boolean(false).is_defined());
        assert!(TypedValue::Boolean(true).is_defined());
        assert!(TypedValue::Integer(0).is_defined());
    }
}
