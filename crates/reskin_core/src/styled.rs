//! Styled attribute arrays.

use std::sync::Arc;

use crate::id::ResId;
use crate::value::AssetHandle;

/// Per-index attribute values obtained while inflating a document.
///
/// Getters take the value to return when the index is unset or has another
/// type.
pub trait StyledAttributes {
    /// Number of indices.
    fn len(&self) -> usize;

    /// Returns true if there are no indices.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Identifier the value at `index` was resolved from, or [`ResId::NULL`].
    fn resource_id(&self, index: usize) -> ResId;

    /// Boolean at `index`.
    fn boolean(&self, index: usize, default: bool) -> bool;

    /// Color at `index`.
    fn color(&self, index: usize, default: i32) -> i32;

    /// Dimension at `index`.
    fn dimension(&self, index: usize, default: f32) -> f32;

    /// Dimension at `index`, truncated.
    fn dimension_pixel_offset(&self, index: usize, default: i32) -> i32;

    /// Dimension at `index`, rounded.
    fn dimension_pixel_size(&self, index: usize, default: i32) -> i32;

    /// Drawable at `index`.
    fn drawable(&self, index: usize) -> Option<AssetHandle>;

    /// Float at `index`.
    fn float(&self, index: usize, default: f32) -> f32;

    /// Fraction at `index`.
    fn fraction(&self, index: usize, base: i32, parent_base: i32, default: f32) -> f32;

    /// Integer at `index`, accepting any integer-like value.
    fn int(&self, index: usize, default: i32) -> i32;

    /// Integer at `index`.
    fn integer(&self, index: usize, default: i32) -> i32;

    /// Layout dimension at `index`.
    fn layout_dimension(&self, index: usize, default: i32) -> i32;

    /// String at `index`.
    fn string(&self, index: usize) -> Option<Arc<str>>;

    /// Text at `index`.
    fn text(&self, index: usize) -> Option<Arc<str>>;

    /// Text array at `index`.
    fn text_array(&self, index: usize) -> Option<Arc<[Arc<str>]>>;
}
