//! In-memory providers and sources for tests.
//!
//! Enabled with the `test-utils` feature.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use hashbrown::{HashMap, HashSet};
use parking_lot::Mutex;

use crate::document::{CompiledDocument, DocumentParser, LoadedDocument, ReferenceRewriter};
use crate::error::ResourceError;
use crate::id::ResId;
use crate::names::ResourceNames;
use crate::provider::ResourceProvider;
use crate::tracker::ModificationSource;
use crate::value::{Asset, AssetHandle, TypedValue};

/// A [`ModificationSource`] driven by the test.
#[derive(Debug, Default)]
pub struct MockModificationSource {
    times: Mutex<HashMap<String, SystemTime>>,
}

impl MockModificationSource {
    /// Creates a source that knows no packages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the modification time of `origin`.
    pub fn set(&self, origin: &str, time: SystemTime) {
        self.times.lock().insert(origin.to_owned(), time);
    }

    /// Advances the modification time of `origin` by one second.
    pub fn touch(&self, origin: &str) {
        let mut times = self.times.lock();
        let time = times
            .entry(origin.to_owned())
            .or_insert(SystemTime::UNIX_EPOCH);
        *time += Duration::from_secs(1);
    }

    /// Forgets `origin`, as if the package were deleted.
    pub fn remove(&self, origin: &str) {
        self.times.lock().remove(origin);
    }
}

impl ModificationSource for MockModificationSource {
    fn last_modified(&self, origin: &str) -> Option<SystemTime> {
        self.times.lock().get(origin).copied()
    }
}

/// A solid-color asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolidAsset(pub u32);

impl Asset for SolidAsset {}

/// Value stored in a [`MemoryProvider`].
#[derive(Debug, Clone)]
pub enum MemoryValue {
    /// Declared without a value (`@+id/...`).
    Undefined,
    /// Boolean.
    Bool(bool),
    /// Integer or color.
    Int(i32),
    /// Dimension, in pixels.
    Dimension(f32),
    /// Fraction.
    Fraction(f32),
    /// Text.
    Text(Arc<str>),
    /// Integer array.
    IntArray(Arc<[i32]>),
    /// String or text array.
    TextArray(Arc<[Arc<str>]>),
    /// Drawable or movie.
    Asset(AssetHandle),
    /// A file-backed document with its path inside the package.
    Document {
        /// Path such as `res/layout-land/main.xml`.
        path: Arc<str>,
        /// Compiled block shared by every parser opened on it.
        block: Arc<CompiledDocument>,
    },
}

#[derive(Debug)]
struct Entry {
    names: ResourceNames,
    value: MemoryValue,
}

/// A [`ResourceProvider`] backed by a map.
#[derive(Debug)]
pub struct MemoryProvider {
    package: String,
    entries: HashMap<ResId, Entry>,
    opened: Mutex<HashSet<ResId>>,
    loads: Mutex<usize>,
}

impl MemoryProvider {
    /// Creates an empty provider for `package`.
    #[must_use]
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            entries: HashMap::new(),
            opened: Mutex::new(HashSet::new()),
            loads: Mutex::new(0),
        }
    }

    /// Adds an entry owned by this provider's package.
    #[must_use]
    pub fn with(self, id: u32, type_name: &str, name: &str, value: MemoryValue) -> Self {
        let package = self.package.clone();
        self.with_in(&package, id, type_name, name, value)
    }

    /// Adds an entry owned by another package, such as a framework entry
    /// visible through an app's provider.
    #[must_use]
    pub fn with_in(
        mut self,
        package: &str,
        id: u32,
        type_name: &str,
        name: &str,
        value: MemoryValue,
    ) -> Self {
        let id = ResId::new(id);
        let names = ResourceNames::new(id, package, type_name, name);
        self.entries.insert(id, Entry { names, value });
        self
    }

    /// Adds a layout document at `path` embedding `references` and `attributes`.
    #[must_use]
    pub fn with_layout(
        self,
        id: u32,
        name: &str,
        path: &str,
        references: impl IntoIterator<Item = u32>,
        attributes: &[&str],
    ) -> Self {
        let block = CompiledDocument::new(
            references.into_iter().map(ResId::new),
            attributes.iter().copied(),
        );
        self.with(
            id,
            "layout",
            name,
            MemoryValue::Document {
                path: path.into(),
                block: Arc::new(block),
            },
        )
    }

    /// Converts into a shared trait object.
    #[must_use]
    pub fn shared(self) -> Arc<dyn ResourceProvider> {
        Arc::new(self)
    }

    /// Compiled block of a document entry.
    #[must_use]
    pub fn block(&self, id: ResId) -> Option<Arc<CompiledDocument>> {
        match &self.entries.get(&id)?.value {
            MemoryValue::Document { block, .. } => Some(Arc::clone(block)),
            _ => None,
        }
    }

    /// Number of `load_document` calls served.
    #[must_use]
    pub fn load_count(&self) -> usize {
        *self.loads.lock()
    }

    fn entry(&self, id: ResId) -> Result<&Entry, ResourceError> {
        self.entries.get(&id).ok_or_else(|| ResourceError::missing(id))
    }

    fn lookup<T>(
        &self,
        id: ResId,
        extract: impl FnOnce(&MemoryValue) -> Option<T>,
    ) -> Result<T, ResourceError> {
        extract(&self.entry(id)?.value).ok_or_else(|| ResourceError::missing(id))
    }
}

/// A parser over a shared [`CompiledDocument`]. Every load yields a new one.
#[derive(Debug)]
pub struct MemoryParser {
    block: Arc<CompiledDocument>,
}

impl MemoryParser {
    /// The block this parser reads.
    #[must_use]
    pub fn block(&self) -> &Arc<CompiledDocument> {
        &self.block
    }
}

impl DocumentParser for MemoryParser {
    fn rewrite_references(&self, rewriter: &mut dyn ReferenceRewriter) {
        self.block.rewrite_references(rewriter);
    }
}

impl ResourceProvider for MemoryProvider {
    fn package_name(&self) -> &str {
        &self.package
    }

    fn resource_names(&self, id: ResId) -> Result<ResourceNames, ResourceError> {
        Ok(self.entry(id)?.names.clone())
    }

    fn identifier(&self, name: &str, type_name: &str, package: &str) -> ResId {
        self.entries
            .iter()
            .find(|(_, entry)| {
                entry
                    .names
                    .matches(Some(package), Some(name), Some(type_name), None)
            })
            .map_or(ResId::NULL, |(id, _)| *id)
    }

    fn value(&self, id: ResId, _resolve_refs: bool) -> Result<TypedValue, ResourceError> {
        Ok(match &self.entry(id)?.value {
            MemoryValue::Undefined => TypedValue::Boolean(false),
            MemoryValue::Bool(value) => TypedValue::Boolean(*value),
            MemoryValue::Int(value) => TypedValue::Integer(*value),
            MemoryValue::Dimension(value) | MemoryValue::Fraction(value) => {
                TypedValue::Float(*value)
            }
            MemoryValue::Text(text) => TypedValue::Text(Arc::clone(text)),
            MemoryValue::Document { path, .. } => TypedValue::Text(Arc::clone(path)),
            MemoryValue::IntArray(_) | MemoryValue::TextArray(_) | MemoryValue::Asset(_) => {
                TypedValue::Reference(id)
            }
        })
    }

    fn boolean(&self, id: ResId) -> Result<bool, ResourceError> {
        self.lookup(id, |v| match v {
            MemoryValue::Bool(value) => Some(*value),
            _ => None,
        })
    }

    fn color(&self, id: ResId) -> Result<i32, ResourceError> {
        self.integer(id)
    }

    fn dimension(&self, id: ResId) -> Result<f32, ResourceError> {
        self.lookup(id, |v| match v {
            MemoryValue::Dimension(value) => Some(*value),
            _ => None,
        })
    }

    fn dimension_pixel_offset(&self, id: ResId) -> Result<i32, ResourceError> {
        self.dimension(id).map(|px| px.trunc() as i32)
    }

    fn dimension_pixel_size(&self, id: ResId) -> Result<i32, ResourceError> {
        self.dimension(id).map(|px| px.round() as i32)
    }

    fn drawable(&self, id: ResId) -> Result<AssetHandle, ResourceError> {
        self.lookup(id, |v| match v {
            MemoryValue::Asset(asset) => Some(Arc::clone(asset)),
            _ => None,
        })
    }

    fn drawable_for_density(&self, id: ResId, _density: u32) -> Result<AssetHandle, ResourceError> {
        self.drawable(id)
    }

    fn fraction(&self, id: ResId, base: i32, _parent_base: i32) -> Result<f32, ResourceError> {
        self.lookup(id, |v| match v {
            MemoryValue::Fraction(value) => Some(*value * base as f32),
            _ => None,
        })
    }

    fn integer(&self, id: ResId) -> Result<i32, ResourceError> {
        self.lookup(id, |v| match v {
            MemoryValue::Int(value) => Some(*value),
            _ => None,
        })
    }

    fn int_array(&self, id: ResId) -> Result<Arc<[i32]>, ResourceError> {
        self.lookup(id, |v| match v {
            MemoryValue::IntArray(values) => Some(Arc::clone(values)),
            _ => None,
        })
    }

    fn movie(&self, id: ResId) -> Result<AssetHandle, ResourceError> {
        self.drawable(id)
    }

    fn quantity_text(&self, id: ResId, _quantity: i32) -> Result<Arc<str>, ResourceError> {
        self.text(id)
    }

    fn string_array(&self, id: ResId) -> Result<Arc<[Arc<str>]>, ResourceError> {
        self.text_array(id)
    }

    fn text(&self, id: ResId) -> Result<Arc<str>, ResourceError> {
        self.lookup(id, |v| match v {
            MemoryValue::Text(text) => Some(Arc::clone(text)),
            _ => None,
        })
    }

    fn text_array(&self, id: ResId) -> Result<Arc<[Arc<str>]>, ResourceError> {
        self.lookup(id, |v| match v {
            MemoryValue::TextArray(values) => Some(Arc::clone(values)),
            _ => None,
        })
    }

    fn load_document(&self, id: ResId, _kind: &str) -> Result<LoadedDocument, ResourceError> {
        let block = self.block(id).ok_or_else(|| ResourceError::missing(id))?;
        *self.loads.lock() += 1;
        let parser: Arc<dyn DocumentParser> = Arc::new(MemoryParser { block });
        if self.opened.lock().insert(id) {
            Ok(LoadedDocument::fresh(parser))
        } else {
            Ok(LoadedDocument::cached(parser))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> MemoryProvider {
        MemoryProvider::new("com.app")
            .with(0x7f01_0001, "bool", "enabled", MemoryValue::Bool(true))
            .with(0x7f05_0001, "dimen", "margin", MemoryValue::Dimension(4.6))
            .with(0x7f06_0001, "id", "title", MemoryValue::Undefined)
            .with_layout(0x7f03_0001, "main", "res/layout/main.xml", [0x7f06_0001], &["text"])
    }

    #[test]
    fn typed_lookups_check_the_kind() {
        let p = provider();
        assert_eq!(p.boolean(ResId::new(0x7f01_0001)), Ok(true));
        assert!(matches!(
            p.integer(ResId::new(0x7f01_0001)),
            Err(ResourceError::NotFound(_))
        ));
        assert_eq!(p.dimension_pixel_offset(ResId::new(0x7f05_0001)), Ok(4));
        assert_eq!(p.dimension_pixel_size(ResId::new(0x7f05_0001)), Ok(5));
    }

    #[test]
    fn undefined_ids_report_false() {
        let p = provider();
        assert_eq!(
            p.value(ResId::new(0x7f06_0001), false),
            Ok(TypedValue::Boolean(false))
        );
    }

    #[test]
    fn identifier_lookup() {
        let p = provider();
        assert_eq!(p.identifier("title", "id", "com.app"), ResId::new(0x7f06_0001));
        assert_eq!(p.identifier("title", "id", "android"), ResId::NULL);
        assert_eq!(p.identifier_by_full_name("layout/main"), ResId::new(0x7f03_0001));
    }

    #[test]
    fn second_load_is_cached_with_a_new_parser() {
        let p = provider();
        let first = p.load_document(ResId::new(0x7f03_0001), "layout").unwrap();
        let second = p.load_document(ResId::new(0x7f03_0001), "layout").unwrap();
        assert!(!first.cached);
        assert!(second.cached);
        assert!(!Arc::ptr_eq(&first.parser, &second.parser));
        assert_eq!(p.load_count(), 2);
    }
}
