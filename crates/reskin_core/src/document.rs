//! Compiled documents and reference rewriting.
//!
//! A compiled document (a layout, a menu, an animation) embeds resource
//! identifiers and attribute names that are only meaningful inside the
//! package that compiled it. Before such a document can be inflated in
//! another package, every embedded reference is passed through a
//! [`ReferenceRewriter`].

use core::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::id::ResId;

/// Maps references embedded in a document into another package.
pub trait ReferenceRewriter {
    /// Returns the identifier to use in place of `id`.
    fn rewrite_reference(&mut self, id: ResId) -> ResId;

    /// Returns the identifier of the attribute called `name`.
    fn rewrite_attribute(&mut self, name: &str) -> ResId;
}

/// A parser over a compiled document.
///
/// Each call to [`ResourceProvider::load_document`](crate::ResourceProvider::load_document)
/// returns a new parser instance; its identity is what layout metadata is
/// keyed on.
pub trait DocumentParser: Send + Sync + 'static {
    /// Rewrites every embedded reference through `rewriter`.
    fn rewrite_references(&self, rewriter: &mut dyn ReferenceRewriter);
}

/// The result of opening a document.
#[derive(Clone)]
pub struct LoadedDocument {
    /// Parser over the document.
    pub parser: Arc<dyn DocumentParser>,
    /// True if the underlying compiled block came from the provider's cache
    /// and was therefore already rewritten on a previous load.
    pub cached: bool,
}

impl LoadedDocument {
    /// A freshly parsed document.
    #[must_use]
    pub fn fresh(parser: Arc<dyn DocumentParser>) -> Self {
        Self {
            parser,
            cached: false,
        }
    }

    /// A document served from cache.
    #[must_use]
    pub fn cached(parser: Arc<dyn DocumentParser>) -> Self {
        Self {
            parser,
            cached: true,
        }
    }
}

impl fmt::Debug for LoadedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedDocument")
            .field("parser", &Arc::as_ptr(&self.parser).cast::<()>())
            .field("cached", &self.cached)
            .finish()
    }
}

#[derive(Debug, Default, Clone)]
struct References {
    ids: Vec<ResId>,
    attributes: Vec<(String, ResId)>,
}

/// A compiled block of references shared by every parser opened on it.
///
/// Rewriting mutates the block in place, mirroring how a compiled document
/// is patched once and then served from cache.
#[derive(Debug, Default)]
pub struct CompiledDocument {
    references: Mutex<References>,
}

impl CompiledDocument {
    /// Creates a block embedding `ids` and attribute `names`.
    ///
    /// Attributes start out unresolved ([`ResId::NULL`]).
    #[must_use]
    pub fn new<I, S>(ids: impl IntoIterator<Item = ResId>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            references: Mutex::new(References {
                ids: ids.into_iter().collect(),
                attributes: attributes
                    .into_iter()
                    .map(|name| (name.into(), ResId::NULL))
                    .collect(),
            }),
        }
    }

    /// Current embedded identifiers.
    #[must_use]
    pub fn references(&self) -> Vec<ResId> {
        self.references.lock().ids.clone()
    }

    /// Current attribute names and their resolved identifiers.
    #[must_use]
    pub fn attributes(&self) -> Vec<(String, ResId)> {
        self.references.lock().attributes.clone()
    }
}

impl DocumentParser for CompiledDocument {
    fn rewrite_references(&self, rewriter: &mut dyn ReferenceRewriter) {
        let mut references = self.references.lock();
        for id in &mut references.ids {
            *id = rewriter.rewrite_reference(*id);
        }
        for (name, id) in &mut references.attributes {
            *id = rewriter.rewrite_attribute(name);
        }
    }
}
