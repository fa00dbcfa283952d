//! Engine primitives for Reskin (Layer 1).
//!
//! `reskin_core` holds the building blocks of the resource indirection layer:
//!
//! - [`id`] - [`ResId`] identifiers and synthetic id minting
//! - [`scope`] - [`Scope`], the origin an override is attributed to
//! - [`scoped`] - [`ScopedMap`], the two-level identifier → scope map
//! - [`names`] - [`ResourceNames`] and the [`NameRegistry`] cache
//! - [`value`] - [`Replacement`] values and [`Forwarder`]s
//! - [`table`] - the [`ReplacementTable`]
//! - [`tracker`] - the [`ModificationTracker`] for stale-override invalidation
//! - [`provider`] - the [`ResourceProvider`] contract every provider implements
//! - [`document`] - compiled documents and reference rewriting
//! - [`styled`] - styled attribute arrays
//! - [`error`] - error types
//!
//! # Lookup Precedence
//!
//! A lookup for identifier `i` from origin `o` consults the origin-specific
//! entry first, then the global entry, and finally falls through to the
//! original value:
//!
//! ```
//! use reskin_core::{ReplacementTable, Replacement, ResId, Scope};
//!
//! let table = ReplacementTable::new();
//! let id = ResId::new(0x0101_0001);
//! let app = Scope::origin("/data/app/a.apk");
//!
//! table.set(id, Scope::Global, Replacement::Bool(true)).unwrap();
//! assert!(matches!(table.get(id, &app), Some(Replacement::Bool(true))));
//!
//! table.set(id, app.clone(), Replacement::Bool(false)).unwrap();
//! assert!(matches!(table.get(id, &app), Some(Replacement::Bool(false))));
//! ```

pub mod document;
pub mod error;
pub mod id;
pub mod names;
pub mod provider;
pub mod scope;
pub mod scoped;
pub mod styled;
pub mod table;
pub mod tracker;
pub mod value;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use document::{CompiledDocument, DocumentParser, LoadedDocument, ReferenceRewriter};
pub use error::{InvalidIdentifier, ResourceError};
pub use id::ResId;
pub use names::{NameRegistry, ResourceNames};
pub use provider::ResourceProvider;
pub use scope::Scope;
pub use scoped::ScopedMap;
pub use styled::StyledAttributes;
pub use table::ReplacementTable;
pub use tracker::{FsModificationSource, ModificationSource, ModificationTracker};
pub use value::{Asset, AssetHandle, Forwarder, Replacement, TypedValue};

/// Type name of bare identifier entries (`@+id/...`). These never carry a value.
pub const ID_TYPE: &str = "id";

/// Type name of attribute entries.
pub const ATTR_TYPE: &str = "attr";

/// Package name reported by framework-scope resources.
pub const FRAMEWORK_PACKAGE: &str = "android";

/// Document kind of layouts, the only kind that layout callbacks observe.
pub const LAYOUT_KIND: &str = "layout";
