//! Resource overlay for Reskin (Layer 2).
//!
//! This crate wires the primitives of `reskin_core` into a working overlay:
//!
//! - [`Overlay`] - the registry service holding every override, name and
//!   callback, shared by all origins
//! - [`OverlayResources`] - a [`ResourceProvider`](reskin_core::ResourceProvider)
//!   wrapping one origin's original provider with override precedence
//! - [`ReferenceTranslator`] - maps references in foreign documents into an origin
//! - [`LayoutHooks`] - layout callback registration and post-inflation dispatch
//! - [`OverlayStyledAttributes`] - override-aware styled attribute arrays
//! - [`ReskinPlugin`] - installs the [`Overlay`] into a [`Host`](reskin_system::host::Host)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use reskin_core::{ResId, ResourceProvider, Scope};
//! use reskin_core::testing::{MemoryProvider, MemoryValue};
//! use reskin_resources::Overlay;
//!
//! let overlay = Overlay::new();
//! let app = MemoryProvider::new("com.app")
//!     .with(0x7f01_0001, "bool", "enabled", MemoryValue::Bool(false))
//!     .shared();
//! let resources = overlay.resources_for(Scope::origin("/data/app/com.app.apk"), app);
//!
//! resources.set_replacement(ResId::new(0x7f01_0001), true).unwrap();
//! assert_eq!(resources.boolean(ResId::new(0x7f01_0001)), Ok(true));
//! ```

mod error;
pub mod hooks;
pub mod overlay;
pub mod plugin;
pub mod resources;
pub mod styled;
pub mod translate;

pub use error::TranslationError;
pub use hooks::{LayoutCallback, LayoutHookHandle, LayoutHooks, LayoutInflated};
pub use overlay::Overlay;
pub use plugin::ReskinPlugin;
pub use resources::OverlayResources;
pub use styled::OverlayStyledAttributes;
pub use translate::ReferenceTranslator;
