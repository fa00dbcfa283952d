//! The host runtime for Reskin (Layer 1).
//!
//! `reskin_system` provides the primitives that let independently-loaded
//! modules plug into a hosting process:
//!
//! - [`api`] - API trait for process-wide capability registries
//! - [`plugin`] - Plugin trait for modules and plugin groups
//! - [`host`] - Host runtime for plugin orchestration
//!
//! # Architecture
//!
//! - **Layer 1** (`reskin_system`, `reskin_core`): host runtime and engine primitives
//! - **Layer 2** (`reskin_resources`, `reskin_core_plugins`): the override registry and infrastructure plugins
//! - **Layer 3** (modules): plugins that register replacements and layout callbacks
//!
//! # Example
//!
//! ```
//! use reskin_system::api::API;
//! use reskin_system::host::Host;
//! use reskin_system::plugin::Plugin;
//!
//! #[derive(Default)]
//! struct Counter;
//! impl API for Counter {}
//!
//! struct CounterPlugin;
//!
//! impl Plugin for CounterPlugin {
//!     fn build(&self, host: &mut Host) {
//!         host.insert_api(Counter);
//!     }
//! }
//!
//! let mut host = Host::new();
//! host.add_plugins(CounterPlugin);
//! host.finish();
//! assert!(host.contains_api::<Counter>());
//! ```

/// API trait for capability registration.
pub mod api;

/// Host runtime for plugin orchestration.
pub mod host;

/// Plugin trait for modules.
pub mod plugin;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::api::*;
    pub use crate::host::*;
    pub use crate::plugin::*;
}
