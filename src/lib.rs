//! Runtime resource overrides for packaged applications.
//!
//! Reskin lets modules replace an application's resources (values, assets
//! and whole layouts) without touching the package on disk, and observe
//! layouts after they are inflated.
//!
//! ```
//! use reskin::prelude::*;
//!
//! let mut host = Host::new();
//! host.add_plugins(MinimalPlugins.build());
//! host.finish();
//!
//! let overlay = host.api::<Overlay>().unwrap();
//! overlay.set_system_wide_replacement(ResId::new(0x0101_0001), true).unwrap();
//! ```

pub use reskin_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use reskin_internal::prelude::*;
}
