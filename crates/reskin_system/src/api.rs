//! API trait for capability registration.
//!
//! APIs are process-wide registries that the host stores once and hands out
//! by type. Modules reach them during their `build`/`ready` phases, and the
//! host application keeps a handle for runtime use.
//!
//! # Interior Mutability Pattern
//!
//! APIs are shared by reference, so registration goes through interior
//! mutability:
//!
//! ```
//! use parking_lot::RwLock;
//! use reskin_system::api::API;
//!
//! #[derive(Default)]
//! pub struct LabelAPI {
//!     labels: RwLock<Vec<String>>,
//! }
//!
//! impl API for LabelAPI {}
//!
//! impl LabelAPI {
//!     pub fn register(&self, label: &str) {
//!         self.labels.write().push(label.to_owned());
//!     }
//! }
//! ```
//!
//! This allows:
//! - `host.api::<LabelAPI>()` returns `&LabelAPI`
//! - Multiple modules can call `register()` without `&mut Host`

/// Marker trait for capability APIs.
///
/// # Usage in Plugins
///
/// ```ignore
/// impl Plugin for RegistryPlugin {
///     fn build(&self, host: &mut Host) {
///         host.insert_api(Registry::new());
///     }
/// }
///
/// impl Plugin for ThemeModule {
///     fn ready(&self, host: &mut Host) {
///         let registry = host.api::<Registry>()
///             .expect("Registry required");
///         registry.register("key", value);
///     }
/// }
/// ```
pub trait API: Send + Sync + 'static {}
