//! Host integration.

use core::fmt;
use std::sync::Arc;

use reskin_core::{ModificationSource, ResourceProvider};
use reskin_system::host::Host;
use reskin_system::plugin::Plugin;
use tracing::debug;

use crate::overlay::Overlay;

/// Installs an [`Overlay`] into the host.
///
/// # Example
///
/// ```
/// use reskin_resources::{Overlay, ReskinPlugin};
/// use reskin_system::host::Host;
///
/// let mut host = Host::new();
/// host.add_plugins(ReskinPlugin::default());
/// host.finish();
///
/// assert!(host.contains_api::<Overlay>());
/// ```
#[derive(Clone, Default)]
pub struct ReskinPlugin {
    source: Option<Arc<dyn ModificationSource>>,
    framework: Option<Arc<dyn ResourceProvider>>,
}

impl ReskinPlugin {
    /// Reads origin modification times from `source` instead of the filesystem.
    #[must_use]
    pub fn with_modification_source(mut self, source: Arc<dyn ModificationSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Registers the framework provider during build.
    #[must_use]
    pub fn with_framework(mut self, framework: Arc<dyn ResourceProvider>) -> Self {
        self.framework = Some(framework);
        self
    }
}

impl Plugin for ReskinPlugin {
    fn build(&self, host: &mut Host) {
        let overlay = match &self.source {
            Some(source) => Overlay::with_modification_source(Arc::clone(source)),
            None => Overlay::new(),
        };
        if let Some(framework) = &self.framework {
            overlay.set_framework(Arc::clone(framework));
        }
        debug!(framework = self.framework.is_some(), "installing overlay");
        host.insert_api(overlay);
    }

    fn name(&self) -> &str {
        "ReskinPlugin"
    }
}

impl fmt::Debug for ReskinPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReskinPlugin")
            .field("custom_source", &self.source.is_some())
            .field("framework", &self.framework.as_ref().map(|p| p.package_name().to_owned()))
            .finish()
    }
}
