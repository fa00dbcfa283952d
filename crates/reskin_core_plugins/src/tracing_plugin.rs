//! Logging for Reskin hosts.
//!
//! [`TracingPlugin`] exposes its settings as the [`TracingConfig`] API during
//! build and installs the subscriber in `ready()`, after every other plugin
//! had a chance to read or adjust the configuration.
//!
//! The overlay logs under the `reskin_*` targets:
//!
//! | Level | Events |
//! |-------|--------|
//! | `error` | reference translation failures |
//! | `warn` | released forwarding targets, unresolved attributes, odd layout paths |
//! | `info` | stale replacements purged after an origin changed |
//! | `debug` | translations, callback registration and dispatch |

use reskin_system::api::API;
use reskin_system::host::Host;
use reskin_system::plugin::Plugin;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Multi-line, human-readable.
    #[default]
    Pretty,
    /// One line per event.
    Compact,
    /// Structured JSON.
    Json,
}

/// The active logging configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Maximum level when no filter directive applies.
    pub level: Level,
    /// Output format.
    pub format: TracingFormat,
    /// Explicit filter directives, if any.
    pub directives: Option<String>,
}

impl API for TracingConfig {}

/// Installs a `tracing` subscriber.
///
/// Filter precedence: [`TracingPlugin::with_env_filter`] directives, then
/// `RUST_LOG`, then the configured level. An already installed global
/// subscriber is left in place.
///
/// ```
/// use reskin_core_plugins::{TracingFormat, TracingPlugin};
/// use reskin_system::host::Host;
/// use tracing::Level;
///
/// let mut host = Host::new();
/// host.add_plugins(
///     TracingPlugin::default()
///         .with_level(Level::DEBUG)
///         .with_format(TracingFormat::Compact)
///         .with_env_filter("reskin_resources=debug,reskin_core=info"),
/// );
/// host.finish();
/// ```
#[derive(Debug, Clone)]
pub struct TracingPlugin {
    level: Level,
    format: TracingFormat,
    env_filter: Option<String>,
    span_events: bool,
}

impl Default for TracingPlugin {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingPlugin {
    /// Creates a plugin logging at `INFO` in the pretty format.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets filter directives (`target=level,...`).
    #[must_use]
    pub fn with_env_filter(mut self, directives: impl Into<String>) -> Self {
        self.env_filter = Some(directives.into());
        self
    }

    /// Logs when spans open and close, with their busy time.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    fn filter(&self) -> EnvFilter {
        let fallback = || EnvFilter::new(self.level.as_str());
        match &self.env_filter {
            Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|_| fallback()),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback()),
        }
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let lifecycle = if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let layer = tracing_subscriber::fmt::layer().with_span_events(lifecycle);
        match self.format {
            TracingFormat::Pretty => layer.pretty().boxed(),
            TracingFormat::Compact => layer.compact().boxed(),
            TracingFormat::Json => layer.json().boxed(),
        }
    }
}

impl Plugin for TracingPlugin {
    fn build(&self, host: &mut Host) {
        host.insert_api(TracingConfig {
            level: self.level,
            format: self.format,
            directives: self.env_filter.clone(),
        });
    }

    fn ready(&self, _host: &mut Host) {
        // Fails only if a global subscriber already exists.
        tracing_subscriber::registry()
            .with(self.fmt_layer())
            .with(self.filter())
            .try_init()
            .ok();

        tracing::info!(level = %self.level, format = ?self.format, "tracing initialized");
    }

    fn cleanup(&self, _host: &mut Host) {
        tracing::debug!("tracing plugin shutting down");
    }

    fn name(&self) -> &str {
        "TracingPlugin"
    }
}
