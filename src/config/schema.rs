//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files, and
//! every field has a default so an empty file is a valid config.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{LogFormat, LoggerOptions};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AddonsConfig {
    /// Per-connection diagnostic logging.
    pub logging: LoggingConfig,

    /// Process-level tracing and metrics.
    pub observability: ObservabilityConfig,
}

/// Per-connection diagnostic logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Initial enabled switch for new connections.
    /// Unset means on in debug builds, off in release builds.
    pub enabled: Option<bool>,

    /// Line format of diagnostic entries.
    pub format: LogFormat,

    /// File to append diagnostics to.
    pub sink_path: Option<String>,

    /// Report sink write failures through tracing.
    pub report_sink_failures: bool,
}

impl LoggingConfig {
    /// Enabled switch with the build-mode default applied.
    pub fn resolved_enabled(&self) -> bool {
        self.enabled.unwrap_or(cfg!(debug_assertions))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: None,
            format: LogFormat::Text,
            sink_path: None,
            report_sink_failures: true,
        }
    }
}

impl From<&LoggingConfig> for LoggerOptions {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            enabled: config.resolved_enabled(),
            format: config.format,
            report_sink_failures: config.report_sink_failures,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
