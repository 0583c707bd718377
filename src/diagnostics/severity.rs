//! Severity of a diagnostic entry.

use serde::{Deserialize, Serialize};

/// Ordered diagnostic classification, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Debug,
    Information,
    Warning,
    Error,
}

impl Severity {
    /// Label used in text entries and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "Debug",
            Severity::Information => "Information",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
