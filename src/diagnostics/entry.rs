//! Log entry rendering.
//!
//! An entry is rendered into a single buffer so the sink receives it in one
//! write. Two line formats are supported:
//!
//! ```text
//! text: [1760600000000] [Information] [conn-3/tcp] message | error: detail
//! json: {"timestamp_ms":1760600000000,"severity":"Information",...}
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::diagnostics::severity::Severity;
use crate::net::connection::ConnectionId;

/// Line format written to a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    pub(crate) fn to_u8(self) -> u8 {
        match self {
            LogFormat::Text => 0,
            LogFormat::Json => 1,
        }
    }

    pub(crate) fn from_u8(val: u8) -> Self {
        match val {
            1 => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

/// One diagnostic event, tagged with the owning connection.
#[derive(Debug, Serialize)]
pub struct LogEntry<'a> {
    pub timestamp_ms: u64,
    pub severity: Severity,
    pub connection: String,
    pub transport: &'static str,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> LogEntry<'a> {
    pub fn new(
        connection: ConnectionId,
        transport: &'static str,
        severity: Severity,
        message: &'a str,
        error: Option<&(dyn std::error::Error + 'static)>,
    ) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        Self {
            timestamp_ms,
            severity,
            connection: connection.to_string(),
            transport,
            message,
            error: error.map(|e| e.to_string()),
        }
    }

    /// Render the entry as one newline-terminated line.
    pub fn render(&self, format: LogFormat) -> std::io::Result<Vec<u8>> {
        match format {
            LogFormat::Text => {
                let mut line = format!(
                    "[{}] [{}] [{}/{}] {}",
                    self.timestamp_ms, self.severity, self.connection, self.transport, self.message
                );
                if let Some(error) = &self.error {
                    line.push_str(" | error: ");
                    line.push_str(error);
                }
                line.push('\n');
                Ok(line.into_bytes())
            }
            LogFormat::Json => {
                let mut buf = serde_json::to_vec(self)?;
                buf.push(b'\n');
                Ok(buf)
            }
        }
    }
}
