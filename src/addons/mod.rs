//! Connection addon block and the facade every connection variant exposes.
//!
//! # Data Flow
//! ```text
//! owner code
//!     → AddonHost (facade)
//!         → validation (raw data present?)
//!         → ConnectionLogger (diagnostics)
//!         → send_packet (transport's generic send)
//! ```
//!
//! # Design Decisions
//! - Composition: a connection *has* a `ConnectionAddons` block and implements
//!   `AddonHost` by pointing at it
//! - The block is built once, by `ConnectionAddons::init`, during connection
//!   construction
//! - Transport failures pass through untouched

pub mod binding;

use std::sync::Arc;

use thiserror::Error;

use crate::diagnostics::{ConnectionLogger, LogOwner, LoggerOptions, Severity, SharedSink};
use crate::net::packet::{Packet, RawData};
use crate::net::platform::Platform;
use crate::net::transport::TransportError;
use crate::observability::metrics;

pub use binding::SinkBinding;

/// Caller misuse detected by the facade. Reported through diagnostics only.
#[derive(Debug, Error)]
pub enum AddonError {
    #[error("cannot send raw data for key '{key}': no payload supplied")]
    MissingPayload { key: String },
}

/// Per-connection addon state.
#[derive(Debug)]
pub struct ConnectionAddons {
    logger: Arc<ConnectionLogger>,
}

impl ConnectionAddons {
    /// Build the addon block for a connection.
    ///
    /// Call exactly once per connection, before it is handed out.
    pub fn init(owner: LogOwner, options: LoggerOptions) -> Self {
        Self {
            logger: Arc::new(ConnectionLogger::new(owner, options)),
        }
    }

    pub fn logger(&self) -> &ConnectionLogger {
        &self.logger
    }

    /// Shared handle for I/O threads that need to log.
    pub fn logger_handle(&self) -> Arc<ConnectionLogger> {
        Arc::clone(&self.logger)
    }

    /// Detach the sink for good. Further swaps are ignored.
    pub fn release(&self) {
        self.logger.release();
    }
}

/// Capability shared by every connection variant carrying addons.
pub trait AddonHost {
    fn addons(&self) -> &ConnectionAddons;

    /// The transport's generic send.
    fn send_packet(&self, packet: Packet) -> Result<(), TransportError>;

    fn logger(&self) -> &ConnectionLogger {
        self.addons().logger()
    }

    fn logger_handle(&self) -> Arc<ConnectionLogger> {
        self.addons().logger_handle()
    }

    /// Log into the given sink, or stop logging with `None`.
    /// Sinks may be swapped at any time.
    fn log_into_stream(&self, sink: Option<&SharedSink>) {
        self.logger().log_into_stream(sink);
    }

    fn enable_logging(&self) -> bool {
        self.logger().enable_logging()
    }

    fn set_enable_logging(&self, enabled: bool) {
        self.logger().set_enable_logging(enabled);
    }

    /// Send `data` under `key`. A missing payload is logged and skipped.
    fn send_raw_data(&self, key: &str, data: Option<&[u8]>) -> Result<(), TransportError> {
        let Some(data) = data else {
            let err = AddonError::MissingPayload {
                key: key.to_string(),
            };
            self.logger().log(
                "Can't send raw data without a payload",
                Some(&err),
                Severity::Information,
            );
            metrics::record_raw_data_rejected();
            return Ok(());
        };

        self.send_packet(Packet::RawData(RawData::new(key, data)))?;
        metrics::record_raw_data_sent();
        Ok(())
    }

    /// Send an already constructed raw data packet as is.
    fn send_raw_packet(&self, raw: RawData) -> Result<(), TransportError> {
        self.send_packet(Packet::RawData(raw))?;
        metrics::record_raw_data_sent();
        Ok(())
    }

    fn platform(&self) -> Platform {
        Platform::current()
    }

    fn is_linux(&self) -> bool {
        self.platform().is_linux()
    }

    fn is_windows(&self) -> bool {
        self.platform().is_windows()
    }

    fn is_macos(&self) -> bool {
        self.platform().is_macos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use crate::net::connection::ConnectionId;
    use std::sync::Mutex;

    /// Minimal host recording what reaches the transport.
    struct RecordingHost {
        addons: ConnectionAddons,
        sent: Mutex<Vec<Packet>>,
    }

    impl RecordingHost {
        fn new(enabled: bool) -> Self {
            Self {
                addons: ConnectionAddons::init(
                    LogOwner {
                        connection: ConnectionId::new(),
                        transport: "recording",
                    },
                    LoggerOptions {
                        enabled,
                        ..LoggerOptions::default()
                    },
                ),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    impl AddonHost for RecordingHost {
        fn addons(&self) -> &ConnectionAddons {
            &self.addons
        }

        fn send_packet(&self, packet: Packet) -> Result<(), TransportError> {
            self.sent.lock().unwrap().push(packet);
            Ok(())
        }
    }

    #[test]
    fn missing_payload_skips_send_and_logs() {
        let host = RecordingHost::new(true);
        let mem = Arc::new(MemorySink::new());
        let sink: SharedSink = mem.clone();
        host.log_into_stream(Some(&sink));

        host.send_raw_data("k", None).unwrap();

        assert!(host.sent.lock().unwrap().is_empty());
        let lines = mem.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("[Information]"));
        assert!(lines[0].contains("no payload supplied"));
    }

    #[test]
    fn payload_is_wrapped_in_raw_data() {
        let host = RecordingHost::new(true);
        host.send_raw_data("k", Some(b"abc")).unwrap();

        let sent = host.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let raw = sent[0].as_raw_data().unwrap();
        assert_eq!(raw.key(), "k");
        assert_eq!(raw.data(), b"abc");
    }

    #[test]
    fn enable_logging_delegates_to_logger() {
        let host = RecordingHost::new(false);
        assert!(!host.enable_logging());
        host.set_enable_logging(true);
        assert!(host.logger().enable_logging());
    }

    #[test]
    fn platform_queries_agree_with_probe() {
        let host = RecordingHost::new(false);
        let p = Platform::current();
        assert_eq!(host.is_linux(), p.is_linux());
        assert_eq!(host.is_windows(), p.is_windows());
        assert_eq!(host.is_macos(), p.is_macos());
    }
}
