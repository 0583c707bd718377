//! Shared helpers for integration tests.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use conn_addons::diagnostics::{LogSink, LoggerOptions, MemorySink, SharedSink};
use conn_addons::net::{Connection, Packet, Transport, TransportError};

/// Transport that records every packet it is asked to send.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Packet>>,
    fail_with_disconnect: bool,
}

impl RecordingTransport {
    #[allow(dead_code)]
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_with_disconnect: true,
        }
    }

    #[allow(dead_code)]
    pub fn sent(&self) -> Vec<Packet> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn kind(&self) -> &'static str {
        "recording"
    }

    fn send(&self, packet: Packet) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(packet);
        if self.fail_with_disconnect {
            return Err(TransportError::Disconnected("peer reset".into()));
        }
        Ok(())
    }
}

/// Sink that always fails and counts attempts.
#[allow(dead_code)]
#[derive(Default)]
pub struct FailingSink {
    pub attempts: AtomicUsize,
}

impl LogSink for FailingSink {
    fn write_entry(&self, _entry: &[u8]) -> io::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }
}

/// Connection over a recording transport with the given enabled switch.
pub fn connection(enabled: bool) -> Connection<RecordingTransport> {
    Connection::with_options(
        RecordingTransport::default(),
        LoggerOptions {
            enabled,
            ..LoggerOptions::default()
        },
    )
}

/// A memory sink plus the shared handle to attach it with.
pub fn memory_sink() -> (Arc<MemorySink>, SharedSink) {
    let mem = Arc::new(MemorySink::new());
    let shared: SharedSink = mem.clone();
    (mem, shared)
}
