//! Transport seam.
//!
//! Concrete transports (TCP, UDP, TLS) own framing, handshakes and retries.
//! The addon layer only needs a generic `send`.

use thiserror::Error;
use tokio::sync::mpsc;

use crate::net::packet::Packet;

/// Errors a transport may report from `send`.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connection was closed locally.
    #[error("connection is closed")]
    Closed,

    /// The remote side or the receiving half went away.
    #[error("transport disconnected: {0}")]
    Disconnected(String),

    /// Underlying socket error.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Generic send capability every connection variant provides.
pub trait Transport: Send + Sync {
    /// Short transport name used to tag diagnostics ("tcp", "udp", ...).
    fn kind(&self) -> &'static str;

    /// Transmit one packet.
    fn send(&self, packet: Packet) -> Result<(), TransportError>;
}

/// In-process transport that hands packets to a channel receiver.
///
/// Used by the CLI and tests in place of a socket.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<Packet>,
}

impl ChannelTransport {
    /// Create the transport and the receiver that observes sent packets.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Packet>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Transport for ChannelTransport {
    fn kind(&self) -> &'static str {
        "channel"
    }

    fn send(&self, packet: Packet) -> Result<(), TransportError> {
        self.tx
            .send(packet)
            .map_err(|_| TransportError::Disconnected("receiver dropped".to_string()))
    }
}
