//! Connection identity and lifecycle.
//!
//! # Responsibilities
//! - Generate unique connection IDs for tagging diagnostics
//! - Track connection state (Active → Closed)
//! - Compose a transport with the addon block
//! - Release the diagnostic logger on close or drop

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

use crate::addons::{AddonHost, ConnectionAddons};
use crate::config::LoggingConfig;
use crate::diagnostics::{LogOwner, LoggerOptions, Severity};
use crate::net::packet::Packet;
use crate::net::transport::{Transport, TransportError};

/// Global atomic counter for connection IDs.
/// Using relaxed ordering is sufficient since we only need uniqueness, not synchronization.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Connection state for lifecycle tracking.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Connection is established and may send.
    Active = 0,
    /// Connection is closed; sends are refused.
    Closed = 1,
}

impl From<u8> for ConnectionState {
    fn from(val: u8) -> Self {
        match val {
            0 => ConnectionState::Active,
            _ => ConnectionState::Closed,
        }
    }
}

/// A transport endpoint carrying the addon block.
pub struct Connection<T: Transport> {
    id: ConnectionId,
    state: AtomicU8,
    transport: T,
    addons: ConnectionAddons,
}

impl<T: Transport> Connection<T> {
    /// Wrap an established transport. Addons are initialized here, once.
    pub fn new(transport: T, logging: &LoggingConfig) -> Self {
        Self::with_options(transport, LoggerOptions::from(logging))
    }

    pub fn with_options(transport: T, options: LoggerOptions) -> Self {
        let id = ConnectionId::new();
        let addons = ConnectionAddons::init(
            LogOwner {
                connection: id,
                transport: transport.kind(),
            },
            options,
        );

        tracing::debug!(connection_id = %id, transport = transport.kind(), "Connection established");

        Self {
            id,
            state: AtomicU8::new(ConnectionState::Active as u8),
            transport,
            addons,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from(self.state.load(Ordering::Acquire))
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Generic send. Refused once the connection is closed.
    pub fn send(&self, packet: Packet) -> Result<(), TransportError> {
        if self.state() == ConnectionState::Closed {
            return Err(TransportError::Closed);
        }
        tracing::trace!(connection_id = %self.id, packet = packet.kind(), "Sending packet");
        self.transport.send(packet)
    }

    /// Close the connection and release its logger. Idempotent.
    pub fn close(&self) {
        let prev = self.state.swap(ConnectionState::Closed as u8, Ordering::AcqRel);
        if ConnectionState::from(prev) == ConnectionState::Closed {
            return;
        }

        self.addons.logger().log("Connection closed", None, Severity::Information);
        self.addons.release();
        tracing::trace!(connection_id = %self.id, "Connection closed");
    }
}

impl<T: Transport> AddonHost for Connection<T> {
    fn addons(&self) -> &ConnectionAddons {
        &self.addons
    }

    fn send_packet(&self, packet: Packet) -> Result<(), TransportError> {
        self.send(packet)
    }
}

impl<T: Transport> Drop for Connection<T> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T: Transport> std::fmt::Debug for Connection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("transport", &self.transport.kind())
            .finish()
    }
}
