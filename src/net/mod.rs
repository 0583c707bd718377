//! Network layer seams used by the addon block.
//!
//! # Data Flow
//! ```text
//! Established transport (TCP, UDP, TLS, in-process channel)
//!     → connection.rs (identity, state, addon block)
//!     → packet.rs (values handed to Transport::send)
//!     → transport.rs (generic send seam)
//!
//! platform.rs answers OS questions for socket option selection.
//! ```
//!
//! # Design Decisions
//! - Framing, handshakes and reconnects live inside each `Transport`
//! - Every connection variant gets the addons by composition, not inheritance

pub mod connection;
pub mod packet;
pub mod platform;
pub mod transport;

pub use connection::{Connection, ConnectionId, ConnectionState};
pub use packet::{Packet, RawData};
pub use platform::Platform;
pub use transport::{ChannelTransport, Transport, TransportError};
