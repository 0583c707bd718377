//! Connection diagnostics subsystem.
//!
//! # Data Flow
//! ```text
//! connection code / addon facade
//!     → logger.rs (enabled check, sink snapshot)
//!     → entry.rs (render one line: text or JSON)
//!     → sink.rs (caller-owned destination, written whole)
//!
//! Sink failure:
//!     → discarded, counted, optionally reported via tracing
//! ```
//!
//! # Design Decisions
//! - One logger per connection, shared by `Arc` with the connection's I/O threads
//! - Sink slot is atomically swappable; readers snapshot it once per entry
//! - Logger holds sinks weakly; the caller decides when a sink dies
//! - Disabled logging returns before any formatting or I/O

pub mod entry;
pub mod logger;
pub mod severity;
pub mod sink;

pub use entry::{LogEntry, LogFormat};
pub use logger::{ConnectionLogger, LogOwner, LoggerOptions};
pub use severity::Severity;
pub use sink::{LogSink, MemorySink, SharedSink, StreamSink};
