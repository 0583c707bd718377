//! Lifecycle management for the long-running CLI mode.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → shutdown.trigger()
//!
//! Shutdown (shutdown.rs):
//!     broadcast → heartbeat loop exits → connection closed → logger released
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
