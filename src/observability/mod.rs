//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Library internals produce:
//!     → logging.rs (tracing events: sink swaps, sink failures, reloads)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stderr via the fmt subscriber (binary only)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - The library never installs a subscriber or recorder; the binary does
//! - Metrics are cheap (atomic increments, no-ops without a recorder)

pub mod logging;
pub mod metrics;
