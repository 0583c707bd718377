//! Connection addons: per-connection diagnostics, platform probing and raw
//! data sends shared by every transport variant.

pub mod addons;
pub mod config;
pub mod diagnostics;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use addons::{AddonHost, ConnectionAddons};
pub use config::AddonsConfig;
pub use diagnostics::{ConnectionLogger, Severity, SharedSink};
pub use net::{Connection, RawData};
