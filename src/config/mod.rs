//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AddonsConfig (validated)
//!     → LoggingConfig → LoggerOptions for each new connection
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → SinkBinding applies it to live connections (sink hot swap)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - The build-mode logging default is resolved here, never inside the logger
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::AddonsConfig;
pub use schema::LoggingConfig;
pub use schema::ObservabilityConfig;
