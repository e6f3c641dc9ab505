//! Bucketwire Domain Layer
pub mod config;
pub mod errors;

pub use config::{Config, ConfigError, LoggingConfig, TransportConfig};
pub use errors::{BoxError, LookupError, TransportError};
