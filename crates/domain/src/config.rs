pub mod errors;
pub mod logging;
pub mod root;
pub mod transport;

pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::Config;
pub use transport::TransportConfig;
