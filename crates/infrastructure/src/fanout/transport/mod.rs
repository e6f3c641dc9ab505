pub mod connector;
pub mod pooled;
pub mod tls;

pub use connector::{HostPinnedConnector, HostStream};
pub use pooled::PooledHttpTransport;
pub use tls::TlsSettings;
