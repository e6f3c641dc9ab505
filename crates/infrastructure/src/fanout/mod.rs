pub mod address_cache;
pub mod facade;
pub mod registry;
pub mod resolver;
pub mod selector;
pub mod transport;

pub use address_cache::ExpiringAddressCache;
pub use facade::{FanoutTransport, FanoutTransportBuilder};
pub use registry::HostTransportRegistry;
pub use resolver::SystemResolver;
pub use selector::RandomSelector;
pub use transport::{HostPinnedConnector, PooledHttpTransport, TlsSettings};
