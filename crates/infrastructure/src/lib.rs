//! Bucketwire Infrastructure Layer
pub mod fanout;

pub use fanout::{
    ExpiringAddressCache, FanoutTransport, FanoutTransportBuilder, HostTransportRegistry,
    PooledHttpTransport, RandomSelector, SystemResolver, TlsSettings,
};
