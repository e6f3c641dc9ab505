mod address_cache;
mod address_selector;
mod host_transport;
mod ip_resolver;
mod round_trip;
mod transport_registry;

pub use address_cache::{AddressCache, AddressCacheMaintenance, SweepOutcome};
pub use address_selector::AddressSelector;
pub use host_transport::{HostTransport, TransportFactory};
pub use ip_resolver::IpResolver;
pub use round_trip::{empty_body, full_body, RequestBody, ResponseBody, RoundTrip};
pub use transport_registry::TransportRegistry;
