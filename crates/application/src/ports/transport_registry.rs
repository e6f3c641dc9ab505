use super::host_transport::HostTransport;
use bucketwire_domain::TransportError;
use std::sync::Arc;

pub trait TransportRegistry: Send + Sync {
    /// The pooled transport bound to `host`, created on first use. Every
    /// caller observes the same instance for a given host.
    fn transport_for(&self, host: &str) -> Result<Arc<dyn HostTransport>, TransportError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
