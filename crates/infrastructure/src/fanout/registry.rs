use bucketwire_application::ports::{HostTransport, TransportFactory, TransportRegistry};
use bucketwire_domain::TransportError;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use tracing::debug;

/// One pooled transport per hostname, kept for the life of the registry.
///
/// Creation happens under the shard lock of the host's entry, so concurrent
/// first requests for a host observe a single instance and the factory runs
/// once. Transports are never evicted; idle connections inside them are
/// closed by their own pool timeout.
pub struct HostTransportRegistry {
    transports: DashMap<String, Arc<dyn HostTransport>, FxBuildHasher>,
    factory: TransportFactory,
}

impl HostTransportRegistry {
    pub fn new(factory: TransportFactory) -> Self {
        Self {
            transports: DashMap::with_hasher(FxBuildHasher),
            factory,
        }
    }

    pub fn contains(&self, host: &str) -> bool {
        self.transports.contains_key(host)
    }

    pub fn hosts(&self) -> Vec<String> {
        self.transports.iter().map(|e| e.key().clone()).collect()
    }

    fn create(&self, host: &str) -> Result<Arc<dyn HostTransport>, TransportError> {
        let mut transport = (self.factory)();
        transport.set_tls_server_name(host)?;
        debug!(host = %host, "Created pooled transport");
        Ok(Arc::from(transport))
    }
}

impl TransportRegistry for HostTransportRegistry {
    fn transport_for(&self, host: &str) -> Result<Arc<dyn HostTransport>, TransportError> {
        if let Some(existing) = self.transports.get(host) {
            return Ok(Arc::clone(existing.value()));
        }

        match self.transports.entry(host.to_string()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let transport = self.create(host)?;
                entry.insert(Arc::clone(&transport));
                Ok(transport)
            }
        }
    }

    fn len(&self) -> usize {
        self.transports.len()
    }
}
