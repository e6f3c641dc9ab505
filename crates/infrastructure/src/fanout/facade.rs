use async_trait::async_trait;
use bucketwire_application::ports::{
    AddressCache, AddressSelector, IpResolver, RequestBody, ResponseBody, RoundTrip,
    TransportFactory, TransportRegistry,
};
use bucketwire_application::use_cases::DispatchRequestUseCase;
use bucketwire_domain::{ConfigError, TransportConfig, TransportError};
use bucketwire_jobs::{CacheSweepJob, SweepHandle};
use http::{Request, Response};
use std::sync::Arc;
use tracing::info;

use super::address_cache::ExpiringAddressCache;
use super::registry::HostTransportRegistry;
use super::resolver::SystemResolver;
use super::selector::RandomSelector;
use super::transport::PooledHttpTransport;

/// An HTTP transport that spreads requests for a hostname across every IP
/// the hostname has recently resolved to, with one connection pool per
/// hostname.
///
/// Drop-in wherever a [`RoundTrip`] is expected.
pub struct FanoutTransport {
    dispatch: DispatchRequestUseCase,
    cache: Arc<ExpiringAddressCache>,
    registry: Arc<HostTransportRegistry>,
    sweep: SweepHandle,
}

impl FanoutTransport {
    pub fn builder() -> FanoutTransportBuilder {
        FanoutTransportBuilder::default()
    }

    /// Stop the cache sweep. Pooled connections close on their idle timeout.
    pub fn shutdown(&self) {
        self.sweep.stop();
    }

    pub fn is_shut_down(&self) -> bool {
        self.sweep.token().is_cancelled()
    }

    /// Hostnames with live address cache entries.
    pub fn cached_hosts(&self) -> usize {
        self.cache.len()
    }

    pub fn pooled_hosts(&self) -> usize {
        self.registry.len()
    }

    pub fn is_cached(&self, host: &str) -> bool {
        self.cache.contains(host)
    }

    pub fn has_pool_for(&self, host: &str) -> bool {
        self.registry.contains(host)
    }
}

#[async_trait]
impl RoundTrip for FanoutTransport {
    async fn round_trip(
        &self,
        request: Request<RequestBody>,
    ) -> Result<Response<ResponseBody>, TransportError> {
        self.dispatch.execute(request).await
    }
}

impl Drop for FanoutTransport {
    fn drop(&mut self) {
        self.sweep.stop();
    }
}

#[derive(Default)]
pub struct FanoutTransportBuilder {
    config: TransportConfig,
    factory: Option<TransportFactory>,
    resolver: Option<Arc<dyn IpResolver>>,
    selector: Option<Arc<dyn AddressSelector>>,
}

impl FanoutTransportBuilder {
    pub fn config(mut self, config: TransportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn factory(mut self, factory: TransportFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn resolver(mut self, resolver: Arc<dyn IpResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn selector(mut self, selector: Arc<dyn AddressSelector>) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Must be called from within a tokio runtime: the cache sweep job is
    /// spawned here.
    pub fn build(self) -> Result<FanoutTransport, ConfigError> {
        let config = self.config;
        config.validate()?;

        let factory = self
            .factory
            .unwrap_or_else(|| PooledHttpTransport::factory(&config));
        let resolver: Arc<dyn IpResolver> = match self.resolver {
            Some(resolver) => resolver,
            None => Arc::new(SystemResolver::new(config.lookup_timeout())),
        };
        let selector: Arc<dyn AddressSelector> = match self.selector {
            Some(selector) => selector,
            None => Arc::new(RandomSelector::new()),
        };

        let cache = Arc::new(ExpiringAddressCache::new(config.expire_after()));
        let registry = Arc::new(HostTransportRegistry::new(factory));

        info!(
            expire_after_secs = config.cache_expire_after_secs,
            sweep_interval_secs = config.cache_sweep_interval_secs,
            selector = selector.name(),
            "Fan-out transport ready"
        );

        let sweep = CacheSweepJob::new(cache.clone())
            .with_interval(config.sweep_interval())
            .start();

        let dispatch =
            DispatchRequestUseCase::new(resolver, cache.clone(), registry.clone(), selector);

        Ok(FanoutTransport {
            dispatch,
            cache,
            registry,
            sweep,
        })
    }
}
