use super::target::RequestTarget;
use crate::ports::{
    AddressCache, AddressSelector, IpResolver, RequestBody, ResponseBody, TransportRegistry,
};
use bucketwire_domain::{LookupError, TransportError};
use http::{Request, Response};
use http_body::Body;
use std::sync::Arc;
use tracing::{debug, warn};

/// Sends one request to one of the IPs its hostname resolves to, through the
/// connection pool owned by that hostname.
pub struct DispatchRequestUseCase {
    resolver: Arc<dyn IpResolver>,
    cache: Arc<dyn AddressCache>,
    registry: Arc<dyn TransportRegistry>,
    selector: Arc<dyn AddressSelector>,
}

impl DispatchRequestUseCase {
    pub fn new(
        resolver: Arc<dyn IpResolver>,
        cache: Arc<dyn AddressCache>,
        registry: Arc<dyn TransportRegistry>,
        selector: Arc<dyn AddressSelector>,
    ) -> Self {
        Self {
            resolver,
            cache,
            registry,
            selector,
        }
    }

    pub async fn execute(
        &self,
        request: Request<RequestBody>,
    ) -> Result<Response<ResponseBody>, TransportError> {
        let target = match RequestTarget::from_uri(request.uri()) {
            Ok(target) => target,
            Err(e) => return Err(release(request, e)),
        };
        let host = target.host();

        let resolved = match self.resolver.lookup_ip(host).await {
            Ok(addresses) if !addresses.is_empty() => addresses,
            Ok(_) => {
                return Err(release(
                    request,
                    TransportError::resolution(host, LookupError::NoAddresses),
                ))
            }
            Err(e) => {
                warn!(host = %host, error = %e, "IP lookup failed");
                return Err(release(request, TransportError::resolution(host, e)));
            }
        };

        let known = self.cache.add_and_get(host, &resolved);

        let Some(ip) = self.selector.select(&known) else {
            return Err(release(
                request,
                TransportError::resolution(host, LookupError::NoAddresses),
            ));
        };

        debug!(
            host = %host,
            resolved = resolved.len(),
            known = known.len(),
            ip = %ip,
            strategy = self.selector.name(),
            "Dispatching request"
        );

        let request = target.rewrite(request, ip)?;

        let transport = match self.registry.transport_for(host) {
            Ok(transport) => transport,
            Err(e) => return Err(release(request, e)),
        };

        transport.round_trip(request).await
    }
}

/// Drops a request that will never be sent, closing its body.
fn release(request: Request<RequestBody>, error: TransportError) -> TransportError {
    let (parts, body) = request.into_parts();
    if !body.is_end_stream() {
        debug!(uri = %parts.uri, "Releasing unsent request body");
    }
    drop(body);
    error
}
