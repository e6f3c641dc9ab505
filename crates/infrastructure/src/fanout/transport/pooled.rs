use async_trait::async_trait;
use bucketwire_application::ports::{
    HostTransport, RequestBody, ResponseBody, RoundTrip, TransportFactory,
};
use bucketwire_domain::{BoxError, TransportConfig, TransportError};
use http::{Request, Response};
use http_body_util::BodyExt;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use rustls::pki_types::ServerName;
use std::sync::Arc;
use std::time::Duration;

use super::connector::HostPinnedConnector;
use super::tls::TlsSettings;

#[derive(Debug, Clone, Copy)]
struct PoolSettings {
    idle_timeout: Duration,
    max_idle_per_host: usize,
    connect_timeout: Duration,
    tcp_keepalive: Duration,
    tls_handshake_timeout: Duration,
}

impl From<&TransportConfig> for PoolSettings {
    fn from(config: &TransportConfig) -> Self {
        Self {
            idle_timeout: config.pool_idle_timeout(),
            max_idle_per_host: config.max_idle_per_host,
            connect_timeout: config.connect_timeout(),
            tcp_keepalive: config.tcp_keepalive(),
            tls_handshake_timeout: config.tls_handshake_timeout(),
        }
    }
}

/// HTTP/1.1 client with its own connection pool, keyed by peer IP.
///
/// One instance serves one hostname: connections to any of that host's IPs
/// verify the certificate against the pinned server name.
pub struct PooledHttpTransport {
    client: Client<HostPinnedConnector, RequestBody>,
    settings: PoolSettings,
    tls: TlsSettings,
    server_name: Option<String>,
}

impl PooledHttpTransport {
    pub fn new(config: &TransportConfig, tls: TlsSettings) -> Self {
        let settings = PoolSettings::from(config);
        let client = build_client(settings, &tls, None);
        Self {
            client,
            settings,
            tls,
            server_name: None,
        }
    }

    /// Factory producing transports that trust the webpki root set.
    pub fn factory(config: &TransportConfig) -> TransportFactory {
        Self::factory_with_tls(config, TlsSettings::webpki())
    }

    pub fn factory_with_tls(config: &TransportConfig, tls: TlsSettings) -> TransportFactory {
        let config = config.clone();
        Arc::new(move || Box::new(PooledHttpTransport::new(&config, tls.clone())))
    }

    pub fn pool_idle_timeout(&self) -> Duration {
        self.settings.idle_timeout
    }

    pub fn max_idle_per_host(&self) -> usize {
        self.settings.max_idle_per_host
    }

    pub fn tls_handshake_timeout(&self) -> Duration {
        self.settings.tls_handshake_timeout
    }
}

fn build_client(
    settings: PoolSettings,
    tls: &TlsSettings,
    server_name: Option<ServerName<'static>>,
) -> Client<HostPinnedConnector, RequestBody> {
    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_nodelay(true);
    http.set_connect_timeout(Some(settings.connect_timeout));
    http.set_keepalive(Some(settings.tcp_keepalive));

    let connector = HostPinnedConnector::new(http, tls, server_name)
        .with_handshake_timeout(settings.tls_handshake_timeout);

    Client::builder(TokioExecutor::new())
        .pool_timer(TokioTimer::new())
        .pool_idle_timeout(settings.idle_timeout)
        .pool_max_idle_per_host(settings.max_idle_per_host)
        .build(connector)
}

#[async_trait]
impl RoundTrip for PooledHttpTransport {
    async fn round_trip(
        &self,
        request: Request<RequestBody>,
    ) -> Result<Response<ResponseBody>, TransportError> {
        let response = self
            .client
            .request(request)
            .await
            .map_err(TransportError::exchange)?;

        Ok(response.map(|body| body.map_err(BoxError::from).boxed()))
    }
}

impl HostTransport for PooledHttpTransport {
    fn tls_server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }

    fn set_tls_server_name(&mut self, host: &str) -> Result<(), TransportError> {
        let name = ServerName::try_from(host.to_string())
            .map_err(|_| TransportError::InvalidServerName(host.to_string()))?;

        self.client = build_client(self.settings, &self.tls, Some(name));
        self.server_name = Some(host.to_string());
        Ok(())
    }
}
