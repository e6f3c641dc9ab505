use super::round_trip::RoundTrip;
use bucketwire_domain::TransportError;
use std::sync::Arc;

/// A connection-pooling transport dedicated to one hostname.
///
/// Requests reach it with an IP in the URI, so certificate verification has
/// to be pinned to the hostname separately.
pub trait HostTransport: RoundTrip {
    /// Name the server certificate is checked against, if pinned.
    fn tls_server_name(&self) -> Option<&str>;

    /// Pin certificate verification to `host`. Called once, before the
    /// transport serves its first request.
    fn set_tls_server_name(&mut self, host: &str) -> Result<(), TransportError>;
}

/// Builds a fresh, unshared transport on every call.
///
/// The registry calls it, and then `set_tls_server_name`, while holding the
/// lock that guards the new host's slot; other hosts sharing that lock wait.
/// Both must return quickly without blocking or doing I/O.
pub type TransportFactory = Arc<dyn Fn() -> Box<dyn HostTransport> + Send + Sync>;
