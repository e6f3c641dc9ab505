use rustls::{ClientConfig, RootCertStore};
use std::sync::{Arc, LazyLock};

/// Mozilla roots, built once and shared by every pooled transport.
static WEBPKI_CLIENT_CONFIG: LazyLock<Arc<ClientConfig>> = LazyLock::new(|| {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    TlsSettings::client_config(root_store)
});

/// Client-side TLS configuration handed to each pooled transport.
#[derive(Clone)]
pub struct TlsSettings {
    config: Arc<ClientConfig>,
}

impl TlsSettings {
    /// Verify servers against the bundled webpki root set.
    pub fn webpki() -> Self {
        Self {
            config: Arc::clone(&WEBPKI_CLIENT_CONFIG),
        }
    }

    /// Verify servers against `roots` only.
    pub fn with_roots(roots: RootCertStore) -> Self {
        Self {
            config: Self::client_config(roots),
        }
    }

    pub fn from_config(config: Arc<ClientConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Arc<ClientConfig> {
        &self.config
    }

    fn client_config(roots: RootCertStore) -> Arc<ClientConfig> {
        let mut config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        config.alpn_protocols = vec![b"http/1.1".to_vec()];
        Arc::new(config)
    }
}

impl Default for TlsSettings {
    fn default() -> Self {
        Self::webpki()
    }
}

impl std::fmt::Debug for TlsSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsSettings")
            .field("alpn_protocols", &self.config.alpn_protocols)
            .finish_non_exhaustive()
    }
}
