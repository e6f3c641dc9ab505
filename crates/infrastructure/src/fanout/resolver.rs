use async_trait::async_trait;
use bucketwire_application::ports::IpResolver;
use bucketwire_domain::LookupError;
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;

const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves through the operating system resolver (`getaddrinfo`), which
/// returns both IPv4 and IPv6 addresses.
#[derive(Debug, Clone)]
pub struct SystemResolver {
    timeout: Duration,
}

impl SystemResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for SystemResolver {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKUP_TIMEOUT)
    }
}

#[async_trait]
impl IpResolver for SystemResolver {
    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, LookupError> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(vec![ip]);
        }

        // lookup_host wants a socket address; the port is discarded.
        let target = format!("{host}:0");
        let addrs = tokio::time::timeout(self.timeout, tokio::net::lookup_host(target))
            .await
            .map_err(|_| LookupError::Timeout)?
            .map_err(|e| LookupError::Failed(e.to_string()))?;

        let mut ips: Vec<IpAddr> = Vec::new();
        for addr in addrs {
            let ip = addr.ip();
            if !ips.contains(&ip) {
                ips.push(ip);
            }
        }

        if ips.is_empty() {
            return Err(LookupError::NoAddresses);
        }

        debug!(host = %host, addresses = ips.len(), "Resolved host");
        Ok(ips)
    }
}
