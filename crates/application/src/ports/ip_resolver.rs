use async_trait::async_trait;
use bucketwire_domain::LookupError;
use std::net::IpAddr;

#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Every address currently published for `host`.
    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, LookupError>;
}
