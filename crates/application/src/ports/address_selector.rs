use std::net::IpAddr;

/// Picks the peer a single request is sent to.
pub trait AddressSelector: Send + Sync {
    fn select(&self, addresses: &[IpAddr]) -> Option<IpAddr>;

    fn name(&self) -> &'static str;
}
