use bucketwire_application::ports::AddressSelector;
use std::net::IpAddr;

/// Uniform random choice. Spreads load across every known peer without
/// shared state between requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl RandomSelector {
    pub fn new() -> Self {
        Self
    }
}

impl AddressSelector for RandomSelector {
    fn select(&self, addresses: &[IpAddr]) -> Option<IpAddr> {
        fastrand::choice(addresses).copied()
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
