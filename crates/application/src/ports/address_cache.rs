use std::net::IpAddr;

/// Outcome of a cache sweep cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepOutcome {
    pub entries_removed: usize,
    pub cache_size: usize,
}

/// Remembers every address a hostname resolved to recently.
pub trait AddressCache: Send + Sync {
    /// Union `addresses` into the entry for `host`, mark it as just seen and
    /// return everything currently known for it.
    fn add_and_get(&self, host: &str, addresses: &[IpAddr]) -> Vec<IpAddr>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Port driven by the periodic sweep job.
pub trait AddressCacheMaintenance: Send + Sync {
    /// Drop every entry idle for longer than the expiry window.
    fn run_sweep_cycle(&self) -> SweepOutcome;
}
