use bucketwire_application::ports::{AddressCache, AddressCacheMaintenance, SweepOutcome};
use dashmap::DashMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use std::net::IpAddr;
use std::time::Duration;
use tokio::time::Instant;

struct AddressEntry {
    addresses: FxHashSet<IpAddr>,
    last_seen: Instant,
}

impl AddressEntry {
    fn snapshot(&self) -> Vec<IpAddr> {
        self.addresses.iter().copied().collect()
    }
}

/// Every IP a hostname resolved to within the expiry window.
///
/// DNS for large object stores rotates through many addresses per name;
/// keeping recent answers lets requests spread over peers that already have
/// pooled connections. Entries are only ever removed by [`sweep`].
///
/// [`sweep`]: ExpiringAddressCache::sweep
pub struct ExpiringAddressCache {
    entries: DashMap<String, AddressEntry, FxBuildHasher>,
    expire_after: Duration,
}

impl ExpiringAddressCache {
    pub fn new(expire_after: Duration) -> Self {
        Self {
            entries: DashMap::with_hasher(FxBuildHasher),
            expire_after,
        }
    }

    pub fn expire_after(&self) -> Duration {
        self.expire_after
    }

    pub fn contains(&self, host: &str) -> bool {
        self.entries.contains_key(host)
    }

    /// Remove entries not seen for longer than the expiry window. Each shard
    /// is locked only while it is being filtered.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = now.saturating_duration_since(entry.last_seen) <= self.expire_after;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }
}

impl AddressCache for ExpiringAddressCache {
    fn add_and_get(&self, host: &str, addresses: &[IpAddr]) -> Vec<IpAddr> {
        let now = Instant::now();

        if let Some(mut entry) = self.entries.get_mut(host) {
            entry.addresses.extend(addresses.iter().copied());
            entry.last_seen = now;
            return entry.snapshot();
        }

        if addresses.is_empty() {
            return Vec::new();
        }

        let mut entry = self
            .entries
            .entry(host.to_string())
            .or_insert_with(|| AddressEntry {
                addresses: FxHashSet::default(),
                last_seen: now,
            });
        entry.addresses.extend(addresses.iter().copied());
        entry.last_seen = now;
        entry.snapshot()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl AddressCacheMaintenance for ExpiringAddressCache {
    fn run_sweep_cycle(&self) -> SweepOutcome {
        let entries_removed = self.sweep();
        SweepOutcome {
            entries_removed,
            cache_size: self.entries.len(),
        }
    }
}
