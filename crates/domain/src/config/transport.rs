use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::ConfigError;

/// Tuning for the fan-out transport: address cache lifetime and the
/// per-hostname connection pools.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransportConfig {
    /// An address not seen in a lookup for this long is forgotten.
    #[serde(default = "default_cache_expire_after_secs")]
    pub cache_expire_after_secs: u64,

    /// How often stale addresses are swept out.
    #[serde(default = "default_cache_sweep_interval_secs")]
    pub cache_sweep_interval_secs: u64,

    /// Idle connections kept per peer IP.
    #[serde(default = "default_max_idle_per_host")]
    pub max_idle_per_host: usize,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_tcp_keepalive_secs")]
    pub tcp_keepalive_secs: u64,

    /// Per-lookup limit for the system resolver.
    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,

    #[serde(default = "default_tls_handshake_timeout_secs")]
    pub tls_handshake_timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            cache_expire_after_secs: default_cache_expire_after_secs(),
            cache_sweep_interval_secs: default_cache_sweep_interval_secs(),
            max_idle_per_host: default_max_idle_per_host(),
            connect_timeout_secs: default_connect_timeout_secs(),
            tcp_keepalive_secs: default_tcp_keepalive_secs(),
            lookup_timeout_secs: default_lookup_timeout_secs(),
            tls_handshake_timeout_secs: default_tls_handshake_timeout_secs(),
        }
    }
}

impl TransportConfig {
    pub fn expire_after(&self) -> Duration {
        Duration::from_secs(self.cache_expire_after_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache_sweep_interval_secs)
    }

    /// Pooled connections outlive the cache entry that pointed at them:
    /// `expire_after + 2 * sweep_interval`.
    pub fn pool_idle_timeout(&self) -> Duration {
        self.expire_after() + self.sweep_interval() * 2
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn tcp_keepalive(&self) -> Duration {
        Duration::from_secs(self.tcp_keepalive_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    pub fn tls_handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.tls_handshake_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_sweep_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "cache_sweep_interval_secs cannot be 0".to_string(),
            ));
        }

        if self.cache_expire_after_secs <= self.cache_sweep_interval_secs {
            return Err(ConfigError::Validation(format!(
                "cache_expire_after_secs ({}) must exceed cache_sweep_interval_secs ({})",
                self.cache_expire_after_secs, self.cache_sweep_interval_secs
            )));
        }

        if self.max_idle_per_host == 0 {
            return Err(ConfigError::Validation(
                "max_idle_per_host cannot be 0".to_string(),
            ));
        }

        if self.lookup_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "lookup_timeout_secs cannot be 0".to_string(),
            ));
        }

        if self.tls_handshake_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "tls_handshake_timeout_secs cannot be 0".to_string(),
            ));
        }

        // Durations are added to clock readings and to each other.
        for (name, secs) in [
            ("cache_expire_after_secs", self.cache_expire_after_secs),
            ("cache_sweep_interval_secs", self.cache_sweep_interval_secs),
            ("connect_timeout_secs", self.connect_timeout_secs),
            ("tcp_keepalive_secs", self.tcp_keepalive_secs),
            ("lookup_timeout_secs", self.lookup_timeout_secs),
            ("tls_handshake_timeout_secs", self.tls_handshake_timeout_secs),
        ] {
            if secs > MAX_DURATION_SECS {
                return Err(ConfigError::Validation(format!(
                    "{} ({}) exceeds the maximum of {} seconds",
                    name, secs, MAX_DURATION_SECS
                )));
            }
        }

        Ok(())
    }
}

/// One year.
const MAX_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

fn default_cache_expire_after_secs() -> u64 {
    300
}

fn default_cache_sweep_interval_secs() -> u64 {
    60
}

fn default_max_idle_per_host() -> usize {
    4
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_tcp_keepalive_secs() -> u64 {
    30
}

fn default_lookup_timeout_secs() -> u64 {
    10
}

fn default_tls_handshake_timeout_secs() -> u64 {
    10
}
