use bucketwire_domain::Config;
use tracing::info;

/// Load the config file (or defaults) and apply command-line overrides.
pub fn load_config(path: Option<&str>, log_level: Option<&str>) -> anyhow::Result<Config> {
    let mut config = Config::load(path)?;

    if let Some(level) = log_level {
        config.logging.level = level.to_string();
    }

    Ok(config)
}

pub fn log_config(config: &Config) {
    info!(
        expire_after_secs = config.transport.cache_expire_after_secs,
        sweep_interval_secs = config.transport.cache_sweep_interval_secs,
        max_idle_per_host = config.transport.max_idle_per_host,
        pool_idle_timeout_secs = config.transport.pool_idle_timeout().as_secs(),
        "Configuration loaded"
    );
}
