use bucketwire_application::ports::AddressCacheMaintenance;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Periodically evicts idle entries from the address cache.
pub struct CacheSweepJob {
    maintenance: Arc<dyn AddressCacheMaintenance>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl CacheSweepJob {
    pub fn new(maintenance: Arc<dyn AddressCacheMaintenance>) -> Self {
        Self {
            maintenance,
            interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            shutdown: CancellationToken::new(),
        }
    }

    /// Clamped to between 1ms and one year.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.clamp(MIN_SWEEP_INTERVAL, MAX_SWEEP_INTERVAL);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the sweep loop on the current tokio runtime. The first pass runs
    /// one interval after start.
    pub fn start(self) -> SweepHandle {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            "Starting address cache sweep job"
        );

        let shutdown = self.shutdown.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("CacheSweepJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let outcome = self.maintenance.run_sweep_cycle();
                        if outcome.entries_removed > 0 {
                            debug!(
                                entries_removed = outcome.entries_removed,
                                cache_size = outcome.cache_size,
                                "Address cache sweep completed"
                            );
                        }
                    }
                }
            }
        });

        SweepHandle { shutdown, task }
    }
}

/// Lifetime of a running sweep job. Dropping the handle leaves the job
/// running; call [`SweepHandle::stop`] to end it.
pub struct SweepHandle {
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl SweepHandle {
    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    pub async fn stop_and_wait(self) {
        self.shutdown.cancel();
        let _ = self.task.await;
    }

    pub fn is_stopped(&self) -> bool {
        self.task.is_finished()
    }

    pub fn token(&self) -> CancellationToken {
        self.shutdown.clone()
    }
}
