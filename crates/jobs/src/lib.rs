pub mod cache_sweep;

pub use cache_sweep::{CacheSweepJob, SweepHandle};
