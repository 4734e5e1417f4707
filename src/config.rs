use std::num::NonZeroUsize;

use color_eyre::eyre::{Result, WrapErr};

/// Environment variable overriding the auto-detected worker count.
pub const WORKER_COUNT_VAR: &str = "DIRSTAT_WORKER_COUNT";

#[derive(Debug, Clone)]
pub struct Config {
    /// Number of parallel aggregation workers. Set with `DIRSTAT_WORKER_COUNT`.
    /// Default is one less than the available parallelism, and never below `1`.
    pub worker_count: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let worker_count = match std::env::var(WORKER_COUNT_VAR) {
            Ok(raw) => Some(raw.trim().parse::<usize>().wrap_err_with(|| {
                format!("{WORKER_COUNT_VAR} must be an unsigned integer, got {raw:?}")
            })?),
            Err(_) => None,
        };

        Ok(Self::with_override(worker_count))
    }

    /// Resolve the worker count from an optional override, falling back to the
    /// detected parallelism minus the coordinating thread.
    pub fn with_override(worker_count: Option<usize>) -> Self {
        let worker_count = worker_count
            .unwrap_or_else(|| default_worker_count(std::thread::available_parallelism().ok()))
            .max(1);

        Self { worker_count }
    }
}

fn default_worker_count(parallelism: Option<NonZeroUsize>) -> usize {
    parallelism
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}
