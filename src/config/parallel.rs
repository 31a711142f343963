//! Worker pool configuration for assessment passes.

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

/// Controls how many entities are assessed concurrently.
///
/// Per-entity work is independent, so entities are spread over a rayon
/// pool. The pool size should follow the capacity of the persistence store,
/// not the CPU count, when the store is remote.
///
/// # Example
///
/// ```rust
/// use chainrisk::config::ParallelConfig;
///
/// let config = ParallelConfig {
///     enabled: true,
///     max_concurrency: Some(4),
/// };
/// assert_eq!(config.effective_concurrency(), 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParallelConfig {
    /// Process entities on a worker pool (default: true)
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Worker pool size (default: available CPU cores)
    #[serde(default)]
    pub max_concurrency: Option<usize>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_concurrency: None,
        }
    }
}

impl ParallelConfig {
    pub fn sequential() -> Self {
        Self {
            enabled: false,
            max_concurrency: None,
        }
    }

    pub fn with_workers(workers: usize) -> Self {
        Self {
            enabled: true,
            max_concurrency: Some(workers),
        }
    }

    /// Configured pool size, or the number of available cores.
    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrency
            .filter(|&n| n > 0)
            .unwrap_or_else(available_cores)
    }
}

fn available_cores() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1)
}
