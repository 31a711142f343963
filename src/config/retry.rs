//! Retry policy for per-entity store operations.
//!
//! Two kinds of failures are retried by the orchestrator:
//!
//! - optimistic concurrency conflicts, retried up to `max_retries` times
//! - transient store failures, retried `transient_retries` times (once by default)
//!
//! # Configuration Example
//!
//! ```toml
//! [retry]
//! enabled = true
//! max_retries = 3
//! transient_retries = 1
//! base_delay_ms = 25
//! strategy = "exponential"
//! ```

use crate::errors::RiskError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Enable automatic retries (default: true)
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Attempts allowed after a version conflict (default: 3)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Attempts allowed after a transient store failure (default: 1)
    #[serde(default = "default_transient_retries")]
    pub transient_retries: u32,

    /// Base delay between attempts in milliseconds (default: 25)
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Delay growth between attempts (default: exponential)
    #[serde(default)]
    pub strategy: RetryStrategy,

    /// Upper bound for a single delay in milliseconds (default: 1000)
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_retries: default_max_retries(),
            transient_retries: default_transient_retries(),
            base_delay_ms: default_base_delay_ms(),
            strategy: RetryStrategy::default(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl RetryConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Retry immediately, used by tests that inject failures.
    pub fn immediate() -> Self {
        Self {
            base_delay_ms: 0,
            ..Default::default()
        }
    }

    /// Delay before retry attempt `attempt` (1-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.base_delay_ms;
        let attempt = u64::from(attempt.max(1));
        let delay_ms = match self.strategy {
            RetryStrategy::Constant => base,
            RetryStrategy::Linear => base.saturating_mul(attempt),
            RetryStrategy::Exponential => {
                base.saturating_mul(1u64.checked_shl((attempt - 1) as u32).unwrap_or(u64::MAX))
            }
        };
        Duration::from_millis(delay_ms.min(self.max_delay_ms))
    }

    /// Whether `error`, seen after `conflicts` conflicts and `transients`
    /// transient failures so far, earns another attempt.
    pub fn should_retry(&self, error: &RiskError, conflicts: u32, transients: u32) -> bool {
        if !self.enabled {
            return false;
        }
        match error {
            RiskError::Conflict { .. } => conflicts < self.max_retries,
            RiskError::TransientStore(_) => transients < self.transient_retries,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetryStrategy {
    Constant,
    Linear,
    #[default]
    Exponential,
}

fn default_enabled() -> bool {
    true
}

fn default_max_retries() -> u32 {
    3
}

fn default_transient_retries() -> u32 {
    1
}

fn default_base_delay_ms() -> u64 {
    25
}

fn default_max_delay_ms() -> u64 {
    1000
}
