use serde::{Deserialize, Serialize};

use super::parallel::ParallelConfig;
use super::retry::RetryConfig;
use super::scoring::ScoringConfig;
use super::thresholds::{AlertConfig, RecommendationConfig, RunConfig};
use crate::errors::RiskError;

/// Root configuration structure for chainrisk
///
/// Loaded once at startup and shared read-only (behind an `Arc`) with every
/// component of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Factor scorer and aggregator settings
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Alert lifecycle settings
    #[serde(default)]
    pub alerts: AlertConfig,

    /// Alternative-supplier suggestion settings
    #[serde(default)]
    pub recommendations: RecommendationConfig,

    /// Worker pool settings
    #[serde(default)]
    pub parallel: ParallelConfig,

    /// Retry policy for store conflicts and transient failures
    #[serde(default)]
    pub retry: RetryConfig,

    /// Run-level limits
    #[serde(default)]
    pub run: RunConfig,
}

impl RiskConfig {
    /// Collect every validation problem in the configuration.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = self.scoring.validate();
        errors.extend(self.alerts.validate());
        errors.extend(self.recommendations.validate());
        errors
    }

    pub fn validate(&self) -> Result<(), RiskError> {
        let errors = self.validation_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(RiskError::config(errors.join("; ")))
        }
    }
}
