use serde::{Deserialize, Serialize};

/// Alert lifecycle and notification settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Alerts created or escalated within this window are dispatched (default: 24)
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u32,

    /// Alert threshold given to newly created supplier records (default: 70)
    #[serde(default = "default_alert_threshold")]
    pub default_alert_threshold: u8,

    /// Days between scheduled assessments (default: 90)
    #[serde(default = "default_next_assessment_interval_days")]
    pub next_assessment_interval_days: u32,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            lookback_hours: default_lookback_hours(),
            default_alert_threshold: default_alert_threshold(),
            next_assessment_interval_days: default_next_assessment_interval_days(),
        }
    }
}

impl AlertConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.default_alert_threshold > 100 {
            errors.push(format!(
                "alerts.default_alert_threshold must be between 0 and 100, got {}",
                self.default_alert_threshold
            ));
        }
        if self.lookback_hours == 0 {
            errors.push("alerts.lookback_hours must be at least 1".to_string());
        }
        errors
    }
}

fn default_lookback_hours() -> u32 {
    24
}

fn default_alert_threshold() -> u8 {
    70
}

fn default_next_assessment_interval_days() -> u32 {
    90
}

/// Alternative-supplier suggestion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Size of the suggestion set per part (default: 3)
    #[serde(default = "default_max_per_part")]
    pub max_per_part: usize,

    /// Similarity given to a candidate before shared parts are counted (default: 50)
    #[serde(default = "default_base_similarity")]
    pub base_similarity: u8,

    /// Similarity added per shared-category part (default: 10)
    #[serde(default = "default_per_shared_part")]
    pub per_shared_part: u8,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            max_per_part: default_max_per_part(),
            base_similarity: default_base_similarity(),
            per_shared_part: default_per_shared_part(),
        }
    }
}

impl RecommendationConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.base_similarity > 100 {
            errors.push(format!(
                "recommendations.base_similarity must be between 0 and 100, got {}",
                self.base_similarity
            ));
        }
        errors
    }
}

fn default_max_per_part() -> usize {
    3
}

fn default_base_similarity() -> u8 {
    50
}

fn default_per_shared_part() -> u8 {
    10
}

/// Run-level limits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Wall-clock budget for a whole run. Unset means no limit.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl RunConfig {
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_seconds.map(std::time::Duration::from_secs)
    }
}
