use serde::{Deserialize, Serialize};

/// Weights of the four supplier factors in the overall score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_financial_weight")]
    pub financial: f64,
    #[serde(default = "default_delivery_weight")]
    pub delivery: f64,
    #[serde(default = "default_quality_weight")]
    pub quality: f64,
    #[serde(default = "default_geographical_weight")]
    pub geographical: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            financial: default_financial_weight(),
            delivery: default_delivery_weight(),
            quality: default_quality_weight(),
            geographical: default_geographical_weight(),
        }
    }
}

impl ScoringWeights {
    // Pure function: Check if weight is in valid range
    pub fn is_valid_weight(weight: f64) -> bool {
        (0.0..=1.0).contains(&weight)
    }

    pub fn validate_weight(weight: f64, name: &str) -> Result<(), String> {
        if Self::is_valid_weight(weight) {
            Ok(())
        } else {
            Err(format!("{} weight must be between 0.0 and 1.0", name))
        }
    }

    pub fn sum(&self) -> f64 {
        self.financial + self.delivery + self.quality + self.geographical
    }

    /// Validate individual weights and that they sum to 1.0
    pub fn validate(&self) -> Result<(), String> {
        Self::validate_weight(self.financial, "Financial")?;
        Self::validate_weight(self.delivery, "Delivery")?;
        Self::validate_weight(self.quality, "Quality")?;
        Self::validate_weight(self.geographical, "Geographical")?;

        let sum = self.sum();
        if (sum - 1.0).abs() > 0.001 {
            return Err(format!(
                "Supplier factor weights must sum to 1.0, but sum to {:.3}",
                sum
            ));
        }
        Ok(())
    }

    /// Rescale so the weights sum to exactly 1.0
    pub fn normalize(&mut self) {
        let sum = self.sum();
        if sum > 0.0 && (sum - 1.0).abs() > f64::EPSILON {
            self.financial /= sum;
            self.delivery /= sum;
            self.quality /= sum;
            self.geographical /= sum;
        }
    }
}

fn default_financial_weight() -> f64 {
    0.3
}
fn default_delivery_weight() -> f64 {
    0.3
}
fn default_quality_weight() -> f64 {
    0.3
}
fn default_geographical_weight() -> f64 {
    0.1
}

/// Open-order exposure tiers for the financial factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialThresholds {
    /// Exposure above which the score rises by 10 (default: 50 000)
    #[serde(default = "default_elevated_exposure")]
    pub elevated_exposure: f64,
    /// Exposure above which the score rises by 20 (default: 100 000)
    #[serde(default = "default_high_exposure")]
    pub high_exposure: f64,
}

impl Default for FinancialThresholds {
    fn default() -> Self {
        Self {
            elevated_exposure: default_elevated_exposure(),
            high_exposure: default_high_exposure(),
        }
    }
}

fn default_elevated_exposure() -> f64 {
    50_000.0
}
fn default_high_exposure() -> f64 {
    100_000.0
}

/// Part-count tiers used by the placeholder quality factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityThresholds {
    #[serde(default = "default_moderate_part_count")]
    pub moderate_part_count: usize,
    #[serde(default = "default_large_part_count")]
    pub large_part_count: usize,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            moderate_part_count: default_moderate_part_count(),
            large_part_count: default_large_part_count(),
        }
    }
}

fn default_moderate_part_count() -> usize {
    50
}
fn default_large_part_count() -> usize {
    100
}

/// Country-risk lookup for the geographical factor.
///
/// Entries are matched case-insensitively against the country on the
/// supplier's address. Countries in neither list fall into the low tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRiskTable {
    #[serde(default = "default_high_risk_countries")]
    pub high: Vec<String>,
    #[serde(default = "default_medium_risk_countries")]
    pub medium: Vec<String>,
}

impl Default for CountryRiskTable {
    fn default() -> Self {
        Self {
            high: default_high_risk_countries(),
            medium: default_medium_risk_countries(),
        }
    }
}

impl CountryRiskTable {
    pub fn tier(&self, country: &str) -> CountryTier {
        let country = country.trim();
        let matches = |list: &[String]| list.iter().any(|c| c.eq_ignore_ascii_case(country));
        if matches(&self.high) {
            CountryTier::High
        } else if matches(&self.medium) {
            CountryTier::Medium
        } else {
            CountryTier::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryTier {
    High,
    Medium,
    Other,
}

fn default_high_risk_countries() -> Vec<String> {
    ["AF", "BY", "IR", "KP", "MM", "RU", "SD", "SY", "VE", "YE"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_medium_risk_countries() -> Vec<String> {
    ["BD", "BR", "CN", "EG", "ID", "IN", "MX", "NG", "PK", "TR", "VN"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Days-on-hand cutoffs for the stockout factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockoutThresholds {
    /// Below this many days on hand scores 90 (default: 7)
    #[serde(default = "default_critical_days")]
    pub critical_days: f64,
    /// Below this many days on hand scores 70 (default: 30)
    #[serde(default = "default_high_days")]
    pub high_days: f64,
    /// Below this many days on hand scores 40 (default: 90)
    #[serde(default = "default_medium_days")]
    pub medium_days: f64,
}

impl Default for StockoutThresholds {
    fn default() -> Self {
        Self {
            critical_days: default_critical_days(),
            high_days: default_high_days(),
            medium_days: default_medium_days(),
        }
    }
}

fn default_critical_days() -> f64 {
    7.0
}
fn default_high_days() -> f64 {
    30.0
}
fn default_medium_days() -> f64 {
    90.0
}

/// Scoring section of `.chainrisk.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Trailing history window in days (default: 365)
    #[serde(default = "default_history_window_days")]
    pub history_window_days: u32,
    #[serde(default)]
    pub weights: ScoringWeights,
    #[serde(default)]
    pub financial: FinancialThresholds,
    #[serde(default)]
    pub quality: QualityThresholds,
    #[serde(default)]
    pub countries: CountryRiskTable,
    #[serde(default)]
    pub stockout: StockoutThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            history_window_days: default_history_window_days(),
            weights: ScoringWeights::default(),
            financial: FinancialThresholds::default(),
            quality: QualityThresholds::default(),
            countries: CountryRiskTable::default(),
            stockout: StockoutThresholds::default(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.history_window_days == 0 {
            errors.push("scoring.history_window_days must be at least 1".to_string());
        }
        if let Err(e) = self.weights.validate() {
            errors.push(format!("scoring.weights: {}", e));
        }
        if self.financial.elevated_exposure > self.financial.high_exposure {
            errors.push(
                "scoring.financial.elevated_exposure must not exceed high_exposure".to_string(),
            );
        }
        if self.quality.moderate_part_count > self.quality.large_part_count {
            errors.push(
                "scoring.quality.moderate_part_count must not exceed large_part_count".to_string(),
            );
        }
        let days = &self.stockout;
        if !(days.critical_days <= days.high_days && days.high_days <= days.medium_days) {
            errors.push(
                "scoring.stockout thresholds must satisfy critical_days <= high_days <= medium_days"
                    .to_string(),
            );
        }
        errors
    }
}

fn default_history_window_days() -> u32 {
    365
}
