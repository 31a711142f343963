//! Combines factor scores into an overall score and a risk level.
//!
//! The derived values only leave this module inside [`SupplierAssessment`]
//! and [`PartAssessment`], which can only be built here, so a stored overall
//! score always matches the factors it was computed from.

use super::score_types::FactorScore;
use crate::config::{ScoringConfig, ScoringWeights};
use crate::core::RiskLevel;
use crate::errors::RiskError;
use serde::{Deserialize, Serialize};

/// Overall supplier scores at or above this are MEDIUM.
pub const SUPPLIER_MEDIUM_CUTOFF: f64 = 30.0;
/// Overall supplier scores at or above this are HIGH.
pub const SUPPLIER_HIGH_CUTOFF: f64 = 70.0;

pub const PART_MEDIUM_CUTOFF: u8 = 40;
pub const PART_HIGH_CUTOFF: u8 = 60;
pub const PART_CRITICAL_CUTOFF: u8 = 80;

const SINGLE_SOURCE_WEIGHT: u32 = 30;
const LONG_LEAD_TIME_WEIGHT: u32 = 25;
const HIGH_VALUE_WEIGHT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SupplierFactors {
    pub financial: FactorScore,
    pub delivery: FactorScore,
    pub quality: FactorScore,
    pub geographical: FactorScore,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupplierAssessment {
    factors: SupplierFactors,
    overall: f64,
    level: RiskLevel,
}

impl SupplierAssessment {
    pub fn factors(&self) -> SupplierFactors {
        self.factors
    }

    pub fn overall(&self) -> f64 {
        self.overall
    }

    pub fn level(&self) -> RiskLevel {
        self.level
    }
}

/// Boolean risk indicators of a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartRiskFlags {
    pub single_source: bool,
    pub long_lead_time: bool,
    pub high_value: bool,
}

impl PartRiskFlags {
    /// Sum of the weights of the raised flags.
    pub fn weight(&self) -> u32 {
        let mut weight = 0;
        if self.single_source {
            weight += SINGLE_SOURCE_WEIGHT;
        }
        if self.long_lead_time {
            weight += LONG_LEAD_TIME_WEIGHT;
        }
        if self.high_value {
            weight += HIGH_VALUE_WEIGHT;
        }
        weight
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartAssessment {
    flags: PartRiskFlags,
    stockout: FactorScore,
    combined: u8,
    level: RiskLevel,
}

impl PartAssessment {
    pub fn flags(&self) -> PartRiskFlags {
        self.flags
    }

    pub fn stockout(&self) -> FactorScore {
        self.stockout
    }

    pub fn combined(&self) -> u8 {
        self.combined
    }

    pub fn level(&self) -> RiskLevel {
        self.level
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskAggregator {
    weights: ScoringWeights,
}

impl RiskAggregator {
    pub fn new(mut weights: ScoringWeights) -> Result<Self, RiskError> {
        weights.normalize();
        weights
            .validate()
            .map_err(|message| RiskError::validation("scoring.weights", message))?;
        Ok(Self { weights })
    }

    pub fn from_config(config: &ScoringConfig) -> Result<Self, RiskError> {
        Self::new(config.weights.clone())
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Weighted sum of the factors, rounded to two decimals.
    pub fn supplier_overall(&self, factors: &SupplierFactors) -> f64 {
        let w = &self.weights;
        let raw = w.financial * factors.financial.as_f64()
            + w.delivery * factors.delivery.as_f64()
            + w.quality * factors.quality.as_f64()
            + w.geographical * factors.geographical.as_f64();
        round_to_cents(raw)
    }

    pub fn supplier_level(overall: f64) -> RiskLevel {
        if overall >= SUPPLIER_HIGH_CUTOFF {
            RiskLevel::High
        } else if overall >= SUPPLIER_MEDIUM_CUTOFF {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn assess_supplier(&self, factors: SupplierFactors) -> SupplierAssessment {
        let overall = self.supplier_overall(&factors);
        SupplierAssessment {
            factors,
            overall,
            level: Self::supplier_level(overall),
        }
    }

    /// `floor((flag weight + stockout) / 2)`
    pub fn part_combined(flags: &PartRiskFlags, stockout: FactorScore) -> u8 {
        let combined = (flags.weight() + u32::from(stockout.value())) / 2;
        // flag weight is at most 75, so this never exceeds 87
        combined.min(100) as u8
    }

    pub fn part_level(combined: u8) -> RiskLevel {
        if combined >= PART_CRITICAL_CUTOFF {
            RiskLevel::Critical
        } else if combined >= PART_HIGH_CUTOFF {
            RiskLevel::High
        } else if combined >= PART_MEDIUM_CUTOFF {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn assess_part(&self, flags: PartRiskFlags, stockout: FactorScore) -> PartAssessment {
        let combined = Self::part_combined(&flags, stockout);
        PartAssessment {
            flags,
            stockout,
            combined,
            level: Self::part_level(combined),
        }
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(value: u8) -> FactorScore {
        FactorScore::from_const(value)
    }

    fn factors(financial: u8, delivery: u8, quality: u8, geographical: u8) -> SupplierFactors {
        SupplierFactors {
            financial: score(financial),
            delivery: score(delivery),
            quality: score(quality),
            geographical: score(geographical),
        }
    }

    #[test]
    fn test_supplier_without_history_is_medium() {
        let assessment = RiskAggregator::default().assess_supplier(factors(50, 50, 50, 10));
        assert_eq!(assessment.overall(), 46.0);
        assert_eq!(assessment.level(), RiskLevel::Medium);
    }

    #[test]
    fn test_supplier_level_boundaries() {
        assert_eq!(RiskAggregator::supplier_level(29.99), RiskLevel::Low);
        assert_eq!(RiskAggregator::supplier_level(30.00), RiskLevel::Medium);
        assert_eq!(RiskAggregator::supplier_level(69.99), RiskLevel::Medium);
        assert_eq!(RiskAggregator::supplier_level(70.00), RiskLevel::High);
    }

    #[test]
    fn test_supplier_overall_rounds_to_two_decimals() {
        let aggregator = RiskAggregator::new(ScoringWeights {
            financial: 1.0 / 3.0,
            delivery: 1.0 / 3.0,
            quality: 1.0 / 3.0,
            geographical: 0.0,
        })
        .unwrap();
        assert_eq!(aggregator.supplier_overall(&factors(10, 10, 11, 0)), 10.33);
    }

    #[test]
    fn test_part_level_boundaries() {
        let cases = [
            (39, RiskLevel::Low),
            (40, RiskLevel::Medium),
            (59, RiskLevel::Medium),
            (60, RiskLevel::High),
            (79, RiskLevel::High),
            (80, RiskLevel::Critical),
        ];
        for (combined, expected) in cases {
            assert_eq!(RiskAggregator::part_level(combined), expected, "{combined}");
        }
    }

    #[test]
    fn test_single_sourced_part_out_of_stock_is_high() {
        let flags = PartRiskFlags {
            single_source: true,
            ..Default::default()
        };
        let assessment = RiskAggregator::default().assess_part(flags, FactorScore::MAX);
        assert_eq!(assessment.combined(), 65);
        assert_eq!(assessment.level(), RiskLevel::High);
    }

    #[test]
    fn test_part_combined_floors() {
        let flags = PartRiskFlags {
            single_source: true,
            long_lead_time: true,
            high_value: false,
        };
        // (55 + 10) / 2 = 32.5
        assert_eq!(RiskAggregator::part_combined(&flags, score(10)), 32);
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let weights = ScoringWeights {
            financial: -1.0,
            delivery: 1.0,
            quality: 0.5,
            geographical: 0.5,
        };
        assert!(RiskAggregator::new(weights).is_err());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn any_score() -> impl Strategy<Value = FactorScore> {
        (0u8..=100).prop_map(FactorScore::from_const)
    }

    fn any_flags() -> impl Strategy<Value = PartRiskFlags> {
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(single_source, long_lead_time, high_value)| PartRiskFlags {
                single_source,
                long_lead_time,
                high_value,
            },
        )
    }

    proptest! {
        #[test]
        fn supplier_assessment_is_deterministic(
            f in any_score(), d in any_score(), q in any_score(), g in any_score()
        ) {
            let aggregator = RiskAggregator::default();
            let factors = SupplierFactors { financial: f, delivery: d, quality: q, geographical: g };
            let first = aggregator.assess_supplier(factors);
            let second = aggregator.assess_supplier(factors);
            prop_assert_eq!(first, second);
            prop_assert!((0.0..=100.0).contains(&first.overall()));
            prop_assert_eq!(first.level(), RiskAggregator::supplier_level(first.overall()));
        }

        #[test]
        fn part_assessment_is_deterministic(flags in any_flags(), stockout in any_score()) {
            let aggregator = RiskAggregator::default();
            let first = aggregator.assess_part(flags, stockout);
            prop_assert_eq!(first, aggregator.assess_part(flags, stockout));
            prop_assert!(first.combined() <= 100);
        }

        #[test]
        fn higher_stockout_never_lowers_part_level(
            flags in any_flags(), a in 0u8..=100, b in 0u8..=100
        ) {
            let (lo, hi) = (a.min(b), a.max(b));
            let aggregator = RiskAggregator::default();
            let low = aggregator.assess_part(flags, FactorScore::from_const(lo));
            let high = aggregator.assess_part(flags, FactorScore::from_const(hi));
            prop_assert!(low.level() <= high.level());
        }
    }
}
