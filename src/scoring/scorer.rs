use super::aggregate::SupplierFactors;
use super::factors;
use super::score_types::FactorScore;
use crate::config::ScoringConfig;
use crate::core::{PartHistory, SupplierHistory};
use chrono::NaiveDate;

/// Source of factor scores for the orchestrator.
///
/// Implementations must be deterministic for a given history and date.
pub trait RiskScorer: Send + Sync {
    fn supplier_factors(&self, history: &SupplierHistory, today: NaiveDate) -> SupplierFactors;

    fn stockout(&self, history: &PartHistory, today: NaiveDate) -> FactorScore;
}

/// Scores computed from order and stock history with configured thresholds.
#[derive(Debug, Clone, Default)]
pub struct HeuristicScorer {
    config: ScoringConfig,
}

impl HeuristicScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    fn window_start(&self, today: NaiveDate) -> NaiveDate {
        factors::window_start(today, self.config.history_window_days)
    }
}

impl RiskScorer for HeuristicScorer {
    fn supplier_factors(&self, history: &SupplierHistory, today: NaiveDate) -> SupplierFactors {
        let lines = &history.order_lines;
        SupplierFactors {
            financial: factors::financial_score(lines, &self.config.financial),
            delivery: factors::delivery_score(lines, self.window_start(today)),
            quality: factors::quality_score(history.parts_supplied.len(), &self.config.quality),
            geographical: factors::geographical_score(
                history.supplier.address.as_ref(),
                &self.config.countries,
            ),
        }
    }

    fn stockout(&self, history: &PartHistory, today: NaiveDate) -> FactorScore {
        factors::stockout_score(history, self.window_start(today), &self.config.stockout)
    }
}
