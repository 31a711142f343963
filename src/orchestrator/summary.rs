use crate::errors::{EntityFailure, FailureSummary};
use serde::Serialize;

/// What one entity's assessment contributed to the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityOutcome {
    pub high_risk: bool,
    pub event_created: bool,
    pub below_stock_threshold: bool,
    pub recommendations: usize,
}

/// Counters of one pass, combined across rayon workers.
#[derive(Debug, Clone, Default)]
pub(crate) struct PassTally {
    pub processed: usize,
    pub high_risk: usize,
    pub events_created: usize,
    pub below_stock_threshold: usize,
    pub recommendations: usize,
    pub skipped: usize,
    pub failures: Vec<EntityFailure>,
}

impl PassTally {
    pub fn record(&mut self, outcome: EntityOutcome) {
        self.processed += 1;
        self.high_risk += usize::from(outcome.high_risk);
        self.events_created += usize::from(outcome.event_created);
        self.below_stock_threshold += usize::from(outcome.below_stock_threshold);
        self.recommendations += outcome.recommendations;
    }

    pub fn merge(mut self, other: PassTally) -> PassTally {
        self.processed += other.processed;
        self.high_risk += other.high_risk;
        self.events_created += other.events_created;
        self.below_stock_threshold += other.below_stock_threshold;
        self.recommendations += other.recommendations;
        self.skipped += other.skipped;
        self.failures.extend(other.failures);
        self
    }
}

/// Statistics of a complete assessment run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub suppliers_assessed: usize,
    pub suppliers_high_risk: usize,
    pub parts_assessed: usize,
    pub parts_high_risk: usize,
    pub parts_below_stock_threshold: usize,
    pub recommendations_generated: usize,
    pub alerts_dispatched: usize,
    pub risk_events_created: usize,
    /// Entities not assessed because the run deadline expired.
    pub skipped_by_timeout: usize,
    pub elapsed_ms: u64,
    /// Sorted by entity.
    pub errors: Vec<EntityFailure>,
}

impl RunSummary {
    pub(crate) fn add_supplier_pass(&mut self, tally: PassTally) {
        self.suppliers_assessed += tally.processed;
        self.suppliers_high_risk += tally.high_risk;
        self.add_common(tally);
    }

    pub(crate) fn add_part_pass(&mut self, tally: PassTally) {
        self.parts_assessed += tally.processed;
        self.parts_high_risk += tally.high_risk;
        self.parts_below_stock_threshold += tally.below_stock_threshold;
        self.add_common(tally);
    }

    pub(crate) fn add_recommendation_pass(&mut self, tally: PassTally) {
        self.recommendations_generated += tally.recommendations;
        self.add_common(tally);
    }

    fn add_common(&mut self, tally: PassTally) {
        self.risk_events_created += tally.events_created;
        self.skipped_by_timeout += tally.skipped;
        self.errors.extend(tally.failures);
    }

    pub(crate) fn sort_errors(&mut self) {
        self.errors
            .sort_by(|a, b| (a.entity, a.operation).cmp(&(b.entity, b.operation)));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn failure_summary(&self) -> FailureSummary {
        FailureSummary::from_failures(&self.errors)
    }
}
