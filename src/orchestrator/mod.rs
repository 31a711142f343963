//! Batch assessment runs.
//!
//! A run enumerates its target entities, assesses each one on a rayon pool
//! and folds the per-entity outcomes into a [`RunSummary`]. A failing entity
//! is recorded and skipped; only a failure to enumerate the targets aborts
//! the run.
//!
//! ```rust,no_run
//! use chainrisk::config::RiskConfig;
//! use chainrisk::orchestrator::{AssessmentOptions, Orchestrator};
//! use chainrisk::store::InMemoryStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let orchestrator = Orchestrator::with_defaults(store, Arc::new(RiskConfig::default()))?;
//! let summary = orchestrator.run(&AssessmentOptions::default())?;
//! println!("{} suppliers assessed", summary.suppliers_assessed);
//! # Ok::<(), chainrisk::errors::RiskError>(())
//! ```

pub mod listener;
pub mod summary;

pub use listener::{ChangePublisher, EntityChanged, ListenerReport, ReassessmentListener};
pub use summary::{EntityOutcome, RunSummary};

use crate::alerts::{
    dispatch_alerts, AlertContext, AlertLifecycleManager, LogSink, NotificationSink,
};
use crate::config::RiskConfig;
use crate::core::{
    AlertId, AlertRecord, Clock, EntityRef, EventId, NewRiskEvent, PartId, RecommendationId,
    RecommendationRecord, RiskCategory, RiskEventRecord, SupplierId, SystemClock,
};
use crate::errors::{EntityFailure, OperationType, Result, RiskError};
use crate::observability::{increment_processed, set_current_entity, set_phase, set_progress, AssessmentPhase};
use crate::progress::{ProgressConfig, TEMPLATE_PARTS, TEMPLATE_RECOMMENDATIONS, TEMPLATE_SUPPLIERS};
use crate::recommendations::RecommendationGenerator;
use crate::scoring::{HeuristicScorer, RiskAggregator, RiskScorer};
use crate::store::RiskStore;
use indicatif::{ParallelProgressIterator, ProgressIterator};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use summary::PassTally;

const SUPPLIER_ALERT_TYPE: &str = "supplier_risk";
const PART_ALERT_TYPE: &str = "supply_chain_risk";

/// Delivery scores above this make DELIVERY the category of a supplier alert.
const DELIVERY_CATEGORY_CUTOFF: u8 = 70;

/// Which passes a run performs.
///
/// Setting neither `suppliers_only` nor `parts_only` assesses both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssessmentOptions {
    pub suppliers_only: bool,
    pub parts_only: bool,
    pub generate_recommendations: bool,
    pub dispatch_alerts: bool,
}

impl AssessmentOptions {
    pub fn assess_suppliers(&self) -> bool {
        !self.parts_only
    }

    pub fn assess_parts(&self) -> bool {
        !self.suppliers_only
    }
}

/// Drives assessment runs against a store.
///
/// Collaborators are injected so tests can swap the scorer, sink or clock.
pub struct Orchestrator {
    store: Arc<dyn RiskStore>,
    scorer: Arc<dyn RiskScorer>,
    aggregator: RiskAggregator,
    alerts: AlertLifecycleManager,
    recommender: RecommendationGenerator,
    sink: Arc<dyn NotificationSink>,
    config: Arc<RiskConfig>,
    clock: Arc<dyn Clock>,
    progress: ProgressConfig,
}

/// One pass over a set of entities.
struct Pass {
    phase: AssessmentPhase,
    operation: OperationType,
    template: &'static str,
    message: &'static str,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn RiskStore>,
        scorer: Arc<dyn RiskScorer>,
        alerts: AlertLifecycleManager,
        recommender: RecommendationGenerator,
        config: Arc<RiskConfig>,
    ) -> Result<Self> {
        config.validate()?;
        let aggregator = RiskAggregator::from_config(&config.scoring)?;
        Ok(Self {
            store,
            scorer,
            aggregator,
            alerts,
            recommender,
            sink: Arc::new(LogSink),
            config,
            clock: Arc::new(SystemClock),
            progress: ProgressConfig::hidden(),
        })
    }

    /// Heuristic scorer, log sink and system clock.
    pub fn with_defaults(store: Arc<dyn RiskStore>, config: Arc<RiskConfig>) -> Result<Self> {
        let scorer = Arc::new(HeuristicScorer::new(config.scoring.clone()));
        let recommender = RecommendationGenerator::new(config.recommendations.clone());
        Self::new(store, scorer, AlertLifecycleManager::new(), recommender, config)
    }

    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_progress(mut self, progress: ProgressConfig) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn RiskStore {
        self.store.as_ref()
    }

    /// Run a full assessment.
    ///
    /// Returns `Err` only when the target entities cannot be enumerated.
    pub fn run(&self, options: &AssessmentOptions) -> Result<RunSummary> {
        let started = Instant::now();
        let deadline = self.config.run.timeout().map(|timeout| started + timeout);
        let mut summary = RunSummary::default();

        tracing::info!(?options, "starting assessment run");

        if options.assess_suppliers() {
            let targets = self.supplier_targets()?;
            let pass = Pass {
                phase: AssessmentPhase::SupplierAssessment,
                operation: OperationType::SupplierAssessment,
                template: TEMPLATE_SUPPLIERS,
                message: "Assessing suppliers",
            };
            summary.add_supplier_pass(self.run_pass(&pass, &targets, deadline));
        }

        if options.assess_parts() {
            let targets = self.part_targets()?;
            let pass = Pass {
                phase: AssessmentPhase::PartAssessment,
                operation: OperationType::PartAssessment,
                template: TEMPLATE_PARTS,
                message: "Assessing parts",
            };
            summary.add_part_pass(self.run_pass(&pass, &targets, deadline));
        }

        // targets come from stored part levels, so a supplier-only run can still suggest
        if options.generate_recommendations {
            let targets = self.recommendation_targets()?;
            let pass = Pass {
                phase: AssessmentPhase::RecommendationGeneration,
                operation: OperationType::Recommendation,
                template: TEMPLATE_RECOMMENDATIONS,
                message: "Finding alternative suppliers",
            };
            summary.add_recommendation_pass(self.run_pass(&pass, &targets, deadline));
        }

        if options.dispatch_alerts {
            let _phase = set_phase(AssessmentPhase::AlertDispatch);
            let alerts = self
                .store
                .alerts()
                .map_err(|e| RiskError::enumeration("alerts", &e))?;
            let report = dispatch_alerts(
                self.sink.as_ref(),
                &alerts,
                self.clock.now(),
                self.config.alerts.lookback_hours,
            );
            summary.alerts_dispatched = report.sent;
            summary.errors.extend(report.failed);
        }

        summary.sort_errors();
        summary.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        tracing::info!(
            suppliers = summary.suppliers_assessed,
            parts = summary.parts_assessed,
            errors = summary.errors.len(),
            elapsed_ms = summary.elapsed_ms,
            "assessment run finished"
        );
        Ok(summary)
    }

    fn supplier_targets(&self) -> Result<Vec<EntityRef>> {
        let _phase = set_phase(AssessmentPhase::Enumeration);
        let suppliers = self
            .store
            .suppliers()
            .map_err(|e| RiskError::enumeration("suppliers", &e))?;
        Ok(suppliers
            .into_iter()
            .filter(|supplier| supplier.active)
            .map(|supplier| EntityRef::Supplier(supplier.id))
            .collect())
    }

    fn part_targets(&self) -> Result<Vec<EntityRef>> {
        let _phase = set_phase(AssessmentPhase::Enumeration);
        let parts = self
            .store
            .parts()
            .map_err(|e| RiskError::enumeration("parts", &e))?;
        Ok(parts.into_iter().map(|part| EntityRef::Part(part.id)).collect())
    }

    fn recommendation_targets(&self) -> Result<Vec<EntityRef>> {
        let _phase = set_phase(AssessmentPhase::Enumeration);
        let records = self
            .store
            .part_risks()
            .map_err(|e| RiskError::enumeration("part risk records", &e))?;
        Ok(records
            .iter()
            .filter(|record| RecommendationGenerator::is_eligible(record))
            .map(|record| record.entity())
            .collect())
    }

    fn run_pass(
        &self,
        pass: &Pass,
        targets: &[EntityRef],
        deadline: Option<Instant>,
    ) -> PassTally {
        set_progress(0, targets.len());
        let bar = self.progress.create_bar(targets.len() as u64, pass.template);
        bar.set_message(pass.message);

        let visit = |mut tally: PassTally, entity: &EntityRef| {
            self.visit(pass, *entity, deadline, &mut tally);
            tally
        };

        let tally = match self.build_pool() {
            Some(pool) => pool.install(|| {
                targets
                    .par_iter()
                    .progress_with(bar.clone())
                    .fold(PassTally::default, visit)
                    .reduce(PassTally::default, PassTally::merge)
            }),
            None => targets
                .iter()
                .progress_with(bar.clone())
                .fold(PassTally::default(), visit),
        };

        bar.finish_and_clear();
        tally
    }

    fn build_pool(&self) -> Option<rayon::ThreadPool> {
        if !self.config.parallel.enabled {
            return None;
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.parallel.effective_concurrency())
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                tracing::warn!("Failed to build worker pool, running sequentially: {}", e);
                None
            }
        }
    }

    fn visit(
        &self,
        pass: &Pass,
        entity: EntityRef,
        deadline: Option<Instant>,
        tally: &mut PassTally,
    ) {
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            tally.skipped += 1;
            return;
        }

        let _phase = set_phase(pass.phase);
        let _entity = set_current_entity(entity);

        let outcome = self.with_retry(entity, deadline, || match pass.operation {
            OperationType::Recommendation => self.recommend(entity),
            _ => self.reassess(entity),
        });

        match outcome {
            Ok(outcome) => tally.record(outcome),
            Err(e) => {
                tracing::warn!(%entity, code = %e.code(), "{} failed: {}", pass.operation.as_str(), e);
                tally.failures.push(EntityFailure::new(entity, pass.operation, &e));
            }
        }
        increment_processed();
    }

    /// Run `work` again while the retry policy allows it.
    ///
    /// A retry that would start after the run deadline fails with
    /// [`RiskError::Timeout`] instead.
    fn with_retry<T>(
        &self,
        entity: EntityRef,
        deadline: Option<Instant>,
        mut work: impl FnMut() -> Result<T>,
    ) -> Result<T> {
        let retry = &self.config.retry;
        let mut conflicts = 0;
        let mut transients = 0;
        loop {
            match work() {
                Ok(value) => return Ok(value),
                Err(e) if retry.should_retry(&e, conflicts, transients) => {
                    if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                        tracing::debug!(%entity, "deadline expired before retrying {}", e);
                        return Err(RiskError::Timeout);
                    }
                    if e.is_conflict() {
                        conflicts += 1;
                    } else {
                        transients += 1;
                    }
                    let delay = retry.delay_for_attempt(conflicts + transients);
                    tracing::debug!(%entity, ?delay, "retrying after {}", e);
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Assess a single entity through the same path a run uses.
    pub fn reassess(&self, entity: EntityRef) -> Result<EntityOutcome> {
        match entity {
            EntityRef::Supplier(id) => self.assess_supplier(id),
            EntityRef::Part(id) => self.assess_part(id),
        }
    }

    /// Recompute and persist one supplier's risk record, then reconcile its alert.
    pub fn assess_supplier(&self, id: SupplierId) -> Result<EntityOutcome> {
        let _span = tracing::info_span!("assess_supplier", id = id.get()).entered();
        let now = self.clock.now();
        let today = now.date_naive();

        let history = self.store.supplier_history(id)?;
        let mut record = self
            .store
            .get_or_create_supplier_risk(id, self.config.alerts.default_alert_threshold)?;

        let factors = self.scorer.supplier_factors(&history, today);
        let assessment = self.aggregator.assess_supplier(factors);
        record.apply_assessment(
            &assessment,
            today,
            self.config.alerts.next_assessment_interval_days,
        );
        let record = self.store.save_supplier_risk(&record)?;

        let level = record.risk_level();
        let category = if factors.delivery.value() > DELIVERY_CATEGORY_CUTOFF {
            RiskCategory::Delivery
        } else {
            RiskCategory::Financial
        };
        let name = &history.supplier.name;
        let outcome = self.alerts.reconcile(
            self.store.as_ref(),
            AlertContext {
                entity: record.entity(),
                level,
                category,
                alert_type: SUPPLIER_ALERT_TYPE,
                message: format!(
                    "Supplier {} risk level is {} (overall score {:.2})",
                    name,
                    level,
                    record.overall_risk_score()
                ),
            },
            now,
        )?;

        let event_created =
            self.log_pending_event(outcome.alert, record.is_alert_triggered(), || NewRiskEvent {
                event_date: today,
                title: format!("High supplier risk detected: {}", name),
                description: format!(
                    "Supplier {} has an overall risk score of {:.2}",
                    name,
                    record.overall_risk_score()
                ),
                category,
                severity: level,
                affected_suppliers: BTreeSet::from([id]),
                affected_parts: BTreeSet::new(),
            })?;

        tracing::debug!(overall = record.overall_risk_score(), %level, "supplier assessed");
        Ok(EntityOutcome {
            high_risk: level.is_high(),
            event_created,
            ..Default::default()
        })
    }

    /// Recompute and persist one part's supply-chain risk record, then reconcile its alert.
    pub fn assess_part(&self, id: PartId) -> Result<EntityOutcome> {
        let _span = tracing::info_span!("assess_part", id = id.get()).entered();
        let now = self.clock.now();
        let today = now.date_naive();

        let history = self.store.part_history(id)?;
        let mut record = self.store.get_or_create_part_risk(id)?;

        let stockout = self.scorer.stockout(&history, today);
        let flags = record.flags_with_single_source(history.is_single_source());
        let assessment = self.aggregator.assess_part(flags, stockout);
        record.apply_assessment(&assessment, today);
        let record = self.store.save_part_risk(&record)?;

        let level = record.risk_level();
        let name = &history.part.name;
        let outcome = self.alerts.reconcile(
            self.store.as_ref(),
            AlertContext {
                entity: record.entity(),
                level,
                category: RiskCategory::Supply,
                alert_type: PART_ALERT_TYPE,
                message: format!(
                    "Part {} supply chain risk is {} (combined score {})",
                    name,
                    level,
                    record.combined_risk()
                ),
            },
            now,
        )?;

        let event_created = self.log_pending_event(outcome.alert, true, || NewRiskEvent {
            event_date: today,
            title: format!("High supply chain risk detected: {}", name),
            description: format!("Part {} has been assessed as {} risk", name, level.as_str()),
            category: RiskCategory::Supply,
            severity: level,
            affected_suppliers: history.suppliers.iter().copied().collect(),
            affected_parts: BTreeSet::from([id]),
        })?;

        let below_stock_threshold = history.is_below_stock_threshold();
        if below_stock_threshold {
            tracing::info!(on_hand = history.on_hand(), "part is below its low-stock threshold");
        }

        tracing::debug!(combined = record.combined_risk(), %level, "part assessed");
        Ok(EntityOutcome {
            high_risk: level.is_high(),
            event_created,
            below_stock_threshold,
            ..Default::default()
        })
    }

    /// Log the risk event an open alert still owes, then clear its pending flag.
    ///
    /// The flag is written together with the alert transition, so a retry
    /// after a failed insert finds it set and logs the event then.
    fn log_pending_event(
        &self,
        alert: Option<AlertRecord>,
        triggered: bool,
        event: impl FnOnce() -> NewRiskEvent,
    ) -> Result<bool> {
        let Some(mut alert) = alert.filter(|alert| alert.is_open() && alert.event_pending) else {
            return Ok(false);
        };
        let logged = if triggered {
            Some(self.store.insert_event(event())?.id)
        } else {
            None
        };
        alert.record_event(logged);
        self.store.update_alert(&alert)?;
        Ok(logged.is_some())
    }

    fn recommend(&self, entity: EntityRef) -> Result<EntityOutcome> {
        let EntityRef::Part(id) = entity else {
            return Ok(EntityOutcome::default());
        };
        let _span = tracing::info_span!("recommend_alternatives", id = id.get()).entered();
        let history = self.store.part_history(id)?;
        let record = self.store.get_or_create_part_risk(id)?;
        let created = self
            .recommender
            .generate(self.store.as_ref(), &record, &history)?;
        Ok(EntityOutcome {
            recommendations: created.len(),
            ..Default::default()
        })
    }

    pub fn resolve_alert(&self, id: AlertId, resolver: Option<String>) -> Result<AlertRecord> {
        self.alerts
            .resolve_alert(self.store.as_ref(), id, resolver, self.clock.now())
    }

    /// Mark a recommendation reviewed; the review date is today.
    pub fn review_recommendation(
        &self,
        id: RecommendationId,
        notes: &str,
    ) -> Result<RecommendationRecord> {
        let mut recommendation = self.store.recommendation(id)?;
        recommendation.mark_reviewed(notes, self.clock.today());
        self.store.update_recommendation(&recommendation)?;
        Ok(recommendation)
    }

    pub fn resolve_event(&self, id: EventId, notes: &str) -> Result<RiskEventRecord> {
        self.store.resolve_event(id, notes, self.clock.today())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ParallelConfig, RetryConfig};
    use crate::core::{FixedClock, RiskLevel};
    use crate::testkit::{FaultyStore, StoreBuilder};
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn config() -> RiskConfig {
        RiskConfig {
            parallel: ParallelConfig::with_workers(2),
            retry: RetryConfig::immediate(),
            ..Default::default()
        }
    }

    fn orchestrator(store: Arc<dyn RiskStore>) -> Orchestrator {
        Orchestrator::with_defaults(store, Arc::new(config()))
            .unwrap()
            .with_clock(Arc::new(FixedClock::at_date(today())))
    }

    #[test]
    fn test_options_default_runs_both_passes() {
        let options = AssessmentOptions::default();
        assert!(options.assess_suppliers());
        assert!(options.assess_parts());

        let suppliers_only = AssessmentOptions {
            suppliers_only: true,
            ..Default::default()
        };
        assert!(suppliers_only.assess_suppliers());
        assert!(!suppliers_only.assess_parts());
    }

    #[test]
    fn test_single_source_part_raises_alert_and_event() {
        let store = Arc::new(
            StoreBuilder::new(today())
                .supplier(1, "Acme Castings", Some("DE"))
                .part(10, "Gearbox housing", Some(1))
                .supplies(1, 10)
                .long_lead_time(10)
                .build(),
        );
        let summary = orchestrator(store.clone())
            .run(&AssessmentOptions {
                parts_only: true,
                ..Default::default()
            })
            .unwrap();

        // (single source 30 + long lead 25 + empty stock 100) / 2 = 77
        assert_eq!(summary.parts_assessed, 1);
        assert_eq!(summary.parts_high_risk, 1);
        assert_eq!(summary.risk_events_created, 1);
        let record = store.get_or_create_part_risk(PartId(10)).unwrap();
        assert_eq!(record.combined_risk(), 77);
        assert_eq!(record.risk_level(), RiskLevel::High);
        assert!(store.open_alert(EntityRef::Part(PartId(10))).unwrap().is_some());
    }

    #[test]
    fn test_missing_entity_is_recorded_and_run_continues() {
        let base = StoreBuilder::new(today())
            .supplier(1, "Acme Castings", Some("DE"))
            .supplier(2, "Borealis Metals", Some("SE"))
            .supplier(3, "Cobalt Fasteners", Some("US"))
            .build();
        let store = Arc::new(FaultyStore::new(base).missing(EntityRef::Supplier(SupplierId(2))));

        let summary = orchestrator(store)
            .run(&AssessmentOptions {
                suppliers_only: true,
                ..Default::default()
            })
            .unwrap();

        assert_eq!(summary.suppliers_assessed, 2);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].entity, EntityRef::Supplier(SupplierId(2)));
        assert_eq!(summary.errors[0].kind, "not_found");
    }

    #[test]
    fn test_transient_failure_is_retried_once() {
        let base = StoreBuilder::new(today())
            .supplier(1, "Acme Castings", Some("DE"))
            .build();
        let store =
            Arc::new(FaultyStore::new(base).transient_once(EntityRef::Supplier(SupplierId(1))));

        let summary = orchestrator(store)
            .run(&AssessmentOptions {
                suppliers_only: true,
                ..Default::default()
            })
            .unwrap();

        assert_eq!(summary.suppliers_assessed, 1);
        assert!(summary.errors.is_empty());
    }

    #[test]
    fn test_expired_deadline_skips_everything() {
        let store = Arc::new(
            StoreBuilder::new(today())
                .supplier(1, "Acme Castings", Some("DE"))
                .part(10, "Gearbox housing", None)
                .build(),
        );
        let mut config = config();
        config.run.timeout_seconds = Some(0);
        let orchestrator = Orchestrator::with_defaults(store, Arc::new(config)).unwrap();

        let summary = orchestrator.run(&AssessmentOptions::default()).unwrap();
        assert_eq!(summary.suppliers_assessed, 0);
        assert_eq!(summary.parts_assessed, 0);
        assert_eq!(summary.skipped_by_timeout, 2);
    }

    #[test]
    fn test_review_recommendation_stamps_today() {
        let store = Arc::new(
            StoreBuilder::new(today())
                .supplier(1, "Acme Castings", Some("DE"))
                .supplier(2, "Borealis Metals", Some("SE"))
                .category(5, "Castings")
                .part(10, "Gearbox housing", Some(5))
                .part(11, "Pump housing", Some(5))
                .supplies(1, 10)
                .supplies(2, 11)
                .long_lead_time(10)
                .build(),
        );
        let orchestrator = orchestrator(store.clone());
        let summary = orchestrator
            .run(&AssessmentOptions {
                parts_only: true,
                generate_recommendations: true,
                ..Default::default()
            })
            .unwrap();
        // both parts are single-sourced and HIGH, each gets the other's supplier
        assert_eq!(summary.recommendations_generated, 2);

        let id = store.recommendations_for_part(PartId(10)).unwrap()[0].id;
        let reviewed = orchestrator.review_recommendation(id, "call them").unwrap();
        assert!(reviewed.reviewed);
        assert_eq!(reviewed.review_date, Some(today()));
    }

    #[test]
    fn test_supplier_only_run_recommends_from_stored_part_levels() {
        let store = Arc::new(
            StoreBuilder::new(today())
                .supplier(1, "Acme Castings", Some("DE"))
                .supplier(2, "Borealis Metals", Some("SE"))
                .category(5, "Castings")
                .part(10, "Gearbox housing", Some(5))
                .part(11, "Pump housing", Some(5))
                .supplies(1, 10)
                .supplies(2, 11)
                .long_lead_time(10)
                .build(),
        );
        let orchestrator = orchestrator(store.clone());
        orchestrator
            .run(&AssessmentOptions {
                parts_only: true,
                ..Default::default()
            })
            .unwrap();
        assert!(store.recommendations_for_part(PartId(10)).unwrap().is_empty());

        let summary = orchestrator
            .run(&AssessmentOptions {
                suppliers_only: true,
                generate_recommendations: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(summary.parts_assessed, 0);
        assert_eq!(summary.recommendations_generated, 2);
    }
}
