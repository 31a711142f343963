//! Assessment results owned by the engine.
//!
//! Risk records hold their derived values (overall score, level) in private
//! fields that are only written together with the inputs they derive from.
//! Every record carries a `version` used by the store for optimistic
//! concurrency: a save succeeds only if the stored version still equals the
//! version the writer read.

use super::types::{
    AlertId, EntityRef, EventId, PartId, RecommendationId, RiskCategory, RiskLevel, SupplierId,
};
use crate::errors::RiskError;
use crate::scoring::{FactorScore, PartAssessment, PartRiskFlags, SupplierAssessment, SupplierFactors};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_ALERT_THRESHOLD: u8 = 70;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierRiskRecord {
    pub supplier: SupplierId,
    financial_risk_score: FactorScore,
    delivery_risk_score: FactorScore,
    quality_risk_score: FactorScore,
    geographical_risk_score: FactorScore,
    overall_risk_score: f64,
    risk_level: RiskLevel,
    alert_threshold: u8,
    #[serde(default)]
    pub last_assessment_date: Option<NaiveDate>,
    #[serde(default)]
    pub next_assessment_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub version: u64,
}

impl SupplierRiskRecord {
    pub fn new(supplier: SupplierId, alert_threshold: u8) -> Self {
        Self {
            supplier,
            financial_risk_score: FactorScore::MIN,
            delivery_risk_score: FactorScore::MIN,
            quality_risk_score: FactorScore::MIN,
            geographical_risk_score: FactorScore::MIN,
            overall_risk_score: 0.0,
            risk_level: RiskLevel::Low,
            alert_threshold,
            last_assessment_date: None,
            next_assessment_date: None,
            notes: String::new(),
            version: 0,
        }
    }

    pub fn entity(&self) -> EntityRef {
        EntityRef::Supplier(self.supplier)
    }

    pub fn factors(&self) -> SupplierFactors {
        SupplierFactors {
            financial: self.financial_risk_score,
            delivery: self.delivery_risk_score,
            quality: self.quality_risk_score,
            geographical: self.geographical_risk_score,
        }
    }

    pub fn overall_risk_score(&self) -> f64 {
        self.overall_risk_score
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn alert_threshold(&self) -> u8 {
        self.alert_threshold
    }

    /// Whether the overall score reaches this supplier's alert threshold.
    pub fn is_alert_triggered(&self) -> bool {
        self.overall_risk_score >= f64::from(self.alert_threshold)
    }

    pub fn set_alert_threshold(&mut self, threshold: i64) -> Result<(), RiskError> {
        self.alert_threshold = validate_percentage("alert_threshold", threshold)?;
        Ok(())
    }

    /// Store a fresh assessment and stamp the schedule.
    ///
    /// `next_assessment_date` is moved to `today + interval_days` when it
    /// is unset or already in the past.
    pub fn apply_assessment(
        &mut self,
        assessment: &SupplierAssessment,
        today: NaiveDate,
        interval_days: u32,
    ) {
        let factors = assessment.factors();
        self.financial_risk_score = factors.financial;
        self.delivery_risk_score = factors.delivery;
        self.quality_risk_score = factors.quality;
        self.geographical_risk_score = factors.geographical;
        self.overall_risk_score = assessment.overall();
        self.risk_level = assessment.level();
        self.last_assessment_date = Some(today);
        if self.next_assessment_date.is_none_or(|next| next < today) {
            self.next_assessment_date =
                Some(today + chrono::Duration::days(i64::from(interval_days)));
        }
    }

    /// Checks applied by the store on every save.
    pub fn validate(&self) -> Result<(), RiskError> {
        validate_percentage("alert_threshold", i64::from(self.alert_threshold))?;
        if !(0.0..=100.0).contains(&self.overall_risk_score) {
            return Err(RiskError::validation(
                "overall_risk_score",
                format!("{} is outside the allowed range [0, 100]", self.overall_risk_score),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartSupplyChainRiskRecord {
    pub part: PartId,
    single_source_risk: bool,
    /// Set by planners, not by the assessment.
    #[serde(default)]
    pub long_lead_time_risk: bool,
    /// Set by planners, not by the assessment.
    #[serde(default)]
    pub high_value_risk: bool,
    stockout_risk_score: FactorScore,
    combined_risk: u8,
    risk_level: RiskLevel,
    #[serde(default)]
    pub last_assessment_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub version: u64,
}

impl PartSupplyChainRiskRecord {
    pub fn new(part: PartId) -> Self {
        Self {
            part,
            single_source_risk: false,
            long_lead_time_risk: false,
            high_value_risk: false,
            stockout_risk_score: FactorScore::MIN,
            combined_risk: 0,
            risk_level: RiskLevel::Low,
            last_assessment_date: None,
            notes: String::new(),
            version: 0,
        }
    }

    pub fn entity(&self) -> EntityRef {
        EntityRef::Part(self.part)
    }

    pub fn single_source_risk(&self) -> bool {
        self.single_source_risk
    }

    pub fn stockout_risk_score(&self) -> FactorScore {
        self.stockout_risk_score
    }

    pub fn combined_risk(&self) -> u8 {
        self.combined_risk
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    /// Flags as input to the next assessment, with the given single-source state.
    pub fn flags_with_single_source(&self, single_source: bool) -> PartRiskFlags {
        PartRiskFlags {
            single_source,
            long_lead_time: self.long_lead_time_risk,
            high_value: self.high_value_risk,
        }
    }

    pub fn apply_assessment(&mut self, assessment: &PartAssessment, today: NaiveDate) {
        let flags = assessment.flags();
        self.single_source_risk = flags.single_source;
        self.long_lead_time_risk = flags.long_lead_time;
        self.high_value_risk = flags.high_value;
        self.stockout_risk_score = assessment.stockout();
        self.combined_risk = assessment.combined();
        self.risk_level = assessment.level();
        self.last_assessment_date = Some(today);
    }

    pub fn validate(&self) -> Result<(), RiskError> {
        validate_percentage("combined_risk", i64::from(self.combined_risk))?;
        Ok(())
    }
}

fn validate_percentage(field: &str, value: i64) -> Result<u8, RiskError> {
    if (0..=100).contains(&value) {
        Ok(value as u8)
    } else {
        Err(RiskError::out_of_range(field, value, 0, 100))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: AlertId,
    pub entity: EntityRef,
    pub risk_level: RiskLevel,
    pub alert_type: String,
    pub category: RiskCategory,
    pub message: String,
    #[serde(default)]
    pub resolved: bool,
    pub alert_date: DateTime<Utc>,
    #[serde(default)]
    pub escalated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolved_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolved_by: Option<String>,
    /// Set when the alert opened or escalated at HIGH or above and the
    /// matching risk event has not been logged yet.
    #[serde(default)]
    pub event_pending: bool,
    #[serde(default)]
    pub risk_event: Option<EventId>,
}

impl AlertRecord {
    pub fn from_new(id: AlertId, alert: NewAlert) -> Self {
        Self {
            id,
            entity: alert.entity,
            risk_level: alert.risk_level,
            alert_type: alert.alert_type,
            category: alert.category,
            message: alert.message,
            resolved: false,
            alert_date: alert.alert_date,
            escalated_at: None,
            resolved_date: None,
            resolved_by: None,
            event_pending: alert.event_pending,
            risk_event: None,
        }
    }

    pub fn is_open(&self) -> bool {
        !self.resolved
    }

    /// Creation or latest escalation, whichever is later.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.escalated_at.unwrap_or(self.alert_date)
    }

    pub fn escalate(&mut self, level: RiskLevel, message: String, at: DateTime<Utc>) {
        self.risk_level = level;
        self.message = message;
        self.escalated_at = Some(at);
    }

    pub fn resolve(&mut self, at: DateTime<Utc>, resolver: Option<String>) {
        self.resolved = true;
        self.resolved_date = Some(at);
        self.resolved_by = resolver;
    }

    /// Close out a pending event; `None` when the condition did not call for one.
    pub fn record_event(&mut self, event: Option<EventId>) {
        self.event_pending = false;
        if event.is_some() {
            self.risk_event = event;
        }
    }
}

/// Alert to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlert {
    pub entity: EntityRef,
    pub risk_level: RiskLevel,
    pub alert_type: String,
    pub category: RiskCategory,
    pub message: String,
    pub alert_date: DateTime<Utc>,
    pub event_pending: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub id: RecommendationId,
    pub part: PartId,
    /// Current supplier the suggestion is an alternative to, when known.
    #[serde(default)]
    pub primary_supplier: Option<SupplierId>,
    pub suggested_supplier: SupplierId,
    pub similarity_score: u8,
    pub reason: String,
    #[serde(default)]
    pub reviewed: bool,
    #[serde(default)]
    pub review_date: Option<NaiveDate>,
    #[serde(default)]
    pub review_notes: String,
}

impl RecommendationRecord {
    pub fn from_new(id: RecommendationId, recommendation: NewRecommendation) -> Self {
        Self {
            id,
            part: recommendation.part,
            primary_supplier: recommendation.primary_supplier,
            suggested_supplier: recommendation.suggested_supplier,
            similarity_score: recommendation.similarity_score,
            reason: recommendation.reason,
            reviewed: false,
            review_date: None,
            review_notes: String::new(),
        }
    }

    pub fn mark_reviewed(&mut self, notes: impl Into<String>, on: NaiveDate) {
        self.reviewed = true;
        self.review_date = Some(on);
        self.review_notes = notes.into();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRecommendation {
    pub part: PartId,
    pub primary_supplier: Option<SupplierId>,
    pub suggested_supplier: SupplierId,
    pub similarity_score: u8,
    pub reason: String,
}

impl NewRecommendation {
    pub fn validate(&self) -> Result<(), RiskError> {
        validate_percentage("similarity_score", i64::from(self.similarity_score))?;
        Ok(())
    }
}

/// Log entry for a notable risk condition.
///
/// Only the resolution fields may change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEventRecord {
    pub id: EventId,
    pub event_date: NaiveDate,
    pub title: String,
    pub description: String,
    pub category: RiskCategory,
    pub severity: RiskLevel,
    #[serde(default)]
    pub affected_suppliers: BTreeSet<SupplierId>,
    #[serde(default)]
    pub affected_parts: BTreeSet<PartId>,
    #[serde(default)]
    resolved: bool,
    #[serde(default)]
    resolution_date: Option<NaiveDate>,
    #[serde(default)]
    resolution_notes: String,
}

impl RiskEventRecord {
    pub fn from_new(id: EventId, event: NewRiskEvent) -> Self {
        Self {
            id,
            event_date: event.event_date,
            title: event.title,
            description: event.description,
            category: event.category,
            severity: event.severity,
            affected_suppliers: event.affected_suppliers,
            affected_parts: event.affected_parts,
            resolved: false,
            resolution_date: None,
            resolution_notes: String::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn resolution_date(&self) -> Option<NaiveDate> {
        self.resolution_date
    }

    pub fn resolution_notes(&self) -> &str {
        &self.resolution_notes
    }

    /// Mark resolved; the date is stamped only on the first resolution.
    pub fn mark_resolved(&mut self, notes: impl Into<String>, on: NaiveDate) {
        if !self.resolved {
            self.resolved = true;
            self.resolution_date = Some(on);
        }
        self.resolution_notes = notes.into();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRiskEvent {
    pub event_date: NaiveDate,
    pub title: String,
    pub description: String,
    pub category: RiskCategory,
    pub severity: RiskLevel,
    pub affected_suppliers: BTreeSet<SupplierId>,
    pub affected_parts: BTreeSet<PartId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::RiskAggregator;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn neutral_factors() -> SupplierFactors {
        SupplierFactors {
            financial: FactorScore::NEUTRAL,
            delivery: FactorScore::NEUTRAL,
            quality: FactorScore::NEUTRAL,
            geographical: FactorScore::new(10).unwrap(),
        }
    }

    #[test]
    fn test_apply_assessment_sets_derived_fields_and_schedule() {
        let assessment = RiskAggregator::default().assess_supplier(neutral_factors());
        let mut record = SupplierRiskRecord::new(SupplierId(1), DEFAULT_ALERT_THRESHOLD);

        record.apply_assessment(&assessment, date(2026, 4, 1), 90);

        assert_eq!(record.overall_risk_score(), 46.0);
        assert_eq!(record.risk_level(), RiskLevel::Medium);
        assert_eq!(record.last_assessment_date, Some(date(2026, 4, 1)));
        assert_eq!(record.next_assessment_date, Some(date(2026, 6, 30)));
        assert!(!record.is_alert_triggered());
    }

    #[test]
    fn test_future_next_assessment_is_kept() {
        let assessment = RiskAggregator::default().assess_supplier(neutral_factors());
        let mut record = SupplierRiskRecord::new(SupplierId(1), DEFAULT_ALERT_THRESHOLD);
        record.next_assessment_date = Some(date(2026, 5, 1));

        record.apply_assessment(&assessment, date(2026, 4, 1), 90);
        assert_eq!(record.next_assessment_date, Some(date(2026, 5, 1)));

        record.apply_assessment(&assessment, date(2026, 5, 2), 90);
        assert_eq!(record.next_assessment_date, Some(date(2026, 7, 31)));
    }

    #[test]
    fn test_alert_threshold_range() {
        let mut record = SupplierRiskRecord::new(SupplierId(1), DEFAULT_ALERT_THRESHOLD);
        let err = record.set_alert_threshold(150).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid alert_threshold: 150 is outside the allowed range [0, 100]"
        );
        assert_eq!(record.alert_threshold(), 70);

        record.set_alert_threshold(0).unwrap();
        assert_eq!(record.alert_threshold(), 0);
    }

    #[test]
    fn test_event_resolution_date_stamped_once() {
        let mut event = RiskEventRecord::from_new(
            EventId(1),
            NewRiskEvent {
                event_date: date(2026, 1, 1),
                title: "Late deliveries".into(),
                description: String::new(),
                category: RiskCategory::Delivery,
                severity: RiskLevel::High,
                affected_suppliers: BTreeSet::from([SupplierId(3)]),
                affected_parts: BTreeSet::new(),
            },
        );
        assert!(!event.is_resolved());

        event.mark_resolved("new carrier", date(2026, 2, 1));
        event.mark_resolved("new carrier, confirmed", date(2026, 2, 9));

        assert!(event.is_resolved());
        assert_eq!(event.resolution_date(), Some(date(2026, 2, 1)));
        assert_eq!(event.resolution_notes(), "new carrier, confirmed");
    }

    #[test]
    fn test_alert_last_activity_tracks_escalation() {
        let created = date(2026, 1, 1).and_hms_opt(8, 0, 0).unwrap().and_utc();
        let escalated = date(2026, 1, 3).and_hms_opt(8, 0, 0).unwrap().and_utc();
        let mut alert = AlertRecord::from_new(
            AlertId(1),
            NewAlert {
                entity: EntityRef::Part(PartId(1)),
                risk_level: RiskLevel::Medium,
                alert_type: "supply_chain_risk".into(),
                category: RiskCategory::Supply,
                message: "medium".into(),
                alert_date: created,
                event_pending: false,
            },
        );
        assert_eq!(alert.last_activity(), created);

        alert.escalate(RiskLevel::High, "high".into(), escalated);
        assert_eq!(alert.last_activity(), escalated);
        assert_eq!(alert.risk_level, RiskLevel::High);
    }
}
