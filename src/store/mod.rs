//! Persistence boundary of the engine.
//!
//! The engine reads inventory entities and writes assessment records through
//! [`RiskStore`]. Implementations must enforce three constraints regardless
//! of caller behaviour:
//!
//! - one risk record per supplier and per part (get-or-create)
//! - at most one unresolved alert per entity
//! - at most one recommendation per (part, suggested supplier)
//!
//! Risk record saves are optimistic: a save whose `version` differs from the
//! stored version fails with [`RiskError::Conflict`](crate::errors::RiskError::Conflict).

mod memory;
mod snapshot;

pub use memory::InMemoryStore;
pub use snapshot::{load_snapshot, save_snapshot, Snapshot};

use crate::core::{
    AlertId, AlertRecord, EntityRef, EventId, NewAlert, NewRecommendation, NewRiskEvent, Part,
    PartHistory, PartId, PartSupplyChainRiskRecord, RecommendationId, RecommendationRecord,
    RiskEventRecord, Supplier, SupplierHistory, SupplierId, SupplierPart, SupplierRiskRecord,
};
use crate::errors::Result;
use chrono::NaiveDate;

pub trait RiskStore: Send + Sync {
    // Inventory entities

    fn suppliers(&self) -> Result<Vec<Supplier>>;

    fn parts(&self) -> Result<Vec<Part>>;

    fn supplier_history(&self, id: SupplierId) -> Result<SupplierHistory>;

    fn part_history(&self, id: PartId) -> Result<PartHistory>;

    /// Offerings by active suppliers of every part in the category.
    fn category_offerings(&self, category_id: u64) -> Result<Vec<SupplierPart>>;

    fn set_part_stock_threshold(&self, id: PartId, threshold: Option<u32>) -> Result<()>;

    // Risk records

    /// The supplier's record, creating it with `default_threshold` if absent.
    fn get_or_create_supplier_risk(
        &self,
        id: SupplierId,
        default_threshold: u8,
    ) -> Result<SupplierRiskRecord>;

    /// Validate and persist, returning the record with its new version.
    fn save_supplier_risk(&self, record: &SupplierRiskRecord) -> Result<SupplierRiskRecord>;

    fn supplier_risks(&self) -> Result<Vec<SupplierRiskRecord>>;

    fn get_or_create_part_risk(&self, id: PartId) -> Result<PartSupplyChainRiskRecord>;

    fn save_part_risk(&self, record: &PartSupplyChainRiskRecord)
        -> Result<PartSupplyChainRiskRecord>;

    fn part_risks(&self) -> Result<Vec<PartSupplyChainRiskRecord>>;

    // Alerts

    fn open_alert(&self, entity: EntityRef) -> Result<Option<AlertRecord>>;

    /// Fails with `UniqueViolation` if the entity already has an open alert.
    fn insert_alert(&self, alert: NewAlert) -> Result<AlertRecord>;

    fn update_alert(&self, alert: &AlertRecord) -> Result<()>;

    fn alert(&self, id: AlertId) -> Result<AlertRecord>;

    fn alerts(&self) -> Result<Vec<AlertRecord>>;

    // Recommendations

    fn recommendations_for_part(&self, part: PartId) -> Result<Vec<RecommendationRecord>>;

    /// Fails with `UniqueViolation` if (part, suggested supplier) exists.
    fn insert_recommendation(&self, recommendation: NewRecommendation)
        -> Result<RecommendationRecord>;

    fn update_recommendation(&self, recommendation: &RecommendationRecord) -> Result<()>;

    fn recommendation(&self, id: RecommendationId) -> Result<RecommendationRecord>;

    fn recommendations(&self) -> Result<Vec<RecommendationRecord>>;

    // Risk events

    fn insert_event(&self, event: NewRiskEvent) -> Result<RiskEventRecord>;

    fn resolve_event(&self, id: EventId, notes: &str, on: NaiveDate) -> Result<RiskEventRecord>;

    fn events(&self) -> Result<Vec<RiskEventRecord>>;
}
