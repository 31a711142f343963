//! A store wrapper that injects failures for chosen entities.

use crate::core::{
    AlertId, AlertRecord, EntityRef, EventId, NewAlert, NewRecommendation, NewRiskEvent, Part,
    PartHistory, PartId, PartSupplyChainRiskRecord, RecommendationId, RecommendationRecord,
    RiskEventRecord, Supplier, SupplierHistory, SupplierId, SupplierPart, SupplierRiskRecord,
};
use crate::errors::{Result, RiskError};
use crate::store::{InMemoryStore, RiskStore};
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::collections::BTreeSet;

/// Delegates to an [`InMemoryStore`], failing on request.
///
/// - `missing`: history reads and get-or-create report `NotFound`
/// - `transient_once`: the next history read reports `TransientStore`
/// - `conflict_once`: the next save races a concurrent writer
/// - `failing_enumeration`: listing suppliers and parts fails
/// - `failing_event_once`: the next risk event insert reports `TransientStore`
#[derive(Debug, Default)]
pub struct FaultyStore {
    inner: InMemoryStore,
    missing: BTreeSet<EntityRef>,
    transient: Mutex<BTreeSet<EntityRef>>,
    conflict: Mutex<BTreeSet<EntityRef>>,
    fail_enumeration: bool,
    fail_event: Mutex<bool>,
}

impl FaultyStore {
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    pub fn missing(mut self, entity: impl Into<EntityRef>) -> Self {
        self.missing.insert(entity.into());
        self
    }

    pub fn transient_once(self, entity: impl Into<EntityRef>) -> Self {
        self.transient.lock().insert(entity.into());
        self
    }

    pub fn conflict_once(self, entity: impl Into<EntityRef>) -> Self {
        self.conflict.lock().insert(entity.into());
        self
    }

    pub fn failing_enumeration(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }

    pub fn failing_event_once(self) -> Self {
        *self.fail_event.lock() = true;
        self
    }

    fn check_read(&self, entity: EntityRef) -> Result<()> {
        if self.missing.contains(&entity) {
            return Err(RiskError::not_found(entity));
        }
        if self.transient.lock().remove(&entity) {
            return Err(RiskError::transient(format!("injected failure reading {entity}")));
        }
        Ok(())
    }

    fn check_enumeration(&self, target: &str) -> Result<()> {
        if self.fail_enumeration {
            return Err(RiskError::transient(format!("cannot list {target}")));
        }
        Ok(())
    }
}

impl RiskStore for FaultyStore {
    fn suppliers(&self) -> Result<Vec<Supplier>> {
        self.check_enumeration("suppliers")?;
        self.inner.suppliers()
    }

    fn parts(&self) -> Result<Vec<Part>> {
        self.check_enumeration("parts")?;
        self.inner.parts()
    }

    fn supplier_history(&self, id: SupplierId) -> Result<SupplierHistory> {
        self.check_read(id.into())?;
        self.inner.supplier_history(id)
    }

    fn part_history(&self, id: PartId) -> Result<PartHistory> {
        self.check_read(id.into())?;
        self.inner.part_history(id)
    }

    fn category_offerings(&self, category_id: u64) -> Result<Vec<SupplierPart>> {
        self.inner.category_offerings(category_id)
    }

    fn set_part_stock_threshold(&self, id: PartId, threshold: Option<u32>) -> Result<()> {
        self.inner.set_part_stock_threshold(id, threshold)
    }

    fn get_or_create_supplier_risk(
        &self,
        id: SupplierId,
        default_threshold: u8,
    ) -> Result<SupplierRiskRecord> {
        if self.missing.contains(&EntityRef::Supplier(id)) {
            return Err(RiskError::not_found(id));
        }
        self.inner.get_or_create_supplier_risk(id, default_threshold)
    }

    fn save_supplier_risk(&self, record: &SupplierRiskRecord) -> Result<SupplierRiskRecord> {
        if self.conflict.lock().remove(&record.entity()) {
            self.inner.bump_supplier_risk_version(record.supplier);
        }
        self.inner.save_supplier_risk(record)
    }

    fn supplier_risks(&self) -> Result<Vec<SupplierRiskRecord>> {
        self.inner.supplier_risks()
    }

    fn get_or_create_part_risk(&self, id: PartId) -> Result<PartSupplyChainRiskRecord> {
        if self.missing.contains(&EntityRef::Part(id)) {
            return Err(RiskError::not_found(id));
        }
        self.inner.get_or_create_part_risk(id)
    }

    fn save_part_risk(&self, record: &PartSupplyChainRiskRecord) -> Result<PartSupplyChainRiskRecord> {
        if self.conflict.lock().remove(&record.entity()) {
            self.inner.bump_part_risk_version(record.part);
        }
        self.inner.save_part_risk(record)
    }

    fn part_risks(&self) -> Result<Vec<PartSupplyChainRiskRecord>> {
        self.inner.part_risks()
    }

    fn open_alert(&self, entity: EntityRef) -> Result<Option<AlertRecord>> {
        self.inner.open_alert(entity)
    }

    fn insert_alert(&self, alert: NewAlert) -> Result<AlertRecord> {
        self.inner.insert_alert(alert)
    }

    fn update_alert(&self, alert: &AlertRecord) -> Result<()> {
        self.inner.update_alert(alert)
    }

    fn alert(&self, id: AlertId) -> Result<AlertRecord> {
        self.inner.alert(id)
    }

    fn alerts(&self) -> Result<Vec<AlertRecord>> {
        self.inner.alerts()
    }

    fn recommendations_for_part(&self, part: PartId) -> Result<Vec<RecommendationRecord>> {
        self.inner.recommendations_for_part(part)
    }

    fn insert_recommendation(&self, recommendation: NewRecommendation) -> Result<RecommendationRecord> {
        self.inner.insert_recommendation(recommendation)
    }

    fn update_recommendation(&self, recommendation: &RecommendationRecord) -> Result<()> {
        self.inner.update_recommendation(recommendation)
    }

    fn recommendation(&self, id: RecommendationId) -> Result<RecommendationRecord> {
        self.inner.recommendation(id)
    }

    fn recommendations(&self) -> Result<Vec<RecommendationRecord>> {
        self.inner.recommendations()
    }

    fn insert_event(&self, event: NewRiskEvent) -> Result<RiskEventRecord> {
        if std::mem::take(&mut *self.fail_event.lock()) {
            return Err(RiskError::transient(format!("injected failure logging {:?}", event.title)));
        }
        self.inner.insert_event(event)
    }

    fn resolve_event(&self, id: EventId, notes: &str, on: NaiveDate) -> Result<RiskEventRecord> {
        self.inner.resolve_event(id, notes, on)
    }

    fn events(&self) -> Result<Vec<RiskEventRecord>> {
        self.inner.events()
    }
}
