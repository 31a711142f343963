use super::snapshot::Snapshot;
use super::RiskStore;
use crate::core::{
    AlertId, AlertRecord, EntityRef, EventId, NewAlert, NewRecommendation, NewRiskEvent, Part,
    PartHistory, PartId, PartSupplyChainRiskRecord, PurchaseOrderLine, RecommendationId,
    RecommendationRecord, RiskEventRecord, StockItem, Supplier, SupplierHistory, SupplierId,
    SupplierPart, SupplierRiskRecord,
};
use crate::errors::{Result, RiskError};
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct StoreData {
    suppliers: BTreeMap<SupplierId, Supplier>,
    parts: BTreeMap<PartId, Part>,
    supplier_parts: Vec<SupplierPart>,
    order_lines: Vec<PurchaseOrderLine>,
    stock_items: Vec<StockItem>,
    supplier_risks: BTreeMap<SupplierId, SupplierRiskRecord>,
    part_risks: BTreeMap<PartId, PartSupplyChainRiskRecord>,
    alerts: BTreeMap<AlertId, AlertRecord>,
    recommendations: BTreeMap<RecommendationId, RecommendationRecord>,
    events: BTreeMap<EventId, RiskEventRecord>,
}

impl StoreData {
    fn next_alert_id(&self) -> AlertId {
        AlertId(self.alerts.keys().next_back().map_or(1, |id| id.get() + 1))
    }

    fn next_recommendation_id(&self) -> RecommendationId {
        RecommendationId(
            self.recommendations
                .keys()
                .next_back()
                .map_or(1, |id| id.get() + 1),
        )
    }

    fn next_event_id(&self) -> EventId {
        EventId(self.events.keys().next_back().map_or(1, |id| id.get() + 1))
    }

    fn is_active(&self, id: SupplierId) -> bool {
        self.suppliers.get(&id).is_some_and(|supplier| supplier.active)
    }

    fn open_alert_for(&self, entity: EntityRef) -> Option<&AlertRecord> {
        self.alerts
            .values()
            .find(|alert| alert.entity == entity && alert.is_open())
    }
}

/// Thread-safe store held entirely in memory.
///
/// Used directly by tests and, via [`Snapshot`], as the CLI's file-backed
/// store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<StoreData>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let data = StoreData {
            suppliers: snapshot.suppliers.into_iter().map(|s| (s.id, s)).collect(),
            parts: snapshot.parts.into_iter().map(|p| (p.id, p)).collect(),
            supplier_parts: snapshot.supplier_parts,
            order_lines: snapshot.order_lines,
            stock_items: snapshot.stock_items,
            supplier_risks: snapshot
                .supplier_risks
                .into_iter()
                .map(|r| (r.supplier, r))
                .collect(),
            part_risks: snapshot.part_risks.into_iter().map(|r| (r.part, r)).collect(),
            alerts: snapshot.alerts.into_iter().map(|a| (a.id, a)).collect(),
            recommendations: snapshot
                .recommendations
                .into_iter()
                .map(|r| (r.id, r))
                .collect(),
            events: snapshot.events.into_iter().map(|e| (e.id, e)).collect(),
        };
        Self {
            data: RwLock::new(data),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let data = self.data.read();
        Snapshot {
            suppliers: data.suppliers.values().cloned().collect(),
            parts: data.parts.values().cloned().collect(),
            supplier_parts: data.supplier_parts.clone(),
            order_lines: data.order_lines.clone(),
            stock_items: data.stock_items.clone(),
            supplier_risks: data.supplier_risks.values().cloned().collect(),
            part_risks: data.part_risks.values().cloned().collect(),
            alerts: data.alerts.values().cloned().collect(),
            recommendations: data.recommendations.values().cloned().collect(),
            events: data.events.values().cloned().collect(),
        }
    }

    pub fn add_supplier(&self, supplier: Supplier) {
        self.data.write().suppliers.insert(supplier.id, supplier);
    }

    pub fn add_part(&self, part: Part) {
        self.data.write().parts.insert(part.id, part);
    }

    pub fn link(&self, supplier: SupplierId, part: PartId) {
        let link = SupplierPart { supplier, part };
        let mut data = self.data.write();
        if !data.supplier_parts.contains(&link) {
            data.supplier_parts.push(link);
        }
    }

    pub fn add_order_line(&self, line: PurchaseOrderLine) {
        self.data.write().order_lines.push(line);
    }

    pub fn add_stock_item(&self, item: StockItem) {
        self.data.write().stock_items.push(item);
    }

    /// Overwrite a stored supplier record as if another writer had saved it.
    pub fn bump_supplier_risk_version(&self, id: SupplierId) {
        if let Some(record) = self.data.write().supplier_risks.get_mut(&id) {
            record.version += 1;
        }
    }

    pub fn bump_part_risk_version(&self, id: PartId) {
        if let Some(record) = self.data.write().part_risks.get_mut(&id) {
            record.version += 1;
        }
    }
}

impl RiskStore for InMemoryStore {
    fn suppliers(&self) -> Result<Vec<Supplier>> {
        Ok(self.data.read().suppliers.values().cloned().collect())
    }

    fn parts(&self) -> Result<Vec<Part>> {
        Ok(self.data.read().parts.values().cloned().collect())
    }

    fn supplier_history(&self, id: SupplierId) -> Result<SupplierHistory> {
        let data = self.data.read();
        let supplier = data
            .suppliers
            .get(&id)
            .cloned()
            .ok_or_else(|| RiskError::not_found(id))?;
        Ok(SupplierHistory {
            supplier,
            order_lines: data
                .order_lines
                .iter()
                .filter(|line| line.supplier == id)
                .cloned()
                .collect(),
            parts_supplied: data
                .supplier_parts
                .iter()
                .filter(|link| link.supplier == id)
                .map(|link| link.part)
                .collect(),
        })
    }

    fn part_history(&self, id: PartId) -> Result<PartHistory> {
        let data = self.data.read();
        let part = data
            .parts
            .get(&id)
            .cloned()
            .ok_or_else(|| RiskError::not_found(id))?;
        Ok(PartHistory {
            part,
            stock_items: data
                .stock_items
                .iter()
                .filter(|item| item.part == id)
                .cloned()
                .collect(),
            order_lines: data
                .order_lines
                .iter()
                .filter(|line| line.part == id)
                .cloned()
                .collect(),
            suppliers: data
                .supplier_parts
                .iter()
                .filter(|link| link.part == id && data.is_active(link.supplier))
                .map(|link| link.supplier)
                .collect(),
            linked_suppliers: data
                .supplier_parts
                .iter()
                .filter(|link| link.part == id)
                .map(|link| link.supplier)
                .collect(),
        })
    }

    fn category_offerings(&self, category_id: u64) -> Result<Vec<SupplierPart>> {
        let data = self.data.read();
        Ok(data
            .supplier_parts
            .iter()
            .filter(|link| data.is_active(link.supplier))
            .filter(|link| {
                data.parts
                    .get(&link.part)
                    .and_then(|part| part.category.as_ref())
                    .is_some_and(|category| category.id == category_id)
            })
            .copied()
            .collect())
    }

    fn set_part_stock_threshold(&self, id: PartId, threshold: Option<u32>) -> Result<()> {
        let mut data = self.data.write();
        let part = data
            .parts
            .get_mut(&id)
            .ok_or_else(|| RiskError::not_found(id))?;
        part.low_stock_threshold = threshold;
        Ok(())
    }

    fn get_or_create_supplier_risk(
        &self,
        id: SupplierId,
        default_threshold: u8,
    ) -> Result<SupplierRiskRecord> {
        if let Some(record) = self.data.read().supplier_risks.get(&id) {
            return Ok(record.clone());
        }
        let mut data = self.data.write();
        if !data.suppliers.contains_key(&id) {
            return Err(RiskError::not_found(id));
        }
        Ok(data
            .supplier_risks
            .entry(id)
            .or_insert_with(|| SupplierRiskRecord::new(id, default_threshold))
            .clone())
    }

    fn save_supplier_risk(&self, record: &SupplierRiskRecord) -> Result<SupplierRiskRecord> {
        record.validate()?;
        let mut data = self.data.write();
        let stored_version = data.supplier_risks.get(&record.supplier).map(|r| r.version);
        check_version(record.entity(), record.version, stored_version)?;

        let mut saved = record.clone();
        saved.version += 1;
        data.supplier_risks.insert(saved.supplier, saved.clone());
        Ok(saved)
    }

    fn supplier_risks(&self) -> Result<Vec<SupplierRiskRecord>> {
        Ok(self.data.read().supplier_risks.values().cloned().collect())
    }

    fn get_or_create_part_risk(&self, id: PartId) -> Result<PartSupplyChainRiskRecord> {
        if let Some(record) = self.data.read().part_risks.get(&id) {
            return Ok(record.clone());
        }
        let mut data = self.data.write();
        if !data.parts.contains_key(&id) {
            return Err(RiskError::not_found(id));
        }
        Ok(data
            .part_risks
            .entry(id)
            .or_insert_with(|| PartSupplyChainRiskRecord::new(id))
            .clone())
    }

    fn save_part_risk(
        &self,
        record: &PartSupplyChainRiskRecord,
    ) -> Result<PartSupplyChainRiskRecord> {
        record.validate()?;
        let mut data = self.data.write();
        let stored_version = data.part_risks.get(&record.part).map(|r| r.version);
        check_version(record.entity(), record.version, stored_version)?;

        let mut saved = record.clone();
        saved.version += 1;
        data.part_risks.insert(saved.part, saved.clone());
        Ok(saved)
    }

    fn part_risks(&self) -> Result<Vec<PartSupplyChainRiskRecord>> {
        Ok(self.data.read().part_risks.values().cloned().collect())
    }

    fn open_alert(&self, entity: EntityRef) -> Result<Option<AlertRecord>> {
        Ok(self.data.read().open_alert_for(entity).cloned())
    }

    fn insert_alert(&self, alert: NewAlert) -> Result<AlertRecord> {
        let mut data = self.data.write();
        if let Some(existing) = data.open_alert_for(alert.entity) {
            return Err(RiskError::UniqueViolation(format!(
                "{} already has open {}",
                alert.entity, existing.id
            )));
        }
        let record = AlertRecord::from_new(data.next_alert_id(), alert);
        data.alerts.insert(record.id, record.clone());
        Ok(record)
    }

    fn update_alert(&self, alert: &AlertRecord) -> Result<()> {
        let mut data = self.data.write();
        if !data.alerts.contains_key(&alert.id) {
            return Err(RiskError::RecordNotFound(alert.id.to_string()));
        }
        if alert.is_open() {
            if let Some(other) = data
                .open_alert_for(alert.entity)
                .filter(|other| other.id != alert.id)
            {
                return Err(RiskError::UniqueViolation(format!(
                    "{} already has open {}",
                    alert.entity, other.id
                )));
            }
        }
        data.alerts.insert(alert.id, alert.clone());
        Ok(())
    }

    fn alert(&self, id: AlertId) -> Result<AlertRecord> {
        self.data
            .read()
            .alerts
            .get(&id)
            .cloned()
            .ok_or_else(|| RiskError::RecordNotFound(id.to_string()))
    }

    fn alerts(&self) -> Result<Vec<AlertRecord>> {
        Ok(self.data.read().alerts.values().cloned().collect())
    }

    fn recommendations_for_part(&self, part: PartId) -> Result<Vec<RecommendationRecord>> {
        Ok(self
            .data
            .read()
            .recommendations
            .values()
            .filter(|r| r.part == part)
            .cloned()
            .collect())
    }

    fn insert_recommendation(
        &self,
        recommendation: NewRecommendation,
    ) -> Result<RecommendationRecord> {
        recommendation.validate()?;
        let mut data = self.data.write();
        let duplicate = data.recommendations.values().any(|r| {
            r.part == recommendation.part
                && r.suggested_supplier == recommendation.suggested_supplier
        });
        if duplicate {
            return Err(RiskError::UniqueViolation(format!(
                "{} already suggested for {}",
                recommendation.suggested_supplier, recommendation.part
            )));
        }
        let record = RecommendationRecord::from_new(data.next_recommendation_id(), recommendation);
        data.recommendations.insert(record.id, record.clone());
        Ok(record)
    }

    fn update_recommendation(&self, recommendation: &RecommendationRecord) -> Result<()> {
        let mut data = self.data.write();
        match data.recommendations.get_mut(&recommendation.id) {
            Some(stored) => {
                *stored = recommendation.clone();
                Ok(())
            }
            None => Err(RiskError::RecordNotFound(recommendation.id.to_string())),
        }
    }

    fn recommendation(&self, id: RecommendationId) -> Result<RecommendationRecord> {
        self.data
            .read()
            .recommendations
            .get(&id)
            .cloned()
            .ok_or_else(|| RiskError::RecordNotFound(id.to_string()))
    }

    fn recommendations(&self) -> Result<Vec<RecommendationRecord>> {
        Ok(self.data.read().recommendations.values().cloned().collect())
    }

    fn insert_event(&self, event: NewRiskEvent) -> Result<RiskEventRecord> {
        let mut data = self.data.write();
        let record = RiskEventRecord::from_new(data.next_event_id(), event);
        data.events.insert(record.id, record.clone());
        Ok(record)
    }

    fn resolve_event(&self, id: EventId, notes: &str, on: NaiveDate) -> Result<RiskEventRecord> {
        let mut data = self.data.write();
        let event = data
            .events
            .get_mut(&id)
            .ok_or_else(|| RiskError::RecordNotFound(id.to_string()))?;
        event.mark_resolved(notes, on);
        Ok(event.clone())
    }

    fn events(&self) -> Result<Vec<RiskEventRecord>> {
        Ok(self.data.read().events.values().cloned().collect())
    }
}

/// A stored record must exist at exactly the writer's version; a missing
/// record may only be written as a fresh one.
fn check_version(entity: EntityRef, expected: u64, stored: Option<u64>) -> Result<()> {
    match stored {
        Some(found) if found != expected => Err(RiskError::Conflict {
            entity,
            expected,
            found,
        }),
        None if expected != 0 => Err(RiskError::Conflict {
            entity,
            expected,
            found: 0,
        }),
        _ => Ok(()),
    }
}
