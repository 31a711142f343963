//! Threshold import.
//!
//! Each row sets either a supplier's alert threshold (0-100) or a part's
//! low-stock threshold (non-negative, empty clears it). Rows are applied
//! independently: a rejected row is reported and the rest still apply.

use crate::core::{EntityKind, EntityRef, PartId, SupplierId, DEFAULT_ALERT_THRESHOLD};
use crate::errors::{EntityFailure, OperationType, Result, RiskError};
use crate::store::RiskStore;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdRecord {
    pub kind: EntityKind,
    pub id: u64,
    #[serde(default)]
    pub threshold: Option<i64>,
}

impl ThresholdRecord {
    pub fn entity(&self) -> EntityRef {
        match self.kind {
            EntityKind::Supplier => EntityRef::Supplier(SupplierId(self.id)),
            EntityKind::Part => EntityRef::Part(PartId(self.id)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Csv,
}

impl RecordFormat {
    /// `.csv` files are CSV, everything else JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => RecordFormat::Csv,
            _ => RecordFormat::Json,
        }
    }
}

pub fn parse_threshold_records<R: Read>(
    reader: R,
    format: RecordFormat,
) -> Result<Vec<ThresholdRecord>> {
    match format {
        RecordFormat::Json => Ok(serde_json::from_reader(reader)?),
        RecordFormat::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(true)
                .trim(csv::Trim::All)
                .from_reader(reader);
            reader
                .deserialize()
                .map(|row| row.map_err(RiskError::from))
                .collect()
        }
    }
}

/// Read threshold records from a file, guessing the format from its
/// extension when none is given.
pub fn read_threshold_records(
    path: &Path,
    format: Option<RecordFormat>,
) -> Result<Vec<ThresholdRecord>> {
    let file = std::fs::File::open(path)?;
    let format = format.unwrap_or_else(|| RecordFormat::from_path(path));
    parse_threshold_records(std::io::BufReader::new(file), format)
}

#[derive(Debug, Default, Clone)]
pub struct ImportReport {
    pub applied: usize,
    pub failures: Vec<EntityFailure>,
}

pub fn apply_thresholds(store: &dyn RiskStore, records: &[ThresholdRecord]) -> ImportReport {
    let mut report = ImportReport::default();
    for record in records {
        match apply_threshold(store, record) {
            Ok(()) => report.applied += 1,
            Err(e) => {
                log::warn!("Rejected threshold for {}: {}", record.entity(), e);
                report
                    .failures
                    .push(EntityFailure::new(record.entity(), OperationType::Import, &e));
            }
        }
    }
    report
}

fn apply_threshold(store: &dyn RiskStore, record: &ThresholdRecord) -> Result<()> {
    match record.entity() {
        EntityRef::Supplier(id) => {
            let threshold = record.threshold.ok_or_else(|| {
                RiskError::validation("alert_threshold", "a supplier threshold is required")
            })?;
            let mut risk = store.get_or_create_supplier_risk(id, DEFAULT_ALERT_THRESHOLD)?;
            risk.set_alert_threshold(threshold)?;
            store.save_supplier_risk(&risk)?;
        }
        EntityRef::Part(id) => {
            let threshold = record
                .threshold
                .map(|value| {
                    u32::try_from(value).map_err(|_| {
                        RiskError::out_of_range("low_stock_threshold", value, 0, i64::from(u32::MAX))
                    })
                })
                .transpose()?;
            store.set_part_stock_threshold(id, threshold)?;
        }
    }
    Ok(())
}
