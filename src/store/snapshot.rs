//! JSON snapshot of a whole store, used as the CLI's data file.

use super::memory::InMemoryStore;
use crate::core::{
    AlertRecord, Part, PartSupplyChainRiskRecord, PurchaseOrderLine, RecommendationRecord,
    RiskEventRecord, StockItem, Supplier, SupplierPart, SupplierRiskRecord,
};
use crate::errors::{Result, RiskError};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Flat, hand-editable form of the store contents.
///
/// Inventory sections are usually written by an export from the inventory
/// system; the risk sections are written back by `chainrisk assess`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default)]
    pub supplier_parts: Vec<SupplierPart>,
    #[serde(default)]
    pub order_lines: Vec<PurchaseOrderLine>,
    #[serde(default)]
    pub stock_items: Vec<StockItem>,
    #[serde(default)]
    pub supplier_risks: Vec<SupplierRiskRecord>,
    #[serde(default)]
    pub part_risks: Vec<PartSupplyChainRiskRecord>,
    #[serde(default)]
    pub alerts: Vec<AlertRecord>,
    #[serde(default)]
    pub recommendations: Vec<RecommendationRecord>,
    #[serde(default)]
    pub events: Vec<RiskEventRecord>,
}

pub fn load_snapshot(path: &Path) -> Result<InMemoryStore> {
    let file = File::open(path).map_err(|e| {
        RiskError::enumeration(
            format!("data file {}", path.display()),
            &RiskError::Io(e),
        )
    })?;
    let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))?;
    log::debug!(
        "Loaded {} suppliers and {} parts from {}",
        snapshot.suppliers.len(),
        snapshot.parts.len(),
        path.display()
    );
    Ok(InMemoryStore::from_snapshot(snapshot))
}

/// Write the store to `path`, replacing it atomically.
pub fn save_snapshot(store: &InMemoryStore, path: &Path) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    {
        let file = File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &store.snapshot())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
