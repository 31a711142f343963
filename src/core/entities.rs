//! Domain entities the engine reads from the persistence store.
//!
//! These are plain records owned by the surrounding inventory system. The
//! engine never mutates them, with the single exception of a part's
//! low-stock threshold which is exchanged through the import boundary.

use super::types::{PartId, SupplierId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub line1: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    /// ISO 3166 alpha-2 code or country name.
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    /// Short identifying code used in exports.
    pub code: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<Category>,
    /// Minimum on-hand quantity before the part counts as low on stock.
    #[serde(default)]
    pub low_stock_threshold: Option<u32>,
}

/// A supplier's offering of a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupplierPart {
    pub supplier: SupplierId,
    pub part: PartId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderLine {
    pub supplier: SupplierId,
    pub part: PartId,
    pub order_date: NaiveDate,
    pub quantity: f64,
    #[serde(default)]
    pub received: f64,
    #[serde(default)]
    pub unit_price: f64,
    /// Promised delivery date.
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    /// Date the delivery completed, if it has.
    #[serde(default)]
    pub received_date: Option<NaiveDate>,
}

impl PurchaseOrderLine {
    pub fn is_completed(&self) -> bool {
        self.received_date.is_some()
    }

    /// Completed after the promised date. Lines without a target date are never late.
    pub fn is_late(&self) -> bool {
        match (self.received_date, self.target_date) {
            (Some(received), Some(target)) => received > target,
            _ => false,
        }
    }

    pub fn open_quantity(&self) -> f64 {
        if self.is_completed() {
            0.0
        } else {
            (self.quantity - self.received).max(0.0)
        }
    }

    /// Value still owed on this line.
    pub fn open_value(&self) -> f64 {
        self.open_quantity() * self.unit_price
    }

    pub fn ordered_on_or_after(&self, cutoff: NaiveDate) -> bool {
        self.order_date >= cutoff
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub part: PartId,
    pub quantity: f64,
    #[serde(default = "default_true")]
    pub in_stock: bool,
}

/// Everything the supplier scorers look at for one supplier.
#[derive(Debug, Clone)]
pub struct SupplierHistory {
    pub supplier: Supplier,
    pub order_lines: Vec<PurchaseOrderLine>,
    pub parts_supplied: Vec<PartId>,
}

/// Everything the part scorers look at for one part.
#[derive(Debug, Clone)]
pub struct PartHistory {
    pub part: Part,
    pub stock_items: Vec<StockItem>,
    pub order_lines: Vec<PurchaseOrderLine>,
    /// Active suppliers linked to the part.
    pub suppliers: Vec<SupplierId>,
    /// Every supplier linked to the part, active or not.
    pub linked_suppliers: Vec<SupplierId>,
}

impl PartHistory {
    pub fn on_hand(&self) -> f64 {
        self.stock_items
            .iter()
            .filter(|item| item.in_stock)
            .map(|item| item.quantity)
            .sum()
    }

    pub fn is_single_source(&self) -> bool {
        self.suppliers.len() <= 1
    }

    pub fn is_below_stock_threshold(&self) -> bool {
        self.part
            .low_stock_threshold
            .is_some_and(|threshold| self.on_hand() < f64::from(threshold))
    }
}

fn default_true() -> bool {
    true
}
