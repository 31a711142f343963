//! Fixture builders for stores used in tests.
//!
//! | Helper | Purpose |
//! |--------|---------|
//! | [`StoreBuilder`] | Populate an [`InMemoryStore`] fluently |
//! | [`supplier`] | A supplier with an optional country |
//! | [`part`] | A part with an optional category |
//!
//! ```rust
//! use chainrisk::testkit::StoreBuilder;
//! use chainrisk::store::RiskStore;
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
//! let store = StoreBuilder::new(today)
//!     .supplier(1, "Acme Castings", Some("DE"))
//!     .part(10, "Gearbox housing", None)
//!     .supplies(1, 10)
//!     .stock(10, 25.0)
//!     .build();
//! assert_eq!(store.parts().unwrap().len(), 1);
//! ```

use crate::core::{
    Address, Category, Part, PartId, PurchaseOrderLine, StockItem, Supplier, SupplierId,
};
use crate::store::{InMemoryStore, RiskStore};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

pub fn supplier(id: u64, name: &str, country: Option<&str>) -> Supplier {
    Supplier {
        id: SupplierId(id),
        code: format!("S{id:04}"),
        name: name.to_string(),
        active: true,
        address: country.map(|country| Address {
            line1: None,
            postal_code: None,
            country: country.to_string(),
        }),
    }
}

pub fn part(id: u64, name: &str, category: Option<Category>) -> Part {
    Part {
        id: PartId(id),
        code: format!("P{id:04}"),
        name: name.to_string(),
        category,
        low_stock_threshold: None,
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct PartFlags {
    long_lead_time: bool,
    high_value: bool,
}

/// Builds an [`InMemoryStore`] relative to a reference date.
///
/// Order dates are given in days before `today`.
pub struct StoreBuilder {
    today: NaiveDate,
    suppliers: Vec<Supplier>,
    categories: BTreeMap<u64, Category>,
    parts: Vec<(Part, Option<u64>)>,
    links: Vec<(u64, u64)>,
    order_lines: Vec<PurchaseOrderLine>,
    stock_items: Vec<StockItem>,
    flags: BTreeMap<u64, PartFlags>,
    alert_thresholds: BTreeMap<u64, i64>,
}

impl StoreBuilder {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            suppliers: Vec::new(),
            categories: BTreeMap::new(),
            parts: Vec::new(),
            links: Vec::new(),
            order_lines: Vec::new(),
            stock_items: Vec::new(),
            flags: BTreeMap::new(),
            alert_thresholds: BTreeMap::new(),
        }
    }

    pub fn supplier(mut self, id: u64, name: &str, country: Option<&str>) -> Self {
        self.suppliers.push(supplier(id, name, country));
        self
    }

    pub fn inactive_supplier(mut self, id: u64, name: &str) -> Self {
        let mut inactive = supplier(id, name, None);
        inactive.active = false;
        self.suppliers.push(inactive);
        self
    }

    pub fn category(mut self, id: u64, name: &str) -> Self {
        self.categories.insert(
            id,
            Category {
                id,
                name: name.to_string(),
            },
        );
        self
    }

    /// Unknown category ids get a generated name.
    pub fn part(mut self, id: u64, name: &str, category: Option<u64>) -> Self {
        self.parts.push((part(id, name, None), category));
        self
    }

    pub fn low_stock_threshold(mut self, part: u64, threshold: u32) -> Self {
        if let Some((part, _)) = self.parts.iter_mut().find(|(p, _)| p.id == PartId(part)) {
            part.low_stock_threshold = Some(threshold);
        }
        self
    }

    pub fn supplies(mut self, supplier: u64, part: u64) -> Self {
        self.links.push((supplier, part));
        self
    }

    pub fn stock(mut self, part: u64, quantity: f64) -> Self {
        self.stock_items.push(StockItem {
            part: PartId(part),
            quantity,
            in_stock: true,
        });
        self
    }

    /// An order line still awaiting delivery.
    pub fn open_order(
        mut self,
        supplier: u64,
        part: u64,
        days_ago: i64,
        quantity: f64,
        unit_price: f64,
    ) -> Self {
        let order_date = self.today - Duration::days(days_ago);
        self.order_lines.push(PurchaseOrderLine {
            supplier: SupplierId(supplier),
            part: PartId(part),
            order_date,
            quantity,
            received: 0.0,
            unit_price,
            target_date: Some(order_date + Duration::days(14)),
            received_date: None,
        });
        self
    }

    /// A completed delivery promised 14 days after ordering.
    pub fn delivery(
        mut self,
        supplier: u64,
        part: u64,
        days_ago: i64,
        quantity: f64,
        late: bool,
    ) -> Self {
        let order_date = self.today - Duration::days(days_ago);
        let target = order_date + Duration::days(14);
        let received = if late {
            target + Duration::days(3)
        } else {
            target - Duration::days(1)
        };
        self.order_lines.push(PurchaseOrderLine {
            supplier: SupplierId(supplier),
            part: PartId(part),
            order_date,
            quantity,
            received: quantity,
            unit_price: 1.0,
            target_date: Some(target),
            received_date: Some(received),
        });
        self
    }

    pub fn long_lead_time(mut self, part: u64) -> Self {
        self.flags.entry(part).or_default().long_lead_time = true;
        self
    }

    pub fn high_value(mut self, part: u64) -> Self {
        self.flags.entry(part).or_default().high_value = true;
        self
    }

    pub fn alert_threshold(mut self, supplier: u64, threshold: i64) -> Self {
        self.alert_thresholds.insert(supplier, threshold);
        self
    }

    /// Panics on inconsistent fixtures, e.g. a flag on an unknown part.
    pub fn build(self) -> InMemoryStore {
        let store = InMemoryStore::new();
        for supplier in self.suppliers {
            store.add_supplier(supplier);
        }
        for (mut part, category) in self.parts {
            part.category = category.map(|id| {
                self.categories.get(&id).cloned().unwrap_or_else(|| Category {
                    id,
                    name: format!("Category {id}"),
                })
            });
            store.add_part(part);
        }
        for (supplier, part) in self.links {
            store.link(SupplierId(supplier), PartId(part));
        }
        for line in self.order_lines {
            store.add_order_line(line);
        }
        for item in self.stock_items {
            store.add_stock_item(item);
        }

        for (part, flags) in self.flags {
            let mut record = store
                .get_or_create_part_risk(PartId(part))
                .expect("flagged part exists");
            record.long_lead_time_risk = flags.long_lead_time;
            record.high_value_risk = flags.high_value;
            store.save_part_risk(&record).expect("fixture record saves");
        }
        for (supplier, threshold) in self.alert_thresholds {
            let mut record = store
                .get_or_create_supplier_risk(SupplierId(supplier), crate::core::DEFAULT_ALERT_THRESHOLD)
                .expect("supplier exists");
            record
                .set_alert_threshold(threshold)
                .expect("threshold in range");
            store.save_supplier_risk(&record).expect("fixture record saves");
        }
        store
    }
}
