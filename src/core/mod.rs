//! Domain model: identifiers, input entities and assessment records.

pub mod clock;
pub mod entities;
pub mod records;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use entities::{
    Address, Category, Part, PartHistory, PurchaseOrderLine, StockItem, Supplier,
    SupplierHistory, SupplierPart,
};
pub use records::{
    AlertRecord, NewAlert, NewRecommendation, NewRiskEvent, PartSupplyChainRiskRecord,
    RecommendationRecord, RiskEventRecord, SupplierRiskRecord, DEFAULT_ALERT_THRESHOLD,
};
pub use types::{
    AlertId, EntityKind, EntityRef, EventId, PartId, RecommendationId, RiskCategory, RiskLevel,
    SupplierId,
};
