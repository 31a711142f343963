// Export modules for library usage
pub mod alerts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;
pub mod observability;
pub mod orchestrator;
pub mod progress;
pub mod recommendations;
pub mod scoring;
pub mod store;
pub mod testkit;

// Re-export commonly used types
pub use crate::core::{
    AlertRecord, EntityRef, PartId, PartSupplyChainRiskRecord, RecommendationRecord,
    RiskCategory, RiskEventRecord, RiskLevel, SupplierId, SupplierRiskRecord,
};

pub use crate::config::{load_config, RiskConfig};
pub use crate::errors::{Result, RiskError};
pub use crate::orchestrator::{AssessmentOptions, Orchestrator, RunSummary};
pub use crate::scoring::{FactorScore, RiskAggregator};
pub use crate::store::{InMemoryStore, RiskStore};
