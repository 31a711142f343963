//! Testing infrastructure for chainrisk.
//!
//! - **[`StoreBuilder`]**: populate an in-memory store relative to a fixed date
//! - **[`FaultyStore`]**: wrap a store and inject `NotFound`, transient and
//!   conflict failures for chosen entities
//!
//! # Quick Start
//!
//! ```rust
//! use chainrisk::config::RiskConfig;
//! use chainrisk::core::{EntityRef, FixedClock, SupplierId};
//! use chainrisk::orchestrator::{AssessmentOptions, Orchestrator};
//! use chainrisk::testkit::{FaultyStore, StoreBuilder};
//! use chrono::NaiveDate;
//! use std::sync::Arc;
//!
//! let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
//! let base = StoreBuilder::new(today)
//!     .supplier(1, "Acme Castings", Some("DE"))
//!     .supplier(2, "Borealis Metals", Some("SE"))
//!     .build();
//! let store = Arc::new(FaultyStore::new(base).missing(SupplierId(2)));
//!
//! let orchestrator = Orchestrator::with_defaults(store, Arc::new(RiskConfig::default()))
//!     .unwrap()
//!     .with_clock(Arc::new(FixedClock::at_date(today)));
//! let summary = orchestrator.run(&AssessmentOptions::default()).unwrap();
//! assert_eq!(summary.suppliers_assessed, 1);
//! assert_eq!(summary.errors[0].entity, EntityRef::Supplier(SupplierId(2)));
//! ```

pub mod faulty;
pub mod helpers;

pub use faulty::FaultyStore;
pub use helpers::{part, supplier, StoreBuilder};
