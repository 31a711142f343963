//! Shared fixtures for integration tests.
#![allow(dead_code)]

use chainrisk::config::{ParallelConfig, RetryConfig, RiskConfig};
use chainrisk::core::FixedClock;
use chainrisk::orchestrator::{AssessmentOptions, Orchestrator};
use chainrisk::store::RiskStore;
use chrono::NaiveDate;
use std::sync::Arc;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date")
}

/// Defaults with a small pool and retries that do not sleep.
pub fn test_config() -> RiskConfig {
    RiskConfig {
        parallel: ParallelConfig::with_workers(4),
        retry: RetryConfig::immediate(),
        ..Default::default()
    }
}

pub fn orchestrator(store: Arc<dyn RiskStore>) -> Orchestrator {
    orchestrator_with(store, test_config())
}

pub fn orchestrator_with(store: Arc<dyn RiskStore>, config: RiskConfig) -> Orchestrator {
    Orchestrator::with_defaults(store, Arc::new(config))
        .expect("valid config")
        .with_clock(Arc::new(FixedClock::at_date(today())))
}

pub fn suppliers_only() -> AssessmentOptions {
    AssessmentOptions {
        suppliers_only: true,
        ..Default::default()
    }
}

pub fn parts_only() -> AssessmentOptions {
    AssessmentOptions {
        parts_only: true,
        ..Default::default()
    }
}
