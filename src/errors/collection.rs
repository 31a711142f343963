//! Per-entity failure records for batch assessment runs.
//!
//! A run never stops at the first failing entity. Each failure is captured
//! with the entity it belongs to and the operation that failed, and the
//! run carries on with the next entity.

use super::RiskError;
use crate::core::EntityRef;
use serde::Serialize;

/// Information about a failed per-entity operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityFailure {
    pub entity: EntityRef,
    pub operation: OperationType,
    /// Short error kind, see [`RiskError::kind`].
    pub kind: &'static str,
    pub error: String, // String for Clone, preserves error message
}

impl EntityFailure {
    pub fn new(entity: EntityRef, operation: OperationType, error: &RiskError) -> Self {
        Self {
            entity,
            operation,
            kind: error.kind(),
            error: error.to_string(),
        }
    }

    pub fn supplier_assessment(entity: EntityRef, error: &RiskError) -> Self {
        Self::new(entity, OperationType::SupplierAssessment, error)
    }

    pub fn part_assessment(entity: EntityRef, error: &RiskError) -> Self {
        Self::new(entity, OperationType::PartAssessment, error)
    }

    pub fn recommendation(entity: EntityRef, error: &RiskError) -> Self {
        Self::new(entity, OperationType::Recommendation, error)
    }

    pub fn alert_dispatch(entity: EntityRef, error: &RiskError) -> Self {
        Self::new(entity, OperationType::AlertDispatch, error)
    }
}

/// Type of operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    SupplierAssessment,
    PartAssessment,
    Recommendation,
    AlertDispatch,
    Import,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SupplierAssessment => "Supplier assessment",
            Self::PartAssessment => "Part assessment",
            Self::Recommendation => "Recommendation",
            Self::AlertDispatch => "Alert dispatch",
            Self::Import => "Import",
        }
    }
}
