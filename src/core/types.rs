//! Identifiers and classification enums shared across the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

entity_id!(
    /// Identity of a supplier company.
    SupplierId,
    "supplier"
);
entity_id!(
    /// Identity of a part.
    PartId,
    "part"
);
entity_id!(AlertId, "alert");
entity_id!(RecommendationId, "recommendation");
entity_id!(EventId, "event");

/// Reference to an entity that can carry risk state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    Supplier(SupplierId),
    Part(PartId),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Supplier(id) => id.fmt(f),
            Self::Part(id) => id.fmt(f),
        }
    }
}

impl From<SupplierId> for EntityRef {
    fn from(id: SupplierId) -> Self {
        Self::Supplier(id)
    }
}

impl From<PartId> for EntityRef {
    fn from(id: PartId) -> Self {
        Self::Part(id)
    }
}

/// Kind of entity, used in flat import/export records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Supplier,
    Part,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Supplier => "supplier",
            Self::Part => "part",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal risk classification, `Low < Medium < High < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// HIGH or CRITICAL.
    pub fn is_high(&self) -> bool {
        *self >= RiskLevel::High
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

/// Category attached to risk events and alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Financial,
    Delivery,
    Quality,
    Geographical,
    Political,
    Environmental,
    /// Inventory and sourcing exposure of a part.
    Supply,
}

impl RiskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Financial => "financial",
            Self::Delivery => "delivery",
            Self::Quality => "quality",
            Self::Geographical => "geographical",
            Self::Political => "political",
            Self::Environmental => "environmental",
            Self::Supply => "supply",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
        assert!(RiskLevel::Critical.is_high());
        assert!(!RiskLevel::Medium.is_high());
    }

    #[test]
    fn test_entity_ref_display() {
        assert_eq!(EntityRef::Supplier(SupplierId(4)).to_string(), "supplier#4");
        assert_eq!(EntityRef::Part(PartId(12)).to_string(), "part#12");
    }

    #[test]
    fn test_entity_ref_serde_shape() {
        let json = serde_json::to_string(&EntityRef::Part(PartId(3))).unwrap();
        assert_eq!(json, r#"{"kind":"part","id":3}"#);
        let back: EntityRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EntityRef::Part(PartId(3)));
    }

    #[test]
    fn test_risk_level_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RiskLevel::Critical).unwrap(),
            "\"critical\""
        );
        assert_eq!(RiskLevel::High.to_string(), "HIGH");
    }
}
