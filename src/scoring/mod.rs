pub mod aggregate;
pub mod factors;
pub mod score_types;
pub mod scorer;

pub use aggregate::{
    PartAssessment, PartRiskFlags, RiskAggregator, SupplierAssessment, SupplierFactors,
};
pub use score_types::FactorScore;
pub use scorer::{HeuristicScorer, RiskScorer};
