//! Bounded integer score used for every risk factor.
//!
//! Factor scores live on a 0-100 scale where higher means riskier. The
//! bound is encoded in the type: checked construction rejects values outside
//! the range with a validation error, saturating construction clamps.
//!
//! # Examples
//!
//! ```rust
//! use chainrisk::scoring::FactorScore;
//!
//! let score = FactorScore::new(85).unwrap();
//! assert_eq!(score.value(), 85);
//!
//! assert!(FactorScore::new(150).is_err());
//! assert_eq!(FactorScore::saturating(150.0).value(), 100);
//! ```

use crate::errors::RiskError;
use serde::{Deserialize, Serialize};

/// Integer risk score in `[0, 100]`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "u8")]
pub struct FactorScore(u8);

impl FactorScore {
    pub const MIN: FactorScore = FactorScore(0);
    pub const MAX: FactorScore = FactorScore(100);
    /// Returned by scorers when there is no data to judge by.
    pub const NEUTRAL: FactorScore = FactorScore(50);

    /// Create a score, rejecting values outside `[0, 100]`.
    pub fn new(value: i64) -> Result<Self, RiskError> {
        if (0..=100).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(RiskError::out_of_range("factor score", value, 0, 100))
        }
    }

    /// Create a score from a computed value, rounding and clamping to `[0, 100]`.
    pub fn saturating(value: f64) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self(value.round().clamp(0.0, 100.0) as u8)
    }

    /// For literal constants known to be in range.
    pub(crate) const fn from_const(value: u8) -> Self {
        assert!(value <= 100);
        Self(value)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl TryFrom<i64> for FactorScore {
    type Error = RiskError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FactorScore> for u8 {
    fn from(score: FactorScore) -> Self {
        score.0
    }
}

impl std::fmt::Display for FactorScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
