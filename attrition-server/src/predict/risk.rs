//! Risk tiering

use serde::Serialize;

/// Probabilities below this are Low risk
pub const MEDIUM_RISK_FLOOR: f64 = 0.30;

/// Probabilities at or above this are High risk
pub const HIGH_RISK_FLOOR: f64 = 0.60;

/// Low / Medium / High attrition bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Bucket a probability in `[0, 1]`; lower bounds are inclusive
    pub fn from_probability(p: f64) -> Self {
        if p < MEDIUM_RISK_FLOOR {
            RiskTier::Low
        } else if p < HIGH_RISK_FLOOR {
            RiskTier::Medium
        } else {
            RiskTier::High
        }
    }

    /// Fallback explanation when no risk rule fires
    pub fn generic_factor(self) -> &'static str {
        match self {
            RiskTier::High => {
                "Overall profile indicates higher attrition risk based on combination of factors"
            }
            RiskTier::Medium => {
                "Some indicators suggest moderate attrition concern - recommend engagement check"
            }
            RiskTier::Low => "Employee profile shows positive retention indicators",
        }
    }
}
