//! Rule-based risk factors
//!
//! A fixed, ordered table of attribute thresholds evaluated against the raw
//! row. It is independent of the classifier: the model decides the tier,
//! these rules only describe what in the profile looks risky. Each firing
//! rule contributes one sentence, in table order.

use super::risk::RiskTier;
use crate::dataset::RowView;
use crate::format::{decimal, group_thousands};

/// Attribute condition checked by a rule
#[derive(Debug, Clone, Copy)]
pub enum Condition {
    LessThan(f64),
    AtLeast(f64),
    GreaterThan(f64),
    Equals(&'static str),
}

/// How the observed value is read before comparison and display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    /// Truncated to a whole number and displayed as an integer
    Whole,
    /// Kept as a float
    Decimal,
    /// Compared as text
    Label,
}

/// One row of the rule table
#[derive(Debug, Clone, Copy)]
pub struct RiskRule {
    pub column: &'static str,
    pub reading: Reading,
    pub condition: Condition,
    pub render: fn(f64) -> String,
}

impl RiskRule {
    /// Message for this row, if the rule fires
    ///
    /// A missing or non-numeric attribute never fires.
    pub fn evaluate(&self, row: &RowView<'_>) -> Option<String> {
        match (self.reading, self.condition) {
            (Reading::Label, Condition::Equals(expected)) => {
                let fires = row.text(self.column).is_some_and(|v| v == expected);
                fires.then(|| (self.render)(0.0))
            }
            (Reading::Label, _) | (_, Condition::Equals(_)) => None,
            (reading, condition) => {
                let raw = row.number(self.column)?;
                let value = if reading == Reading::Whole { raw.trunc() } else { raw };
                let fires = match condition {
                    Condition::LessThan(t) => value < t,
                    Condition::AtLeast(t) => value >= t,
                    Condition::GreaterThan(t) => value > t,
                    Condition::Equals(_) => false,
                };
                fires.then(|| (self.render)(value))
            }
        }
    }
}

/// Rule table, in output order
pub const RISK_RULES: [RiskRule; 9] = [
    RiskRule {
        column: "YearsAtCompany",
        reading: Reading::Whole,
        condition: Condition::LessThan(5.0),
        render: |v| {
            format!(
                "Company tenure: {} years - Recent hire with less than 5 years tenure",
                v as i64
            )
        },
    },
    RiskRule {
        column: "MonthlyIncome",
        reading: Reading::Decimal,
        condition: Condition::LessThan(3000.0),
        render: |v| {
            format!(
                "Monthly income: ${} - Below average salary (< $3000/month)",
                group_thousands(v.round_ties_even() as i64)
            )
        },
    },
    RiskRule {
        column: "YearsInCurrentRole",
        reading: Reading::Whole,
        condition: Condition::LessThan(2.0),
        render: |v| {
            format!(
                "Time in role: {} years - Limited time in current role (< 2 years)",
                v as i64
            )
        },
    },
    RiskRule {
        column: "YearsSinceLastPromotion",
        reading: Reading::Whole,
        condition: Condition::AtLeast(3.0),
        render: |v| format!("Last promotion: {} years ago - No promotion in 3+ years", v as i64),
    },
    RiskRule {
        column: "DistanceFromHome",
        reading: Reading::Whole,
        condition: Condition::GreaterThan(10.0),
        render: |v| format!("Commute distance: {} miles - Long commute (> 10 miles)", v as i64),
    },
    RiskRule {
        column: "TrainingTimesLastYear",
        reading: Reading::Whole,
        condition: Condition::LessThan(2.0),
        render: |v| {
            format!(
                "Training sessions: {}/year - Minimal training/development (< 2 times)",
                v as i64
            )
        },
    },
    RiskRule {
        column: "OverTime",
        reading: Reading::Label,
        condition: Condition::Equals("Yes"),
        render: |_| "Overtime: Frequently working overtime - High workload stress".to_string(),
    },
    RiskRule {
        column: "NumCompaniesWorked",
        reading: Reading::Whole,
        condition: Condition::GreaterThan(5.0),
        render: |v| {
            format!(
                "Previous employers: {} - Frequent job changes (> 5 companies)",
                v as i64
            )
        },
    },
    RiskRule {
        column: "PercentSalaryHike",
        reading: Reading::Decimal,
        condition: Condition::LessThan(12.0),
        render: |v| format!("Latest raise: {}% - Below average raise (< 12%)", decimal(v)),
    },
];

/// Risk factor sentences for one employee
///
/// Falls back to a single tier-specific sentence when no rule fires.
pub fn risk_factors(row: &RowView<'_>, tier: RiskTier) -> Vec<String> {
    let factors: Vec<String> = RISK_RULES.iter().filter_map(|rule| rule.evaluate(row)).collect();
    if factors.is_empty() {
        vec![tier.generic_factor().to_string()]
    } else {
        factors
    }
}
