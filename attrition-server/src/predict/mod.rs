//! Prediction & explanation engine
//!
//! Pipeline: drop the target column, encode with the preprocessor, classify,
//! tier each probability and attach rule-based risk factors. Any failure
//! aborts the whole run; no partial result is returned.

pub mod drivers;
pub mod risk;

use attrition_common::schema::{EMPLOYEE_ID_COLUMN, TARGET_COLUMN};
use attrition_common::Error;
use serde::Serialize;
use tracing::debug;

use crate::dataset::{Dataset, RowView};
use crate::error::ApiResult;
use crate::model::{FeatureWeight, ModelArtifacts, TOP_FEATURES};
pub use risk::RiskTier;

/// Per-employee prediction
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub index: usize,
    pub employee_id: String,
    pub name: String,
    pub department: String,
    pub job_role: String,
    pub attrition_prediction: &'static str,
    /// Probability of attrition on a 0-100 scale
    pub attrition_probability: f64,
    pub risk_level: RiskTier,
    pub age: Option<i64>,
    pub monthly_income: Option<f64>,
    pub years_at_company: Option<i64>,
    pub risk_factors: Vec<String>,
}

/// Aggregate over all predictions
#[derive(Debug, Clone, Serialize)]
pub struct PredictionSummary {
    pub total_employees: usize,
    pub high_risk: usize,
    pub medium_risk: usize,
    pub low_risk: usize,
    /// Mean probability on a 0-100 scale; 0.0 for an empty table
    pub average_attrition_probability: f64,
}

/// POST /predict payload
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub status: &'static str,
    pub predictions: Vec<PredictionResult>,
    pub summary: PredictionSummary,
    pub top_risk_factors: Vec<FeatureWeight>,
}

/// Score every row of the session table
pub fn predict(dataset: &Dataset, artifacts: &ModelArtifacts) -> ApiResult<PredictionReport> {
    let features = dataset.without_column(TARGET_COLUMN);
    debug!("Scoring {} rows with {} feature columns", features.n_rows(), features.n_cols());

    let x = artifacts.preprocessor.transform(&features)?;
    let labels = artifacts.classifier.predict(&x)?;
    let proba = artifacts.classifier.predict_proba(&x)?;

    if labels.len() != dataset.n_rows() || proba.nrows() != dataset.n_rows() || proba.ncols() < 2 {
        return Err(Error::Internal(format!(
            "classifier returned {} labels and {}x{} probabilities for {} rows",
            labels.len(),
            proba.nrows(),
            proba.ncols(),
            dataset.n_rows()
        ))
        .into());
    }
    let probabilities = proba.column(1);

    let predictions: Vec<PredictionResult> = dataset
        .iter_rows()
        .map(|row| {
            let p = probabilities[row.index()];
            build_result(&row, labels[row.index()], p)
        })
        .collect();

    let count = |tier: RiskTier| predictions.iter().filter(|r| r.risk_level == tier).count();
    let average = if probabilities.is_empty() {
        0.0
    } else {
        probabilities.sum() / probabilities.len() as f64 * 100.0
    };

    let summary = PredictionSummary {
        total_employees: predictions.len(),
        high_risk: count(RiskTier::High),
        medium_risk: count(RiskTier::Medium),
        low_risk: count(RiskTier::Low),
        average_attrition_probability: average,
    };

    Ok(PredictionReport {
        status: "success",
        predictions,
        summary,
        top_risk_factors: artifacts.explainability.top(TOP_FEATURES),
    })
}

fn build_result(row: &RowView<'_>, label: u8, probability: f64) -> PredictionResult {
    let tier = RiskTier::from_probability(probability);
    let employee_id = row
        .text(EMPLOYEE_ID_COLUMN)
        .unwrap_or_else(|| row.index().to_string());

    PredictionResult {
        index: row.index(),
        name: employee_id.clone(),
        employee_id,
        department: row.text("Department").unwrap_or_else(|| "Unknown".to_string()),
        job_role: row.text("JobRole").unwrap_or_else(|| "Unknown".to_string()),
        attrition_prediction: if label == 1 { "Yes" } else { "No" },
        attrition_probability: probability * 100.0,
        risk_level: tier,
        age: row.number("Age").map(|v| v.trunc() as i64),
        monthly_income: row.number("MonthlyIncome"),
        years_at_company: row.number("YearsAtCompany").map(|v| v.trunc() as i64),
        risk_factors: drivers::risk_factors(row, tier),
    }
}
