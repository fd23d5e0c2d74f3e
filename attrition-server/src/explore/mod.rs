//! Exploration engine
//!
//! Read-only statistics over the session table: numeric summaries,
//! categorical frequency tables and four chart series.

pub mod charts;
pub mod stats;

use attrition_common::schema::{self, CATEGORICAL_COLUMNS, NUMERIC_COLUMNS};
use polars::prelude::{ChunkAgg, Float64Chunked};
use serde::Serialize;

use crate::dataset::{Dataset, OrderedMap};
use crate::error::{ApiError, ApiResult};
use charts::ChartSeries;
use stats::{FrequencyTable, NumericSummary};

/// Table shape and null counts
#[derive(Debug, Serialize)]
pub struct DatasetOverview {
    pub total_rows: usize,
    pub total_cols: usize,
    pub missing_values: OrderedMap<usize>,
}

/// Per categorical column summary
#[derive(Debug, Serialize)]
pub struct CategoricalSummary {
    pub unique: usize,
    pub values: OrderedMap<usize>,
    pub labels: Vec<String>,
    pub counts: Vec<usize>,
}

impl From<&FrequencyTable> for CategoricalSummary {
    fn from(table: &FrequencyTable) -> Self {
        Self {
            unique: table.unique(),
            values: table.to_map(),
            labels: table.labels(),
            counts: table.counts(),
        }
    }
}

/// The four dashboard charts
#[derive(Debug, Serialize)]
pub struct Charts {
    pub age_distribution: ChartSeries,
    pub department: ChartSeries,
    pub job_role: ChartSeries,
    pub monthly_income: ChartSeries,
}

/// GET /explore payload
#[derive(Debug, Serialize)]
pub struct ExploreReport {
    pub status: &'static str,
    pub summary: DatasetOverview,
    pub numerical: OrderedMap<NumericSummary>,
    pub categorical: OrderedMap<CategoricalSummary>,
    pub charts: Charts,
}

/// Compute the full exploration report
pub fn explore(dataset: &Dataset) -> ApiResult<ExploreReport> {
    let missing = schema::missing_required(&dataset.columns());
    if !missing.is_empty() {
        return Err(ApiError::MissingColumns(missing));
    }

    let mut numerical = OrderedMap::new();
    for name in NUMERIC_COLUMNS {
        numerical.insert(name, stats::numeric_summary(&numeric(dataset, name)?));
    }

    let mut categorical = OrderedMap::new();
    for name in CATEGORICAL_COLUMNS {
        let table = frequency(dataset, name)?;
        categorical.insert(name, CategoricalSummary::from(&table));
    }

    let charts = Charts {
        age_distribution: charts::age_distribution(&numeric(dataset, "Age")?),
        department: ChartSeries::from(&frequency(dataset, "Department")?),
        job_role: ChartSeries::from(&frequency(dataset, "JobRole")?),
        monthly_income: charts::income_distribution(&numeric(dataset, "MonthlyIncome")?)?,
    };

    Ok(ExploreReport {
        status: "success",
        summary: DatasetOverview {
            total_rows: dataset.n_rows(),
            total_cols: dataset.n_cols(),
            missing_values: dataset.missing_counts(),
        },
        numerical,
        categorical,
        charts,
    })
}

/// GET /summary payload body
#[derive(Debug, Serialize)]
pub struct HeadlineSummary {
    pub total_employees: usize,
    pub avg_age: Option<f64>,
    pub avg_income: Option<f64>,
    pub avg_tenure: Option<f64>,
    pub departments: usize,
    pub job_roles: usize,
}

/// Headline workforce figures
pub fn headline(dataset: &Dataset) -> ApiResult<HeadlineSummary> {
    Ok(HeadlineSummary {
        total_employees: dataset.n_rows(),
        avg_age: numeric(dataset, "Age")?.mean(),
        avg_income: numeric(dataset, "MonthlyIncome")?.mean(),
        avg_tenure: numeric(dataset, "YearsAtCompany")?.mean(),
        departments: frequency(dataset, "Department")?.unique(),
        job_roles: frequency(dataset, "JobRole")?.unique(),
    })
}

fn numeric(dataset: &Dataset, name: &str) -> ApiResult<Float64Chunked> {
    dataset
        .numeric_column(name)
        .ok_or_else(|| ApiError::MissingColumns(vec![name.to_string()]))
}

fn frequency(dataset: &Dataset, name: &str) -> ApiResult<FrequencyTable> {
    let series = dataset
        .frame()
        .column(name)
        .map_err(|_| ApiError::MissingColumns(vec![name.to_string()]))?;
    Ok(FrequencyTable::from_series(series)?)
}
