//! Chart-ready binned distributions

use polars::prelude::*;
use serde::Serialize;

use super::stats::FrequencyTable;
use crate::format::group_thousands;

/// Age bin edges; bins are right-open `[lo, hi)`
pub const AGE_BIN_EDGES: [f64; 6] = [0.0, 25.0, 35.0, 45.0, 55.0, 65.0];

/// Display labels for the age bins (first label reads 18-25 regardless of the 0 edge)
pub const AGE_BIN_LABELS: [&str; 5] = ["18-25", "25-35", "35-45", "45-55", "55-65"];

/// Index-aligned labels and counts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
}

impl From<&FrequencyTable> for ChartSeries {
    fn from(table: &FrequencyTable) -> Self {
        Self {
            labels: table.labels(),
            values: table.counts(),
        }
    }
}

/// Count ages into the five fixed bands
pub fn age_distribution(ages: &Float64Chunked) -> ChartSeries {
    let values = AGE_BIN_EDGES
        .windows(2)
        .map(|edge| count(&(ages.gt_eq(edge[0]) & ages.lt(edge[1]))))
        .collect();

    ChartSeries {
        labels: AGE_BIN_LABELS.iter().map(|l| l.to_string()).collect(),
        values,
    }
}

/// Split incomes into equal-frequency quartile buckets
///
/// Buckets are `(e_i, e_i+1]`, the first one also closed on the left.
/// Edges that collapse onto each other are dropped, so heavily repeated
/// incomes may yield fewer than four buckets.
pub fn income_distribution(incomes: &Float64Chunked) -> PolarsResult<ChartSeries> {
    let mut edges = Vec::with_capacity(5);
    for q in [0.0, 0.25, 0.5, 0.75, 1.0] {
        if let Some(edge) = incomes.quantile(q, QuantileInterpolOptions::Linear)? {
            edges.push(edge);
        }
    }
    edges.dedup();
    if edges.len() < 2 {
        return Ok(ChartSeries::default());
    }

    let values = edges
        .windows(2)
        .enumerate()
        .map(|(i, edge)| {
            let above_low = if i == 0 {
                incomes.gt_eq(edge[0])
            } else {
                incomes.gt(edge[0])
            };
            count(&(above_low & incomes.lt_eq(edge[1])))
        })
        .collect();

    let labels = edges
        .windows(2)
        .map(|edge| {
            format!(
                "${} - ${}",
                group_thousands(edge[0] as i64),
                group_thousands(edge[1] as i64)
            )
        })
        .collect();

    Ok(ChartSeries { labels, values })
}

/// Rows where the mask is true; null comparisons do not count
fn count(mask: &BooleanChunked) -> usize {
    mask.into_iter().filter(|hit| *hit == Some(true)).count()
}
