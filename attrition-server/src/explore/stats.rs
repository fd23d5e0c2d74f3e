//! Descriptive statistics over coerced columns

use polars::prelude::*;
use serde::Serialize;

use crate::dataset::{text_at, OrderedMap};

/// Per numeric column summary; `None` serializes as null
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub median: Option<f64>,
}

/// Summarize the non-null values of a column
///
/// `std` is the sample standard deviation (n - 1 denominator), so it needs
/// at least two values.
pub fn numeric_summary(values: &Float64Chunked) -> NumericSummary {
    let present = values.len() - values.null_count();
    NumericSummary {
        mean: values.mean(),
        std: if present > 1 { values.std(1) } else { None },
        min: values.min(),
        max: values.max(),
        median: values.median(),
    }
}

/// Value counts of a column, most frequent first
///
/// Ties are ordered by label. Nulls are not counted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
}

impl FrequencyTable {
    pub fn from_series(series: &Series) -> PolarsResult<Self> {
        let counted = series.value_counts(false, true)?;
        let [values, counts] = counted.get_columns() else {
            return Err(PolarsError::ComputeError("value counts must have two columns".into()));
        };
        let counts = counts.cast(&DataType::UInt64)?;
        let counts = counts.u64()?;

        let mut entries: Vec<(String, usize)> = (0..counted.height())
            .filter_map(|i| Some((text_at(values, i)?, counts.get(i)? as usize)))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(Self { entries })
    }

    /// Distinct non-null values
    pub fn unique(&self) -> usize {
        self.entries.len()
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|(l, _)| l.clone()).collect()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.entries.iter().map(|(_, c)| *c).collect()
    }

    pub fn to_map(&self) -> OrderedMap<usize> {
        OrderedMap(self.entries.clone())
    }
}
