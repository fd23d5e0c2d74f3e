//! Column transformer artifact
//!
//! JSON layout:
//!
//! ```json
//! {
//!   "transformers": [
//!     { "kind": "standard_scaler", "name": "num", "columns": ["Age"], "mean": [36.9], "scale": [9.1] },
//!     { "kind": "one_hot", "name": "cat", "columns": ["OverTime"], "categories": [["No", "Yes"]], "drop": ["No"] }
//!   ]
//! }
//! ```
//!
//! Blocks are applied in order and their outputs concatenated. Columns not
//! named by any block are dropped.

use attrition_common::{Error, Result};
use ndarray::Array2;
use serde::Deserialize;

use super::FeatureTransform;
use crate::dataset::Dataset;

/// One encoding block
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformerBlock {
    /// `(x - mean) / scale`; missing values take `fill` (default: mean)
    StandardScaler {
        name: String,
        columns: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
        #[serde(default)]
        fill: Option<Vec<f64>>,
    },
    /// One indicator per known category; unknown or missing values encode as all zeros
    ///
    /// `drop` names, per column, a category that gets no indicator (`null` keeps all).
    OneHot {
        name: String,
        columns: Vec<String>,
        categories: Vec<Vec<String>>,
        #[serde(default)]
        drop: Option<Vec<Option<String>>>,
    },
}

/// Categories that get an indicator column, in output order
fn kept<'a>(known: &'a [String], dropped: Option<&String>) -> Vec<&'a String> {
    known.iter().filter(|c| Some(*c) != dropped).collect()
}

/// Dropped category for column `j`, if any
fn dropped_at(drop: &Option<Vec<Option<String>>>, j: usize) -> Option<&String> {
    drop.as_ref().and_then(|d| d.get(j)).and_then(Option::as_ref)
}

impl TransformerBlock {
    fn columns(&self) -> &[String] {
        match self {
            TransformerBlock::StandardScaler { columns, .. } => columns,
            TransformerBlock::OneHot { columns, .. } => columns,
        }
    }

    fn width(&self) -> usize {
        match self {
            TransformerBlock::StandardScaler { columns, .. } => columns.len(),
            TransformerBlock::OneHot {
                categories, drop, ..
            } => categories
                .iter()
                .enumerate()
                .map(|(j, known)| kept(known, dropped_at(drop, j)).len())
                .sum(),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            TransformerBlock::StandardScaler {
                name,
                columns,
                mean,
                scale,
                fill,
            } => {
                let n = columns.len();
                let fill_ok = fill.as_ref().map_or(true, |f| f.len() == n);
                if mean.len() != n || scale.len() != n || !fill_ok {
                    return Err(Error::Artifact(format!(
                        "Scaler '{}' parameter lengths do not match its {} columns",
                        name, n
                    )));
                }
            }
            TransformerBlock::OneHot {
                name,
                columns,
                categories,
                drop,
            } => {
                if categories.len() != columns.len() {
                    return Err(Error::Artifact(format!(
                        "Encoder '{}' has {} category lists for {} columns",
                        name,
                        categories.len(),
                        columns.len()
                    )));
                }
                if let Some(drop) = drop {
                    if drop.len() != columns.len() {
                        return Err(Error::Artifact(format!(
                            "Encoder '{}' has {} drop entries for {} columns",
                            name,
                            drop.len(),
                            columns.len()
                        )));
                    }
                    let unknown = drop
                        .iter()
                        .zip(categories)
                        .find(|(d, known)| matches!(d, Some(d) if !known.contains(d)));
                    if let Some((Some(d), _)) = unknown {
                        return Err(Error::Artifact(format!(
                            "Encoder '{}' drops unknown category '{}'",
                            name, d
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

fn absent_column(names: &str) -> Error {
    Error::Internal(format!("columns are missing: {}", names))
}

/// Ordered set of encoding blocks
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnTransformer {
    transformers: Vec<TransformerBlock>,
}

impl ColumnTransformer {
    pub fn new(transformers: Vec<TransformerBlock>) -> Result<Self> {
        let transformer = Self { transformers };
        for block in &transformer.transformers {
            block.validate()?;
        }
        Ok(transformer)
    }

    /// Decode and validate the JSON artifact
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: ColumnTransformer = serde_json::from_str(json)
            .map_err(|e| Error::Artifact(format!("Invalid preprocessor artifact: {}", e)))?;
        Self::new(parsed.transformers)
    }

    pub fn n_features_out(&self) -> usize {
        self.transformers.iter().map(TransformerBlock::width).sum()
    }
}

impl FeatureTransform for ColumnTransformer {
    fn transform(&self, features: &Dataset) -> Result<Array2<f64>> {
        let absent: Vec<&str> = self
            .transformers
            .iter()
            .flat_map(TransformerBlock::columns)
            .filter(|c| !features.has_column(c))
            .map(String::as_str)
            .collect();
        if !absent.is_empty() {
            return Err(absent_column(&absent.join(", ")));
        }

        let mut out = Array2::zeros((features.n_rows(), self.n_features_out()));
        let mut offset = 0;

        for block in &self.transformers {
            match block {
                TransformerBlock::StandardScaler {
                    columns,
                    mean,
                    scale,
                    fill,
                    ..
                } => {
                    for (j, column) in columns.iter().enumerate() {
                        // Zero variance columns were left unscaled at fit time
                        let s = if scale[j] == 0.0 { 1.0 } else { scale[j] };
                        let default = fill.as_ref().map_or(mean[j], |f| f[j]);
                        let values = features
                            .numeric_column(column)
                            .ok_or_else(|| absent_column(column))?;
                        for (i, x) in values.into_iter().enumerate() {
                            out[[i, offset + j]] = (x.unwrap_or(default) - mean[j]) / s;
                        }
                    }
                    offset += columns.len();
                }
                TransformerBlock::OneHot {
                    columns,
                    categories,
                    drop,
                    ..
                } => {
                    for (j, (column, known)) in columns.iter().zip(categories).enumerate() {
                        let slots = kept(known, dropped_at(drop, j));
                        let values = features
                            .text_column(column)
                            .ok_or_else(|| absent_column(column))?;
                        for (i, value) in values.iter().enumerate() {
                            let hit = value
                                .as_ref()
                                .and_then(|v| slots.iter().position(|c| *c == v));
                            if let Some(k) = hit {
                                out[[i, offset + k]] = 1.0;
                            }
                        }
                        offset += slots.len();
                    }
                }
            }
        }

        Ok(out)
    }

    fn feature_names_out(&self) -> Option<Vec<String>> {
        let mut names = Vec::with_capacity(self.n_features_out());
        for block in &self.transformers {
            match block {
                TransformerBlock::StandardScaler { name, columns, .. } => {
                    names.extend(columns.iter().map(|c| format!("{}__{}", name, c)));
                }
                TransformerBlock::OneHot {
                    name,
                    columns,
                    categories,
                    drop,
                } => {
                    for (j, (column, known)) in columns.iter().zip(categories).enumerate() {
                        names.extend(
                            kept(known, dropped_at(drop, j))
                                .into_iter()
                                .map(|k| format!("{}__{}_{}", name, column, k)),
                        );
                    }
                }
            }
        }
        Some(names)
    }
}
