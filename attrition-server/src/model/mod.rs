//! Trained model artifacts
//!
//! The preprocessor and classifier are produced offline and loaded once at
//! startup. They are used only through [`FeatureTransform`] and
//! [`Classifier`]; nothing here trains or mutates them.

pub mod classifier;
pub mod preprocessor;

use std::path::Path;
use std::sync::Arc;

use attrition_common::{Error, Result};
use ndarray::Array2;
use serde::Serialize;
use tracing::{info, warn};

use crate::dataset::Dataset;

pub use classifier::{load_classifier, LogisticRegression};
pub use preprocessor::ColumnTransformer;

/// Number of globally most influential features reported
pub const TOP_FEATURES: usize = 5;

/// Feature-encoding step applied before classification
pub trait FeatureTransform: Send + Sync {
    /// Encode a feature table into a numeric matrix (one row per table row)
    fn transform(&self, features: &Dataset) -> Result<Array2<f64>>;

    /// Names of the output matrix columns, when the transform can tell
    fn feature_names_out(&self) -> Option<Vec<String>> {
        None
    }
}

/// Binary attrition classifier
pub trait Classifier: Send + Sync {
    /// Hard labels (0 = stays, 1 = leaves)
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<u8>>;

    /// Class probabilities, shape `(rows, 2)`; column 1 is attrition
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>>;

    /// Linear coefficients aligned with the input features, if the model has them
    fn coefficients(&self) -> Option<&[f64]> {
        None
    }
}

/// Signed weight of one encoded feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureWeight {
    pub feature: String,
    pub coefficient: f64,
}

/// Whether the loaded pair supports a global coefficient ranking
#[derive(Debug, Clone, PartialEq)]
pub enum Explainability {
    /// Features ranked by descending absolute coefficient
    Linear(Vec<FeatureWeight>),
    Opaque,
}

impl Explainability {
    /// Pair coefficients with output feature names
    pub fn resolve(transform: &dyn FeatureTransform, classifier: &dyn Classifier) -> Self {
        let (Some(coefficients), Some(names)) =
            (classifier.coefficients(), transform.feature_names_out())
        else {
            return Explainability::Opaque;
        };

        if coefficients.len() != names.len() {
            warn!(
                "Coefficient count {} does not match feature count {}; importance ranking disabled",
                coefficients.len(),
                names.len()
            );
            return Explainability::Opaque;
        }

        let mut ranked: Vec<FeatureWeight> = names
            .into_iter()
            .zip(coefficients.iter().copied())
            .map(|(feature, coefficient)| FeatureWeight {
                feature,
                coefficient,
            })
            .collect();
        ranked.sort_by(|a, b| b.coefficient.abs().total_cmp(&a.coefficient.abs()));
        Explainability::Linear(ranked)
    }

    /// The `n` strongest features, empty when opaque
    pub fn top(&self, n: usize) -> Vec<FeatureWeight> {
        match self {
            Explainability::Linear(ranked) => ranked.iter().take(n).cloned().collect(),
            Explainability::Opaque => Vec::new(),
        }
    }
}

/// Loaded preprocessor + classifier pair
pub struct ModelArtifacts {
    pub preprocessor: Arc<dyn FeatureTransform>,
    pub classifier: Arc<dyn Classifier>,
    pub explainability: Explainability,
}

impl ModelArtifacts {
    pub fn new(preprocessor: Arc<dyn FeatureTransform>, classifier: Arc<dyn Classifier>) -> Self {
        let explainability = Explainability::resolve(preprocessor.as_ref(), classifier.as_ref());
        Self {
            preprocessor,
            classifier,
            explainability,
        }
    }

    /// Read both artifacts from disk
    pub fn load(model_path: &Path, preprocessor_path: &Path) -> Result<Self> {
        let preprocessor = ColumnTransformer::from_json(&read_artifact(preprocessor_path)?)?;
        info!(
            "Loaded preprocessor from {} ({} output features)",
            preprocessor_path.display(),
            preprocessor.n_features_out()
        );

        let classifier = load_classifier(&read_artifact(model_path)?)?;
        info!("Loaded classifier from {}", model_path.display());

        let artifacts = Self::new(Arc::new(preprocessor), classifier);
        match &artifacts.explainability {
            Explainability::Linear(ranked) => {
                info!("Linear explainability available ({} features)", ranked.len())
            }
            Explainability::Opaque => info!("Classifier is opaque; no importance ranking"),
        }
        Ok(artifacts)
    }
}

fn read_artifact(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| Error::Artifact(format!("Failed to read {}: {}", path.display(), e)))
}
