//! Classifier artifacts

use std::sync::Arc;

use attrition_common::{Error, Result};
use ndarray::{Array1, Array2};
use serde::Deserialize;

use super::Classifier;

/// Serialized classifier, tagged by model family
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ClassifierArtifact {
    LogisticRegression { coef: Vec<f64>, intercept: f64 },
}

/// Decode a classifier artifact
pub fn load_classifier(json: &str) -> Result<Arc<dyn Classifier>> {
    let artifact: ClassifierArtifact = serde_json::from_str(json)
        .map_err(|e| Error::Artifact(format!("Invalid model artifact: {}", e)))?;

    match artifact {
        ClassifierArtifact::LogisticRegression { coef, intercept } => {
            if coef.is_empty() {
                return Err(Error::Artifact("Logistic regression has no coefficients".to_string()));
            }
            Ok(Arc::new(LogisticRegression::new(coef, intercept)))
        }
    }
}

/// Binary logistic regression
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    coef: Array1<f64>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(coef: Vec<f64>, intercept: f64) -> Self {
        Self {
            coef: Array1::from(coef),
            intercept,
        }
    }

    /// Log-odds of attrition per row
    pub fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.coef.len() {
            return Err(Error::Internal(format!(
                "X has {} features, but the classifier expects {} features as input",
                x.ncols(),
                self.coef.len()
            )));
        }
        Ok(x.dot(&self.coef) + self.intercept)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Classifier for LogisticRegression {
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<u8>> {
        Ok(self
            .decision_function(x)?
            .iter()
            .map(|z| u8::from(*z > 0.0))
            .collect())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let z = self.decision_function(x)?;
        let mut proba = Array2::zeros((z.len(), 2));
        for (i, zi) in z.iter().enumerate() {
            let p = sigmoid(*zi);
            proba[[i, 0]] = 1.0 - p;
            proba[[i, 1]] = p;
        }
        Ok(proba)
    }

    fn coefficients(&self) -> Option<&[f64]> {
        self.coef.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_zero_decision_is_even_odds() {
        let model = LogisticRegression::new(vec![1.0, -1.0], 0.0);
        let x = array![[2.0, 2.0], [3.0, 0.0]];

        let proba = model.predict_proba(&x).unwrap();
        assert_eq!(proba[[0, 1]], 0.5);
        assert!((proba[[1, 1]] - sigmoid(3.0)).abs() < 1e-12);
        assert!((proba[[1, 0]] + proba[[1, 1]] - 1.0).abs() < 1e-12);

        assert_eq!(model.predict(&x).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_width_mismatch_is_error() {
        let model = LogisticRegression::new(vec![1.0, 2.0, 3.0], 0.5);
        let x = array![[1.0, 2.0]];
        assert!(model.predict_proba(&x).is_err());
    }

    #[test]
    fn test_load_from_json() {
        let json = r#"{"kind": "logistic_regression", "coef": [0.5, -0.25], "intercept": -1.0}"#;
        let model = load_classifier(json).unwrap();
        assert_eq!(model.coefficients(), Some(&[0.5, -0.25][..]));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = load_classifier(r#"{"kind": "random_forest", "trees": []}"#).err().unwrap();
        assert!(matches!(err, Error::Artifact(_)));
    }
}
