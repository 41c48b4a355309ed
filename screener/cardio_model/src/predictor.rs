use std::path::Path;

use log::debug;

use crate::classifier::{Classifier, ClassifierBackend, ClassifierKind, LogisticClassifier};
use crate::scaler::StandardScaler;
use crate::ModelError;

/// A validated scaler + classifier pair. The only inference entry
/// point the rest of the workspace uses.
#[derive(Debug, Clone)]
pub struct Predictor {
    scaler: StandardScaler,
    classifier: Classifier,
}

impl Predictor {
    /// Pair a scaler with a classifier. Their dimensions must agree;
    /// catching the mismatch here keeps it out of the predict path.
    pub fn new(scaler: StandardScaler, classifier: Classifier) -> Result<Self, ModelError> {
        if scaler.len() != classifier.n_features() {
            return Err(ModelError::DimensionMismatch {
                expected: scaler.len(),
                got: classifier.n_features(),
            });
        }
        Ok(Predictor { scaler, classifier })
    }

    /// Load both artifacts from JSON files.
    pub fn from_files(
        scaler_path: impl AsRef<Path>,
        classifier_path: impl AsRef<Path>,
    ) -> Result<Self, ModelError> {
        let scaler = StandardScaler::from_file(scaler_path)?;
        let classifier = Classifier::from_file(classifier_path)?;
        Self::new(scaler, classifier)
    }

    pub fn n_features(&self) -> usize {
        self.scaler.len()
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Scale the raw feature vector and return the probability of
    /// disease. Deterministic; the same input always yields the same
    /// probability.
    pub fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        let scaled = self.scaler.transform(features)?;
        let probability = self.classifier.predict_proba(&scaled)?;
        debug!("predicted probability {probability:.6}");
        Ok(probability)
    }

    /// A built-in artifact pair fitted on the thirteen-column heart
    /// dataset, so the screener runs without any files on disk.
    pub fn demo() -> Predictor {
        let scaler = StandardScaler {
            means: vec![
                54.4, 0.68, 1.97, 131.6, 246.7, 0.15, 0.99, 149.6, 0.33, 1.04, 0.67, 0.73, 1.2,
            ],
            stds: vec![
                9.1, 0.47, 1.03, 17.5, 51.8, 0.36, 0.99, 22.9, 0.47, 1.16, 0.62, 1.02, 0.9,
            ],
        };
        let classifier = Classifier {
            name: "cardio-demo".to_string(),
            version: "1.0.0".to_string(),
            kind: ClassifierKind::Logistic(LogisticClassifier {
                weights: vec![
                    0.35, 0.55, 0.62, 0.28, 0.22, 0.10, 0.12, -0.58, 0.48, 0.65, 0.40, 0.85, 0.70,
                ],
                bias: -0.30,
            }),
        };
        Predictor { scaler, classifier }
    }
}
