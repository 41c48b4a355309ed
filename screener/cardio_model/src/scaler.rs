use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Pre-fitted per-column z-normalization. Columns follow the same
/// order as the feature vector the classifier was trained on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub(crate) means: Vec<f64>,
    pub(crate) stds: Vec<f64>,
}

impl StandardScaler {
    pub fn new(means: Vec<f64>, stds: Vec<f64>) -> Result<Self, ModelError> {
        let scaler = StandardScaler { means, stds };
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let scaler: StandardScaler = serde_json::from_str(text)?;
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let scaler = Self::from_json(&std::fs::read_to_string(path)?)?;
        debug!("loaded scaler with {} columns from {}", scaler.len(), path.display());
        Ok(scaler)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.means.is_empty() {
            return Err(ModelError::EmptyModel);
        }
        if self.means.len() != self.stds.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.means.len(),
                got: self.stds.len(),
            });
        }
        for (i, mean) in self.means.iter().enumerate() {
            if !mean.is_finite() {
                return Err(ModelError::NonFiniteParameter { what: "scaler mean", index: i });
            }
        }
        for (i, std) in self.stds.iter().enumerate() {
            if !std.is_finite() {
                return Err(ModelError::NonFiniteParameter { what: "scaler std", index: i });
            }
            if *std < 0.0 {
                return Err(ModelError::NegativeStd(i));
            }
        }
        Ok(())
    }

    /// Number of columns the scaler was fitted on.
    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    /// Standardize one input vector. A column with zero spread maps to
    /// 0.0 instead of dividing by it.
    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        if features.len() != self.means.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.means.len(),
                got: features.len(),
            });
        }
        Ok(features
            .iter()
            .zip(self.means.iter().zip(&self.stds))
            .map(|(x, (mean, std))| {
                if *std == 0.0 {
                    0.0
                } else {
                    (x - mean) / std
                }
            })
            .collect())
    }
}
