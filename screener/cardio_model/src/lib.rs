//! Pre-fitted artifacts for the cardio screener.
//!
//! The crate loads two opaque JSON artifacts, a [`StandardScaler`] and a
//! [`Classifier`], validates them, and exposes a single inference entry
//! point: [`Predictor::predict`] takes a fixed-order feature vector and
//! returns the probability of disease. Nothing here trains or refits;
//! artifacts are produced elsewhere and consumed read-only.
//!
//! Both artifact types validate on load, so a `Predictor` never holds
//! NaN parameters, mismatched dimensions, or a tree that could walk out
//! of bounds. [`Predictor::demo`] provides a built-in artifact pair for
//! running without files.

pub mod classifier;
pub mod predictor;
pub mod scaler;

use thiserror::Error;

pub use classifier::{
    Classifier, ClassifierBackend, ClassifierKind, LogisticClassifier, Tree,
    TreeEnsembleClassifier, TreeNode,
};
pub use predictor::Predictor;
pub use scaler::StandardScaler;

/// Errors from loading, validating, or applying model artifacts.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid artifact JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("dimension mismatch: expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("{what}[{index}] is not finite")]
    NonFiniteParameter { what: &'static str, index: usize },

    #[error("scaler std[{0}] is negative")]
    NegativeStd(usize),

    #[error("artifact has no parameters")]
    EmptyModel,

    #[error("tree {tree} is malformed: {reason}")]
    BadTree { tree: usize, reason: String },
}
