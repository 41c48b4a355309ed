use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// A pre-fitted binary classifier over a fixed-order feature vector.
/// Inputs are expected to be scaled already.
pub trait ClassifierBackend {
    /// Number of input columns the classifier was trained on.
    fn n_features(&self) -> usize;

    /// Probability of the positive class for one scaled input vector.
    fn predict_proba(&self, features: &[f64]) -> Result<f64, ModelError>;
}

pub(crate) fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn dot(xs: &[f64], ys: &[f64]) -> f64 {
    xs.iter().zip(ys).map(|(x, y)| x * y).sum()
}

/// Logistic regression: sigmoid(w . x + b).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub(crate) weights: Vec<f64>,
    pub(crate) bias: f64,
}

impl LogisticClassifier {
    pub fn new(weights: Vec<f64>, bias: f64) -> Result<Self, ModelError> {
        let classifier = LogisticClassifier { weights, bias };
        classifier.validate()?;
        Ok(classifier)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.weights.is_empty() {
            return Err(ModelError::EmptyModel);
        }
        for (i, w) in self.weights.iter().enumerate() {
            if !w.is_finite() {
                return Err(ModelError::NonFiniteParameter { what: "weight", index: i });
            }
        }
        if !self.bias.is_finite() {
            return Err(ModelError::NonFiniteParameter { what: "bias", index: 0 });
        }
        Ok(())
    }
}

impl ClassifierBackend for LogisticClassifier {
    fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn predict_proba(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.weights.len(),
                got: features.len(),
            });
        }
        Ok(sigmoid(dot(features, &self.weights) + self.bias))
    }
}

/// One node of a regression tree. Split nodes route on
/// `features[feature] < threshold` (left on true), leaves contribute
/// their margin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        margin: f64,
    },
}

/// A regression tree stored as a flat node array rooted at index 0.
/// Children always sit at higher indices than their parent, so a walk
/// strictly descends and terminates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    fn validate(&self, tree: usize, n_features: usize) -> Result<(), ModelError> {
        let bad = |reason: String| ModelError::BadTree { tree, reason };
        if self.nodes.is_empty() {
            return Err(bad("tree has no nodes".to_string()));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Leaf { margin } => {
                    if !margin.is_finite() {
                        return Err(bad(format!("node {i} has a non-finite margin")));
                    }
                }
                TreeNode::Split { feature, threshold, left, right } => {
                    if *feature >= n_features {
                        return Err(bad(format!(
                            "node {i} splits on feature {feature}, model has {n_features}"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(bad(format!("node {i} has a non-finite threshold")));
                    }
                    for (side, child) in [("left", *left), ("right", *right)] {
                        if child <= i {
                            return Err(bad(format!(
                                "node {i} {side} child {child} does not descend"
                            )));
                        }
                        if child >= self.nodes.len() {
                            return Err(bad(format!(
                                "node {i} {side} child {child} is out of bounds"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk the tree for one input vector. Callers guarantee the vector
    /// covers every feature index the tree was validated against.
    fn margin(&self, features: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { margin } => return *margin,
                TreeNode::Split { feature, threshold, left, right } => {
                    index = if features[*feature] < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// Gradient-boosted tree ensemble: leaf margins summed over all trees,
/// plus a base margin, passed through a sigmoid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsembleClassifier {
    pub(crate) n_features: usize,
    pub(crate) base_margin: f64,
    pub(crate) trees: Vec<Tree>,
}

impl TreeEnsembleClassifier {
    pub fn new(n_features: usize, base_margin: f64, trees: Vec<Tree>) -> Result<Self, ModelError> {
        let classifier = TreeEnsembleClassifier { n_features, base_margin, trees };
        classifier.validate()?;
        Ok(classifier)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.n_features == 0 || self.trees.is_empty() {
            return Err(ModelError::EmptyModel);
        }
        if !self.base_margin.is_finite() {
            return Err(ModelError::NonFiniteParameter { what: "base_margin", index: 0 });
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i, self.n_features)?;
        }
        Ok(())
    }
}

impl ClassifierBackend for TreeEnsembleClassifier {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                got: features.len(),
            });
        }
        let margin: f64 = self.trees.iter().map(|t| t.margin(features)).sum();
        Ok(sigmoid(margin + self.base_margin))
    }
}

/// The supported classifier families, tagged in the artifact JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierKind {
    Logistic(LogisticClassifier),
    TreeEnsemble(TreeEnsembleClassifier),
}

/// The on-disk classifier artifact: a backend plus human-readable
/// metadata. `name` and `version` are labels, nothing schedules on
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classifier {
    pub name: String,
    pub version: String,
    #[serde(flatten)]
    pub(crate) kind: ClassifierKind,
}

impl Classifier {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        kind: ClassifierKind,
    ) -> Result<Self, ModelError> {
        let classifier = Classifier { name: name.into(), version: version.into(), kind };
        classifier.validate()?;
        Ok(classifier)
    }

    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let classifier: Classifier = serde_json::from_str(text)?;
        classifier.validate()?;
        Ok(classifier)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let classifier = Self::from_json(&std::fs::read_to_string(path)?)?;
        debug!(
            "loaded {} classifier `{}` v{} from {}",
            classifier.kind_name(),
            classifier.name,
            classifier.version,
            path.display()
        );
        Ok(classifier)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        match &self.kind {
            ClassifierKind::Logistic(c) => c.validate(),
            ClassifierKind::TreeEnsemble(c) => c.validate(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ClassifierKind::Logistic(_) => "logistic",
            ClassifierKind::TreeEnsemble(_) => "tree_ensemble",
        }
    }
}

impl ClassifierBackend for Classifier {
    fn n_features(&self) -> usize {
        match &self.kind {
            ClassifierKind::Logistic(c) => c.n_features(),
            ClassifierKind::TreeEnsemble(c) => c.n_features(),
        }
    }

    fn predict_proba(&self, features: &[f64]) -> Result<f64, ModelError> {
        match &self.kind {
            ClassifierKind::Logistic(c) => c.predict_proba(features),
            ClassifierKind::TreeEnsemble(c) => c.predict_proba(features),
        }
    }
}
