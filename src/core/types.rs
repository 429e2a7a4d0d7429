//! Fundamental type aliases and small value types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Class label of a training example or prediction. Labels are dense
/// non-negative integers; the class count is `max label + 1`.
pub type ClassLabel = usize;

/// Index of a node inside a DAG or jungle arena.
pub type NodeId = usize;

/// Index of a feature column inside a feature vector.
pub type FeatureIndex = usize;

/// Outcome of a majority vote over the DAGs of a jungle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    label: ClassLabel,
    confidence: f64,
}

impl PredictionResult {
    /// Creates a new prediction result. `confidence` is the fraction of
    /// DAGs that voted for `label`.
    pub fn new(label: ClassLabel, confidence: f64) -> Self {
        PredictionResult { label, confidence }
    }

    /// The winning class label.
    pub fn label(&self) -> ClassLabel {
        self.label
    }

    /// Fraction of DAGs that voted for the winning label, in `[0, 1]`.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {} ({:.1}%)", self.label, self.confidence * 100.0)
    }
}
