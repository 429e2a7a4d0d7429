//! Training data: examples, delimited-text loading, bootstrap sampling.
//!
//! Data files carry one example per line, comma-delimited. Column 0 is the
//! integer class label (absent for unlabeled sets); every remaining column
//! is an `f64` feature. Blank lines are skipped; any malformed row aborts
//! the whole load.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use rand::Rng;

use crate::core::error::{JungleError, Result};
use crate::core::types::ClassLabel;

/// One labeled feature vector. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    features: Vec<f64>,
    label: ClassLabel,
}

impl TrainingExample {
    /// Creates a labeled example.
    pub fn new(features: Vec<f64>, label: ClassLabel) -> Self {
        TrainingExample { features, label }
    }

    /// The feature vector.
    pub fn features(&self) -> &[f64] {
        &self.features
    }

    /// The class label.
    pub fn label(&self) -> ClassLabel {
        self.label
    }

    /// Number of feature columns.
    pub fn feature_dim(&self) -> usize {
        self.features.len()
    }
}

/// Loads labeled examples from a comma-delimited file.
pub fn load_examples<P: AsRef<Path>>(path: P) -> Result<Vec<TrainingExample>> {
    let file = File::open(path.as_ref())?;
    let examples = read_examples(BufReader::new(file))?;
    log::debug!(
        "loaded {} examples from {}",
        examples.len(),
        path.as_ref().display()
    );
    Ok(examples)
}

/// Reads labeled examples from any reader.
pub fn read_examples<R: Read>(reader: R) -> Result<Vec<TrainingExample>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut examples = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        if record.len() < 2 {
            return Err(JungleError::data_loading(format!(
                "row {}: expected a label and at least one feature",
                row + 1
            )));
        }
        let label: i64 = record[0].trim().parse().map_err(|_| {
            JungleError::data_loading(format!("row {}: invalid class label '{}'", row + 1, &record[0]))
        })?;
        if label < 0 {
            return Err(JungleError::data_loading(format!(
                "row {}: class labels must be non-negative",
                row + 1
            )));
        }
        let features = parse_features(&record, 1, row)?;
        examples.push(TrainingExample::new(features, label as ClassLabel));
    }
    Ok(examples)
}

/// Loads unlabeled feature vectors from a comma-delimited file.
pub fn load_unlabeled<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<f64>>> {
    let file = File::open(path.as_ref())?;
    read_unlabeled(BufReader::new(file))
}

/// Reads unlabeled feature vectors from any reader.
pub fn read_unlabeled<R: Read>(reader: R) -> Result<Vec<Vec<f64>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut points = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        points.push(parse_features(&record, 0, row)?);
    }
    Ok(points)
}

fn parse_features(record: &csv::StringRecord, start: usize, row: usize) -> Result<Vec<f64>> {
    record
        .iter()
        .skip(start)
        .map(|field| {
            field.trim().parse::<f64>().map_err(|_| {
                JungleError::data_loading(format!(
                    "row {}: invalid feature value '{}'",
                    row + 1,
                    field
                ))
            })
        })
        .collect()
}

/// Checks that a training slice is non-empty and dimensionally consistent.
/// Returns `(feature_dim, class_count)`.
pub fn validate_examples(examples: &[TrainingExample]) -> Result<(usize, usize)> {
    let Some(first) = examples.first() else {
        return Err(JungleError::dataset("training set is empty"));
    };
    let feature_dim = first.feature_dim();
    if feature_dim == 0 {
        return Err(JungleError::dataset("examples carry no features"));
    }
    let mut max_label = 0;
    for (i, ex) in examples.iter().enumerate() {
        if ex.feature_dim() != feature_dim {
            return Err(JungleError::dataset(format!(
                "example {} has {} features, expected {}",
                i,
                ex.feature_dim(),
                feature_dim
            )));
        }
        max_label = max_label.max(ex.label());
    }
    Ok((feature_dim, max_label + 1))
}

/// Draws `count` example indices uniformly with replacement.
pub fn bootstrap_sample<R: Rng>(n: usize, count: usize, rng: &mut R) -> Vec<usize> {
    (0..count).map(|_| rng.gen_range(0..n)).collect()
}
