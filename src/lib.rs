//! Decision jungles in pure Rust.
//!
//! A decision jungle is an ensemble of rooted decision DAGs. Unlike a
//! forest, the nodes of one level share a bounded set of child slots, so
//! several parents can point at the same child; the model stays compact
//! while the ensemble keeps the variance-reducing properties of bagged
//! trees. Each level is trained with LSearch: block-coordinate descent
//! alternating between (feature, threshold) split search and child-slot
//! re-assignment, minimizing the weighted class entropy of the child row
//! via incrementally maintained histograms.
//!
//! # Example
//!
//! ```
//! use jungle_rust::{JungleConfig, JungleTrainer, TrainingExample};
//!
//! fn main() -> jungle_rust::Result<()> {
//!     let mut examples = Vec::new();
//!     for i in 0..20 {
//!         examples.push(TrainingExample::new(vec![-2.0 - 0.1 * i as f64], 0));
//!         examples.push(TrainingExample::new(vec![2.0 + 0.1 * i as f64], 1));
//!     }
//!
//!     let config = JungleConfig::builder()
//!         .num_dags(4)
//!         .max_depth(4)
//!         .seed(42)
//!         .build()?;
//!     let jungle = JungleTrainer::new(config)?.train(&examples)?;
//!
//!     let prediction = jungle.predict(&[-3.0]).unwrap();
//!     assert_eq!(prediction.label(), 0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod core;
pub mod dag;
pub mod dataset;
pub mod io;
pub mod jungle;
pub mod metrics;

pub use crate::config::{ConfigBuilder, JungleConfig};
pub use crate::core::error::{JungleError, Result};
pub use crate::core::types::{ClassLabel, FeatureIndex, NodeId, PredictionResult};
pub use crate::dag::histogram::{EfficientHistogram, Histogram};
pub use crate::dag::node::{Dag, DagNode};
pub use crate::dag::trainer::DagTrainer;
pub use crate::dataset::{
    bootstrap_sample, load_examples, load_unlabeled, read_examples, read_unlabeled,
    validate_examples, TrainingExample,
};
pub use crate::io::{load_jungle, read_jungle, save_jungle, write_jungle};
pub use crate::jungle::{Jungle, JungleTrainer, NullProgress, ProgressSink};
pub use crate::metrics::{classification_error, confusion_matrix, prediction_histogram};

/// Crate version, straight from the manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
