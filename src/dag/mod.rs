//! Decision DAG model and training.
//!
//! A DAG is an arena of [`node::DagNode`]s reached from a single root.
//! Training grows one level at a time with a bounded number of child slots;
//! [`trainer::DagTrainer`] implements the LSearch coordinate descent over
//! thresholds and slot assignments, scored by the evaluators in
//! [`objective`].

pub mod histogram;
pub mod node;
pub(crate) mod objective;
pub mod trainer;

pub use histogram::{EfficientHistogram, Histogram};
pub use node::{Dag, DagNode};
pub use trainer::DagTrainer;
