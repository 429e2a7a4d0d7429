//! Core types, constants, and error handling shared across the crate.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{JungleError, Result};
pub use types::{ClassLabel, FeatureIndex, NodeId, PredictionResult};
