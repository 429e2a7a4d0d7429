//! Training configuration.
//!
//! [`JungleConfig`] collects every knob of the trainer; [`ConfigBuilder`]
//! offers a fluent way to assemble one. Validation happens eagerly in
//! `build()` and again when a trainer is constructed, so bad parameters
//! never reach the training loop.

use serde::{Deserialize, Serialize};

use crate::core::constants::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_LEVEL_ITERATIONS, DEFAULT_MAX_WIDTH, DEFAULT_NUM_DAGS,
};
use crate::core::error::{JungleError, Result};

/// Parameters controlling jungle training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JungleConfig {
    /// Number of DAGs in the ensemble.
    pub num_dags: usize,
    /// Maximum number of levels below the root of each DAG.
    pub max_depth: usize,
    /// Maximum number of child slots per level (at least 2).
    pub max_width: usize,
    /// Features sampled per threshold search; `None` picks
    /// `ceil(sqrt(feature_dim))` once the dimension is known.
    pub num_feature_samples: Option<usize>,
    /// Cap on threshold/assignment passes within one level.
    pub max_level_iterations: usize,
    /// Train each DAG on a bootstrap resample instead of the full set.
    pub use_bagging: bool,
    /// Examples drawn per DAG when bagging; `None` picks
    /// `min(n, 5n / num_dags)`.
    pub num_training_samples: Option<usize>,
    /// A frontier child with at most this many examples stays a leaf.
    /// 0 disables the gate.
    pub min_split_count: usize,
    /// A child slot whose aggregate count is at most this withholds the
    /// splits feeding it. 0 disables the gate.
    pub min_child_split_count: usize,
    /// Train DAGs in parallel with rayon.
    pub parallel: bool,
    /// Fixed base seed; each DAG derives its own RNG from `seed + index`.
    /// `None` seeds from system entropy.
    pub seed: Option<u64>,
}

impl Default for JungleConfig {
    fn default() -> Self {
        JungleConfig {
            num_dags: DEFAULT_NUM_DAGS,
            max_depth: DEFAULT_MAX_DEPTH,
            max_width: DEFAULT_MAX_WIDTH,
            num_feature_samples: None,
            max_level_iterations: DEFAULT_MAX_LEVEL_ITERATIONS,
            use_bagging: true,
            num_training_samples: None,
            min_split_count: 0,
            min_child_split_count: 0,
            parallel: true,
            seed: None,
        }
    }
}

impl JungleConfig {
    /// Starts a builder with default values.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Checks every parameter that can be checked without knowing the
    /// training data.
    pub fn validate(&self) -> Result<()> {
        if self.num_dags < 1 {
            return Err(JungleError::config("number of DAGs must be positive"));
        }
        if self.max_depth < 1 {
            return Err(JungleError::config("maximum depth must be positive"));
        }
        if self.max_width < 2 {
            return Err(JungleError::config("maximum width must be at least 2"));
        }
        if self.max_level_iterations < 1 {
            return Err(JungleError::config(
                "maximum level iterations must be positive",
            ));
        }
        if self.num_feature_samples == Some(0) {
            return Err(JungleError::config(
                "feature sample count must be positive when set",
            ));
        }
        if self.num_training_samples == Some(0) {
            return Err(JungleError::config(
                "training sample count must be positive when set",
            ));
        }
        Ok(())
    }
}

/// Fluent builder for [`JungleConfig`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: JungleConfig,
}

impl ConfigBuilder {
    /// Sets the number of DAGs.
    pub fn num_dags(mut self, num_dags: usize) -> Self {
        self.config.num_dags = num_dags;
        self
    }

    /// Sets the maximum depth.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Sets the maximum level width.
    pub fn max_width(mut self, max_width: usize) -> Self {
        self.config.max_width = max_width;
        self
    }

    /// Sets the per-search feature sample count.
    pub fn num_feature_samples(mut self, count: usize) -> Self {
        self.config.num_feature_samples = Some(count);
        self
    }

    /// Sets the per-level iteration cap.
    pub fn max_level_iterations(mut self, count: usize) -> Self {
        self.config.max_level_iterations = count;
        self
    }

    /// Enables or disables bootstrap sampling.
    pub fn use_bagging(mut self, enabled: bool) -> Self {
        self.config.use_bagging = enabled;
        self
    }

    /// Sets the per-DAG bootstrap sample count.
    pub fn num_training_samples(mut self, count: usize) -> Self {
        self.config.num_training_samples = Some(count);
        self
    }

    /// Sets the minimum frontier child size.
    pub fn min_split_count(mut self, count: usize) -> Self {
        self.config.min_split_count = count;
        self
    }

    /// Sets the minimum child slot aggregate size.
    pub fn min_child_split_count(mut self, count: usize) -> Self {
        self.config.min_child_split_count = count;
        self
    }

    /// Enables or disables parallel DAG training.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.config.parallel = enabled;
        self
    }

    /// Fixes the base RNG seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<JungleConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(JungleConfig::default().validate().is_ok());
    }

    #[test]
    fn builder_sets_fields() {
        let config = JungleConfig::builder()
            .num_dags(8)
            .max_depth(6)
            .max_width(16)
            .num_feature_samples(2)
            .use_bagging(false)
            .parallel(false)
            .seed(99)
            .build()
            .unwrap();
        assert_eq!(config.num_dags, 8);
        assert_eq!(config.max_depth, 6);
        assert_eq!(config.max_width, 16);
        assert_eq!(config.num_feature_samples, Some(2));
        assert!(!config.use_bagging);
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(99));
    }

    #[test]
    fn zero_depth_is_rejected() {
        let err = JungleConfig::builder().max_depth(0).build().err().unwrap();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn width_below_two_is_rejected() {
        assert!(JungleConfig::builder().max_width(1).build().is_err());
    }

    #[test]
    fn zero_dags_is_rejected() {
        assert!(JungleConfig::builder().num_dags(0).build().is_err());
    }

    #[test]
    fn zero_feature_samples_is_rejected() {
        assert!(JungleConfig::builder().num_feature_samples(0).build().is_err());
    }

    #[test]
    fn config_serde_round_trip() {
        let config = JungleConfig::builder().num_dags(4).seed(1).build().unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let back: JungleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
