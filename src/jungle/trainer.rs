//! Ensemble training: many DAGs, optionally in parallel.
//!
//! Parallelism is only across DAGs; each DAG trains single-threaded over
//! its own data. The shared jungle is behind a mutex entered exactly once
//! per finished DAG, together with the progress report. Progress rendering
//! itself is a collaborator: implement [`ProgressSink`] to observe
//! completions (the default [`NullProgress`] ignores them).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::config::JungleConfig;
use crate::core::error::{JungleError, Result};
use crate::dag::trainer::DagTrainer;
use crate::dataset::{bootstrap_sample, validate_examples, TrainingExample};
use crate::jungle::Jungle;

/// Receives a notification whenever a DAG finishes training.
pub trait ProgressSink: Sync {
    /// Called with the number of finished DAGs and the ensemble size.
    fn report(&self, finished: usize, total: usize);
}

/// Progress sink that discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&self, _finished: usize, _total: usize) {}
}

/// Default per-DAG bootstrap sample count: `min(n, 5n / num_dags)`, at
/// least 1.
fn auto_sample_count(n: usize, num_dags: usize) -> usize {
    n.min(5 * n / num_dags).max(1)
}

/// Trains an ensemble of DAGs into a [`Jungle`].
pub struct JungleTrainer {
    config: JungleConfig,
}

impl JungleTrainer {
    /// Validates the configuration and creates a trainer.
    pub fn new(config: JungleConfig) -> Result<Self> {
        config.validate()?;
        Ok(JungleTrainer { config })
    }

    /// The trainer's configuration.
    pub fn config(&self) -> &JungleConfig {
        &self.config
    }

    /// Trains the configured number of DAGs without progress reporting.
    pub fn train(&self, examples: &[TrainingExample]) -> Result<Jungle> {
        self.train_with_progress(examples, &NullProgress)
    }

    /// Trains the configured number of DAGs, reporting each completion.
    pub fn train_with_progress(
        &self,
        examples: &[TrainingExample],
        progress: &dyn ProgressSink,
    ) -> Result<Jungle> {
        let (feature_dim, class_count) = validate_examples(examples)?;
        let n = examples.len();
        let num_dags = self.config.num_dags;
        let samples_per_dag = if self.config.use_bagging {
            self.config
                .num_training_samples
                .unwrap_or_else(|| auto_sample_count(n, num_dags))
        } else {
            n
        };
        log::info!(
            "training {} DAGs on {} examples ({} features, {} classes, {} samples per DAG)",
            num_dags,
            n,
            feature_dim,
            class_count,
            samples_per_dag
        );

        let finished = AtomicUsize::new(0);
        let shared = Mutex::new(Jungle::new());
        let train_one = |index: usize| -> Result<()> {
            let mut rng = match self.config.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
                None => StdRng::from_entropy(),
            };
            let indices = if self.config.use_bagging {
                bootstrap_sample(n, samples_per_dag, &mut rng)
            } else {
                (0..n).collect()
            };
            let dag = DagTrainer::new(&self.config, examples, indices, rng)?.train()?;
            log::debug!("DAG {} finished with {} nodes", index, dag.len());

            let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
            let mut jungle = shared
                .lock()
                .map_err(|_| JungleError::internal("jungle lock poisoned"))?;
            jungle.insert_dag(dag);
            progress.report(done, num_dags);
            Ok(())
        };

        if self.config.parallel && num_dags > 1 {
            (0..num_dags).into_par_iter().try_for_each(train_one)?;
        } else {
            for index in 0..num_dags {
                train_one(index)?;
            }
        }

        shared
            .into_inner()
            .map_err(|_| JungleError::internal("jungle lock poisoned"))
    }
}
