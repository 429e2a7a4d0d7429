//! Shared helpers for the integration tests.

use jungle_rust::TrainingExample;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Initializes logging once per test binary; safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Four well-separated 2-D Gaussian blobs, one per class, `n / 4` examples
/// each. Centers follow the classic benchmark scenario: class 0 sits far
/// away at (-1, 25), the others at (1, 1), (-1, 1) and (1, -1), all with
/// standard deviation 0.5.
pub fn gaussian_blobs(n: usize, seed: u64) -> Vec<TrainingExample> {
    let mut rng = StdRng::seed_from_u64(seed);
    let low = Normal::new(-1.0, 0.5).unwrap();
    let high = Normal::new(1.0, 0.5).unwrap();
    let far = Normal::new(25.0, 0.5).unwrap();

    let mut examples = Vec::with_capacity(n);
    let per_class = n / 4;
    for _ in 0..per_class {
        examples.push(TrainingExample::new(
            vec![low.sample(&mut rng), far.sample(&mut rng)],
            0,
        ));
    }
    for _ in 0..per_class {
        examples.push(TrainingExample::new(
            vec![high.sample(&mut rng), high.sample(&mut rng)],
            1,
        ));
    }
    for _ in 0..per_class {
        examples.push(TrainingExample::new(
            vec![low.sample(&mut rng), high.sample(&mut rng)],
            2,
        ));
    }
    for _ in 0..per_class {
        examples.push(TrainingExample::new(
            vec![high.sample(&mut rng), low.sample(&mut rng)],
            3,
        ));
    }
    examples
}
