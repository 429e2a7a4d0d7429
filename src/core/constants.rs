//! Numeric constants and training defaults.

/// Minimum entropy improvement a level must deliver over its parent row.
/// Anything at or below this aborts growth of the branch.
pub const ENTROPY_IMPROVEMENT_EPSILON: f64 = 1e-6;

/// Two adjacent sorted feature values must differ by at least this much
/// before the midpoint between them is considered a split candidate.
pub const MIN_THRESHOLD_GAP: f64 = 1e-6;

/// Default number of DAGs in a jungle.
pub const DEFAULT_NUM_DAGS: usize = 1;

/// Default maximum DAG depth (levels below the root).
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default maximum number of child slots per level.
pub const DEFAULT_MAX_WIDTH: usize = 256;

/// Default cap on threshold/assignment passes within one level.
pub const DEFAULT_MAX_LEVEL_ITERATIONS: usize = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        assert!(ENTROPY_IMPROVEMENT_EPSILON > 0.0);
        assert!(MIN_THRESHOLD_GAP > 0.0);
        assert!(DEFAULT_MAX_DEPTH >= 1);
        assert!(DEFAULT_MAX_WIDTH >= 2);
        assert!(DEFAULT_NUM_DAGS >= 1);
        assert!(DEFAULT_MAX_LEVEL_ITERATIONS >= 1);
    }
}
