//! Entropy objectives driving the level-wise split optimization.
//!
//! All four evaluators score the same quantity, the weighted average class
//! entropy over the child row, `sum_s mass_s * H_s / total`. They differ in
//! what they precompute:
//!
//! - [`RowEntropyObjective`] scores the parent row itself.
//! - [`ChildRowEntropyObjective`] aggregates every parent's split histograms
//!   into the assigned slots and scores them directly. O(row * classes),
//!   used for the commit/stop decision and as the cross-check path.
//! - [`ThresholdEntropyObjective`] fixes everything except one parent's
//!   split point, so each candidate threshold costs O(1).
//! - [`AssignmentEntropyObjective`] fixes everything except one parent's
//!   slot pointers, so each candidate slot pair costs O(classes).

use crate::dag::histogram::{EfficientHistogram, Histogram};
use crate::dag::trainer::TrainingNode;

/// Weighted average entropy of the parent row.
pub(crate) struct RowEntropyObjective;

impl RowEntropyObjective {
    pub(crate) fn error(row: &[TrainingNode]) -> f64 {
        let total: u32 = row.iter().map(|n| n.histogram.mass()).sum();
        if total == 0 {
            return 0.0;
        }
        let weighted: f64 = row.iter().map(|n| n.histogram.weighted_entropy()).sum();
        weighted / total as f64
    }
}

/// Weighted average entropy of the fully aggregated child row.
pub(crate) struct ChildRowEntropyObjective;

impl ChildRowEntropyObjective {
    pub(crate) fn error(row: &[TrainingNode], child_count: usize) -> f64 {
        let Some(first) = row.first() else {
            return 0.0;
        };
        let mut slots = vec![Histogram::new(first.histogram.len()); child_count];
        for node in row {
            slots[node.temp_left].accumulate(&node.left_histogram);
            slots[node.temp_right].accumulate(&node.right_histogram);
        }
        let total: u32 = slots.iter().map(|s| s.mass()).sum();
        if total == 0 {
            return 0.0;
        }
        let weighted: f64 = slots.iter().map(|s| s.weighted_entropy()).sum();
        weighted / total as f64
    }
}

/// Child-row entropy as a function of one parent's split point.
///
/// The contributions of every other parent to the two slots the parent
/// points at are frozen into base histograms; the weighted entropies of all
/// untouched slots collapse into a single static remainder. A sweep then
/// starts from the everything-right state and moves one example at a time
/// into the left slot.
pub(crate) struct ThresholdEntropyObjective {
    base_left: Histogram,
    base_right: Histogram,
    static_remainder: f64,
    total_mass: f64,
    left: EfficientHistogram,
    right: EfficientHistogram,
}

impl ThresholdEntropyObjective {
    /// Precomputes the static parts for the parent at `parent_idx`.
    /// The parent must have distinct temp slots.
    pub(crate) fn new(row: &[TrainingNode], parent_idx: usize, child_count: usize) -> Self {
        let parent = &row[parent_idx];
        debug_assert_ne!(parent.temp_left, parent.temp_right);
        let class_count = parent.histogram.len();

        let mut slots = vec![Histogram::new(class_count); child_count];
        for (i, node) in row.iter().enumerate() {
            if i == parent_idx {
                continue;
            }
            slots[node.temp_left].accumulate(&node.left_histogram);
            slots[node.temp_right].accumulate(&node.right_histogram);
        }

        let mut static_remainder = 0.0;
        for (s, slot) in slots.iter().enumerate() {
            if s != parent.temp_left && s != parent.temp_right {
                static_remainder += slot.weighted_entropy();
            }
        }
        let total: u32 =
            slots.iter().map(|s| s.mass()).sum::<u32>() + parent.histogram.mass();

        let base_left = slots[parent.temp_left].clone();
        let base_right = slots[parent.temp_right].clone();

        let left = EfficientHistogram::from_histogram(&base_left);
        let right = EfficientHistogram::from_histogram(&base_right);
        ThresholdEntropyObjective {
            base_left,
            base_right,
            static_remainder,
            total_mass: total as f64,
            left,
            right,
        }
    }

    /// Resets the live slots to the start-of-sweep state: the parent's
    /// whole histogram on the right, nothing on the left.
    pub(crate) fn begin_sweep(&mut self, parent_histogram: &Histogram) {
        self.left = EfficientHistogram::from_histogram(&self.base_left);
        self.right = EfficientHistogram::from_histogram(&self.base_right);
        self.right.accumulate(parent_histogram);
    }

    /// Moves one example of class `label` from the right slot to the left.
    pub(crate) fn move_left(&mut self, label: usize) {
        self.left.add_one(label);
        self.right.sub_one(label);
    }

    /// Current objective value for the sweep state.
    pub(crate) fn error(&self) -> f64 {
        if self.total_mass <= 0.0 {
            return 0.0;
        }
        (self.static_remainder
            + self.left.weighted_entropy()
            + self.right.weighted_entropy())
            / self.total_mass
    }

    /// Objective value for an arbitrary split of the parent, given as its
    /// left/right histograms. Used to score the parent's current split.
    pub(crate) fn error_for(&self, left: &Histogram, right: &Histogram) -> f64 {
        if self.total_mass <= 0.0 {
            return 0.0;
        }
        (self.static_remainder
            + self.base_left.weighted_entropy_with(left)
            + self.base_right.weighted_entropy_with(right))
            / self.total_mass
    }
}

/// Child-row entropy as a function of one parent's slot pointers.
pub(crate) struct AssignmentEntropyObjective {
    statics: Vec<Histogram>,
    static_weighted: Vec<f64>,
    static_sum: f64,
    total_mass: f64,
}

impl AssignmentEntropyObjective {
    /// Precomputes per-slot static histograms, leaving out the parent at
    /// `parent_idx`.
    pub(crate) fn new(row: &[TrainingNode], parent_idx: usize, child_count: usize) -> Self {
        let class_count = row[parent_idx].histogram.len();
        let mut statics = vec![Histogram::new(class_count); child_count];
        for (i, node) in row.iter().enumerate() {
            if i == parent_idx {
                continue;
            }
            statics[node.temp_left].accumulate(&node.left_histogram);
            statics[node.temp_right].accumulate(&node.right_histogram);
        }
        let static_weighted: Vec<f64> =
            statics.iter().map(|s| s.weighted_entropy()).collect();
        let static_sum = static_weighted.iter().sum();
        let total: u32 = statics.iter().map(|s| s.mass()).sum::<u32>()
            + row[parent_idx].histogram.mass();
        AssignmentEntropyObjective {
            statics,
            static_weighted,
            static_sum,
            total_mass: total as f64,
        }
    }

    /// Objective value with the parent's left histogram in slot `left` and
    /// its right histogram in slot `right`.
    pub(crate) fn error(&self, parent: &TrainingNode, left: usize, right: usize) -> f64 {
        if left == right {
            return self.error_coherent(parent, left);
        }
        if self.total_mass <= 0.0 {
            return 0.0;
        }
        (self.static_sum - self.static_weighted[left] - self.static_weighted[right]
            + self.statics[left].weighted_entropy_with(&parent.left_histogram)
            + self.statics[right].weighted_entropy_with(&parent.right_histogram))
            / self.total_mass
    }

    /// Objective value with both of the parent's histograms funneled into
    /// one shared slot (the pure-node pass-through case).
    pub(crate) fn error_coherent(&self, parent: &TrainingNode, slot: usize) -> f64 {
        if self.total_mass <= 0.0 {
            return 0.0;
        }
        (self.static_sum - self.static_weighted[slot]
            + self.statics[slot]
                .weighted_entropy_with_two(&parent.left_histogram, &parent.right_histogram))
            / self.total_mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn node(
        counts: Vec<u32>,
        left: Vec<u32>,
        right: Vec<u32>,
        temp_left: usize,
        temp_right: usize,
    ) -> TrainingNode {
        let histogram = Histogram::from_counts(counts);
        let pure = histogram.is_pure();
        let entropy = histogram.entropy();
        TrainingNode {
            feature_id: 0,
            threshold: 0.0,
            examples: Vec::new(),
            histogram,
            left_histogram: Histogram::from_counts(left),
            right_histogram: Histogram::from_counts(right),
            temp_left,
            temp_right,
            pure,
            entropy,
            arena_id: 0,
        }
    }

    fn sample_row() -> Vec<TrainingNode> {
        vec![
            node(vec![4, 2, 0], vec![3, 0, 0], vec![1, 2, 0], 0, 1),
            node(vec![0, 3, 3], vec![0, 3, 1], vec![0, 0, 2], 1, 2),
            node(vec![2, 0, 0], vec![0, 0, 0], vec![2, 0, 0], 3, 3),
        ]
    }

    #[test]
    fn row_entropy_weights_by_mass() {
        let row = sample_row();
        let total: u32 = row.iter().map(|n| n.histogram.mass()).sum();
        let expected: f64 = row
            .iter()
            .map(|n| n.histogram.mass() as f64 * n.histogram.entropy())
            .sum::<f64>()
            / total as f64;
        assert_relative_eq!(RowEntropyObjective::error(&row), expected, epsilon = 1e-9);
    }

    #[test]
    fn empty_row_scores_zero() {
        assert_eq!(RowEntropyObjective::error(&[]), 0.0);
        assert_eq!(ChildRowEntropyObjective::error(&[], 4), 0.0);
    }

    #[test]
    fn threshold_objective_agrees_with_full_aggregation() {
        let row = sample_row();
        let full = ChildRowEntropyObjective::error(&row, 4);
        for parent_idx in 0..2 {
            let obj = ThresholdEntropyObjective::new(&row, parent_idx, 4);
            let incremental = obj.error_for(
                &row[parent_idx].left_histogram,
                &row[parent_idx].right_histogram,
            );
            assert_relative_eq!(incremental, full, epsilon = 1e-9);
        }
    }

    #[test]
    fn threshold_sweep_matches_recomputed_aggregation() {
        let mut row = sample_row();
        let mut obj = ThresholdEntropyObjective::new(&row, 0, 4);
        obj.begin_sweep(&row[0].histogram);

        // Everything right: the parent's left histogram is empty.
        row[0].left_histogram = Histogram::new(3);
        row[0].right_histogram = row[0].histogram.clone();
        assert_relative_eq!(
            obj.error(),
            ChildRowEntropyObjective::error(&row, 4),
            epsilon = 1e-9
        );

        // Move two class-0 examples and one class-1 example left.
        obj.move_left(0);
        obj.move_left(0);
        obj.move_left(1);
        row[0].left_histogram = Histogram::from_counts(vec![2, 1, 0]);
        row[0].right_histogram = Histogram::from_counts(vec![2, 1, 0]);
        assert_relative_eq!(
            obj.error(),
            ChildRowEntropyObjective::error(&row, 4),
            epsilon = 1e-9
        );
    }

    #[test]
    fn assignment_objective_agrees_with_full_aggregation() {
        let row = sample_row();
        for parent_idx in 0..row.len() {
            let obj = AssignmentEntropyObjective::new(&row, parent_idx, 4);
            let parent = &row[parent_idx];
            let incremental = obj.error(parent, parent.temp_left, parent.temp_right);
            assert_relative_eq!(
                incremental,
                ChildRowEntropyObjective::error(&row, 4),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn assignment_objective_scores_candidate_moves() {
        let mut row = sample_row();
        let obj = AssignmentEntropyObjective::new(&row, 0, 4);
        let moved = obj.error(&row[0], 2, 1);
        row[0].temp_left = 2;
        assert_relative_eq!(
            moved,
            ChildRowEntropyObjective::error(&row, 4),
            epsilon = 1e-9
        );
    }

    #[test]
    fn coherent_assignment_merges_both_histograms() {
        let mut row = sample_row();
        let obj = AssignmentEntropyObjective::new(&row, 2, 4);
        let moved = obj.error_coherent(&row[2], 1);
        row[2].temp_left = 1;
        row[2].temp_right = 1;
        assert_relative_eq!(
            moved,
            ChildRowEntropyObjective::error(&row, 4),
            epsilon = 1e-9
        );
    }
}
