//! Level-wise DAG growth (LSearch).
//!
//! The trainer keeps a frontier row of training nodes, each owning the
//! indices of the examples that reached it. Every level allocates
//! `min(2 * row, max_width)` child slots and alternates two coordinate
//! descent moves until a fixed point: a threshold search per impure node
//! (fresh random feature subset, midpoint sweep in O(1) per candidate) and
//! an assignment search that re-points each node's left/right slot
//! independently. The level commits only if the child row improves on the
//! parent row by more than the entropy epsilon; committed splits are frozen
//! into the node arena and the surviving children become the next frontier.

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::JungleConfig;
use crate::core::constants::{ENTROPY_IMPROVEMENT_EPSILON, MIN_THRESHOLD_GAP};
use crate::core::error::{JungleError, Result};
use crate::core::types::{FeatureIndex, NodeId};
use crate::dag::histogram::Histogram;
use crate::dag::node::{Dag, DagNode};
use crate::dag::objective::{
    AssignmentEntropyObjective, ChildRowEntropyObjective, RowEntropyObjective,
    ThresholdEntropyObjective,
};
use crate::dataset::{validate_examples, TrainingExample};

/// Mutable per-node bookkeeping while a level is optimized.
///
/// `examples` partitions the borrowed training slice by index; feature
/// vectors are never copied. `temp_left`/`temp_right` are virtual child
/// slots, equal for pure nodes (pass-through). `arena_id` points at the
/// frozen counterpart in the growing arena.
pub(crate) struct TrainingNode {
    pub(crate) feature_id: FeatureIndex,
    pub(crate) threshold: f64,
    pub(crate) examples: Vec<usize>,
    pub(crate) histogram: Histogram,
    pub(crate) left_histogram: Histogram,
    pub(crate) right_histogram: Histogram,
    pub(crate) temp_left: usize,
    pub(crate) temp_right: usize,
    pub(crate) pure: bool,
    pub(crate) entropy: f64,
    pub(crate) arena_id: NodeId,
}

impl TrainingNode {
    /// Back to the everything-right state: no split chosen yet.
    fn reset_split(&mut self) {
        self.feature_id = 0;
        self.threshold = f64::NEG_INFINITY;
        self.left_histogram.reset();
        self.right_histogram = self.histogram.clone();
    }

    /// Re-derives the split histograms from the stored feature/threshold.
    fn recompute_split_histograms(&mut self, examples: &[TrainingExample]) {
        self.left_histogram.reset();
        self.right_histogram.reset();
        for &i in &self.examples {
            let ex = &examples[i];
            if ex.features()[self.feature_id] <= self.threshold {
                self.left_histogram.add_one(ex.label());
            } else {
                self.right_histogram.add_one(ex.label());
            }
        }
    }
}

/// Sorts the row by descending entropy and hands out virtual slots round
/// robin: two fresh indices per impure node, one shared index per pure node.
fn assign_initial_slots(row: &mut [TrainingNode], child_count: usize) {
    row.sort_by(|a, b| b.entropy.partial_cmp(&a.entropy).unwrap_or(Ordering::Equal));
    let mut next_slot = 0;
    for node in row.iter_mut() {
        if node.pure {
            let slot = next_slot % child_count;
            next_slot += 1;
            node.temp_left = slot;
            node.temp_right = slot;
        } else {
            node.temp_left = next_slot % child_count;
            next_slot += 1;
            node.temp_right = next_slot % child_count;
            next_slot += 1;
        }
        node.reset_split();
    }
}

/// Grows a single decision DAG on a subset of a training slice.
pub struct DagTrainer<'a> {
    examples: &'a [TrainingExample],
    indices: Vec<usize>,
    feature_dim: usize,
    class_count: usize,
    num_feature_samples: usize,
    max_depth: usize,
    max_width: usize,
    max_level_iterations: usize,
    min_split_count: usize,
    min_child_split_count: usize,
    rng: StdRng,
    arena: Vec<DagNode>,
}

impl<'a> DagTrainer<'a> {
    /// Validates the configuration and the training slice, then prepares a
    /// trainer over the examples selected by `indices` (duplicates allowed,
    /// as produced by bootstrap sampling).
    pub fn new(
        config: &JungleConfig,
        examples: &'a [TrainingExample],
        indices: Vec<usize>,
        rng: StdRng,
    ) -> Result<Self> {
        config.validate()?;
        let (feature_dim, class_count) = validate_examples(examples)?;
        if indices.is_empty() {
            return Err(JungleError::dataset("training subset is empty"));
        }
        if indices.iter().any(|&i| i >= examples.len()) {
            return Err(JungleError::dataset("training subset index out of range"));
        }
        let num_feature_samples = config
            .num_feature_samples
            .unwrap_or_else(|| (feature_dim as f64).sqrt().ceil() as usize);
        if num_feature_samples == 0 || num_feature_samples > feature_dim {
            return Err(JungleError::config(format!(
                "feature sample count must lie in [1, {feature_dim}], got {num_feature_samples}"
            )));
        }
        Ok(DagTrainer {
            examples,
            indices,
            feature_dim,
            class_count,
            num_feature_samples,
            max_depth: config.max_depth,
            max_width: config.max_width,
            max_level_iterations: config.max_level_iterations,
            min_split_count: config.min_split_count,
            min_child_split_count: config.min_child_split_count,
            rng,
            arena: Vec::new(),
        })
    }

    /// Trains the DAG level by level and returns it with its local arena.
    pub fn train(mut self) -> Result<Dag> {
        let indices = std::mem::take(&mut self.indices);
        let mut row = vec![self.make_node(indices)];
        for level in 1..=self.max_depth {
            let child_count = (2 * row.len()).min(self.max_width);
            row = self.train_level(row, child_count);
            log::trace!(
                "level {}: {} frontier nodes, {} arena nodes",
                level,
                row.len(),
                self.arena.len()
            );
            if row.is_empty() {
                break;
            }
        }
        Ok(Dag::from_parts(self.arena, 0))
    }

    /// Builds a training node over `indices` and freezes a leaf for it.
    fn make_node(&mut self, indices: Vec<usize>) -> TrainingNode {
        let mut histogram = Histogram::new(self.class_count);
        for &i in &indices {
            histogram.add_one(self.examples[i].label());
        }
        let label = histogram.argmax();
        let pure = histogram.is_pure();
        let entropy = histogram.entropy();
        let arena_id = self.arena.len();
        self.arena.push(DagNode::new_leaf(label, histogram.clone()));
        TrainingNode {
            feature_id: 0,
            threshold: f64::NEG_INFINITY,
            examples: indices,
            left_histogram: Histogram::new(histogram.len()),
            right_histogram: histogram.clone(),
            histogram,
            temp_left: 0,
            temp_right: 0,
            pure,
            entropy,
            arena_id,
        }
    }

    /// Optimizes one level. Returns the next frontier, empty when the
    /// branch stops growing.
    fn train_level(&mut self, mut row: Vec<TrainingNode>, child_count: usize) -> Vec<TrainingNode> {
        assign_initial_slots(&mut row, child_count);

        // With one slot pair per node the round-robin init is already a
        // bijection and re-assignment cannot help.
        let tree_level = child_count == 2 * row.len();

        let mut passes = 0;
        loop {
            let mut change = false;
            for i in 0..row.len() {
                if !row[i].pure && row[i].examples.len() >= 2 {
                    change |= self.find_threshold(&mut row, i, child_count);
                }
            }
            if !tree_level {
                for i in 0..row.len() {
                    change |= self.find_assignment(&mut row, i, child_count);
                }
            }
            passes += 1;
            if !change || passes >= self.max_level_iterations {
                break;
            }
        }

        let parent_entropy = RowEntropyObjective::error(&row);
        let child_entropy = ChildRowEntropyObjective::error(&row, child_count);
        if parent_entropy - child_entropy <= ENTROPY_IMPROVEMENT_EPSILON {
            return Vec::new();
        }

        // Optional gate: a slot whose aggregate count is too small makes
        // the nodes feeding it keep their leaves instead of splitting.
        let mut withheld = vec![false; row.len()];
        if self.min_child_split_count > 0 {
            let mut slot_mass = vec![0u64; child_count];
            for node in &row {
                slot_mass[node.temp_left] += u64::from(node.left_histogram.mass());
                slot_mass[node.temp_right] += u64::from(node.right_histogram.mass());
            }
            let limit = self.min_child_split_count as u64;
            for (i, node) in row.iter().enumerate() {
                if slot_mass[node.temp_left] <= limit || slot_mass[node.temp_right] <= limit {
                    slot_mass[node.temp_left] -= u64::from(node.left_histogram.mass());
                    slot_mass[node.temp_right] -= u64::from(node.right_histogram.mass());
                    withheld[i] = true;
                }
            }
        }

        // Materialize: partition every node's examples into its two slots.
        let mut slot_examples: Vec<Vec<usize>> = vec![Vec::new(); child_count];
        for (i, node) in row.iter().enumerate() {
            if withheld[i] {
                continue;
            }
            for &ex in &node.examples {
                let slot = if self.examples[ex].features()[node.feature_id] <= node.threshold {
                    node.temp_left
                } else {
                    node.temp_right
                };
                slot_examples[slot].push(ex);
            }
        }

        let children: Vec<Option<TrainingNode>> = slot_examples
            .into_iter()
            .map(|examples| {
                if examples.is_empty() {
                    None
                } else {
                    Some(self.make_node(examples))
                }
            })
            .collect();

        // Freeze parent splits. A pointer at an empty slot re-points at the
        // sibling slot's child so both links stay valid.
        for (i, node) in row.iter().enumerate() {
            if withheld[i] {
                continue;
            }
            let left = children[node.temp_left].as_ref().map(|c| c.arena_id);
            let right = children[node.temp_right].as_ref().map(|c| c.arena_id);
            let (left, right) = match (left, right) {
                (Some(l), Some(r)) => (l, r),
                (Some(l), None) => (l, l),
                (None, Some(r)) => (r, r),
                (None, None) => continue,
            };
            self.arena[node.arena_id].set_split(node.feature_id, node.threshold, left, right);
        }

        children
            .into_iter()
            .flatten()
            .filter(|c| {
                self.min_split_count == 0
                    || (!c.pure && c.examples.len() > self.min_split_count)
            })
            .collect()
    }

    /// Searches a fresh random feature subset for a better split point on
    /// `row[idx]`. Returns true when the node's split changed.
    fn find_threshold(&mut self, row: &mut [TrainingNode], idx: usize, child_count: usize) -> bool {
        let features = self.sample_features();
        let examples = self.examples;
        let mut objective = ThresholdEntropyObjective::new(row, idx, child_count);
        let node = &mut row[idx];
        let mut best_error = objective.error_for(&node.left_histogram, &node.right_histogram);
        let mut best: Option<(FeatureIndex, f64)> = None;

        for feature in features {
            node.examples.sort_by(|&a, &b| {
                examples[a].features()[feature]
                    .partial_cmp(&examples[b].features()[feature])
                    .unwrap_or(Ordering::Equal)
            });
            objective.begin_sweep(&node.histogram);
            for w in 0..node.examples.len() - 1 {
                let current = &examples[node.examples[w]];
                let next = &examples[node.examples[w + 1]];
                objective.move_left(current.label());
                let low = current.features()[feature];
                let high = next.features()[feature];
                if high - low < MIN_THRESHOLD_GAP {
                    continue;
                }
                let error = objective.error();
                if error < best_error {
                    best_error = error;
                    best = Some((feature, 0.5 * (low + high)));
                }
            }
        }

        match best {
            Some((feature, threshold)) => {
                node.feature_id = feature;
                node.threshold = threshold;
                node.recompute_split_histograms(examples);
                true
            }
            None => false,
        }
    }

    /// Tries every slot for the left and right pointer of `row[idx]`
    /// independently, keeping strict improvements. Pure nodes move both
    /// pointers together. Returns true when an assignment changed.
    fn find_assignment(&self, row: &mut [TrainingNode], idx: usize, child_count: usize) -> bool {
        let objective = AssignmentEntropyObjective::new(row, idx, child_count);
        let mut changed = false;

        if row[idx].pure {
            let node = &row[idx];
            let mut best_slot = node.temp_left;
            let mut best_error = objective.error_coherent(node, best_slot);
            for slot in 0..child_count {
                if slot == node.temp_left {
                    continue;
                }
                let error = objective.error_coherent(node, slot);
                if error < best_error {
                    best_error = error;
                    best_slot = slot;
                }
            }
            if best_slot != row[idx].temp_left {
                row[idx].temp_left = best_slot;
                row[idx].temp_right = best_slot;
                changed = true;
            }
            return changed;
        }

        // Left pointer first; a node never points both slots at one child.
        {
            let node = &row[idx];
            let mut best_slot = node.temp_left;
            let mut best_error = objective.error(node, best_slot, node.temp_right);
            for slot in 0..child_count {
                if slot == node.temp_left || slot == node.temp_right {
                    continue;
                }
                let error = objective.error(node, slot, node.temp_right);
                if error < best_error {
                    best_error = error;
                    best_slot = slot;
                }
            }
            if best_slot != node.temp_left {
                row[idx].temp_left = best_slot;
                changed = true;
            }
        }

        // Right pointer with the updated left fixed.
        {
            let node = &row[idx];
            let mut best_slot = node.temp_right;
            let mut best_error = objective.error(node, node.temp_left, best_slot);
            for slot in 0..child_count {
                if slot == node.temp_left || slot == node.temp_right {
                    continue;
                }
                let error = objective.error(node, node.temp_left, slot);
                if error < best_error {
                    best_error = error;
                    best_slot = slot;
                }
            }
            if best_slot != node.temp_right {
                row[idx].temp_right = best_slot;
                changed = true;
            }
        }

        changed
    }

    /// Draws the per-search random feature subset, with replacement.
    fn sample_features(&mut self) -> Vec<FeatureIndex> {
        (0..self.num_feature_samples)
            .map(|_| self.rng.gen_range(0..self.feature_dim))
            .collect()
    }
}
