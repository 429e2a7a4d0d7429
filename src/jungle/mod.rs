//! The jungle: an ensemble of decision DAGs sharing one node arena.
//!
//! The jungle is the sole owner of every node. A freshly trained DAG brings
//! its own local arena; [`Jungle::insert_dag`] splices it in by re-basing
//! the child indices, so each physical node is stored exactly once no
//! matter how many parents point at it.

pub mod trainer;

use std::collections::BTreeMap;

use ndarray::ArrayView2;

use crate::core::types::{ClassLabel, NodeId, PredictionResult};
use crate::dag::node::{route_to_leaf, Dag, DagNode};

pub use trainer::{JungleTrainer, NullProgress, ProgressSink};

/// An ensemble of rooted decision DAGs over a shared node arena.
#[derive(Debug, Clone, Default)]
pub struct Jungle {
    nodes: Vec<DagNode>,
    roots: Vec<NodeId>,
}

impl Jungle {
    /// Creates an empty jungle.
    pub fn new() -> Self {
        Jungle::default()
    }

    pub(crate) fn from_parts(nodes: Vec<DagNode>, roots: Vec<NodeId>) -> Self {
        debug_assert!(roots.iter().all(|&r| r < nodes.len()));
        Jungle { nodes, roots }
    }

    /// Absorbs a trained DAG, re-basing its child links into this arena.
    pub fn insert_dag(&mut self, dag: Dag) {
        let offset = self.nodes.len();
        let (nodes, root) = dag.into_parts();
        self.nodes.extend(nodes.into_iter().map(|mut node| {
            node.rebase(offset);
            node
        }));
        self.roots.push(root + offset);
    }

    /// Number of DAGs in the ensemble.
    pub fn num_dags(&self) -> usize {
        self.roots.len()
    }

    /// True when the jungle holds no DAGs.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of physical nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The shared node arena.
    pub fn nodes(&self) -> &[DagNode] {
        &self.nodes
    }

    /// Root indices, one per DAG.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Majority vote over all DAGs.
    ///
    /// Each DAG routes `x` to a leaf and casts one unweighted vote for the
    /// leaf's label, but only when the leaf histogram actually saw that
    /// label. Ties resolve to the lowest label. Returns `None` for an
    /// empty jungle or when no DAG casts a vote.
    ///
    /// Panics if `x` is shorter than a tested feature index.
    pub fn predict(&self, x: &[f64]) -> Option<PredictionResult> {
        if self.roots.is_empty() {
            return None;
        }
        let mut votes: BTreeMap<ClassLabel, usize> = BTreeMap::new();
        for &root in &self.roots {
            let leaf = route_to_leaf(&self.nodes, root, x);
            let label = leaf.label();
            if label < leaf.histogram().len() && leaf.histogram().get(label) > 0 {
                *votes.entry(label).or_insert(0) += 1;
            }
        }
        let mut winner: Option<(ClassLabel, usize)> = None;
        for (&label, &count) in &votes {
            if winner.map_or(true, |(_, best)| count > best) {
                winner = Some((label, count));
            }
        }
        winner.map(|(label, count)| {
            PredictionResult::new(label, count as f64 / self.roots.len() as f64)
        })
    }

    /// Predicts one result per row of a feature matrix.
    pub fn predict_batch(&self, features: ArrayView2<'_, f64>) -> Vec<Option<PredictionResult>> {
        features
            .outer_iter()
            .map(|row| {
                let x: Vec<f64> = row.iter().copied().collect();
                self.predict(&x)
            })
            .collect()
    }
}
