//! DAG nodes and single trained DAGs.
//!
//! Nodes live in an arena (`Vec<DagNode>`) and reference their children by
//! plain indices, so several parents can share one physical child. A node is
//! a leaf exactly when it has no left child; the leaf invariant guarantees
//! both child links are set or neither is.

use crate::core::types::{ClassLabel, FeatureIndex, NodeId};
use crate::dag::histogram::Histogram;
use serde::{Deserialize, Serialize};

/// One node of a decision DAG in its persisted shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DagNode {
    feature_id: FeatureIndex,
    threshold: f64,
    left: Option<NodeId>,
    right: Option<NodeId>,
    label: ClassLabel,
    histogram: Histogram,
}

impl DagNode {
    /// Creates a leaf carrying its class distribution and majority label.
    pub fn new_leaf(label: ClassLabel, histogram: Histogram) -> Self {
        DagNode {
            feature_id: 0,
            threshold: 0.0,
            left: None,
            right: None,
            label,
            histogram,
        }
    }

    /// Creates an internal split node.
    pub fn new_internal(
        feature_id: FeatureIndex,
        threshold: f64,
        left: NodeId,
        right: NodeId,
    ) -> Self {
        DagNode {
            feature_id,
            threshold,
            left: Some(left),
            right: Some(right),
            label: 0,
            histogram: Histogram::new(0),
        }
    }

    /// Turns a leaf into a split node pointing at the given children.
    pub fn set_split(
        &mut self,
        feature_id: FeatureIndex,
        threshold: f64,
        left: NodeId,
        right: NodeId,
    ) {
        self.feature_id = feature_id;
        self.threshold = threshold;
        self.left = Some(left);
        self.right = Some(right);
    }

    /// True when this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none()
    }

    /// Feature column tested by this node (meaningful for split nodes).
    pub fn feature_id(&self) -> FeatureIndex {
        self.feature_id
    }

    /// Split threshold; `x[feature_id] <= threshold` routes left.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Left child index, if any.
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// Right child index, if any.
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// Majority class label (meaningful at leaves).
    pub fn label(&self) -> ClassLabel {
        self.label
    }

    /// Class distribution of the training examples that reached this node.
    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Shifts both child links by `offset`. Used when a local arena is
    /// spliced into the jungle arena.
    pub(crate) fn rebase(&mut self, offset: usize) {
        self.left = self.left.map(|i| i + offset);
        self.right = self.right.map(|i| i + offset);
    }
}

/// Routes a feature vector from `root` to a leaf within `nodes`.
///
/// Panics if the vector is shorter than a tested feature index.
pub(crate) fn route_to_leaf<'a>(nodes: &'a [DagNode], root: NodeId, x: &[f64]) -> &'a DagNode {
    let mut node = &nodes[root];
    while let (Some(left), Some(right)) = (node.left, node.right) {
        let next = if x[node.feature_id] <= node.threshold {
            left
        } else {
            right
        };
        node = &nodes[next];
    }
    node
}

/// A single trained decision DAG: a local node arena plus its root index.
#[derive(Debug, Clone)]
pub struct Dag {
    nodes: Vec<DagNode>,
    root: NodeId,
}

impl Dag {
    pub(crate) fn from_parts(nodes: Vec<DagNode>, root: NodeId) -> Self {
        debug_assert!(root < nodes.len());
        Dag { nodes, root }
    }

    /// Number of physical nodes in this DAG.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the DAG holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root node index.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The node arena.
    pub fn nodes(&self) -> &[DagNode] {
        &self.nodes
    }

    /// Consumes the DAG into its arena and root.
    pub(crate) fn into_parts(self) -> (Vec<DagNode>, NodeId) {
        (self.nodes, self.root)
    }

    /// Routes `x` to its leaf.
    pub fn predict_leaf(&self, x: &[f64]) -> &DagNode {
        route_to_leaf(&self.nodes, self.root, x)
    }
}
