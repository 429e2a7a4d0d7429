//! Model persistence.
//!
//! A jungle serializes to a flat node table, one line per physical node:
//!
//! ```text
//! nodeID,isRoot,featureID,threshold,leftChildID,rightChildID,classLabel,"h0,h1,...,hK"
//! ```
//!
//! IDs are assigned per jungle starting at 1, in traversal order from each
//! root, visiting every physical node exactly once; 0 is the reserved
//! no-child sentinel. Internal nodes carry positive child IDs and empty
//! label/histogram fields; leaves carry the literal `0` in both child
//! columns plus their label and quoted histogram. Loading runs two passes:
//! reconstruct all nodes keyed by ID, then resolve child pointers.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::core::error::{JungleError, Result};
use crate::core::types::{ClassLabel, NodeId};
use crate::dag::histogram::Histogram;
use crate::dag::node::DagNode;
use crate::jungle::Jungle;

/// Saves a jungle to a model file.
pub fn save_jungle<P: AsRef<Path>>(jungle: &Jungle, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_jungle(jungle, BufWriter::new(file))?;
    log::debug!(
        "saved {} nodes ({} DAGs) to {}",
        jungle.node_count(),
        jungle.num_dags(),
        path.as_ref().display()
    );
    Ok(())
}

/// Writes the node table of a jungle.
pub fn write_jungle<W: Write>(jungle: &Jungle, mut writer: W) -> Result<()> {
    let nodes = jungle.nodes();
    let mut ids = vec![0u64; nodes.len()];
    let mut order = Vec::with_capacity(nodes.len());
    let mut next_id = 1u64;

    for &root in jungle.roots() {
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            if ids[current] != 0 {
                continue;
            }
            ids[current] = next_id;
            next_id += 1;
            order.push(current);
            if let (Some(left), Some(right)) = (nodes[current].left(), nodes[current].right()) {
                stack.push(right);
                stack.push(left);
            }
        }
    }

    let roots: HashSet<NodeId> = jungle.roots().iter().copied().collect();
    for &index in &order {
        let node = &nodes[index];
        let is_root = u8::from(roots.contains(&index));
        match (node.left(), node.right()) {
            (Some(left), Some(right)) => writeln!(
                writer,
                "{},{},{},{},{},{},,",
                ids[index],
                is_root,
                node.feature_id(),
                node.threshold(),
                ids[left],
                ids[right]
            )?,
            _ => {
                let histogram = node
                    .histogram()
                    .counts()
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                writeln!(
                    writer,
                    "{},{},{},{},0,0,{},\"{}\"",
                    ids[index],
                    is_root,
                    node.feature_id(),
                    node.threshold(),
                    node.label(),
                    histogram
                )?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// Loads a jungle from a model file.
pub fn load_jungle<P: AsRef<Path>>(path: P) -> Result<Jungle> {
    let file = File::open(path.as_ref())?;
    let jungle = read_jungle(BufReader::new(file))?;
    log::debug!(
        "loaded {} nodes ({} DAGs) from {}",
        jungle.node_count(),
        jungle.num_dags(),
        path.as_ref().display()
    );
    Ok(jungle)
}

struct RawNode {
    is_root: bool,
    feature_id: usize,
    threshold: f64,
    left: u64,
    right: u64,
    label: ClassLabel,
    counts: Vec<u32>,
}

impl RawNode {
    fn is_leaf(&self) -> bool {
        self.left == 0
    }
}

fn field_error(line: usize, message: &str, field: &str) -> JungleError {
    JungleError::serialization(format!("line {line}: {message} '{field}'"))
}

/// Reads the node table of a jungle.
pub fn read_jungle<R: Read>(reader: R) -> Result<Jungle> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut raw_nodes = Vec::new();
    let mut id_to_index: HashMap<u64, usize> = HashMap::new();

    for (i, record) in csv_reader.records().enumerate() {
        let line = i + 1;
        let record = record?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        if record.len() != 8 {
            return Err(JungleError::serialization(format!(
                "line {line}: expected 8 fields, found {}",
                record.len()
            )));
        }

        let id: u64 = record[0]
            .trim()
            .parse()
            .map_err(|_| field_error(line, "invalid node ID", &record[0]))?;
        if id == 0 {
            return Err(JungleError::serialization(format!(
                "line {line}: node ID 0 is reserved"
            )));
        }
        if id_to_index.contains_key(&id) {
            return Err(JungleError::serialization(format!(
                "line {line}: duplicate node ID {id}"
            )));
        }

        let is_root = match record[1].trim() {
            "0" => false,
            "1" => true,
            other => return Err(field_error(line, "invalid root flag", other)),
        };
        let feature_id: usize = record[2]
            .trim()
            .parse()
            .map_err(|_| field_error(line, "invalid feature ID", &record[2]))?;
        let threshold: f64 = record[3]
            .trim()
            .parse()
            .map_err(|_| field_error(line, "invalid threshold", &record[3]))?;
        let left: u64 = record[4]
            .trim()
            .parse()
            .map_err(|_| field_error(line, "invalid left child ID", &record[4]))?;
        let right: u64 = record[5]
            .trim()
            .parse()
            .map_err(|_| field_error(line, "invalid right child ID", &record[5]))?;
        if (left == 0) != (right == 0) {
            return Err(JungleError::serialization(format!(
                "line {line}: exactly one child ID is the 0 sentinel"
            )));
        }

        let label_field = record[6].trim();
        let histogram_field = record[7].trim();
        let (label, counts) = if left == 0 {
            if label_field.is_empty() || histogram_field.is_empty() {
                return Err(JungleError::serialization(format!(
                    "line {line}: leaf rows need a label and a histogram"
                )));
            }
            let label: ClassLabel = label_field
                .parse()
                .map_err(|_| field_error(line, "invalid class label", label_field))?;
            let counts: Vec<u32> = histogram_field
                .split(',')
                .map(|c| {
                    c.trim()
                        .parse()
                        .map_err(|_| field_error(line, "invalid histogram count", c))
                })
                .collect::<Result<_>>()?;
            (label, counts)
        } else {
            if !label_field.is_empty() || !histogram_field.is_empty() {
                return Err(JungleError::serialization(format!(
                    "line {line}: internal rows carry empty label and histogram fields"
                )));
            }
            (0, Vec::new())
        };

        id_to_index.insert(id, raw_nodes.len());
        raw_nodes.push(RawNode {
            is_root,
            feature_id,
            threshold,
            left,
            right,
            label,
            counts,
        });
    }

    // Second pass: every child ID must resolve to a loaded node.
    let mut nodes = Vec::with_capacity(raw_nodes.len());
    let mut roots = Vec::new();
    for (index, raw) in raw_nodes.iter().enumerate() {
        if raw.is_root {
            roots.push(index);
        }
        if raw.is_leaf() {
            nodes.push(DagNode::new_leaf(
                raw.label,
                Histogram::from_counts(raw.counts.clone()),
            ));
        } else {
            let resolve = |id: u64| -> Result<NodeId> {
                id_to_index.get(&id).copied().ok_or_else(|| {
                    JungleError::serialization(format!("unknown child node ID {id}"))
                })
            };
            nodes.push(DagNode::new_internal(
                raw.feature_id,
                raw.threshold,
                resolve(raw.left)?,
                resolve(raw.right)?,
            ));
        }
    }
    if roots.is_empty() && !nodes.is_empty() {
        return Err(JungleError::serialization("model file declares no root"));
    }
    check_acyclic(&nodes, &roots)?;

    Ok(Jungle::from_parts(nodes, roots))
}

/// Verifies that every path from a root terminates at a leaf. Child links
/// may converge (that is the point of a jungle), but a back edge would make
/// routing loop forever, so cyclic models are rejected.
fn check_acyclic(nodes: &[DagNode], roots: &[NodeId]) -> Result<()> {
    const UNVISITED: u8 = 0;
    const IN_PROGRESS: u8 = 1;
    const DONE: u8 = 2;

    let mut state = vec![UNVISITED; nodes.len()];
    for &root in roots {
        let mut stack = vec![(root, false)];
        while let Some((index, finished)) = stack.pop() {
            if finished {
                state[index] = DONE;
                continue;
            }
            if state[index] != UNVISITED {
                continue;
            }
            state[index] = IN_PROGRESS;
            stack.push((index, true));
            if let (Some(left), Some(right)) = (nodes[index].left(), nodes[index].right()) {
                for child in [left, right] {
                    match state[child] {
                        IN_PROGRESS => {
                            return Err(JungleError::serialization(
                                "model graph contains a cycle",
                            ))
                        }
                        DONE => {}
                        _ => stack.push((child, false)),
                    }
                }
            }
        }
    }
    Ok(())
}
