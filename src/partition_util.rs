use crate::error::Result;
use crate::graph::WeightedGraph;
use crate::structures::Structure;
use crate::sym_matrix::Weight;
use crate::Partition;
use std::collections::btree_set;
use std::collections::BTreeSet;

/// Nodes that have been assigned to some partition. Nodes can be claimed but never released.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClaimedSet {
    nodes: BTreeSet<usize>,
}

impl ClaimedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the node was already claimed.
    pub fn claim(&mut self, node: usize) -> bool {
        self.nodes.insert(node)
    }

    pub fn contains(&self, node: usize) -> bool {
        self.nodes.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, usize> {
        self.nodes.iter()
    }
}

/// Orders structures by ascending member count, keeping the input order among equal sizes.
pub fn sort_structures(structures: &[Structure]) -> Vec<&Structure> {
    let mut sorted: Vec<&Structure> = structures.iter().collect();
    sorted.sort_by_key(|s| s.len());
    sorted
}

/// The member with the highest degree. Ties go to the first member in iteration order.
pub fn highest_degree_member<T: Weight>(
    graph: &WeightedGraph<T>,
    structure: &Structure,
) -> Result<Option<usize>> {
    let mut best: Option<(usize, usize)> = None;
    for &node in structure.iter() {
        let degree = graph.degree(node)?;
        if best.map_or(true, |(_, best_degree)| degree > best_degree) {
            best = Some((node, degree));
        }
    }
    Ok(best.map(|(node, _)| node))
}

/// Picks up to `count` distinct hotspots, one candidate per structure, visiting the largest
/// structures first. Returns fewer than `count` hotspots when the structures run out.
pub fn select_hotspots<T: Weight>(
    graph: &WeightedGraph<T>,
    structures: &[Structure],
    count: usize,
) -> Result<Vec<usize>> {
    let mut hotspots = Vec::with_capacity(count);
    for structure in sort_structures(structures).into_iter().rev() {
        if hotspots.len() >= count {
            break;
        }
        if let Some(node) = highest_degree_member(graph, structure)? {
            if !hotspots.contains(&node) {
                hotspots.push(node);
            }
        }
    }
    if hotspots.len() < count {
        log::warn!(
            "only {} of {} requested hotspots could be selected",
            hotspots.len(),
            count
        );
    }
    Ok(hotspots)
}

/// Merges every structure that contains `hotspot` and has at most `size_cap` members into the
/// partition. Members already claimed elsewhere are left where they are.
pub fn fill_from_structures(
    partition: &mut Partition,
    hotspot: usize,
    structures: &[Structure],
    size_cap: usize,
    claimed: &mut ClaimedSet,
) {
    for structure in structures
        .iter()
        .filter(|s| s.contains(&hotspot) && s.len() <= size_cap)
    {
        for &node in structure.iter() {
            if claimed.claim(node) {
                partition.insert(node);
            }
        }
    }
}
