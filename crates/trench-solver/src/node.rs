//! Search tree nodes and frontier ordering.

use std::cmp::Ordering;

use crate::moves::Action;
use crate::state::State;

/// A node in the search tree.
///
/// Nodes are stored in a flat arena (`Vec<SearchNode>`) owned by one search
/// call and reference their parent by index, so the whole chain back to the
/// root stays valid until the search returns.
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub state: State,
    /// Index of the parent node in the arena, `None` for root.
    pub parent: Option<usize>,
    /// Blank ordinal and action that produced this node (`None` for root).
    pub action: Option<(usize, Action)>,
    /// Moves from the root, g(n).
    pub path_cost: u32,
    /// Estimated moves to the goal, h(n).
    pub heuristic: u32,
}

impl SearchNode {
    pub fn root(state: State, heuristic: u32) -> Self {
        Self {
            state,
            parent: None,
            action: None,
            path_cost: 0,
            heuristic,
        }
    }

    /// f(n) = g(n) + h(n).
    pub fn total_cost(&self) -> u32 {
        self.path_cost + self.heuristic
    }
}

/// Priority queue entry pointing into the node arena.
///
/// `BinaryHeap` is a max-heap, so the ordering is reversed: the entry with
/// the smallest f compares greatest. Ties go to the smaller h, then to the
/// entry pushed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontierEntry {
    pub f: u32,
    pub h: u32,
    /// Insertion counter, unique per search.
    pub seq: u64,
    /// Index into the `Vec<SearchNode>` arena.
    pub node_index: usize,
}

impl FrontierEntry {
    pub fn new(node: &SearchNode, node_index: usize, seq: u64) -> Self {
        Self {
            f: node.total_cost(),
            h: node.heuristic,
            seq,
            node_index,
        }
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Trace the parent chain from `index` back to the root, returning arena
/// indices in root-to-node order.
pub fn extract_path(arena: &[SearchNode], index: usize) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = Some(index);
    while let Some(idx) = current {
        path.push(idx);
        current = arena[idx].parent;
    }
    path.reverse();
    path
}

/// The `(blank_ordinal, action)` moves leading from the root to `index`.
pub fn extract_actions(arena: &[SearchNode], index: usize) -> Vec<(usize, Action)> {
    extract_path(arena, index)
        .iter()
        .filter_map(|&idx| arena[idx].action)
        .collect()
}
