//! Cost-to-go estimates for the search.
//!
//! Choosing the zero estimate turns the best-first search into Uniform Cost
//! Search; the Manhattan estimate makes it A*.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::{cell_coordinates, State, BLANK};

/// Estimated remaining cost from `state` to `goal`. Must never overestimate.
pub trait Heuristic {
    fn estimate(&self, state: &State, goal: &State) -> u32;
}

/// Always 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn estimate(&self, _state: &State, _goal: &State) -> u32 {
        0
    }
}

/// Sum over misplaced pieces of the grid distance to their goal cell.
///
/// Each move shifts exactly one piece by one grid step (along the trench or
/// between a trench cell and its recess), so the sum is admissible and
/// consistent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManhattanHeuristic;

impl Heuristic for ManhattanHeuristic {
    fn estimate(&self, state: &State, goal: &State) -> u32 {
        let mut total = 0;
        for (i, &piece) in state.cells().iter().enumerate() {
            if piece == BLANK || piece == goal.get(i) {
                continue;
            }
            // Pieces absent from the goal contribute nothing.
            let Some(j) = goal.position_of(piece) else {
                continue;
            };
            let (row_i, col_i) = cell_coordinates(i);
            let (row_j, col_j) = cell_coordinates(j);
            total += col_i.abs_diff(col_j) + row_i.abs_diff(row_j);
        }
        total
    }
}

/// Search algorithm selector.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Uniform Cost Search (zero heuristic)
    #[default]
    #[value(name = "ucs")]
    UniformCost,
    /// A* with the Manhattan distance heuristic
    #[value(name = "astar")]
    AStarManhattan,
}

impl Algorithm {
    pub fn heuristic(self) -> &'static dyn Heuristic {
        match self {
            Algorithm::UniformCost => &ZeroHeuristic,
            Algorithm::AStarManhattan => &ManhattanHeuristic,
        }
    }

    /// True when h(n) can be non-zero.
    pub fn uses_heuristic(self) -> bool {
        matches!(self, Algorithm::AStarManhattan)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::UniformCost => f.write_str("Uniform Cost Search"),
            Algorithm::AStarManhattan => f.write_str("A* with the Manhattan Distance heuristic"),
        }
    }
}
