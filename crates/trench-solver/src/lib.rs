//! Solver library for the nine men in a trench puzzle.
//!
//! The board is a ten-cell trench with three recesses above it. This crate
//! provides the state model, legal move generation, two heuristics and a
//! best-first graph search that runs as Uniform Cost Search or as A*.

pub mod heuristic;
pub mod moves;
pub mod node;
pub mod solver;
pub mod state;

// Re-export main types
pub use heuristic::{Algorithm, Heuristic, ManhattanHeuristic, ZeroHeuristic};
pub use moves::{apply, find_blanks, legal_moves, successors, Action};
pub use node::{FrontierEntry, SearchNode};
pub use solver::{
    solve, solve_with_observer, Expansion, ExpansionObserver, NoopObserver, Outcome,
    SolverConfig, SolverResult, Step,
};
pub use state::{State, StateError, TrenchConfig};
