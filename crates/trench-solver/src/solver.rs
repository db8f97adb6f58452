//! Best-first graph search over trench states.
//!
//! One loop serves both Uniform Cost Search and A*: the only difference is
//! the heuristic used to score new nodes. A state enters the explored set
//! when it is expanded and is never pushed again after that, even if a
//! cheaper path turns up later. Duplicates already sitting in the frontier
//! are not pruned.

use std::collections::{BinaryHeap, HashSet};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::heuristic::Algorithm;
use crate::moves::{successors, Action};
use crate::node::{extract_path, FrontierEntry, SearchNode};
use crate::state::State;

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub algorithm: Algorithm,
    /// Target configuration
    pub goal: State,
    /// Initial capacity for the node arena, frontier and explored set
    pub capacity_hint: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            goal: State::GOAL,
            capacity_hint: 1 << 16,
        }
    }
}

impl SolverConfig {
    pub fn with_algorithm(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Default::default()
        }
    }
}

/// How the search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Outcome {
    /// Goal popped from the frontier after `depth` moves.
    Solved { depth: u32 },
    /// Frontier ran dry without reaching the goal.
    Exhausted,
}

/// One move of a reconstructed solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Ordinal of the moved blank among the blanks of the previous state
    pub blank: usize,
    pub action: Action,
    /// State after the move
    pub state: State,
}

/// Result of the solver search
#[derive(Debug, Clone)]
pub struct SolverResult {
    pub outcome: Outcome,
    /// Nodes taken off the frontier and expanded (the goal node is not counted)
    pub nodes_expanded: usize,
    /// Largest frontier observed after any expansion
    pub max_frontier_size: usize,
    /// Time elapsed in milliseconds
    pub time_elapsed_ms: u64,
    /// Moves from the initial state to the goal, if solved
    pub solution: Option<Vec<Step>>,
}

impl SolverResult {
    pub fn solved(&self) -> bool {
        matches!(self.outcome, Outcome::Solved { .. })
    }

    pub fn depth(&self) -> Option<u32> {
        match self.outcome {
            Outcome::Solved { depth } => Some(depth),
            Outcome::Exhausted => None,
        }
    }
}

/// A node being taken off the frontier.
#[derive(Debug, Clone, Copy)]
pub struct Expansion<'a> {
    pub state: &'a State,
    pub path_cost: u32,
    pub heuristic: u32,
    /// Expansions completed before this one
    pub nodes_expanded: usize,
}

/// Progress callbacks for a running search.
pub trait ExpansionObserver {
    /// Called for every node popped from the frontier, goal included,
    /// before it is goal-tested.
    fn on_expand(&mut self, _expansion: &Expansion<'_>) {}

    /// Called after each expansion with the peak frontier size so far.
    fn on_frontier(&mut self, _max_frontier_size: usize) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl ExpansionObserver for NoopObserver {}

/// Search from `initial` to `config.goal`.
pub fn solve(initial: State, config: &SolverConfig) -> SolverResult {
    solve_with_observer(initial, config, &mut NoopObserver)
}

/// Search from `initial` to `config.goal`, reporting progress to `observer`.
pub fn solve_with_observer(
    initial: State,
    config: &SolverConfig,
    observer: &mut dyn ExpansionObserver,
) -> SolverResult {
    let start_time = Instant::now();
    let heuristic = config.algorithm.heuristic();
    let goal = config.goal;

    let mut arena: Vec<SearchNode> = Vec::with_capacity(config.capacity_hint);
    let mut frontier: BinaryHeap<FrontierEntry> = BinaryHeap::with_capacity(config.capacity_hint);
    let mut explored: HashSet<State> = HashSet::with_capacity(config.capacity_hint);
    let mut seq: u64 = 0;

    let mut nodes_expanded: usize = 0;
    let mut max_frontier_size: usize = 1;

    let root = SearchNode::root(initial, heuristic.estimate(&initial, &goal));
    tracing::debug!(
        algorithm = ?config.algorithm,
        h = root.heuristic,
        "starting search"
    );
    frontier.push(FrontierEntry::new(&root, 0, seq));
    seq += 1;
    arena.push(root);

    while let Some(entry) = frontier.pop() {
        let node_index = entry.node_index;
        let (state, path_cost, h) = {
            let node = &arena[node_index];
            (node.state, node.path_cost, node.heuristic)
        };

        observer.on_expand(&Expansion {
            state: &state,
            path_cost,
            heuristic: h,
            nodes_expanded,
        });
        tracing::trace!(g = path_cost, h, nodes_expanded, "expanding {:?}", state.cells());

        // Goal test
        if state == goal {
            let solution = reconstruct_solution(&arena, node_index);
            let time_elapsed_ms = start_time.elapsed().as_millis() as u64;
            tracing::info!(
                algorithm = ?config.algorithm,
                depth = path_cost,
                nodes_expanded,
                max_frontier_size,
                time_elapsed_ms,
                "goal reached"
            );
            return SolverResult {
                outcome: Outcome::Solved { depth: path_cost },
                nodes_expanded,
                max_frontier_size,
                time_elapsed_ms,
                solution: Some(solution),
            };
        }

        nodes_expanded += 1;
        explored.insert(state);

        for (ordinal, action, next) in successors(&state) {
            if explored.contains(&next) {
                continue;
            }
            let child = SearchNode {
                state: next,
                parent: Some(node_index),
                action: Some((ordinal, action)),
                path_cost: path_cost + 1,
                heuristic: heuristic.estimate(&next, &goal),
            };
            frontier.push(FrontierEntry::new(&child, arena.len(), seq));
            seq += 1;
            arena.push(child);
        }

        max_frontier_size = max_frontier_size.max(frontier.len());
        observer.on_frontier(max_frontier_size);
    }

    let time_elapsed_ms = start_time.elapsed().as_millis() as u64;
    tracing::info!(
        algorithm = ?config.algorithm,
        nodes_expanded,
        max_frontier_size,
        time_elapsed_ms,
        "frontier exhausted without reaching the goal"
    );
    SolverResult {
        outcome: Outcome::Exhausted,
        nodes_expanded,
        max_frontier_size,
        time_elapsed_ms,
        solution: None,
    }
}

fn reconstruct_solution(arena: &[SearchNode], index: usize) -> Vec<Step> {
    extract_path(arena, index)
        .into_iter()
        .filter_map(|idx| {
            let node = &arena[idx];
            node.action.map(|(blank, action)| Step {
                blank,
                action,
                state: node.state,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::apply;

    fn run(initial: State, algorithm: Algorithm) -> SolverResult {
        solve(initial, &SolverConfig::with_algorithm(algorithm))
    }

    /// Walk `steps` moves away from the goal, picking successors by a fixed
    /// pattern so the result is reproducible.
    fn scramble(steps: usize, salt: usize) -> State {
        let mut state = State::GOAL;
        for k in 0..steps {
            let options: Vec<State> = successors(&state)
                .map(|(_, _, s)| s)
                .filter(|s| s != &state)
                .collect();
            state = options[(k * 7 + salt) % options.len()];
        }
        state
    }

    fn replay(initial: State, steps: &[Step]) -> State {
        let mut state = initial;
        for step in steps {
            state = apply(&state, step.blank, step.action).unwrap();
            assert_eq!(state, step.state);
        }
        state
    }

    #[test]
    fn test_already_solved() {
        for algorithm in [Algorithm::UniformCost, Algorithm::AStarManhattan] {
            let result = run(State::GOAL, algorithm);
            assert_eq!(result.outcome, Outcome::Solved { depth: 0 });
            assert_eq!(result.nodes_expanded, 0);
            assert_eq!(result.max_frontier_size, 1);
            assert_eq!(result.solution.as_deref(), Some(&[][..]));
        }
    }

    #[test]
    fn test_one_move_astar() {
        let initial = State::from_raw([1, 2, 3, 4, 5, 6, 7, 8, 0, 9, 0, 0, 0]);
        let result = run(initial, Algorithm::AStarManhattan);
        assert_eq!(result.depth(), Some(1));
        assert_eq!(result.nodes_expanded, 1);
        // Root has blanks at 8, 10, 11, 12: left, right and three lowers.
        assert_eq!(result.max_frontier_size, 5);
        let solution = result.solution.unwrap();
        assert_eq!(solution.len(), 1);
        assert_eq!(solution[0].blank, 0);
        assert_eq!(solution[0].action, Action::Right);
    }

    #[test]
    fn test_one_move_ucs() {
        let initial = State::from_raw([1, 2, 3, 4, 5, 6, 7, 8, 0, 9, 0, 0, 0]);
        let result = run(initial, Algorithm::UniformCost);
        assert_eq!(result.depth(), Some(1));
        // All children tie at f = 1; the "left" child was pushed first.
        assert_eq!(result.nodes_expanded, 2);
        assert_eq!(result.max_frontier_size, 7);
    }

    #[test]
    fn test_exhausted_when_goal_unreachable() {
        // A lone piece can visit each of the 13 cells, never the full goal.
        let initial = State::from_raw([1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        for algorithm in [Algorithm::UniformCost, Algorithm::AStarManhattan] {
            let result = run(initial, algorithm);
            assert_eq!(result.outcome, Outcome::Exhausted);
            assert!(!result.solved());
            assert_eq!(result.depth(), None);
            assert_eq!(result.nodes_expanded, 13);
            assert!(result.solution.is_none());
        }
        let result = run(initial, Algorithm::UniformCost);
        assert_eq!(result.max_frontier_size, 2);
    }

    #[test]
    fn test_ucs_and_astar_agree_on_depth() {
        for (steps, salt) in [(2, 1), (4, 3), (5, 0), (6, 5), (7, 2)] {
            let initial = scramble(steps, salt);
            let ucs = run(initial, Algorithm::UniformCost);
            let astar = run(initial, Algorithm::AStarManhattan);

            let depth = ucs.depth().expect("ucs solves scrambled board");
            assert!(depth as usize <= steps);
            assert_eq!(astar.depth(), Some(depth), "scramble({steps}, {salt})");
            assert!(
                astar.nodes_expanded <= ucs.nodes_expanded,
                "A* expanded {} > UCS {}",
                astar.nodes_expanded,
                ucs.nodes_expanded
            );

            for result in [&ucs, &astar] {
                let solution = result.solution.as_ref().unwrap();
                assert_eq!(solution.len(), depth as usize);
                assert_eq!(replay(initial, solution), State::GOAL);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let initial = scramble(6, 4);
        for algorithm in [Algorithm::UniformCost, Algorithm::AStarManhattan] {
            let a = run(initial, algorithm);
            let b = run(initial, algorithm);
            assert_eq!(a.outcome, b.outcome);
            assert_eq!(a.nodes_expanded, b.nodes_expanded);
            assert_eq!(a.max_frontier_size, b.max_frontier_size);
            assert_eq!(a.solution, b.solution);
        }
    }

    #[derive(Default)]
    struct Recorder {
        popped: Vec<(State, u32, u32)>,
        peaks: Vec<usize>,
    }

    impl ExpansionObserver for Recorder {
        fn on_expand(&mut self, expansion: &Expansion<'_>) {
            self.popped
                .push((*expansion.state, expansion.path_cost, expansion.heuristic));
        }

        fn on_frontier(&mut self, max_frontier_size: usize) {
            self.peaks.push(max_frontier_size);
        }
    }

    #[test]
    fn test_observer_sees_every_pop() {
        let initial = State::from_raw([1, 2, 3, 4, 5, 6, 7, 8, 0, 9, 0, 0, 0]);
        let mut recorder = Recorder::default();
        let config = SolverConfig::with_algorithm(Algorithm::AStarManhattan);
        let result = solve_with_observer(initial, &config, &mut recorder);

        assert_eq!(recorder.popped.len(), result.nodes_expanded + 1);
        assert_eq!(recorder.popped[0], (initial, 0, 1));
        assert_eq!(recorder.popped.last(), Some(&(State::GOAL, 1, 0)));
        assert_eq!(recorder.peaks, vec![5]);
    }

    #[test]
    fn test_custom_goal() {
        let goal = State::from_raw([1, 2, 3, 4, 5, 6, 7, 8, 0, 9, 0, 0, 0]);
        let config = SolverConfig {
            algorithm: Algorithm::AStarManhattan,
            goal,
            ..Default::default()
        };
        let result = solve(State::GOAL, &config);
        assert_eq!(result.depth(), Some(1));
    }

    #[test]
    #[ignore = "explores a large part of the state space"]
    fn test_default_puzzle_ucs_matches_astar() {
        let astar = run(State::DEFAULT_PUZZLE, Algorithm::AStarManhattan);
        let ucs = run(State::DEFAULT_PUZZLE, Algorithm::UniformCost);
        assert!(astar.solved());
        assert_eq!(ucs.depth(), astar.depth());
        assert!(astar.nodes_expanded <= ucs.nodes_expanded);
    }
}
