//! Legal move generation.
//!
//! Every move slides one blank: along the trench, up into the recess above
//! trench cells 3/5/7, or back down. Blanks are addressed by their ordinal in
//! ascending index order, so the same ordinal is only meaningful against the
//! state it was generated from.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::state::{State, BLANK, CELL_COUNT, RECESS_COLUMNS, TRENCH_LEN};

/// Blank positions of a state. Four blanks is the normal case.
pub type Blanks = SmallVec<[usize; 4]>;

/// Actions available to one blank. At most three can apply at once.
pub type BlankActions = SmallVec<[Action; 3]>;

/// A single-blank move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Left,
    Right,
    #[serde(rename = "lift-1")]
    Lift1,
    #[serde(rename = "lift-2")]
    Lift2,
    #[serde(rename = "lift-3")]
    Lift3,
    #[serde(rename = "lower-1")]
    Lower1,
    #[serde(rename = "lower-2")]
    Lower2,
    #[serde(rename = "lower-3")]
    Lower3,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::Left,
        Action::Right,
        Action::Lift1,
        Action::Lift2,
        Action::Lift3,
        Action::Lower1,
        Action::Lower2,
        Action::Lower3,
    ];

    /// Index of the cell a blank at `blank` swaps with.
    ///
    /// Only meaningful for actions that are legal at `blank`.
    pub fn target(self, blank: usize) -> usize {
        match self {
            Action::Left => blank - 1,
            Action::Right => blank + 1,
            Action::Lift1 => TRENCH_LEN,
            Action::Lift2 => TRENCH_LEN + 1,
            Action::Lift3 => TRENCH_LEN + 2,
            Action::Lower1 => RECESS_COLUMNS[0],
            Action::Lower2 => RECESS_COLUMNS[1],
            Action::Lower3 => RECESS_COLUMNS[2],
        }
    }

    /// The action that moves the blank back where it came from.
    pub fn inverse(self) -> Action {
        match self {
            Action::Left => Action::Right,
            Action::Right => Action::Left,
            Action::Lift1 => Action::Lower1,
            Action::Lift2 => Action::Lower2,
            Action::Lift3 => Action::Lower3,
            Action::Lower1 => Action::Lift1,
            Action::Lower2 => Action::Lift2,
            Action::Lower3 => Action::Lift3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Lift1 => "lift-1",
            Action::Lift2 => "lift-2",
            Action::Lift3 => "lift-3",
            Action::Lower1 => "lower-1",
            Action::Lower2 => "lower-2",
            Action::Lower3 => "lower-3",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Indices of all blank cells, ascending.
pub fn find_blanks(state: &State) -> Blanks {
    state
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, &v)| v == BLANK)
        .map(|(i, _)| i)
        .collect()
}

/// Actions legal for a blank sitting at cell `p`.
pub fn actions_at(p: usize) -> BlankActions {
    let mut actions = BlankActions::new();
    if p > 0 && p < TRENCH_LEN {
        actions.push(Action::Left);
    }
    if p < TRENCH_LEN - 1 {
        actions.push(Action::Right);
    }
    match p {
        3 => actions.push(Action::Lift1),
        5 => actions.push(Action::Lift2),
        7 => actions.push(Action::Lift3),
        10 => actions.push(Action::Lower1),
        11 => actions.push(Action::Lower2),
        12 => actions.push(Action::Lower3),
        _ => {}
    }
    actions
}

/// Legal actions for each blank, in `find_blanks` order.
pub fn legal_moves(state: &State) -> Vec<BlankActions> {
    find_blanks(state).into_iter().map(actions_at).collect()
}

/// Apply `action` to the `blank_ordinal`-th blank of `state`.
///
/// Returns `None` if the ordinal is out of range or the action is not legal
/// for that blank.
pub fn apply(state: &State, blank_ordinal: usize, action: Action) -> Option<State> {
    let blanks = find_blanks(state);
    let blank = *blanks.get(blank_ordinal)?;
    if !actions_at(blank).contains(&action) {
        return None;
    }
    let target = action.target(blank);
    debug_assert!(target < CELL_COUNT);
    Some(state.swapped(blank, target))
}

/// Every `(blank_ordinal, action, successor)` reachable in one move, in
/// generation order.
pub fn successors(state: &State) -> impl Iterator<Item = (usize, Action, State)> + '_ {
    find_blanks(state)
        .into_iter()
        .enumerate()
        .flat_map(move |(ordinal, blank)| {
            actions_at(blank)
                .into_iter()
                .map(move |action| (ordinal, action, state.swapped(blank, action.target(blank))))
        })
}
