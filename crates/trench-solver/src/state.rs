//! Board representation for the nine men in a trench puzzle.
//!
//! The board has ten trench cells in a row (indices 0-9) and three recess
//! cells (indices 10-12) sitting above trench columns 3, 5 and 7. A value of
//! 0 is a blank; 1-9 are the pieces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of cells on the board.
pub const CELL_COUNT: usize = 13;

/// Number of cells in the trench row.
pub const TRENCH_LEN: usize = 10;

/// Number of distinct pieces (values 1..=PIECE_COUNT).
pub const PIECE_COUNT: u8 = 9;

/// Trench column under each recess, in recess order.
pub const RECESS_COLUMNS: [usize; 3] = [3, 5, 7];

/// The blank sentinel.
pub const BLANK: u8 = 0;

/// Errors raised while building a `State` from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("expected 13 cells, got {0}")]
    WrongLength(usize),
    #[error("cell {index} holds {value}, expected 0..=9")]
    InvalidValue { index: usize, value: u8 },
    #[error("piece {0} appears more than once")]
    DuplicatePiece(u8),
    #[error("piece {0} is missing")]
    MissingPiece(u8),
    #[error("cannot parse cell value {0:?}")]
    Parse(String),
}

/// A full board configuration.
///
/// Immutable value type: moves produce new states. Equality, ordering and
/// hashing are structural over the 13 cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State([u8; CELL_COUNT]);

impl State {
    /// Pieces 1-9 in trench cells 0-8, everything else blank.
    pub const GOAL: State = State([1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 0, 0, 0]);

    /// The classic starting position: the sergeant (1) at the far end of the
    /// trench, with the first trench cell and all recesses blank.
    pub const DEFAULT_PUZZLE: State = State([0, 2, 3, 4, 5, 6, 7, 8, 9, 1, 0, 0, 0]);

    /// Build a state, checking that it holds each piece exactly once.
    pub fn new(cells: [u8; CELL_COUNT]) -> Result<Self, StateError> {
        let mut seen = [false; PIECE_COUNT as usize + 1];
        for (index, &value) in cells.iter().enumerate() {
            if value > PIECE_COUNT {
                return Err(StateError::InvalidValue { index, value });
            }
            if value == BLANK {
                continue;
            }
            if seen[value as usize] {
                return Err(StateError::DuplicatePiece(value));
            }
            seen[value as usize] = true;
        }
        if let Some(piece) = (1..=PIECE_COUNT).find(|&p| !seen[p as usize]) {
            return Err(StateError::MissingPiece(piece));
        }
        Ok(Self(cells))
    }

    /// Build a state without any validation.
    ///
    /// The move generator and search engine accept any arrangement, including
    /// boards with fewer pieces and therefore more blanks.
    pub const fn from_raw(cells: [u8; CELL_COUNT]) -> Self {
        Self(cells)
    }

    pub fn cells(&self) -> &[u8; CELL_COUNT] {
        &self.0
    }

    pub fn get(&self, index: usize) -> u8 {
        self.0[index]
    }

    /// Position of `piece` on the board, if present.
    pub fn position_of(&self, piece: u8) -> Option<usize> {
        self.0.iter().position(|&v| v == piece)
    }

    /// Copy of this state with cells `a` and `b` exchanged.
    pub fn swapped(&self, a: usize, b: usize) -> Self {
        let mut cells = self.0;
        cells.swap(a, b);
        Self(cells)
    }

    pub fn trench(&self) -> &[u8] {
        &self.0[..TRENCH_LEN]
    }

    pub fn recesses(&self) -> &[u8] {
        &self.0[TRENCH_LEN..]
    }
}

impl TryFrom<&[u8]> for State {
    type Error = StateError;

    fn try_from(cells: &[u8]) -> Result<Self, Self::Error> {
        let cells: [u8; CELL_COUNT] = cells
            .try_into()
            .map_err(|_| StateError::WrongLength(cells.len()))?;
        State::new(cells)
    }
}

/// Parses 13 integers separated by whitespace and/or commas.
impl FromStr for State {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|tok| !tok.is_empty())
            .map(|tok| tok.parse::<u8>().map_err(|_| StateError::Parse(tok.to_string())))
            .collect::<Result<Vec<u8>, _>>()?;
        State::try_from(values.as_slice())
    }
}

/// Renders the recess row above the trench, aligned to its columns.
impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut top = [None; TRENCH_LEN];
        for (slot, &column) in RECESS_COLUMNS.iter().enumerate() {
            top[column] = Some(self.0[TRENCH_LEN + slot]);
        }
        let line: Vec<String> = top
            .iter()
            .map(|cell| match cell {
                Some(v) => v.to_string(),
                None => " ".to_string(),
            })
            .collect();
        writeln!(f, "{}", line.join(" ").trim_end())?;
        let trench: Vec<String> = self.trench().iter().map(|v| v.to_string()).collect();
        write!(f, "{}", trench.join(" "))
    }
}

/// Grid coordinates `(row, column)` of a cell: the trench is row 0, the
/// recesses are row 1 above their trench column.
pub fn cell_coordinates(index: usize) -> (u32, u32) {
    if index < TRENCH_LEN {
        (0, index as u32)
    } else {
        (1, RECESS_COLUMNS[index - TRENCH_LEN] as u32)
    }
}

/// Puzzle input format: the bottom row followed by the recess values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrenchConfig {
    pub trench: [u8; TRENCH_LEN],
    pub recesses: [u8; 3],
}

impl TrenchConfig {
    pub fn to_state(&self) -> Result<State, StateError> {
        let mut cells = [BLANK; CELL_COUNT];
        cells[..TRENCH_LEN].copy_from_slice(&self.trench);
        cells[TRENCH_LEN..].copy_from_slice(&self.recesses);
        State::new(cells)
    }
}

impl From<State> for TrenchConfig {
    fn from(state: State) -> Self {
        let mut trench = [BLANK; TRENCH_LEN];
        let mut recesses = [BLANK; 3];
        trench.copy_from_slice(state.trench());
        recesses.copy_from_slice(state.recesses());
        Self { trench, recesses }
    }
}
