//! Error types shared by the engine, the heuristics, the queue and the board parser.
use thiserror::Error;

/// Failures raised while evaluating or searching a puzzle.
///
/// Neither variant should surface for a puzzle that passed [`crate::engine::Puzzle::validate`]
/// and a driver that checks [`crate::queue::PriorityQueue::is_empty`] before dequeuing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("puzzle has no target piece")]
    MissingTarget,
    #[error("priority queue is empty")]
    EmptyQueue,
}

pub type SolverResult<T> = Result<T, SolverError>;

/// Reasons a set of pieces cannot form a puzzle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("piece {id:?} does not fit inside the {height}x{width} board")]
    OutOfBounds { id: char, height: usize, width: usize },
    #[error("pieces {first:?} and {second:?} overlap at ({row}, {col})")]
    Overlap {
        first: char,
        second: char,
        row: usize,
        col: usize,
    },
    #[error("piece {id:?} has length {length}, expected at least 2")]
    PieceTooShort { id: char, length: usize },
    #[error("piece id {id:?} is used more than once")]
    DuplicatePiece { id: char },
    #[error("expected exactly one target piece, found {found}")]
    TargetCount { found: usize },
    #[error("exit at ({row}, {col}) is not reachable by the target piece")]
    ExitMisaligned { row: i32, col: i32 },
}

/// Problems found while reading a board definition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: {message}")]
    Header { line: usize, message: String },
    #[error("expected {expected} board rows, found {found}")]
    RowCount { expected: usize, found: usize },
    #[error("row {row} has {found} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unrecognized character {ch:?} in row {row} col {col}")]
    InvalidChar { ch: char, row: usize, col: usize },
    #[error("expected exactly one exit 'K', found {found}")]
    ExitCount { found: usize },
    #[error("header declares {expected} non-target pieces, board has {found}")]
    PieceCount { expected: usize, found: usize },
    #[error("piece {id:?} does not form a straight contiguous line")]
    NotContiguous { id: char },
    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
}
