//! # Slide Solver Library
//!
//! This library models a sliding-block puzzle, where rigid pieces on a rectangular
//! board slide along their own axis until the target piece can leave through the exit,
//! and solves it with informed and uninformed search.
//!
//! It is used by two binaries:
//! - `ai_solver`: Reads a board file, runs one search and prints the solution path,
//!   either as rendered boards or as a JSON report.
//! - `heuristic_evaluator`: Scrambles a set of seeded boards and compares how many
//!   expansions every algorithm and heuristic needs to solve them.
//!
//! ## Modules
//! - `engine`: Contains the puzzle representation (`Puzzle`), pieces (`Piece`), the exit
//!   (`Exit`) and moves (`Move`), with move generation and the goal test.
//! - `heuristics`: Defines the cost-to-goal estimators used by the informed searches.
//! - `node`: Search tree nodes with cost bookkeeping and path reconstruction.
//! - `queue`: A comparator-driven binary heap used as the search frontier.
//! - `solver`: Uniform-cost, greedy best-first, A* and beam search, plus the `solve`
//!   entry points and the serializable report.
//! - `error`: Error types for construction, parsing and search.
//! - `utils`: Parsers for board layouts and board files.

pub mod engine;
pub mod error;
pub mod heuristics;
pub mod node;
pub mod queue;
pub mod solver;
pub mod utils;

// Items from sub-modules should be accessed via their full path, e.g.
// `slide_solver::solver::solve()`, except for this small set of common entry points.
pub use engine::{Move, Puzzle};
pub use heuristics::HeuristicMode;
pub use solver::{solve, Algorithm, SearchStatus};
