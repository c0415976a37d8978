//! Puzzle state model for the sliding-block puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Orientation`: the axis a piece (or the exit) lies along.
//! - `Piece`: a rigid block occupying contiguous cells, one of which is the target.
//! - `Exit`: the cell just outside the board that the target piece must reach.
//! - `Move`: a single slide of one piece by a signed number of cells.
//! - `Puzzle`: the board, its pieces and occupancy grid, with move generation,
//!   goal detection and the canonical state key used for deduplication.
use crate::error::{PuzzleError, SolverError, SolverResult};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fmt;

/// The axis along which a piece slides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Orientation {
    /// Occupies one row and slides left/right.
    Horizontal,
    /// Occupies one column and slides up/down.
    Vertical,
}

impl Orientation {
    /// Converts the orientation to its single-letter form.
    ///
    /// # Examples
    ///
    /// ```
    /// use slide_solver::engine::Orientation;
    /// assert_eq!(Orientation::Horizontal.to_char(), 'H');
    /// assert_eq!(Orientation::Vertical.to_char(), 'V');
    /// ```
    pub fn to_char(&self) -> char {
        match self {
            Orientation::Horizontal => 'H',
            Orientation::Vertical => 'V',
        }
    }
}

/// A rigid, axis-aligned block.
///
/// `row`/`col` is the origin cell: the leftmost cell of a horizontal piece or the
/// topmost cell of a vertical one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: char,
    pub row: usize,
    pub col: usize,
    pub length: usize,
    pub orientation: Orientation,
    pub is_target: bool,
}

impl Piece {
    pub fn new(id: char, row: usize, col: usize, length: usize, orientation: Orientation) -> Self {
        Piece {
            id,
            row,
            col,
            length,
            orientation,
            is_target: false,
        }
    }

    /// Creates the piece that has to reach the exit.
    pub fn target(id: char, row: usize, col: usize, length: usize, orientation: Orientation) -> Self {
        Piece {
            is_target: true,
            ..Piece::new(id, row, col, length, orientation)
        }
    }

    /// Returns every cell the piece covers, starting from its origin.
    pub fn cells(&self) -> Vec<(usize, usize)> {
        (0..self.length)
            .map(|offset| match self.orientation {
                Orientation::Horizontal => (self.row, self.col + offset),
                Orientation::Vertical => (self.row + offset, self.col),
            })
            .collect()
    }

    /// Coordinate of the origin along the sliding axis.
    pub fn axis_start(&self) -> usize {
        match self.orientation {
            Orientation::Horizontal => self.col,
            Orientation::Vertical => self.row,
        }
    }

    /// Coordinate of the piece across the sliding axis (its row or column).
    pub fn cross(&self) -> usize {
        match self.orientation {
            Orientation::Horizontal => self.row,
            Orientation::Vertical => self.col,
        }
    }
}

/// The board exit.
///
/// Exits sit just outside the board: a horizontal exit uses column `-1` (left edge)
/// or `width` (right edge) in the target's row, a vertical exit uses row `-1` (top)
/// or `height` (bottom) in the target's column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Exit {
    pub row: i32,
    pub col: i32,
    pub orientation: Orientation,
}

impl Exit {
    pub fn left(row: usize) -> Self {
        Exit {
            row: row as i32,
            col: -1,
            orientation: Orientation::Horizontal,
        }
    }

    pub fn right(row: usize, width: usize) -> Self {
        Exit {
            row: row as i32,
            col: width as i32,
            orientation: Orientation::Horizontal,
        }
    }

    pub fn top(col: usize) -> Self {
        Exit {
            row: -1,
            col: col as i32,
            orientation: Orientation::Vertical,
        }
    }

    pub fn bottom(col: usize, height: usize) -> Self {
        Exit {
            row: height as i32,
            col: col as i32,
            orientation: Orientation::Vertical,
        }
    }

    fn axis_coord(&self) -> i32 {
        match self.orientation {
            Orientation::Horizontal => self.col,
            Orientation::Vertical => self.row,
        }
    }

    fn cross(&self) -> i32 {
        match self.orientation {
            Orientation::Horizontal => self.row,
            Orientation::Vertical => self.col,
        }
    }
}

/// One slide of a piece: positive `delta` moves right/down, negative moves left/up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    #[serde(rename = "pieceId")]
    pub piece: char,
    pub delta: i32,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:+}", self.piece, self.delta)
    }
}

/// A complete puzzle state: board geometry, pieces, occupancy grid and exit.
///
/// `Puzzle` is a value type. Search code clones a state before calling
/// [`Puzzle::move_piece`], so a state held by one search node is never changed
/// through another.
///
/// # Examples
/// ```
/// use slide_solver::engine::{Exit, Orientation, Piece, Puzzle};
///
/// let pieces = vec![Piece::target('P', 2, 2, 2, Orientation::Horizontal)];
/// let mut puzzle = Puzzle::new(6, 6, pieces, Exit::right(2, 6)).unwrap();
/// assert!(!puzzle.is_goal().unwrap());
/// assert!(puzzle.move_piece('P', 2));
/// assert!(puzzle.is_goal().unwrap());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Puzzle {
    height: usize,
    width: usize,
    grid: Vec<Option<char>>,
    pieces: Vec<Piece>,
    exit: Exit,
}

impl Puzzle {
    /// Builds a puzzle and its occupancy grid.
    ///
    /// Only the geometry is checked here; see [`Puzzle::validate`] for the target
    /// and exit rules.
    ///
    /// # Returns
    /// * `Err(PuzzleError)` if a piece is shorter than 2 cells, reuses an id, leaves the
    ///   board, or overlaps another piece.
    pub fn new(
        height: usize,
        width: usize,
        pieces: Vec<Piece>,
        exit: Exit,
    ) -> Result<Self, PuzzleError> {
        let mut grid = vec![None; height * width];
        for (idx, piece) in pieces.iter().enumerate() {
            if piece.length < 2 {
                return Err(PuzzleError::PieceTooShort {
                    id: piece.id,
                    length: piece.length,
                });
            }
            if pieces[..idx].iter().any(|p| p.id == piece.id) {
                return Err(PuzzleError::DuplicatePiece { id: piece.id });
            }
            for (r, c) in piece.cells() {
                if r >= height || c >= width {
                    return Err(PuzzleError::OutOfBounds {
                        id: piece.id,
                        height,
                        width,
                    });
                }
                if let Some(other) = grid[r * width + c] {
                    return Err(PuzzleError::Overlap {
                        first: other,
                        second: piece.id,
                        row: r,
                        col: c,
                    });
                }
                grid[r * width + c] = Some(piece.id);
            }
        }
        Ok(Puzzle {
            height,
            width,
            grid,
            pieces,
            exit,
        })
    }

    /// Checks the rules a solvable puzzle must satisfy beyond its geometry.
    ///
    /// There must be exactly one target piece, and the exit must lie just outside the
    /// board on the target's own line so that sliding the target can reach it.
    pub fn validate(&self) -> Result<(), PuzzleError> {
        let targets: Vec<&Piece> = self.pieces.iter().filter(|p| p.is_target).collect();
        if targets.len() != 1 {
            return Err(PuzzleError::TargetCount {
                found: targets.len(),
            });
        }
        let target = targets[0];
        let misaligned = PuzzleError::ExitMisaligned {
            row: self.exit.row,
            col: self.exit.col,
        };
        if target.orientation != self.exit.orientation
            || target.cross() as i32 != self.exit.cross()
        {
            return Err(misaligned);
        }
        let axis = self.exit.axis_coord();
        if axis != -1 && axis != self.extent(self.exit.orientation) as i32 {
            return Err(misaligned);
        }
        Ok(())
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn exit(&self) -> Exit {
        self.exit
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: char) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    /// Returns the target piece, or `SolverError::MissingTarget`.
    pub fn target(&self) -> SolverResult<&Piece> {
        self.pieces
            .iter()
            .find(|p| p.is_target)
            .ok_or(SolverError::MissingTarget)
    }

    /// Returns the id of the piece at (`r`, `c`), or `None` for an empty cell.
    ///
    /// # Panics
    /// Panics if `r` or `c` are outside the board.
    pub fn cell(&self, r: usize, c: usize) -> Option<char> {
        self.grid[r * self.width + c]
    }

    /// Board length along `orientation`: the width for horizontal, the height for vertical.
    pub fn extent(&self, orientation: Orientation) -> usize {
        match orientation {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }

    fn place_pieces(&mut self) {
        self.grid = vec![None; self.height * self.width];
        for piece in &self.pieces {
            for (r, c) in piece.cells() {
                self.grid[r * self.width + c] = Some(piece.id);
            }
        }
    }

    /// Maps an (axis, cross) pair for `orientation` back to (row, col).
    fn at(orientation: Orientation, axis: usize, cross: usize) -> (usize, usize) {
        match orientation {
            Orientation::Horizontal => (cross, axis),
            Orientation::Vertical => (axis, cross),
        }
    }

    /// Checks whether `piece` can slide by `delta` cells along its orientation.
    ///
    /// The piece must stay on the board and every cell it would cover must be empty
    /// or already covered by the piece itself. Checking has no side effects.
    pub fn can_move(&self, piece: &Piece, delta: i32) -> bool {
        let extent = self.extent(piece.orientation) as i64;
        let start = piece.axis_start() as i64 + delta as i64;
        if start < 0 || start + piece.length as i64 > extent {
            return false;
        }
        (0..piece.length).all(|offset| {
            let (r, c) = Self::at(
                piece.orientation,
                start as usize + offset,
                piece.cross(),
            );
            self.cell(r, c).map_or(true, |id| id == piece.id)
        })
    }

    /// Slides the piece named `id` by `delta` cells and rebuilds the occupancy grid.
    ///
    /// # Returns
    /// * `true` if the piece exists and the slide is legal.
    /// * `false` otherwise; the puzzle is left untouched.
    pub fn move_piece(&mut self, id: char, delta: i32) -> bool {
        let Some(idx) = self.pieces.iter().position(|p| p.id == id) else {
            return false;
        };
        if !self.can_move(&self.pieces[idx], delta) {
            return false;
        }
        let piece = &mut self.pieces[idx];
        match piece.orientation {
            Orientation::Horizontal => piece.col = (piece.col as i64 + delta as i64) as usize,
            Orientation::Vertical => piece.row = (piece.row as i64 + delta as i64) as usize,
        }
        self.place_pieces();
        true
    }

    /// Generates every state reachable with one slide.
    ///
    /// For each piece, steps of -1, -2, ... are tried until the first illegal one,
    /// then +1, +2, ... likewise. Every legal step yields a cloned puzzle with that
    /// single move applied, paired with the move itself.
    pub fn successors(&self) -> Vec<(Puzzle, Move)> {
        let mut successors = Vec::new();
        for piece in &self.pieces {
            for sign in [-1, 1] {
                let mut step = sign;
                while self.can_move(piece, step) {
                    let mut next = self.clone();
                    next.move_piece(piece.id, step);
                    successors.push((
                        next,
                        Move {
                            piece: piece.id,
                            delta: step,
                        },
                    ));
                    step += sign;
                }
            }
        }
        successors
    }

    /// Axis coordinate of the target's end nearest the exit.
    fn leading_edge(&self, target: &Piece) -> i32 {
        if self.exit.axis_coord() < 0 {
            target.axis_start() as i32
        } else {
            (target.axis_start() + target.length) as i32 - 1
        }
    }

    /// Number of cells the target still has to slide before it touches the exit.
    ///
    /// This is `|exit - leading_edge| - 1`, so it is zero exactly when the target's
    /// leading edge sits on the last board cell before the exit.
    pub fn exit_distance(&self) -> SolverResult<u32> {
        let target = self.target()?;
        let gap = (self.exit.axis_coord() - self.leading_edge(target)).abs() - 1;
        Ok(gap.max(0) as u32)
    }

    /// Checks whether the target piece has reached the exit.
    ///
    /// The target's cross-axis coordinate must match the exit's and its leading edge
    /// must be adjacent to the exit.
    pub fn is_goal(&self) -> SolverResult<bool> {
        let target = self.target()?;
        let aligned = target.orientation == self.exit.orientation
            && target.cross() as i32 == self.exit.cross();
        Ok(aligned && self.exit_distance()? == 0)
    }

    /// Board cells strictly between the target's leading edge and the exit, ordered
    /// from the target outward.
    pub fn corridor(&self) -> SolverResult<Vec<(usize, usize)>> {
        let target = self.target()?;
        let leading = self.leading_edge(target);
        let exit = self.exit.axis_coord();
        let axis: Vec<i32> = if exit > leading {
            (leading + 1..exit).collect()
        } else {
            (exit + 1..leading).rev().collect()
        };
        let extent = self.extent(target.orientation) as i32;
        Ok(axis
            .into_iter()
            .filter(|&a| a >= 0 && a < extent)
            .map(|a| Self::at(target.orientation, a as usize, target.cross()))
            .collect())
    }

    /// Every cell of the row (horizontal) or column (vertical) `piece` slides along.
    pub fn lane(&self, piece: &Piece) -> Vec<(usize, usize)> {
        (0..self.extent(piece.orientation))
            .map(|a| Self::at(piece.orientation, a, piece.cross()))
            .collect()
    }

    /// Distinct ids of the pieces covering `cells`, in order of first appearance.
    pub fn occupants(&self, cells: &[(usize, usize)]) -> Vec<char> {
        let mut ids = Vec::new();
        for &(r, c) in cells {
            if let Some(id) = self.cell(r, c) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    /// Counts the empty cells directly beyond `piece` in the direction of `sign`,
    /// stopping at the board edge or the first occupied cell.
    pub fn free_run(&self, piece: &Piece, sign: i32) -> usize {
        let extent = self.extent(piece.orientation) as i64;
        let mut pos = if sign > 0 {
            (piece.axis_start() + piece.length) as i64
        } else {
            piece.axis_start() as i64 - 1
        };
        let mut run = 0;
        while pos >= 0 && pos < extent {
            let (r, c) = Self::at(piece.orientation, pos as usize, piece.cross());
            if self.cell(r, c).is_some() {
                break;
            }
            run += 1;
            pos += sign.signum() as i64;
        }
        run
    }

    /// Produces the canonical state key.
    ///
    /// Every piece is rendered as `id:row,col`; the entries are sorted and joined with
    /// `|`, so two puzzles with the same placements share a key whatever order their
    /// pieces were added in.
    ///
    /// # Examples
    /// ```
    /// use slide_solver::engine::{Exit, Orientation, Piece, Puzzle};
    ///
    /// let pieces = vec![
    ///     Piece::new('B', 0, 4, 2, Orientation::Vertical),
    ///     Piece::target('P', 2, 0, 2, Orientation::Horizontal),
    /// ];
    /// let puzzle = Puzzle::new(6, 6, pieces, Exit::right(2, 6)).unwrap();
    /// assert_eq!(puzzle.serialize(), "B:0,4|P:2,0");
    /// ```
    pub fn serialize(&self) -> String {
        let mut entries: Vec<String> = self
            .pieces
            .iter()
            .map(|p| format!("{}:{},{}", p.id, p.row, p.col))
            .collect();
        entries.sort_unstable();
        entries.join("|")
    }

    /// Copies the occupancy grid into a row-major matrix for rendering.
    pub fn grid_snapshot(&self) -> Vec<Vec<Option<char>>> {
        self.grid
            .chunks(self.width)
            .map(|row| row.to_vec())
            .collect()
    }

    /// Renders the board in its text format with an optional highlighted piece.
    ///
    /// Empty cells print as `.` and the exit as `K`. A left exit shifts every other row
    /// one column right; top and bottom exits get a line of their own. If `highlight`
    /// names a piece, its cells are wrapped in ANSI escape codes for terminal output.
    pub fn to_string_with_highlight(&self, highlight: Option<char>) -> String {
        let mut lines = Vec::new();
        let exit_line = |col: i32| format!("{}K", " ".repeat(col.max(0) as usize));

        if self.exit.orientation == Orientation::Vertical && self.exit.row < 0 {
            lines.push(exit_line(self.exit.col));
        }
        for r in 0..self.height {
            let mut line = String::new();
            let exit_here = self.exit.orientation == Orientation::Horizontal
                && self.exit.row == r as i32;
            if self.exit.orientation == Orientation::Horizontal && self.exit.col < 0 {
                line.push(if exit_here { 'K' } else { ' ' });
            }
            for c in 0..self.width {
                match self.cell(r, c) {
                    Some(id) if highlight == Some(id) => {
                        line.push_str(&format!("\x1b[1;41m{}\x1b[m", id))
                    }
                    Some(id) => line.push(id),
                    None => line.push('.'),
                }
            }
            if exit_here && self.exit.col >= self.width as i32 {
                line.push('K');
            }
            lines.push(line);
        }
        if self.exit.orientation == Orientation::Vertical && self.exit.row >= self.height as i32 {
            lines.push(exit_line(self.exit.col));
        }
        lines.join("\n")
    }

    /// Walks `steps` random legal moves away from this state.
    ///
    /// The walk is driven by a `SmallRng` seeded with `seed`, so the same seed always
    /// produces the same puzzle. The walk stops early if a state has no successors.
    pub fn scrambled(&self, seed: u64, steps: usize) -> Puzzle {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut current = self.clone();
        for _ in 0..steps {
            let mut successors = current.successors();
            if successors.is_empty() {
                break;
            }
            let pick = rng.gen_range(0..successors.len());
            current = successors.swap_remove(pick).0;
        }
        current
    }
}

impl fmt::Display for Puzzle {
    /// Formats the board using `to_string_with_highlight(None)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_highlight(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::puzzle_from_str_array;

    fn open_board() -> Puzzle {
        puzzle_from_str_array(&[
            "......", "......", "..PP..K", "......", "......", "......",
        ])
        .unwrap()
    }

    fn assert_no_overlap(puzzle: &Puzzle) {
        let mut seen = vec![vec![None; puzzle.width()]; puzzle.height()];
        for piece in puzzle.pieces() {
            for (r, c) in piece.cells() {
                assert!(r < puzzle.height() && c < puzzle.width());
                assert_eq!(seen[r][c], None, "cell ({}, {}) covered twice", r, c);
                seen[r][c] = Some(piece.id);
                assert_eq!(puzzle.cell(r, c), Some(piece.id));
            }
        }
        let covered: usize = puzzle.pieces().iter().map(|p| p.length).sum();
        let occupied = puzzle.grid.iter().filter(|c| c.is_some()).count();
        assert_eq!(covered, occupied);
    }

    #[test]
    fn test_new_rejects_overlap() {
        let pieces = vec![
            Piece::target('P', 0, 0, 2, Orientation::Horizontal),
            Piece::new('A', 0, 1, 2, Orientation::Vertical),
        ];
        let err = Puzzle::new(3, 3, pieces, Exit::right(0, 3)).unwrap_err();
        assert_eq!(
            err,
            PuzzleError::Overlap {
                first: 'P',
                second: 'A',
                row: 0,
                col: 1
            }
        );
    }

    #[test]
    fn test_new_rejects_out_of_bounds_and_short_pieces() {
        let off_board = vec![Piece::target('P', 0, 2, 2, Orientation::Horizontal)];
        assert!(matches!(
            Puzzle::new(3, 3, off_board, Exit::right(0, 3)),
            Err(PuzzleError::OutOfBounds { id: 'P', .. })
        ));

        let short = vec![Piece::target('P', 0, 0, 1, Orientation::Horizontal)];
        assert!(matches!(
            Puzzle::new(3, 3, short, Exit::right(0, 3)),
            Err(PuzzleError::PieceTooShort { id: 'P', length: 1 })
        ));

        let duplicate = vec![
            Piece::target('P', 0, 0, 2, Orientation::Horizontal),
            Piece::new('P', 1, 0, 2, Orientation::Horizontal),
        ];
        assert!(matches!(
            Puzzle::new(3, 3, duplicate, Exit::right(0, 3)),
            Err(PuzzleError::DuplicatePiece { id: 'P' })
        ));
    }

    #[test]
    fn test_validate() {
        assert!(open_board().validate().is_ok());

        let no_target = Puzzle::new(
            3,
            3,
            vec![Piece::new('A', 0, 0, 2, Orientation::Horizontal)],
            Exit::right(0, 3),
        )
        .unwrap();
        assert_eq!(
            no_target.validate(),
            Err(PuzzleError::TargetCount { found: 0 })
        );

        let wrong_row = Puzzle::new(
            3,
            3,
            vec![Piece::target('P', 0, 0, 2, Orientation::Horizontal)],
            Exit::right(1, 3),
        )
        .unwrap();
        assert!(matches!(
            wrong_row.validate(),
            Err(PuzzleError::ExitMisaligned { row: 1, col: 3 })
        ));

        let wrong_axis = Puzzle::new(
            3,
            3,
            vec![Piece::target('P', 0, 0, 2, Orientation::Horizontal)],
            Exit::top(0),
        )
        .unwrap();
        assert!(wrong_axis.validate().is_err());
    }

    #[test]
    fn test_can_move() {
        let puzzle = puzzle_from_str_array(&["APPCK", "ADDC", ".BBB"]).unwrap();
        let target = puzzle.piece('P').unwrap();
        assert!(!puzzle.can_move(target, 1), "C blocks the target");
        assert!(!puzzle.can_move(target, -1), "A blocks the target");

        let b = puzzle.piece('B').unwrap();
        assert!(puzzle.can_move(b, -1));
        assert!(!puzzle.can_move(b, -2), "would leave the board");
        assert!(!puzzle.can_move(b, 1));

        let a = puzzle.piece('A').unwrap();
        assert!(puzzle.can_move(a, 1));
        assert!(!puzzle.can_move(a, -1));
    }

    #[test]
    fn test_move_piece_invalid_is_noop() {
        let mut puzzle = puzzle_from_str_array(&["APPCK", "ADDC", ".BBB"]).unwrap();
        let before = puzzle.clone();
        assert!(!puzzle.move_piece('P', 1));
        assert!(!puzzle.move_piece('Z', 1), "unknown id");
        assert!(!puzzle.move_piece('B', 5));
        assert_eq!(puzzle, before);
    }

    #[test]
    fn test_move_piece_rebuilds_grid() {
        let mut puzzle = puzzle_from_str_array(&["APPCK", "ADDC", ".BBB"]).unwrap();
        assert!(puzzle.move_piece('B', -1));
        assert_eq!(puzzle.cell(2, 0), Some('B'));
        assert_eq!(puzzle.cell(2, 3), None);
        assert!(puzzle.move_piece('C', 1));
        assert_eq!(puzzle.cell(0, 3), None);
        assert_eq!(puzzle.cell(2, 3), Some('C'));
        assert_no_overlap(&puzzle);
    }

    #[test]
    fn test_successors_slide_full_range() {
        let puzzle = open_board();
        let moves: Vec<Move> = puzzle.successors().into_iter().map(|(_, m)| m).collect();
        let deltas: Vec<i32> = moves.iter().map(|m| m.delta).collect();
        assert_eq!(deltas, vec![-1, -2, 1, 2]);
        assert!(moves.iter().all(|m| m.piece == 'P'));
    }

    #[test]
    fn test_successors_do_not_touch_source() {
        let puzzle = puzzle_from_str_array(&["APPCK", "ADDC", ".BBB"]).unwrap();
        let before = puzzle.clone();
        let successors = puzzle.successors();
        assert_eq!(puzzle, before);
        let moves: Vec<Move> = successors.iter().map(|(_, m)| *m).collect();
        assert_eq!(
            moves,
            vec![
                Move { piece: 'A', delta: 1 },
                Move { piece: 'B', delta: -1 },
            ]
        );
        for (next, m) in &successors {
            assert_no_overlap(next);
            let mut replay = puzzle.clone();
            assert!(replay.move_piece(m.piece, m.delta));
            assert_eq!(&replay, next);
        }
    }

    #[test]
    fn test_no_overlap_after_random_walks() {
        let base = puzzle_from_str_array(&[
            "AAB..C", "D.B..C", "DPPE.CK", "D..E..", "FF.E.G", "HHH..G",
        ])
        .unwrap();
        for seed in 0..20 {
            let puzzle = base.scrambled(seed, 40);
            assert_no_overlap(&puzzle);
            for (next, _) in puzzle.successors() {
                assert_no_overlap(&next);
            }
        }
    }

    #[test]
    fn test_scrambled_is_deterministic() {
        let base = open_board();
        assert_eq!(base.scrambled(7, 10), base.scrambled(7, 10));
        assert_eq!(base.scrambled(7, 0), base);
    }

    #[test]
    fn test_is_goal_all_edges() {
        let right = puzzle_from_str_array(&["...PPK", "....."]).unwrap();
        assert!(right.is_goal().unwrap());

        let left = puzzle_from_str_array(&[" .....", "KPP..."]).unwrap();
        assert!(left.is_goal().unwrap());
        let left_far = puzzle_from_str_array(&[" .....", "K..PP."]).unwrap();
        assert!(!left_far.is_goal().unwrap());
        assert_eq!(left_far.exit_distance().unwrap(), 2);

        let top = puzzle_from_str_array(&[" K", ".P", ".P", ".."]).unwrap();
        assert!(top.is_goal().unwrap());

        let bottom = puzzle_from_str_array(&["P.", "P.", "..", "K"]).unwrap();
        assert!(!bottom.is_goal().unwrap());
        assert_eq!(bottom.exit_distance().unwrap(), 1);
    }

    #[test]
    fn test_missing_target() {
        let puzzle = Puzzle::new(
            3,
            3,
            vec![Piece::new('A', 0, 0, 2, Orientation::Horizontal)],
            Exit::right(0, 3),
        )
        .unwrap();
        assert_eq!(puzzle.is_goal(), Err(SolverError::MissingTarget));
        assert_eq!(puzzle.exit_distance(), Err(SolverError::MissingTarget));
        assert_eq!(puzzle.corridor(), Err(SolverError::MissingTarget));
    }

    #[test]
    fn test_corridor_and_occupants() {
        let puzzle = puzzle_from_str_array(&[
            "....A.", "PP..A.K", "...BB.",
        ])
        .unwrap();
        assert_eq!(
            puzzle.corridor().unwrap(),
            vec![(1, 2), (1, 3), (1, 4), (1, 5)]
        );
        assert_eq!(puzzle.occupants(&puzzle.corridor().unwrap()), vec!['A']);

        let left = puzzle_from_str_array(&[" A....", "KA..PP"]).unwrap();
        assert_eq!(
            left.corridor().unwrap(),
            vec![(1, 2), (1, 1), (1, 0)]
        );
    }

    #[test]
    fn test_free_run() {
        let puzzle = puzzle_from_str_array(&["AAB..C", "PPB..CK", "....DD"]).unwrap();
        let b = puzzle.piece('B').unwrap();
        assert_eq!(puzzle.free_run(b, -1), 0);
        assert_eq!(puzzle.free_run(b, 1), 1);
        let d = puzzle.piece('D').unwrap();
        assert_eq!(puzzle.free_run(d, -1), 4);
        assert_eq!(puzzle.free_run(d, 1), 0);
    }

    #[test]
    fn test_serialize_ignores_insertion_order() {
        let forward = vec![
            Piece::target('P', 2, 0, 2, Orientation::Horizontal),
            Piece::new('A', 0, 3, 3, Orientation::Vertical),
            Piece::new('b', 5, 0, 2, Orientation::Horizontal),
        ];
        let mut backward = forward.clone();
        backward.reverse();
        let a = Puzzle::new(6, 6, forward, Exit::right(2, 6)).unwrap();
        let b = Puzzle::new(6, 6, backward, Exit::right(2, 6)).unwrap();
        assert_eq!(a.serialize(), b.serialize());
        assert_eq!(a.serialize(), "A:0,3|P:2,0|b:5,0");

        let mut moved = a.clone();
        moved.move_piece('A', 1);
        assert_ne!(moved.serialize(), a.serialize());
    }

    #[test]
    fn test_grid_snapshot() {
        let puzzle = puzzle_from_str_array(&["PP.K", "AA."]).unwrap();
        assert_eq!(
            puzzle.grid_snapshot(),
            vec![
                vec![Some('P'), Some('P'), None],
                vec![Some('A'), Some('A'), None],
            ]
        );
    }

    #[test]
    fn test_display_board_formatting() {
        let rows = ["APPCK", "ADDC", ".BBB"];
        let puzzle = puzzle_from_str_array(&rows).unwrap();
        assert_eq!(format!("{}", puzzle), rows.join("\n"));

        let top = puzzle_from_str_array(&[" K", ".P", ".P"]).unwrap();
        assert_eq!(top.to_string(), " K\n.P\n.P");

        let left = puzzle_from_str_array(&[" ...", "KPP.", " AA."]).unwrap();
        assert_eq!(left.to_string(), " ...\nKPP.\n AA.");

        let highlighted = puzzle.to_string_with_highlight(Some('D'));
        assert!(highlighted.contains("\x1b[1;41mD\x1b[m"));
    }

    #[test]
    fn test_move_display() {
        assert_eq!(Move { piece: 'A', delta: -2 }.to_string(), "A-2");
        assert_eq!(Move { piece: 'P', delta: 3 }.to_string(), "P+3");
    }
}
