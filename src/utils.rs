use crate::engine::{Exit, Orientation, Piece, Puzzle};
use crate::error::ParseError;

/// Id of the piece that has to leave the board.
pub const TARGET_ID: char = 'P';
/// Marker for the exit cell.
pub const EXIT_MARKER: char = 'K';

enum ExitSide {
    Left(usize),
    Right(usize),
    Top(usize),
    Bottom(usize),
}

/// Parses an array of string slices into a `Puzzle`.
///
/// Each string slice is one row of the board, starting from row 0. The board size is
/// taken from the input: the number of rows and the length of the first row.
///
/// The exit is written as `K` just outside the board:
/// - at the start of a row for a left exit, or at its end for a right exit;
/// - on a line of its own above or below the grid for a top or bottom exit, at the
///   column the exit sits in.
///
/// Other rows may be padded with leading spaces to line up with a left or top exit;
/// surrounding whitespace is trimmed from every row.
///
/// Valid characters for cells are:
/// - `'.'`: an empty cell
/// - any ASCII letter other than `K`: a cell of the piece with that id
/// - `'P'`: a cell of the target piece
///
/// # Returns
/// * `Ok(Puzzle)` if the board parses and passes [`Puzzle::validate`].
/// * `Err(ParseError)` if:
///     - there is not exactly one exit marker;
///     - rows differ in length;
///     - an unrecognized character is encountered;
///     - a piece's cells do not form one straight contiguous line;
///     - the resulting pieces are rejected by [`Puzzle::new`] or [`Puzzle::validate`].
///
/// # Examples
/// ```
/// use slide_solver::engine::{Exit, Orientation};
/// use slide_solver::utils::puzzle_from_str_array;
///
/// let puzzle = puzzle_from_str_array(&[
///     "....A.",
///     "..PPA.K",
///     "......",
/// ])
/// .unwrap();
/// assert_eq!((puzzle.height(), puzzle.width()), (3, 6));
/// assert_eq!(puzzle.exit(), Exit::right(1, 6));
///
/// let blocker = puzzle.piece('A').unwrap();
/// assert_eq!((blocker.row, blocker.col, blocker.length), (0, 4, 2));
/// assert_eq!(blocker.orientation, Orientation::Vertical);
/// assert!(puzzle.target().unwrap().is_target);
///
/// assert!(puzzle_from_str_array(&["..PP.#K"]).is_err());
/// assert!(puzzle_from_str_array(&["..PP.."]).is_err());
/// ```
pub fn puzzle_from_str_array(s: &[&str]) -> Result<Puzzle, ParseError> {
    let markers: usize = s.iter().map(|line| line.matches(EXIT_MARKER).count()).sum();
    if markers != 1 {
        return Err(ParseError::ExitCount { found: markers });
    }

    let mut lines: Vec<&str> = s.to_vec();
    let mut side = None;
    if let Some(first) = lines.first() {
        if first.trim() == "K" {
            side = exit_column(first).map(ExitSide::Top);
            lines.remove(0);
        }
    }
    if side.is_none() {
        if let Some(last) = lines.last() {
            if last.trim() == "K" {
                side = exit_column(last).map(ExitSide::Bottom);
                lines.pop();
            }
        }
    }

    let mut rows = Vec::with_capacity(lines.len());
    for (r, line) in lines.iter().enumerate() {
        let mut row = line.trim();
        if let Some(rest) = row.strip_prefix(EXIT_MARKER) {
            side = Some(ExitSide::Left(r));
            row = rest;
        } else if let Some(rest) = row.strip_suffix(EXIT_MARKER) {
            side = Some(ExitSide::Right(r));
            row = rest;
        }
        rows.push(row.trim());
    }
    // A marker inside a row is neither a side nor a top/bottom exit.
    let side = match side {
        Some(side) => side,
        None => {
            let (row, col) = find_marker(&rows).unwrap_or((0, 0));
            return Err(ParseError::InvalidChar {
                ch: EXIT_MARKER,
                row,
                col,
            });
        }
    };

    let height = rows.len();
    let width = rows.first().map_or(0, |row| row.chars().count());
    let mut cells: Vec<(char, Vec<(usize, usize)>)> = Vec::new();
    for (r, row) in rows.iter().enumerate() {
        let found = row.chars().count();
        if found != width {
            return Err(ParseError::RowLength {
                row: r,
                expected: width,
                found,
            });
        }
        for (c, ch) in row.chars().enumerate() {
            match ch {
                '.' => {}
                id if id.is_ascii_alphabetic() && id != EXIT_MARKER => {
                    match cells.iter_mut().find(|(other, _)| *other == id) {
                        Some((_, covered)) => covered.push((r, c)),
                        None => cells.push((id, vec![(r, c)])),
                    }
                }
                _ => return Err(ParseError::InvalidChar { ch, row: r, col: c }),
            }
        }
    }

    let pieces = cells
        .iter()
        .map(|(id, covered)| piece_from_cells(*id, covered))
        .collect::<Result<Vec<_>, _>>()?;
    let exit = match side {
        ExitSide::Left(row) => Exit::left(row),
        ExitSide::Right(row) => Exit::right(row, width),
        ExitSide::Top(col) => Exit::top(col),
        ExitSide::Bottom(col) => Exit::bottom(col, height),
    };

    let puzzle = Puzzle::new(height, width, pieces, exit)?;
    puzzle.validate()?;
    Ok(puzzle)
}

/// Parses a complete board file.
///
/// The first line holds the board height and width, the second the number of pieces
/// other than the target. The board rows follow in the layout accepted by
/// [`puzzle_from_str_array`]. Blank lines are ignored.
///
/// ```text
/// 6 6
/// 1
/// ......
/// ....A.
/// ..PPA.K
/// ......
/// ......
/// ......
/// ```
pub fn parse_puzzle(text: &str) -> Result<Puzzle, ParseError> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (line, header) = lines.next().ok_or_else(|| ParseError::Header {
        line: 1,
        message: "missing board dimensions".to_string(),
    })?;
    let dims = header
        .split_whitespace()
        .map(|field| field.parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .ok()
        .filter(|dims| dims.len() == 2)
        .ok_or_else(|| ParseError::Header {
            line: line + 1,
            message: format!("expected \"<height> <width>\", found {:?}", header.trim()),
        })?;
    let (height, width) = (dims[0], dims[1]);

    let (line, count) = lines.next().ok_or_else(|| ParseError::Header {
        line: line + 2,
        message: "missing piece count".to_string(),
    })?;
    let expected_pieces = count.trim().parse::<usize>().map_err(|_| ParseError::Header {
        line: line + 1,
        message: format!("expected a piece count, found {:?}", count.trim()),
    })?;

    let rows: Vec<&str> = lines.map(|(_, row)| row).collect();
    let puzzle = puzzle_from_str_array(&rows)?;
    if puzzle.height() != height {
        return Err(ParseError::RowCount {
            expected: height,
            found: puzzle.height(),
        });
    }
    if puzzle.width() != width {
        return Err(ParseError::RowLength {
            row: 0,
            expected: width,
            found: puzzle.width(),
        });
    }
    let found = puzzle.pieces().iter().filter(|p| !p.is_target).count();
    if found != expected_pieces {
        return Err(ParseError::PieceCount {
            expected: expected_pieces,
            found,
        });
    }
    Ok(puzzle)
}

fn exit_column(line: &str) -> Option<usize> {
    line.chars().position(|ch| ch == EXIT_MARKER)
}

fn find_marker(rows: &[&str]) -> Option<(usize, usize)> {
    rows.iter().enumerate().find_map(|(r, row)| {
        row.chars()
            .position(|ch| ch == EXIT_MARKER)
            .map(|c| (r, c))
    })
}

// Cells arrive in row-major order, so a valid piece is already sorted.
fn piece_from_cells(id: char, cells: &[(usize, usize)]) -> Result<Piece, ParseError> {
    let (row, col) = cells[0];
    let along_row = cells.iter().enumerate().all(|(i, &(r, c))| r == row && c == col + i);
    let along_col = cells.iter().enumerate().all(|(i, &(r, c))| c == col && r == row + i);
    let orientation = if along_row {
        Orientation::Horizontal
    } else if along_col {
        Orientation::Vertical
    } else {
        return Err(ParseError::NotContiguous { id });
    };
    Ok(if id == TARGET_ID {
        Piece::target(id, row, col, cells.len(), orientation)
    } else {
        Piece::new(id, row, col, cells.len(), orientation)
    })
}
