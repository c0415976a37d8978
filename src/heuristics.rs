use crate::engine::Puzzle;
use crate::error::SolverResult;
use clap::ValueEnum;
use std::collections::{HashMap, HashSet};

/// Selects one of the cost-to-goal estimators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum HeuristicMode {
    /// Exit distance plus weighted count of occupied corridor cells.
    #[default]
    DirectBlockers,
    /// Direct blockers plus the recursive burden of everything in the way.
    RecursiveBlockers,
    /// Exit distance plus the smallest slide that clears each corridor blocker.
    MinStepsToFree,
}

impl HeuristicMode {
    /// Maps the numeric flag used on the command line (1, 2 or 3) to a mode.
    ///
    /// Any other value falls back to `DirectBlockers`.
    ///
    /// # Examples
    /// ```
    /// use slide_solver::heuristics::HeuristicMode;
    /// assert_eq!(HeuristicMode::from_flag(2), HeuristicMode::RecursiveBlockers);
    /// assert_eq!(HeuristicMode::from_flag(9), HeuristicMode::DirectBlockers);
    /// ```
    pub fn from_flag(flag: u32) -> Self {
        match flag {
            2 => HeuristicMode::RecursiveBlockers,
            3 => HeuristicMode::MinStepsToFree,
            _ => HeuristicMode::DirectBlockers,
        }
    }
}

/// Default weight applied to each occupied corridor cell.
pub const DEFAULT_BLOCKER_WEIGHT: f64 = 1.0;

/// Share of a blocking piece's own burden added to the piece it blocks.
const BURDEN_FACTOR: f64 = 0.5;

/// A configured estimator: which formula to use and its tunable blocker weight.
///
/// Estimates are not admissible, so A* driven by any of them may return a
/// longer-than-optimal path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Heuristic {
    pub mode: HeuristicMode,
    pub blocker_weight: f64,
}

impl Default for Heuristic {
    fn default() -> Self {
        Heuristic::new(HeuristicMode::default())
    }
}

impl Heuristic {
    pub fn new(mode: HeuristicMode) -> Self {
        Heuristic {
            mode,
            blocker_weight: DEFAULT_BLOCKER_WEIGHT,
        }
    }

    pub fn with_blocker_weight(mut self, blocker_weight: f64) -> Self {
        self.blocker_weight = blocker_weight;
        self
    }

    /// Estimates the remaining cost from `puzzle` to a goal state.
    ///
    /// # Returns
    /// `Ok(0.0)` for a goal state, otherwise the value of the selected formula.
    /// Fails with `SolverError::MissingTarget` if the puzzle has no target.
    pub fn evaluate(&self, puzzle: &Puzzle) -> SolverResult<f64> {
        if puzzle.is_goal()? {
            return Ok(0.0);
        }
        match self.mode {
            HeuristicMode::DirectBlockers => direct_blockers(puzzle, self.blocker_weight),
            HeuristicMode::RecursiveBlockers => recursive_blockers(puzzle, self.blocker_weight),
            HeuristicMode::MinStepsToFree => min_steps_to_free(puzzle),
        }
    }
}

/// Counts occupied cells between the target's leading edge and the exit.
pub fn count_corridor_blockers(puzzle: &Puzzle) -> SolverResult<usize> {
    Ok(puzzle
        .corridor()?
        .into_iter()
        .filter(|&(r, c)| puzzle.cell(r, c).is_some())
        .count())
}

/// Exit distance plus `weight` times the number of occupied corridor cells.
pub fn direct_blockers(puzzle: &Puzzle, weight: f64) -> SolverResult<f64> {
    let distance = puzzle.exit_distance()? as f64;
    let blockers = count_corridor_blockers(puzzle)? as f64;
    Ok(distance + weight * blockers)
}

/// Direct blockers plus the target's recursive blocking burden.
///
/// The burden of a piece is the number of other pieces on its blocking line plus
/// half the burden of each of them. The target's blocking line is its corridor;
/// every other piece's is the full row or column it slides along.
pub fn recursive_blockers(puzzle: &Puzzle, weight: f64) -> SolverResult<f64> {
    let target = puzzle.target()?.id;
    let mut memo = HashMap::new();
    let mut visiting = HashSet::new();
    let burden = blocking_burden(puzzle, target, target, &mut memo, &mut visiting)?;
    Ok(direct_blockers(puzzle, weight)? + burden)
}

fn blocking_burden(
    puzzle: &Puzzle,
    target: char,
    id: char,
    memo: &mut HashMap<char, f64>,
    visiting: &mut HashSet<char>,
) -> SolverResult<f64> {
    if let Some(&cached) = memo.get(&id) {
        return Ok(cached);
    }
    // A piece already on the current chain closes a blocking cycle.
    if !visiting.insert(id) {
        return Ok(0.0);
    }

    let line = match puzzle.piece(id) {
        Some(_) if id == target => puzzle.corridor()?,
        Some(piece) => puzzle.lane(piece),
        None => Vec::new(),
    };
    let blockers: Vec<char> = puzzle
        .occupants(&line)
        .into_iter()
        .filter(|&other| other != id)
        .collect();

    let mut burden = blockers.len() as f64;
    for blocker in blockers {
        burden += BURDEN_FACTOR * blocking_burden(puzzle, target, blocker, memo, visiting)?;
    }

    visiting.remove(&id);
    memo.insert(id, burden);
    Ok(burden)
}

/// Exit distance plus, for every piece in the corridor, the shortest slide that
/// moves it out of the target's way.
///
/// A blocker that cannot leave the corridor in either direction, because of the
/// board edge, another piece, or because it lies along the target's own line,
/// adds nothing. The estimate is optimistic for such boards.
pub fn min_steps_to_free(puzzle: &Puzzle) -> SolverResult<f64> {
    let target = puzzle.target()?;
    let line = target.cross();
    let mut total = puzzle.exit_distance()? as f64;

    for id in puzzle.occupants(&puzzle.corridor()?) {
        let Some(blocker) = puzzle.piece(id) else {
            continue;
        };
        if blocker.orientation == target.orientation {
            continue;
        }
        let start = blocker.axis_start();
        // Slide toward lower coordinates until the far end passes the corridor line,
        // or toward higher ones until the near end does.
        let backward = start + blocker.length - line;
        let forward = line + 1 - start;
        let options = [
            (backward, puzzle.free_run(blocker, -1)),
            (forward, puzzle.free_run(blocker, 1)),
        ];
        if let Some(steps) = options
            .iter()
            .filter(|(needed, room)| needed <= room)
            .map(|(needed, _)| *needed)
            .min()
        {
            total += steps as f64;
        }
    }
    Ok(total)
}
