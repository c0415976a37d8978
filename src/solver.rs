//! Search drivers over puzzle states.
//!
//! Uniform-cost, greedy best-first and A* share one best-first loop that differs only
//! in the node ordering. Beam search expands the puzzle one generation at a time and
//! keeps the best `beam_width` children of each generation.
use crate::engine::Puzzle;
use crate::error::SolverResult;
use crate::heuristics::{Heuristic, HeuristicMode};
use crate::node::{PathStep, SearchNode};
use crate::queue::{PriorityQueue, TieBreak};
use clap::ValueEnum;
use log::{debug, warn};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Instant;

pub const DEFAULT_MAX_EXPANSIONS: usize = 100_000;
pub const DEFAULT_BEAM_WIDTH: usize = 75;

/// The available search strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Algorithm {
    /// Orders the frontier by path cost.
    #[default]
    UniformCost,
    /// Orders the frontier by the heuristic estimate alone.
    GreedyBestFirst,
    /// Orders the frontier by path cost plus estimate.
    AStar,
    /// Keeps only the best `beam_width` nodes of each generation.
    Beam,
}

impl Algorithm {
    /// Maps the numeric algorithm flag (1 = uniform-cost, 2 = greedy, 3 = A*, 4 = beam).
    /// Unknown flags select uniform-cost.
    pub fn from_flag(flag: u32) -> Self {
        match flag {
            2 => Algorithm::GreedyBestFirst,
            3 => Algorithm::AStar,
            4 => Algorithm::Beam,
            _ => Algorithm::UniformCost,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::UniformCost => "UCS",
            Algorithm::GreedyBestFirst => "GBFS",
            Algorithm::AStar => "A*",
            Algorithm::Beam => "Beam",
        }
    }
}

/// Tunables shared by all drivers.
///
/// # Examples
/// ```
/// use slide_solver::heuristics::{Heuristic, HeuristicMode};
/// use slide_solver::queue::TieBreak;
/// use slide_solver::solver::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_heuristic(Heuristic::new(HeuristicMode::MinStepsToFree))
///     .with_max_expansions(5_000)
///     .with_beam_width(10)
///     .with_tie_break(TieBreak::Lifo);
/// assert_eq!(config.max_expansions, 5_000);
/// assert_eq!(SearchConfig::default().beam_width, 75);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchConfig {
    pub heuristic: Heuristic,
    /// A search stops with `BudgetExceeded` once this many nodes have been expanded.
    pub max_expansions: usize,
    pub beam_width: usize,
    /// Order of frontier nodes that compare as equal.
    pub tie_break: TieBreak,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            heuristic: Heuristic::default(),
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            beam_width: DEFAULT_BEAM_WIDTH,
            tie_break: TieBreak::default(),
        }
    }
}

impl SearchConfig {
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    pub fn with_beam_width(mut self, beam_width: usize) -> Self {
        self.beam_width = beam_width;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }
}

/// How a search ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchStatus {
    Solved,
    /// Every reachable state was explored, or the beam emptied, without a goal.
    Exhausted,
    BudgetExceeded,
}

/// Result of one search.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// The goal node, present only when `status` is `Solved`.
    pub node: Option<Rc<SearchNode>>,
    /// Number of nodes removed from the frontier and processed.
    pub expansions: usize,
    pub status: SearchStatus,
}

impl SearchOutcome {
    fn solved(node: Rc<SearchNode>, expansions: usize) -> Self {
        SearchOutcome {
            node: Some(node),
            expansions,
            status: SearchStatus::Solved,
        }
    }

    fn unsolved(expansions: usize, status: SearchStatus) -> Self {
        SearchOutcome {
            node: None,
            expansions,
            status,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.status == SearchStatus::Solved
    }

    /// The solution path from the initial state to the goal, if one was found.
    pub fn solution(&self) -> Option<Vec<PathStep>> {
        self.node.as_ref().map(|node| node.path())
    }
}

/// Serializable summary of a solve, matching the JSON document printed by `ai_solver`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveReport {
    pub elapsed_time_ms: u64,
    pub expansion_count: usize,
    pub status: SearchStatus,
    pub solution_path: Option<Vec<PathStep>>,
}

fn by_cost(a: &SearchNode, b: &SearchNode) -> Ordering {
    a.g().cmp(&b.g())
}

fn by_estimate(a: &SearchNode, b: &SearchNode) -> Ordering {
    a.h().total_cmp(&b.h()).then(a.g().cmp(&b.g()))
}

fn by_total(a: &SearchNode, b: &SearchNode) -> Ordering {
    a.f().total_cmp(&b.f()).then(a.h().total_cmp(&b.h()))
}

fn best_first<C>(initial: &Puzzle, config: &SearchConfig, ordering: C) -> SolverResult<SearchOutcome>
where
    C: Fn(&SearchNode, &SearchNode) -> Ordering,
{
    let root = SearchNode::root(initial.clone(), config.heuristic)?;
    let mut frontier = PriorityQueue::with_tie_break(
        |a: &Rc<SearchNode>, b: &Rc<SearchNode>| ordering(a.as_ref(), b.as_ref()),
        config.tie_break,
    );
    frontier.enqueue(root);
    let mut explored: HashSet<String> = HashSet::new();
    let mut expansions = 0;

    while !frontier.is_empty() {
        let current = frontier.dequeue()?;
        expansions += 1;
        if expansions > config.max_expansions {
            warn!(
                "expansion budget of {} exhausted with {} nodes still queued",
                config.max_expansions,
                frontier.len() + 1
            );
            return Ok(SearchOutcome::unsolved(
                config.max_expansions,
                SearchStatus::BudgetExceeded,
            ));
        }
        if current.is_goal()? {
            return Ok(SearchOutcome::solved(current, expansions));
        }
        explored.insert(current.serialize());
        for neighbor in current.neighbors()? {
            if !explored.contains(&neighbor.serialize()) {
                frontier.enqueue(neighbor);
            }
        }
    }
    Ok(SearchOutcome::unsolved(expansions, SearchStatus::Exhausted))
}

/// Expands the cheapest node first; the first goal dequeued has minimal total slide
/// distance.
pub fn uniform_cost_search(initial: &Puzzle, config: &SearchConfig) -> SolverResult<SearchOutcome> {
    best_first(initial, config, by_cost)
}

/// Expands the node with the lowest estimate first, preferring the cheaper of two
/// equal estimates.
pub fn greedy_best_first_search(
    initial: &Puzzle,
    config: &SearchConfig,
) -> SolverResult<SearchOutcome> {
    best_first(initial, config, by_estimate)
}

/// Expands the node with the lowest `g + h` first, preferring the lower estimate on ties.
pub fn a_star_search(initial: &Puzzle, config: &SearchConfig) -> SolverResult<SearchOutcome> {
    best_first(initial, config, by_total)
}

/// Generation-by-generation search keeping at most `config.beam_width` nodes.
///
/// All children of the current generation are pooled, ordered like A*, stripped of
/// explored or duplicate states and cut to the beam width. The search is incomplete:
/// it ends with `Exhausted` as soon as a generation comes out empty, even when a
/// solution exists.
pub fn beam_search(initial: &Puzzle, config: &SearchConfig) -> SolverResult<SearchOutcome> {
    let mut generation = vec![SearchNode::root(initial.clone(), config.heuristic)?];
    let mut explored: HashSet<String> = HashSet::new();
    let mut expansions = 0;

    while !generation.is_empty() {
        let mut candidates = Vec::new();
        for node in generation {
            expansions += 1;
            if expansions > config.max_expansions {
                warn!("expansion budget of {} exhausted", config.max_expansions);
                return Ok(SearchOutcome::unsolved(
                    config.max_expansions,
                    SearchStatus::BudgetExceeded,
                ));
            }
            if node.is_goal()? {
                return Ok(SearchOutcome::solved(node, expansions));
            }
            explored.insert(node.serialize());
            candidates.extend(
                node.neighbors()?
                    .into_iter()
                    .filter(|child| !explored.contains(&child.serialize())),
            );
        }

        // Stable sort: equal nodes keep generation order.
        candidates.sort_by(|a, b| by_total(a, b));
        let mut kept = HashSet::new();
        generation = candidates
            .into_iter()
            .filter(|child| {
                let key = child.serialize();
                !explored.contains(&key) && kept.insert(key)
            })
            .take(config.beam_width)
            .collect();
        debug!("beam generation of {} nodes", generation.len());
    }
    Ok(SearchOutcome::unsolved(expansions, SearchStatus::Exhausted))
}

/// Solves `initial` with the default configuration and the given heuristic.
///
/// # Examples
/// ```
/// use slide_solver::engine::Move;
/// use slide_solver::heuristics::HeuristicMode;
/// use slide_solver::solver::{solve, Algorithm, SearchStatus};
/// use slide_solver::utils::puzzle_from_str_array;
///
/// let puzzle = puzzle_from_str_array(&[
///     "......",
///     "....A.",
///     "..PPA.K",
///     "......",
/// ])
/// .unwrap();
/// let outcome = solve(&puzzle, Algorithm::AStar, HeuristicMode::DirectBlockers).unwrap();
/// assert_eq!(outcome.status, SearchStatus::Solved);
/// let goal = outcome.node.unwrap();
/// assert_eq!(goal.g(), 3);
/// assert_eq!(
///     goal.moves(),
///     vec![Move { piece: 'A', delta: -1 }, Move { piece: 'P', delta: 2 }]
/// );
/// ```
pub fn solve(
    initial: &Puzzle,
    algorithm: Algorithm,
    mode: HeuristicMode,
) -> SolverResult<SearchOutcome> {
    let config = SearchConfig::default().with_heuristic(Heuristic::new(mode));
    solve_with_config(initial, algorithm, &config)
}

pub fn solve_with_config(
    initial: &Puzzle,
    algorithm: Algorithm,
    config: &SearchConfig,
) -> SolverResult<SearchOutcome> {
    debug!(
        "{} search with {:?} on a {}x{} board",
        algorithm.name(),
        config.heuristic.mode,
        initial.height(),
        initial.width()
    );
    let outcome = match algorithm {
        Algorithm::UniformCost => uniform_cost_search(initial, config),
        Algorithm::GreedyBestFirst => greedy_best_first_search(initial, config),
        Algorithm::AStar => a_star_search(initial, config),
        Algorithm::Beam => beam_search(initial, config),
    }?;
    debug!(
        "{} search finished: {:?} after {} expansions",
        algorithm.name(),
        outcome.status,
        outcome.expansions
    );
    Ok(outcome)
}

/// Runs [`solve_with_config`] and packages the timing, counters and path.
pub fn solve_report(
    initial: &Puzzle,
    algorithm: Algorithm,
    config: &SearchConfig,
) -> SolverResult<SolveReport> {
    let start = Instant::now();
    let outcome = solve_with_config(initial, algorithm, config)?;
    let elapsed_time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    Ok(SolveReport {
        elapsed_time_ms,
        expansion_count: outcome.expansions,
        status: outcome.status,
        solution_path: outcome.solution(),
    })
}
