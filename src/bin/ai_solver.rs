use clap::Parser;
use slide_solver::engine::Puzzle;
use slide_solver::heuristics::{Heuristic, HeuristicMode, DEFAULT_BLOCKER_WEIGHT};
use slide_solver::solver::{
    solve_report, Algorithm, SearchConfig, SearchStatus, SolveReport, DEFAULT_BEAM_WIDTH,
    DEFAULT_MAX_EXPANSIONS,
};
use slide_solver::utils::parse_puzzle;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Search algorithm to run
    #[clap(short, long, value_enum, default_value_t = Algorithm::UniformCost)]
    algorithm: Algorithm,

    /// Heuristic used by the informed searches
    #[clap(long, value_enum, default_value_t = HeuristicMode::DirectBlockers)]
    heuristic: HeuristicMode,

    /// Number of nodes kept per generation by beam search
    #[clap(long, default_value_t = DEFAULT_BEAM_WIDTH)]
    beam_width: usize,

    /// Give up after this many node expansions
    #[clap(long, default_value_t = DEFAULT_MAX_EXPANSIONS)]
    max_expansions: usize,

    /// Weight of each occupied corridor cell in the blocker heuristics
    #[clap(long, default_value_t = DEFAULT_BLOCKER_WEIGHT)]
    blocker_weight: f64,

    /// Print the result as a JSON report instead of rendered boards
    #[clap(long)]
    json: bool,

    /// Path to the board file (dimensions, piece count, then the grid)
    board_file: PathBuf,
}

fn read_board_file(path: &PathBuf) -> Result<Puzzle, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;
    parse_puzzle(&content).map_err(|e| format!("Invalid board format: {}", e))
}

fn print_solution(initial: &Puzzle, report: &SolveReport) {
    let path = match &report.solution_path {
        Some(path) => path,
        None => return,
    };
    println!("Solution found ({} moves):\n", path.len().saturating_sub(1));
    let mut puzzle = initial.clone();
    for step in path {
        match step.last_move {
            None => println!("Step {}: initial state", step.step_index),
            Some(m) => {
                if !puzzle.move_piece(m.piece, m.delta) {
                    eprintln!("Step {}: move {} is not legal, stopping", step.step_index, m);
                    return;
                }
                println!("Step {}: move {}", step.step_index, m);
            }
        }
        let highlight = step.last_move.map(|m| m.piece);
        println!("{}\n", puzzle.to_string_with_highlight(highlight));
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let puzzle = match read_board_file(&args.board_file) {
        Ok(puzzle) => puzzle,
        Err(e) => {
            eprintln!("Failed to read board from {}: {}", args.board_file.display(), e);
            process::exit(1);
        }
    };
    let config = SearchConfig::default()
        .with_heuristic(Heuristic::new(args.heuristic).with_blocker_weight(args.blocker_weight))
        .with_beam_width(args.beam_width)
        .with_max_expansions(args.max_expansions);

    if !args.json {
        println!("Loaded board from {}\n", args.board_file.display());
        println!("Initial board state:\n{}\n", puzzle);
        println!(
            "Searching with {} ({:?})...\n",
            args.algorithm.name(),
            args.heuristic
        );
    }

    let report = match solve_report(&puzzle, args.algorithm, &config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Search failed: {}", e);
            process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    match report.status {
        SearchStatus::Solved => print_solution(&puzzle, &report),
        SearchStatus::Exhausted => println!("No solution found.\n"),
        SearchStatus::BudgetExceeded => println!(
            "Gave up after {} expansions without a solution.\n",
            args.max_expansions
        ),
    }
    println!("Expansions: {}", report.expansion_count);
    println!("Elapsed: {} ms", report.elapsed_time_ms);
}
