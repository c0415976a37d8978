use slide_solver::heuristics::{Heuristic, HeuristicMode};
use slide_solver::solver::{solve_with_config, Algorithm, SearchConfig};
use slide_solver::utils::puzzle_from_str_array;
use std::collections::HashMap;
use std::process;

const NUM_RANDOM_BOARDS_FOR_EVALUATION: usize = 20;
const START_SEED: u64 = 0;
const SCRAMBLE_STEPS: usize = 20;
const EVALUATION_MAX_EXPANSIONS: usize = 50_000;

const BASE_BOARD: [&str; 6] = [
    "AAB...", "..B..C", "...PPCK", "D.EE..", "D...FF", "......",
];

#[derive(Default)]
struct Tally {
    solved: usize,
    expansions: Vec<usize>,
    costs: Vec<u32>,
}

fn main() {
    env_logger::init();

    let base = match puzzle_from_str_array(&BASE_BOARD) {
        Ok(puzzle) => puzzle,
        Err(e) => {
            eprintln!("Invalid base board: {}", e);
            process::exit(1);
        }
    };

    let mut strategies: Vec<(String, Algorithm, HeuristicMode)> = vec![(
        Algorithm::UniformCost.name().to_string(),
        Algorithm::UniformCost,
        HeuristicMode::default(),
    )];
    for algorithm in [Algorithm::GreedyBestFirst, Algorithm::AStar, Algorithm::Beam] {
        for mode in [
            HeuristicMode::DirectBlockers,
            HeuristicMode::RecursiveBlockers,
            HeuristicMode::MinStepsToFree,
        ] {
            strategies.push((format!("{}/{:?}", algorithm.name(), mode), algorithm, mode));
        }
    }

    let mut tallies: HashMap<String, Tally> = HashMap::new();
    println!(
        "Starting heuristic evaluation for {} boards...",
        NUM_RANDOM_BOARDS_FOR_EVALUATION
    );

    for board_idx in 0..NUM_RANDOM_BOARDS_FOR_EVALUATION {
        let current_seed = START_SEED + board_idx as u64;
        let initial = base.scrambled(current_seed, SCRAMBLE_STEPS);
        println!("\nEvaluating Board {} (Seed: {})", board_idx, current_seed);

        for (name, algorithm, mode) in &strategies {
            let config = SearchConfig::default()
                .with_heuristic(Heuristic::new(*mode))
                .with_max_expansions(EVALUATION_MAX_EXPANSIONS);
            let outcome = match solve_with_config(&initial, *algorithm, &config) {
                Ok(outcome) => outcome,
                Err(e) => {
                    eprintln!("Error: {} failed on board {}: {}", name, board_idx, e);
                    continue;
                }
            };
            let tally = tallies.entry(name.clone()).or_default();
            let cost = outcome.node.as_ref().map(|node| node.g());
            println!(
                "  Strategy: {:<24}, Status: {:<15}, Expansions: {:<6}, Cost: {}",
                name,
                format!("{:?}", outcome.status),
                outcome.expansions,
                cost.map_or("-".to_string(), |g| g.to_string())
            );
            if let Some(g) = cost {
                tally.solved += 1;
                tally.expansions.push(outcome.expansions);
                tally.costs.push(g);
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of boards evaluated: {}", NUM_RANDOM_BOARDS_FOR_EVALUATION);
    println!("\n--- Average Expansions (solved boards only) ---");

    let mut summary: Vec<(&str, usize, f64, f64)> = Vec::new();
    for (name, _, _) in &strategies {
        let tally = match tallies.get(name) {
            Some(tally) if tally.solved > 0 => tally,
            _ => {
                println!("Strategy {}: No solutions recorded.", name);
                continue;
            }
        };
        let avg_expansions =
            tally.expansions.iter().sum::<usize>() as f64 / tally.solved as f64;
        let avg_cost = tally.costs.iter().map(|&g| g as f64).sum::<f64>() / tally.solved as f64;
        summary.push((name.as_str(), tally.solved, avg_expansions, avg_cost));
    }

    // Fewest expansions first.
    summary.sort_by(|a, b| a.2.total_cmp(&b.2));

    for (name, solved, avg_expansions, avg_cost) in summary {
        println!(
            "Strategy {:<24}: Solved {:>2}/{}, Average Expansions = {:.1}, Average Cost = {:.2}",
            name, solved, NUM_RANDOM_BOARDS_FOR_EVALUATION, avg_expansions, avg_cost
        );
    }
}
