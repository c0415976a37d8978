use slide_solver::engine::Move;
use slide_solver::heuristics::{Heuristic, HeuristicMode};
use slide_solver::solver::{solve_report, solve_with_config, SearchConfig};
use slide_solver::utils::parse_puzzle;
use slide_solver::{solve, Algorithm, Puzzle, SearchStatus};

const PARKING_LOT: &str = include_str!("../demos/parking_lot.txt");
const TRAP: &str = include_str!("../demos/trap.txt");
const ONE_BLOCKER: &str = include_str!("../demos/one_blocker.txt");

const ALGORITHMS: [Algorithm; 4] = [
    Algorithm::UniformCost,
    Algorithm::GreedyBestFirst,
    Algorithm::AStar,
    Algorithm::Beam,
];
const MODES: [HeuristicMode; 3] = [
    HeuristicMode::DirectBlockers,
    HeuristicMode::RecursiveBlockers,
    HeuristicMode::MinStepsToFree,
];

fn mv(piece: char, delta: i32) -> Move {
    Move { piece, delta }
}

fn replay(initial: &Puzzle, moves: &[Move]) -> Puzzle {
    let mut puzzle = initial.clone();
    for m in moves {
        assert!(puzzle.move_piece(m.piece, m.delta), "illegal move {}", m);
    }
    puzzle
}

#[test]
fn test_demo_boards_parse() {
    let parking_lot = parse_puzzle(PARKING_LOT).unwrap();
    assert_eq!((parking_lot.height(), parking_lot.width()), (6, 6));
    assert_eq!(parking_lot.pieces().len(), 7);

    let trap = parse_puzzle(TRAP).unwrap();
    assert_eq!((trap.height(), trap.width()), (3, 4));

    let one_blocker = parse_puzzle(ONE_BLOCKER).unwrap();
    assert_eq!(one_blocker.exit_distance().unwrap(), 2);
}

#[test]
fn test_every_driver_solves_parking_lot() {
    let puzzle = parse_puzzle(PARKING_LOT).unwrap();
    for algorithm in ALGORITHMS {
        for mode in MODES {
            let outcome = solve(&puzzle, algorithm, mode).unwrap();
            assert_eq!(outcome.status, SearchStatus::Solved, "{:?} {:?}", algorithm, mode);
            let goal = outcome.node.as_ref().unwrap();
            assert_eq!(goal.g(), 5, "{:?} {:?}", algorithm, mode);
            assert!(replay(&puzzle, &goal.moves()).is_goal().unwrap());

            let path = outcome.solution().unwrap();
            let indices: Vec<usize> = path.iter().map(|step| step.step_index).collect();
            assert_eq!(indices, (1..=path.len()).collect::<Vec<_>>());
            assert_eq!(path[0].grid_snapshot, puzzle.grid_snapshot());
        }
    }
}

#[test]
fn test_beam_width_changes_the_plan() {
    let puzzle = parse_puzzle(PARKING_LOT).unwrap();
    let base = SearchConfig::default().with_heuristic(Heuristic::new(HeuristicMode::DirectBlockers));

    let narrow = solve_with_config(&puzzle, Algorithm::Beam, &base.with_beam_width(1)).unwrap();
    assert_eq!(narrow.expansions, 4);
    assert_eq!(
        narrow.node.unwrap().moves(),
        vec![mv('P', 2), mv('C', -2), mv('P', 1)]
    );

    let wide = solve_with_config(&puzzle, Algorithm::Beam, &base).unwrap();
    assert_eq!(wide.expansions, 16);
    assert_eq!(wide.node.unwrap().moves(), vec![mv('C', -2), mv('P', 3)]);
}

#[test]
fn test_trap_needs_a_wider_beam() {
    let puzzle = parse_puzzle(TRAP).unwrap();
    let config = SearchConfig::default().with_beam_width(1);
    let beam = solve_with_config(&puzzle, Algorithm::Beam, &config).unwrap();
    assert_eq!(beam.status, SearchStatus::Exhausted);

    let astar = solve_with_config(&puzzle, Algorithm::AStar, &config).unwrap();
    assert_eq!(astar.status, SearchStatus::Solved);
    assert_eq!(
        astar.node.unwrap().moves(),
        vec![mv('B', -1), mv('C', 1), mv('P', 1)]
    );
}

#[test]
fn test_json_report() {
    let puzzle = parse_puzzle(ONE_BLOCKER).unwrap();
    let report = solve_report(&puzzle, Algorithm::GreedyBestFirst, &SearchConfig::default())
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();

    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    for key in ["elapsedTimeMs", "expansionCount", "status", "solutionPath"] {
        assert!(keys.contains(&key), "missing {}", key);
    }
    assert_eq!(json["status"], "solved");
    assert_eq!(json["expansionCount"], 3);

    let path = json["solutionPath"].as_array().unwrap();
    assert_eq!(path.len(), 3);
    assert_eq!(path[1]["stepIndex"], 2);
    assert_eq!(path[1]["move"]["pieceId"], "A");
    assert_eq!(path[1]["move"]["delta"], -1);
    assert_eq!(path[1]["gridSnapshot"].as_array().unwrap().len(), 6);
}

#[test]
fn test_budget_is_reported() {
    let puzzle = parse_puzzle(PARKING_LOT).unwrap();
    let config = SearchConfig::default().with_max_expansions(10);
    let outcome = solve_with_config(&puzzle, Algorithm::UniformCost, &config).unwrap();
    assert_eq!(outcome.status, SearchStatus::BudgetExceeded);
    assert_eq!(outcome.expansions, 10);
    assert!(outcome.node.is_none());
}
