use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cake_sort_solver::goal::Goal;
use cake_sort_solver::heuristics::HeuristicKind;
use cake_sort_solver::level::{initialize_board, LevelConfig};
use cake_sort_solver::rules::Rules;
use cake_sort_solver::solver::{SearchLimits, Solver, Strategy};
use cake_sort_solver::Error;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Highest generated level to evaluate, starting from level 1
    #[clap(long, default_value_t = 1)]
    max_level: u32,

    /// Boards generated per level
    #[clap(short, long, default_value_t = 5)]
    boards: u64,

    /// Seed of the first board; the others use the following seeds
    #[clap(long, default_value_t = 0)]
    start_seed: u64,

    /// Override the level goal with this many cakes
    #[clap(long)]
    cakes: Option<u32>,

    /// Expansion budget per search
    #[clap(short, long, default_value_t = 20_000)]
    node_limit: u64,

    /// Heuristic for greedy and A*
    #[clap(long, default_value_t = HeuristicKind::Combined)]
    heuristic: HeuristicKind,

    /// A* weights to try; any weight other than 1 is reported as weighted A*
    #[clap(short, long, value_delimiter = ',', default_value = "1.0")]
    weights: Vec<f64>,

    /// Where to write the JSON results
    #[clap(short, long, default_value = "results.json")]
    output: PathBuf,
}

/// One search run, in the shape the results plots read.
#[derive(Debug, Serialize)]
struct RunRecord {
    algorithm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    heuristic: Option<HeuristicKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight: Option<f64>,
    level: u32,
    seed: u64,
    execution_time: f64,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_reason: Option<String>,
    moves: usize,
    cost: u32,
    score: u32,
    expanded: u64,
    generated: u64,
}

fn runs(args: &Args) -> Vec<(Strategy, f64)> {
    let mut runs: Vec<(Strategy, f64)> = Strategy::ALL
        .into_iter()
        .filter(|&s| s != Strategy::AStar)
        .map(|s| (s, 1.0))
        .collect();
    runs.extend(args.weights.iter().map(|&w| (Strategy::AStar, w)));
    runs
}

fn evaluate(
    args: &Args,
    level: u32,
    seed: u64,
    strategy: Strategy,
    weight: f64,
) -> cake_sort_solver::Result<RunRecord> {
    let mut config = LevelConfig::generated(level, seed)?;
    if let Some(cakes) = args.cakes {
        config.goal = Goal::CakesAtLeast(cakes);
    }
    let state = initialize_board(&config)?;
    let solver = Solver::new(Rules::default())
        .with_limits(SearchLimits {
            node_limit: Some(args.node_limit),
            ..SearchLimits::default()
        })
        .with_heuristic(args.heuristic, weight);

    let algorithm = match strategy {
        Strategy::AStar if weight != 1.0 => "wastar".to_string(),
        other => other.to_string(),
    };
    let mut record = RunRecord {
        algorithm,
        heuristic: strategy.is_informed().then_some(args.heuristic),
        weight: (strategy == Strategy::AStar).then_some(weight),
        level,
        seed,
        execution_time: 0.0,
        found: false,
        stop_reason: None,
        moves: 0,
        cost: 0,
        score: 0,
        expanded: 0,
        generated: 0,
    };

    let start = std::time::Instant::now();
    let outcome = solver.solve(&state, strategy, &config.goal);
    record.execution_time = start.elapsed().as_secs_f64();

    match outcome {
        Ok(solution) => {
            record.found = true;
            record.moves = solution.len();
            record.cost = solution.cost;
            record.score = solution.score();
            record.expanded = solution.stats.expanded;
            record.generated = solution.stats.generated;
        }
        Err(Error::NoSolution { reason, .. }) => {
            record.stop_reason = Some(reason.to_string());
        }
        Err(err) => return Err(err),
    }
    Ok(record)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let runs = runs(&args);
    let mut records = Vec::new();

    println!(
        "Starting strategy evaluation: levels 1..={}, {} boards each...",
        args.max_level, args.boards
    );

    for level in 1..=args.max_level {
        for board_idx in 0..args.boards {
            let seed = args.start_seed + board_idx;
            println!("\nEvaluating level {} board {} (Seed: {})", level, board_idx, seed);

            for &(strategy, weight) in &runs {
                match evaluate(&args, level, seed, strategy, weight) {
                    Ok(record) => {
                        println!(
                            "  Strategy: {:<8} Found: {:<5} Moves: {:<4} Expanded: {:<7} Time: {:.3}s",
                            record.algorithm,
                            record.found,
                            record.moves,
                            record.expanded,
                            record.execution_time
                        );
                        records.push(record);
                    }
                    Err(err) => warn!(
                        event = "evaluation_failed",
                        level = level,
                        seed = seed,
                        strategy = %strategy,
                        error = %err,
                    ),
                }
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("\n--- Average Times ---");
    let mut names: Vec<&str> = records.iter().map(|r| r.algorithm.as_str()).collect();
    names.sort();
    names.dedup();
    for name in names {
        let times: Vec<f64> = records
            .iter()
            .filter(|r| r.algorithm == name)
            .map(|r| r.execution_time)
            .collect();
        let solved = records
            .iter()
            .filter(|r| r.algorithm == name && r.found)
            .count();
        let avg = times.iter().sum::<f64>() / times.len() as f64;
        println!(
            "Strategy {:<8}: Average Time = {:.4}s, Solved = {}/{}",
            name,
            avg,
            solved,
            times.len()
        );
    }

    match serde_json::to_string_pretty(&records) {
        Ok(json) => match fs::write(&args.output, json) {
            Ok(()) => info!(event = "results_written", path = %args.output.display(), runs = records.len()),
            Err(err) => eprintln!("error: cannot write {}: {}", args.output.display(), err),
        },
        Err(err) => eprintln!("error: cannot serialize results: {}", err),
    }
}
