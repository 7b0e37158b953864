use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cake_sort_solver::config::SolverConfig;
use cake_sort_solver::level::{initialize_board, LevelConfig};
use cake_sort_solver::solver::Strategy;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the level file (TOML). Omit to use a generated level.
    level_file: Option<PathBuf>,

    /// Generated level number, used when no level file is given
    #[clap(short, long, default_value_t = 1)]
    level: u32,

    /// Seed for the generated level
    #[clap(long, default_value_t = 514514)]
    seed: u64,

    /// Search strategy: bfs, dfs, ids, ucs, greedy or astar
    #[clap(short, long)]
    strategy: Option<Strategy>,

    /// Depth limit for DFS and the other non-iterative strategies
    #[clap(short, long)]
    depth: Option<u32>,

    /// Maximum depth tried by IDS
    #[clap(long)]
    max_depth: Option<u32>,

    /// Maximum number of node expansions
    #[clap(short, long)]
    node_limit: Option<u64>,

    /// Solver configuration file (TOML)
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Print the moves as JSON instead of text
    #[clap(long)]
    json: bool,
}

fn run(args: Args) -> cake_sort_solver::Result<()> {
    let mut config = match &args.config {
        Some(path) => SolverConfig::load(path)?,
        None => SolverConfig::default(),
    };
    if args.depth.is_some() {
        config.limits.depth_limit = args.depth;
    }
    if let Some(max_depth) = args.max_depth {
        config.limits.max_depth = max_depth;
    }
    if args.node_limit.is_some() {
        config.limits.node_limit = args.node_limit;
    }
    let strategy = args.strategy.unwrap_or(config.strategy);

    let level = match &args.level_file {
        Some(path) => LevelConfig::load(path)?,
        None => LevelConfig::generated(args.level, args.seed)?,
    };
    let state = initialize_board(&level)?;

    println!("Loaded level '{}'\n", level.name);
    println!("Initial state:\n{}\n", state);
    println!("Goal: {}", level.goal);
    println!("Searching with {}...\n", strategy);

    let solution = config.solver().solve(&state, strategy, &level.goal)?;

    if args.json {
        let json = serde_json::json!({
            "level": level.name,
            "strategy": strategy,
            "moves": solution.moves,
            "cost": solution.cost,
            "score": solution.score(),
            "stats": solution.stats,
        });
        println!("{}", json);
        return Ok(());
    }

    println!("Solution found:\n");
    println!("Moves ({}):", solution.len());
    if solution.is_empty() {
        println!("  No moves made.");
    } else {
        for (i, mv) in solution.moves.iter().enumerate() {
            println!("  Move {}: {}", i + 1, mv);
        }
    }
    println!("Path cost: {}", solution.cost);
    println!("Final score: {}", solution.score());
    println!(
        "Expanded {} nodes, generated {}, in {:.3}s\n",
        solution.stats.expanded,
        solution.stats.generated,
        solution.stats.elapsed.as_secs_f64()
    );
    println!("Final state:\n{}", solution.final_state);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_no_solution() => {
            println!("No solution found: {}", err);
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
