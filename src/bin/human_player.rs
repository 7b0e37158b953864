use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cake_sort_solver::config::SolverConfig;
use cake_sort_solver::engine::{Direction, Position};
use cake_sort_solver::game::Game;
use cake_sort_solver::level::LevelConfig;
use cake_sort_solver::rules::Move;
use cake_sort_solver::solver::Strategy;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the level file (TOML). Omit to play a generated level.
    level_file: Option<PathBuf>,

    /// Generated level number, used when no level file is given
    #[clap(short, long, default_value_t = 1)]
    level: u32,

    /// Seed for the generated level
    #[clap(long, default_value_t = 514514)]
    seed: u64,

    /// Solver configuration file (TOML); its rules also govern manual moves
    #[clap(long)]
    config: Option<PathBuf>,
}

const SOLVE_NODE_LIMIT: u64 = 200_000;

const HELP: &str = "Commands:
  s <row> <col> <dir>    slide the loose slice at (row, col) onto the plate in <dir>
  m <row> <col> <dir>    move the plate at (row, col) one cell in <dir>
  p <slot> <row> <col>   put tray plate <slot> on the empty cell (row, col)
  h                      hint
  a [strategy]           solve from here (bfs, dfs, ids, ucs, greedy, astar)
  u                      undo
  q                      quit
<dir> is one of u, d, l, r.";

enum Command {
    Play(Move),
    Hint,
    Solve(Strategy),
    Undo,
    Quit,
    Help,
}

fn number(s: &str) -> Result<usize, String> {
    s.parse::<usize>()
        .map_err(|_| format!("'{}' is not a number", s))
}

fn parse_command(input: &str) -> Result<Command, String> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    match parts.as_slice() {
        ["q"] => Ok(Command::Quit),
        ["u"] => Ok(Command::Undo),
        ["h"] => Ok(Command::Hint),
        ["?"] | ["help"] => Ok(Command::Help),
        ["a"] => Ok(Command::Solve(Strategy::default())),
        ["a", strategy] => strategy.parse().map(Command::Solve),
        ["s", r, c, dir] => Ok(Command::Play(Move::PlaceSlice {
            from: Position::new(number(r)?, number(c)?),
            direction: dir.parse::<Direction>()?,
        })),
        ["m", r, c, dir] => Ok(Command::Play(Move::MovePlate {
            from: Position::new(number(r)?, number(c)?),
            direction: dir.parse::<Direction>()?,
        })),
        ["p", slot, r, c] => Ok(Command::Play(Move::PlacePlate {
            slot: number(slot)?,
            at: Position::new(number(r)?, number(c)?),
        })),
        _ => Err("unrecognized command, type '?' for help".to_string()),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => SolverConfig::load(path),
        None => Ok(SolverConfig::default()),
    };
    let session = config.and_then(|mut config| {
        let level = match &args.level_file {
            Some(path) => LevelConfig::load(path)?,
            None => LevelConfig::generated(args.level, args.seed)?,
        };
        println!("Welcome to Cake Sort: {}", level.name);
        println!("Goal: {}\n", level.goal);
        config.limits.node_limit = config.limits.node_limit.or(Some(SOLVE_NODE_LIMIT));
        let game = Game::from_level(&level, config.rules())?;
        Ok((config, game))
    });
    let (config, mut game) = match session {
        Ok(session) => session,
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    };
    println!("{}", HELP);

    loop {
        println!("---------------------");
        println!("Steps: {}", game.steps());
        println!("{}", game.state());

        if game.is_game_over() {
            println!();
            println!("---------------------");
            if game.is_won() {
                println!("Level complete!");
            } else {
                println!("No moves left.");
            }
            println!("Final Score: {}", game.score());
            println!("Total Steps: {}", game.steps());
            println!("---------------------");
            break;
        }

        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => {
                println!("Error reading input. Please try again.");
                continue;
            }
        }

        match parse_command(input.trim()) {
            Ok(Command::Quit) => {
                println!("Thanks for playing!");
                break;
            }
            Ok(Command::Help) => println!("{}", HELP),
            Ok(Command::Undo) => {
                if game.undo_last_move() {
                    println!("Move undone.");
                } else {
                    println!("Cannot undo further (no moves made).");
                }
            }
            Ok(Command::Hint) => match game.hint(config.heuristic.kind) {
                Some(mv) => {
                    println!("Hint: {}", mv);
                    println!(
                        "{}",
                        game.state()
                            .board()
                            .to_string_with_highlight(Some(mv.anchor()))
                    );
                }
                None => println!("No legal moves."),
            },
            Ok(Command::Solve(strategy)) => {
                match config.solver().solve(game.state(), strategy, &game.goal()) {
                    Ok(solution) => {
                        println!("{} found {} moves:", strategy, solution.len());
                        for (i, mv) in solution.moves.iter().enumerate() {
                            println!("  {}: {}", i + 1, mv);
                        }
                    }
                    Err(err) => println!("{}", err),
                }
            }
            Ok(Command::Play(mv)) => match game.process_move(mv) {
                Ok(()) => println!("Move processed."),
                Err(err) => println!("{}", err),
            },
            Err(msg) => println!("Invalid input: {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert!(matches!(
            parse_command("s 1 2 l"),
            Ok(Command::Play(Move::PlaceSlice {
                direction: Direction::Left,
                ..
            }))
        ));
        assert!(matches!(
            parse_command("p 0 3 3"),
            Ok(Command::Play(Move::PlacePlate { slot: 0, .. }))
        ));
        assert!(matches!(
            parse_command("a ucs"),
            Ok(Command::Solve(Strategy::Ucs))
        ));
        assert!(parse_command("s x 2 l").is_err());
        assert!(parse_command("m 1 2 diagonal").is_err());
        assert!(parse_command("jump").is_err());
    }
}
