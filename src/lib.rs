//! # Cake Sort Solver Library
//!
//! This library provides the board model, move rules and search engine for a
//! cake sorting puzzle: loose slices and tray plates are arranged on a grid,
//! and a plate that collects 8 slices of one flavour bakes into a cake and
//! clears from the board.
//!
//! It is used by three binaries:
//! - `human_player`: Allows interactive play via the command line, with undo
//!   and hints.
//! - `ai_solver`: Takes a level file and a search strategy, then prints the
//!   moves that reach the level goal.
//! - `strategy_evaluator`: Runs every strategy over generated levels and writes
//!   the timings as JSON.
//!
//! ## Modules
//! - `engine`: Board representation (`Board`, `Cell`, `Plate`, `SliceKind`), the
//!   tray of incoming plates and the search node `BoardState`.
//! - `rules`: `Move`, move costs and `Rules`, which validates and applies moves
//!   and generates successors.
//! - `scoring`: Points for a cleared plate and its adjacency bonus.
//! - `goal`: The `GoalTest` trait and the goals a level can declare.
//! - `solver`: BFS, DFS, IDS, UCS, Greedy and A* over one search loop.
//! - `heuristics`: Board estimates for the informed strategies and hints.
//! - `level`: Level files, generated levels and `initialize_board`.
//! - `game`: A manual-play session with history.
//! - `config`: Solver configuration loaded from TOML.
//! - `utils`: Parsing boards and plates from text.

pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod goal;
pub mod heuristics;
pub mod level;
pub mod rules;
pub mod scoring;
pub mod solver;
pub mod utils;

pub use engine::BoardState;
pub use error::{Error, Result};
pub use goal::{Goal, GoalTest};
pub use level::{initialize_board, LevelConfig};
pub use rules::Move;
pub use solver::{Solution, Strategy};

/// Applies a player's move under the default rules.
///
/// The solver's default configuration uses the same rules, so a move the
/// player may make is exactly a move the search may make.
///
/// # Errors
/// `Error::IllegalMove` if the move is not allowed; `state` is untouched.
pub fn apply_player_move(state: &BoardState, mv: Move) -> Result<BoardState> {
    rules::Rules::default().apply_move(state, mv)
}

/// Searches from `state` with `strategy` and the default solver settings.
///
/// # Examples
/// ```
/// use cake_sort_solver::{solve, Goal, Strategy};
/// use cake_sort_solver::engine::{BoardState, Tray};
/// use cake_sort_solver::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["[000000] 0 0"]).unwrap();
/// let state = BoardState::new(board, Tray::empty());
/// let solution = solve(&state, Strategy::Ids, &Goal::CakesAtLeast(1)).unwrap();
/// assert_eq!(solution.len(), 3);
/// ```
pub fn solve<G>(state: &BoardState, strategy: Strategy, goal: &G) -> Result<Solution>
where
    G: GoalTest + ?Sized,
{
    solver::Solver::default().solve(state, strategy, goal)
}

/// Returns the cumulative score of `state`.
pub fn current_score(state: &BoardState) -> u32 {
    state.score()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Direction, Position};

    #[test]
    fn test_public_api_round() {
        let level = LevelConfig::from_toml_str(
            r#"
            rows = 1
            cols = 2
            layout = ["[0000000] 0"]
            goal = { score_at_least = 80 }
            "#,
        )
        .unwrap();
        let state = initialize_board(&level).unwrap();
        assert_eq!(current_score(&state), 0);

        let mv = Move::PlaceSlice {
            from: Position::new(0, 1),
            direction: Direction::Left,
        };
        let next = apply_player_move(&state, mv).unwrap();
        assert_eq!(current_score(&next), 80);
        assert_eq!(current_score(&state), 0);

        let solution = solve(&state, Strategy::Bfs, &level.goal).unwrap();
        assert_eq!(solution.moves, vec![mv]);
        assert_eq!(solution.final_state, next);
    }

    #[test]
    fn test_apply_player_move_rejects_illegal() {
        let level = LevelConfig::from_toml_str("rows = 1\ncols = 2\nlayout = [\"0 .\"]").unwrap();
        let state = initialize_board(&level).unwrap();
        let mv = Move::PlaceSlice {
            from: Position::new(0, 0),
            direction: Direction::Right,
        };
        assert!(matches!(
            apply_player_move(&state, mv),
            Err(Error::IllegalMove { .. })
        ));
    }
}
