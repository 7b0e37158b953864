use tracing::debug;

use crate::engine::BoardState;
use crate::error::Result;
use crate::goal::{Goal, GoalTest};
use crate::heuristics::{best_hint, HeuristicKind};
use crate::level::{initialize_board, LevelConfig};
use crate::rules::{Move, Rules};

/// A manual-play session.
///
/// Moves go through the same `Rules` the solver uses. Every accepted move is
/// recorded so it can be undone.
#[derive(Clone, Debug)]
pub struct Game {
    rules: Rules,
    goal: Goal,
    state: BoardState,
    steps: u32,
    history: Vec<(BoardState, u32)>, // (state, steps) after each accepted move, initial state first
}

impl Game {
    /// Starts a session from `state`. History begins with `state` itself.
    pub fn new(state: BoardState, rules: Rules, goal: Goal) -> Self {
        Game {
            rules,
            goal,
            history: vec![(state.clone(), 0)],
            state,
            steps: 0,
        }
    }

    /// Starts a session on a level under `rules`.
    ///
    /// # Errors
    /// `Error::InvalidLevelConfig` if the level is malformed.
    pub fn from_level(level: &LevelConfig, rules: Rules) -> Result<Self> {
        Ok(Game::new(initialize_board(level)?, rules, level.goal))
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn goal(&self) -> Goal {
        self.goal
    }

    pub fn score(&self) -> u32 {
        self.state.score()
    }

    /// Returns the number of moves accepted so far.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Plays `mv`.
    ///
    /// # Errors
    /// `Error::IllegalMove` if the rules reject the move. The session is left
    /// exactly as it was.
    pub fn process_move(&mut self, mv: Move) -> Result<()> {
        let next = self.rules.apply_move(&self.state, mv)?;
        let gained = next.score() - self.state.score();
        self.state = next;
        self.steps += 1;
        self.history.push((self.state.clone(), self.steps));
        debug!(
            event = "player_move",
            mv = %mv,
            gained = gained,
            score = self.state.score(),
            steps = self.steps,
        );
        Ok(())
    }

    /// Reverts the last accepted move.
    ///
    /// # Returns
    /// * `true` if a move was undone.
    /// * `false` if no moves have been made yet.
    pub fn undo_last_move(&mut self) -> bool {
        if self.history.len() < 2 {
            return false;
        }
        self.history.pop();
        match self.history.last() {
            Some((prev, steps)) => {
                self.state = prev.clone();
                self.steps = *steps;
                debug!(event = "undo", steps = self.steps);
                true
            }
            None => false,
        }
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.rules.legal_moves(&self.state)
    }

    /// Suggests the next move, see `heuristics::best_hint`.
    pub fn hint(&self, heuristic: HeuristicKind) -> Option<Move> {
        best_hint(&self.rules, &self.state, heuristic)
    }

    /// Returns true once the level goal holds.
    pub fn is_won(&self) -> bool {
        self.goal.is_goal(&self.state)
    }

    /// The session is over when the goal holds or no legal move is left.
    pub fn is_game_over(&self) -> bool {
        self.is_won() || self.legal_moves().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::engine::{Direction, Position, Tray};
    use crate::error::Error;
    use crate::utils::board_from_str_array;

    fn game(rows: &[&str]) -> Game {
        let state = BoardState::new(board_from_str_array(rows).unwrap(), Tray::empty());
        Game::new(state, Rules::default(), Goal::CakesAtLeast(1))
    }

    fn slide_left(row: usize, col: usize) -> Move {
        Move::PlaceSlice {
            from: Position::new(row, col),
            direction: Direction::Left,
        }
    }

    #[test]
    fn test_new_game() {
        let g = game(&["[0] 0"]);
        assert_eq!(g.score(), 0);
        assert_eq!(g.steps(), 0);
        assert_eq!(g.history.len(), 1);
        assert!(!g.is_won());
    }

    #[test]
    fn test_process_move_and_undo() {
        let mut g = game(&["[000000] 0 0"]);
        let start = g.state().clone();

        g.process_move(slide_left(0, 1)).unwrap();
        assert_eq!(g.steps(), 1);
        assert_eq!(g.history.len(), 2);
        assert_eq!(g.state().board().plate(Position::new(0, 0)).unwrap().len(), 7);

        assert!(g.undo_last_move());
        assert_eq!(g.state(), &start);
        assert_eq!(g.steps(), 0);
        assert!(!g.undo_last_move(), "nothing left to undo");
    }

    #[test]
    fn test_illegal_move_leaves_session_unchanged() {
        let mut g = game(&["[0] . 0"]);
        let before = g.state().clone();
        let err = g.process_move(slide_left(0, 2)).unwrap_err();
        assert!(matches!(err, Error::IllegalMove { .. }));
        assert_eq!(g.state(), &before);
        assert_eq!(g.steps(), 0);
        assert_eq!(g.history.len(), 1);
    }

    #[test]
    fn test_winning_move() {
        let mut g = game(&["[0000000] 0"]);
        assert_eq!(g.hint(HeuristicKind::default()), Some(slide_left(0, 1)));
        g.process_move(slide_left(0, 1)).unwrap();
        assert!(g.is_won());
        assert!(g.is_game_over());
        assert_eq!(g.score(), 80);
    }

    #[test]
    fn test_stuck_game_is_over() {
        let g = game(&["[00000001] 0"]);
        assert!(!g.is_won());
        assert!(g.is_game_over());
        assert_eq!(g.hint(HeuristicKind::default()), None);
    }

    #[test]
    fn test_from_level() {
        let level = LevelConfig::generated(1, 3).unwrap();
        let g = Game::from_level(&level, Rules::default()).unwrap();
        assert_eq!(g.goal(), Goal::CakesAtLeast(3));
        assert!(!g.legal_moves().is_empty());
    }

    #[test]
    fn test_from_level_keeps_configured_rules() {
        let level = LevelConfig::from_toml_str(
            r#"
            rows = 1
            cols = 2
            layout = ["[0000000] 0"]
            "#,
        )
        .unwrap();
        let config = SolverConfig::from_toml_str("[scoring]\nper_slice_value = 3").unwrap();
        let mut g = Game::from_level(&level, config.rules()).unwrap();
        assert_eq!(g.rules(), &config.rules());

        g.process_move(slide_left(0, 1)).unwrap();
        assert_eq!(g.score(), 24);
    }
}
