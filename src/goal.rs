//! Goal predicates that decide when a search stops.
//!
//! The search engine only sees the `GoalTest` trait. `Goal` covers the targets
//! a level file can name; any `Fn(&BoardState) -> bool` closure works too.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::BoardState;

/// A caller-supplied test for search termination.
pub trait GoalTest {
    fn is_goal(&self, state: &BoardState) -> bool;
}

impl<F> GoalTest for F
where
    F: Fn(&BoardState) -> bool,
{
    fn is_goal(&self, state: &BoardState) -> bool {
        self(state)
    }
}

/// Goals a level can declare.
///
/// In a level file: `goal = "board_cleared"`, `goal = { score_at_least = 200 }`
/// or `goal = { cakes_at_least = 3 }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    /// No plate left on the board and none waiting in the tray.
    #[default]
    BoardCleared,
    ScoreAtLeast(u32),
    CakesAtLeast(u32),
}

impl GoalTest for Goal {
    fn is_goal(&self, state: &BoardState) -> bool {
        match *self {
            Goal::BoardCleared => {
                state.board().plate_count() == 0 && state.tray().is_exhausted()
            }
            Goal::ScoreAtLeast(target) => state.score() >= target,
            Goal::CakesAtLeast(target) => state.cakes() >= target,
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Goal::BoardCleared => write!(f, "clear the board"),
            Goal::ScoreAtLeast(n) => write!(f, "score at least {}", n),
            Goal::CakesAtLeast(n) => write!(f, "bake at least {} cakes", n),
        }
    }
}
