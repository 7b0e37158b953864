//! Error types for the cake sort solver.

use thiserror::Error;

use crate::rules::Move;
use crate::solver::{StopReason, Strategy};

/// Why a move was rejected by the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMoveReason {
    /// A source or target cell lies outside the board.
    OutOfBounds,
    /// The source cell does not hold a loose slice.
    NoSlice,
    /// The source or target cell does not hold a plate.
    NoPlate,
    /// The target plate already holds 8 slices.
    PlateFull,
    /// The target cell is not empty.
    CellOccupied,
    /// The tray slot is not visible or does not exist.
    NoTrayPlate,
}

impl std::fmt::Display for IllegalMoveReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            IllegalMoveReason::OutOfBounds => "position is outside the board",
            IllegalMoveReason::NoSlice => "no loose slice at the source cell",
            IllegalMoveReason::NoPlate => "no plate at the cell",
            IllegalMoveReason::PlateFull => "plate is full",
            IllegalMoveReason::CellOccupied => "target cell is occupied",
            IllegalMoveReason::NoTrayPlate => "no plate in that tray slot",
        };
        f.write_str(text)
    }
}

/// Main error type for solver operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The move violates plate capacity, board bounds or cell occupancy.
    /// The state it was applied to is left unchanged.
    #[error("illegal move {mv}: {reason}")]
    IllegalMove { mv: Move, reason: IllegalMoveReason },

    /// The search ran out of states, depth, nodes or was cancelled.
    #[error("no solution found by {strategy}: {reason}")]
    NoSolution { strategy: Strategy, reason: StopReason },

    /// Malformed level data, detected before any state is built.
    #[error("invalid level configuration: {0}")]
    InvalidLevelConfig(String),

    /// A solver configuration value is out of range.
    #[error("invalid solver configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Returns true for the recoverable "search found nothing" outcome.
    pub fn is_no_solution(&self) -> bool {
        matches!(self, Error::NoSolution { .. })
    }
}

/// Result type alias for solver operations.
pub type Result<T> = std::result::Result<T, Error>;
