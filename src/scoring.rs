//! Points awarded when a plate clears.
//!
//! A cleared plate is worth a fixed per-slice value for each of its
//! `PLATE_CAPACITY` slices, plus an adjacency bonus for every neighbouring
//! plate whose dominant kind matches the cake just completed.

use serde::{Deserialize, Serialize};

use crate::engine::{Adjacency, Board, Plate, Position, PLATE_CAPACITY};

/// Default points per slice of a cleared cake.
pub const DEFAULT_PER_SLICE_VALUE: u32 = 10;

/// Default bonus per matching neighbour plate.
pub const DEFAULT_ADJACENCY_BONUS: u32 = 5;

/// Scoring policy, loadable from the `[scoring]` section of a solver config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Scoring {
    /// Points for each slice of a cleared cake.
    pub per_slice_value: u32,
    /// Points for each neighbouring plate sharing the cake's kind.
    pub bonus_per_neighbor: u32,
    /// Neighbourhood inspected for the adjacency bonus.
    pub adjacency: Adjacency,
}

impl Default for Scoring {
    fn default() -> Self {
        Scoring {
            per_slice_value: DEFAULT_PER_SLICE_VALUE,
            bonus_per_neighbor: DEFAULT_ADJACENCY_BONUS,
            adjacency: Adjacency::Four,
        }
    }
}

impl Scoring {
    /// Points for clearing a cake: `per_slice_value * PLATE_CAPACITY`, saturating
    /// at `u32::MAX`.
    ///
    /// The plate's contents do not change the value; every cake holds the
    /// same number of slices.
    ///
    /// # Examples
    /// ```
    /// use cake_sort_solver::engine::{Plate, SliceKind};
    /// use cake_sort_solver::scoring::Scoring;
    ///
    /// let cake = Plate::from_slices(vec![SliceKind::new(0).unwrap(); 8]).unwrap();
    /// assert_eq!(Scoring::default().plate_clear_score(&cake), 80);
    /// ```
    pub fn plate_clear_score(&self, _plate: &Plate) -> u32 {
        self.per_slice_value.saturating_mul(PLATE_CAPACITY as u32)
    }

    /// Bonus for the plate at `plate_position`, computed from its neighbours.
    ///
    /// Counts neighbouring plates whose dominant kind equals the dominant kind
    /// of the plate at `plate_position`. Must be called before that plate is
    /// removed from the board.
    ///
    /// # Returns
    /// `bonus_per_neighbor * matches`, or 0 if there is no plate (or an empty
    /// one) at `plate_position`.
    pub fn adjacency_bonus(&self, board: &Board, plate_position: Position) -> u32 {
        let Some(kind) = board.plate(plate_position).and_then(Plate::dominant_kind) else {
            return 0;
        };
        let matches = board
            .neighbors(plate_position, self.adjacency)
            .into_iter()
            .filter_map(|pos| board.plate(pos))
            .filter(|plate| plate.dominant_kind() == Some(kind))
            .count() as u32;
        matches.saturating_mul(self.bonus_per_neighbor)
    }
}
