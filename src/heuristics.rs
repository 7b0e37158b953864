//! Board estimates used by Greedy and A* search and by move hints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::{BoardState, Cell, Position, SliceKind, PLATE_CAPACITY};
use crate::rules::{Move, Rules};

/// Dispersion charged for each pair of same-kind slices when one of them is
/// still in the tray.
const TRAY_PAIR_DISPERSION: u32 = 5;

/// Counts the board cells that are not empty.
///
/// Fewer occupied cells means more room to manoeuvre plates, so lower is better.
///
/// # Arguments
/// * `state`: The `BoardState` to analyze.
///
/// # Returns
/// The number of cells holding a loose slice or a plate.
pub fn occupied_cells(state: &BoardState) -> u32 {
    state.board().occupied_count() as u32
}

/// Estimates how many slices are missing to turn every kind into whole cakes.
///
/// Slices are counted per kind across the board (loose and on plates) and the
/// tray. For each kind whose count is not a multiple of `PLATE_CAPACITY`, the
/// shortfall to the next multiple is added.
///
/// # Returns
/// The total shortfall as `u32`; 0 when every kind can form complete cakes.
pub fn missing_slices(state: &BoardState) -> u32 {
    let mut counts: BTreeMap<SliceKind, usize> = BTreeMap::new();
    for (_, kind) in board_slices(state) {
        *counts.entry(kind).or_default() += 1;
    }
    for plate in state.tray().visible().iter().chain(state.tray().queued()) {
        for &kind in plate.slices() {
            *counts.entry(kind).or_default() += 1;
        }
    }
    counts
        .values()
        .map(|&n| match n % PLATE_CAPACITY {
            0 => 0,
            rem => (PLATE_CAPACITY - rem) as u32,
        })
        .sum()
}

/// Measures how scattered same-kind slices are.
///
/// For every kind, sums the Manhattan distance between each pair of slices on
/// the board. A pair where either slice is still in the tray costs a flat
/// `TRAY_PAIR_DISPERSION`. Tightly clustered kinds are easier to bake, so lower
/// is better.
pub fn clustered_slices(state: &BoardState) -> u32 {
    let mut by_kind: BTreeMap<SliceKind, Vec<Option<Position>>> = BTreeMap::new();
    for (pos, kind) in board_slices(state) {
        by_kind.entry(kind).or_default().push(Some(pos));
    }
    for plate in state.tray().visible().iter().chain(state.tray().queued()) {
        for &kind in plate.slices() {
            by_kind.entry(kind).or_default().push(None);
        }
    }

    let mut total = 0;
    for positions in by_kind.values() {
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                total += match (a, b) {
                    (Some(a), Some(b)) => (a.row.abs_diff(b.row) + a.col.abs_diff(b.col)) as u32,
                    _ => TRAY_PAIR_DISPERSION,
                };
            }
        }
    }
    total
}

/// Number of plates still waiting in the tray.
pub fn remaining_plates(state: &BoardState) -> u32 {
    state.tray().remaining() as u32
}

/// Weighted sum of the four estimates above, weights 1.0, 2.0, 1.5 and 3.0.
pub fn combined(state: &BoardState) -> f64 {
    1.0 * occupied_cells(state) as f64
        + 2.0 * missing_slices(state) as f64
        + 1.5 * clustered_slices(state) as f64
        + 3.0 * remaining_plates(state) as f64
}

// Every slice on the board with the cell it sits in.
fn board_slices(state: &BoardState) -> impl Iterator<Item = (Position, SliceKind)> + '_ {
    state.board().cells().flat_map(|(pos, cell)| {
        let kinds: Vec<SliceKind> = match cell {
            Cell::Empty => Vec::new(),
            Cell::Slice(kind) => vec![*kind],
            Cell::Plate(plate) => plate.slices().to_vec(),
        };
        kinds.into_iter().map(move |kind| (pos, kind))
    })
}

/// Which estimate the informed strategies rank states by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    OccupiedCells,
    MissingSlices,
    ClusteredSlices,
    RemainingPlates,
    #[default]
    Combined,
}

impl HeuristicKind {
    /// Evaluates `state`; lower values are closer to a solved board.
    pub fn evaluate(&self, state: &BoardState) -> f64 {
        match self {
            HeuristicKind::OccupiedCells => occupied_cells(state) as f64,
            HeuristicKind::MissingSlices => missing_slices(state) as f64,
            HeuristicKind::ClusteredSlices => clustered_slices(state) as f64,
            HeuristicKind::RemainingPlates => remaining_plates(state) as f64,
            HeuristicKind::Combined => combined(state),
        }
    }
}

impl std::fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HeuristicKind::OccupiedCells => "occupied_cells",
            HeuristicKind::MissingSlices => "missing_slices",
            HeuristicKind::ClusteredSlices => "clustered_slices",
            HeuristicKind::RemainingPlates => "remaining_plates",
            HeuristicKind::Combined => "combined",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for HeuristicKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "occupied_cells" => Ok(HeuristicKind::OccupiedCells),
            "missing_slices" => Ok(HeuristicKind::MissingSlices),
            "clustered_slices" => Ok(HeuristicKind::ClusteredSlices),
            "remaining_plates" => Ok(HeuristicKind::RemainingPlates),
            "combined" => Ok(HeuristicKind::Combined),
            other => Err(format!("unknown heuristic '{}'", other)),
        }
    }
}

/// Chooses a one-step hint without searching.
///
/// Picks the legal move with the highest immediate score gain. Ties go to the
/// move whose successor has the lowest `heuristic` value, then to the earliest
/// move in generation order.
///
/// # Returns
/// `None` if no move is legal.
pub fn best_hint(rules: &Rules, state: &BoardState, heuristic: HeuristicKind) -> Option<Move> {
    let mut best: Option<(Move, u32, f64)> = None;
    for (mv, next) in rules.generate_moves(state) {
        let gain = next.score() - state.score();
        let h = heuristic.evaluate(&next);
        let better = match best {
            None => true,
            Some((_, best_gain, best_h)) => gain > best_gain || (gain == best_gain && h < best_h),
        };
        if better {
            best = Some((mv, gain, h));
        }
    }
    best.map(|(mv, _, _)| mv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Direction, Plate, Tray};
    use crate::utils::{board_from_str_array, plate_from_str};

    fn state(rows: &[&str], tray: &[&str]) -> BoardState {
        let plates: Vec<Plate> = tray.iter().map(|s| plate_from_str(s).unwrap()).collect();
        BoardState::new(board_from_str_array(rows).unwrap(), Tray::new(plates, 3))
    }

    #[test]
    fn test_occupied_cells() {
        assert_eq!(occupied_cells(&state(&["[0] . 1", ". . ."], &[])), 2);
    }

    #[test]
    fn test_missing_slices_counts_board_and_tray() {
        // Kind 0: 6 on the board + 1 in the tray = 7, one short.
        // Kind 1: 8, nothing missing. Kind 2: 1, seven short.
        let s = state(&["[000000] [11111111] 2"], &["[0]"]);
        assert_eq!(missing_slices(&s), 1 + 7);
    }

    #[test]
    fn test_clustered_slices() {
        let s = state(&["0 . 0", ". . ."], &[]);
        assert_eq!(clustered_slices(&s), 2);

        let s = state(&["[00] . ."], &["[0]"]);
        // (0,0)-(0,0) pair costs 0, each board slice paired with the tray slice costs 5.
        assert_eq!(clustered_slices(&s), 10);
    }

    #[test]
    fn test_remaining_plates_and_combined() {
        let s = state(&["0 ."], &["[1]", "[1]"]);
        assert_eq!(remaining_plates(&s), 2);
        let expected = 1.0 * 1.0 + 2.0 * (7.0 + 6.0) + 1.5 * (0.0 + 5.0) + 3.0 * 2.0;
        assert_eq!(combined(&s), expected);
        assert_eq!(HeuristicKind::Combined.evaluate(&s), expected);
    }

    #[test]
    fn test_best_hint_prefers_scoring_move() {
        let s = state(&["[0000000] 0", "1 [1]"], &[]);
        let hint = best_hint(&Rules::default(), &s, HeuristicKind::Combined).unwrap();
        assert_eq!(
            hint,
            Move::PlaceSlice {
                from: Position::new(0, 1),
                direction: Direction::Left
            }
        );
    }

    #[test]
    fn test_heuristic_kind_names() {
        let kinds = [
            HeuristicKind::OccupiedCells,
            HeuristicKind::MissingSlices,
            HeuristicKind::ClusteredSlices,
            HeuristicKind::RemainingPlates,
            HeuristicKind::Combined,
        ];
        for kind in kinds {
            assert_eq!(kind.to_string().parse::<HeuristicKind>(), Ok(kind));
        }
        assert!("manhattan".parse::<HeuristicKind>().is_err());
    }

    #[test]
    fn test_best_hint_none_when_stuck() {
        let s = state(&["[00000001] 0"], &[]);
        assert_eq!(best_hint(&Rules::default(), &s, HeuristicKind::Combined), None);
    }
}
