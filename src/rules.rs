//! Move generation and the plate rules.
//!
//! `Rules` is the single place where moves are validated and applied. Manual
//! play (`Game`, `apply_player_move`) and every search strategy go through the
//! same `Rules::apply_move`, so hints and auto-solve never disagree with what a
//! player is allowed to do.
//!
//! Applying a move never mutates its input: a new `BoardState` is returned, or
//! an `Error::IllegalMove` and the input is untouched.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::engine::{BoardState, Cell, Direction, Position, SliceKind};
use crate::error::{Error, IllegalMoveReason, Result};
use crate::scoring::Scoring;

/// An action that turns one `BoardState` into another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Move {
    /// Slide the loose slice at `from` onto the plate next to it in `direction`.
    PlaceSlice { from: Position, direction: Direction },
    /// Move the plate at `from` one cell in `direction`, into an empty cell.
    MovePlate { from: Position, direction: Direction },
    /// Put the visible tray plate `slot` on the empty cell `at`.
    PlacePlate { slot: usize, at: Position },
}

impl Move {
    /// The cell a move is ordered by: its source, or for tray plates the target.
    pub fn anchor(&self) -> Position {
        match *self {
            Move::PlaceSlice { from, .. } | Move::MovePlate { from, .. } => from,
            Move::PlacePlate { at, .. } => at,
        }
    }

    fn rank(&self) -> (u8, usize) {
        match *self {
            Move::PlaceSlice { direction, .. } => (0, direction_index(direction)),
            Move::MovePlate { direction, .. } => (1, direction_index(direction)),
            Move::PlacePlate { slot, .. } => (2, slot),
        }
    }
}

fn direction_index(direction: Direction) -> usize {
    Direction::ALL
        .iter()
        .position(|&d| d == direction)
        .unwrap_or(0)
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::PlaceSlice { from, direction } => {
                write!(f, "place slice {} {}", from, direction)
            }
            Move::MovePlate { from, direction } => write!(f, "move plate {} {}", from, direction),
            Move::PlacePlate { slot, at } => write!(f, "place tray plate {} at {}", slot, at),
        }
    }
}

/// Path cost of each move type, used by uniform-cost and A* search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct MoveCosts {
    pub place_slice: u32,
    pub move_plate: u32,
    pub place_plate: u32,
}

impl Default for MoveCosts {
    fn default() -> Self {
        MoveCosts {
            place_slice: 1,
            move_plate: 2,
            place_plate: 1,
        }
    }
}

impl MoveCosts {
    /// Returns the cost of `mv`.
    pub fn cost(&self, mv: &Move) -> u32 {
        match mv {
            Move::PlaceSlice { .. } => self.place_slice,
            Move::MovePlate { .. } => self.move_plate,
            Move::PlacePlate { .. } => self.place_plate,
        }
    }
}

/// The rules of the puzzle, parameterised by scoring and move costs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rules {
    pub scoring: Scoring,
    pub costs: MoveCosts,
}

impl Rules {
    pub fn new(scoring: Scoring, costs: MoveCosts) -> Self {
        Rules { scoring, costs }
    }

    /// Applies `mv` to a copy of `state`.
    ///
    /// After the move the destination plates are inspected once each: a plate
    /// holding 8 slices of one kind is cleared, its points and adjacency bonus
    /// are added to the score and its cell becomes empty.
    ///
    /// # Errors
    /// `Error::IllegalMove` if the move breaks plate capacity, board bounds,
    /// cell occupancy or refers to a missing slice, plate or tray slot.
    pub fn apply_move(&self, state: &BoardState, mv: Move) -> Result<BoardState> {
        let illegal = |reason| Error::IllegalMove { mv, reason };
        let board = state.board();

        match mv {
            Move::PlaceSlice { from, direction } => {
                let kind = match board.get(from) {
                    None => return Err(illegal(IllegalMoveReason::OutOfBounds)),
                    Some(Cell::Slice(kind)) => *kind,
                    Some(_) => return Err(illegal(IllegalMoveReason::NoSlice)),
                };
                let target = board
                    .step(from, direction)
                    .ok_or_else(|| illegal(IllegalMoveReason::OutOfBounds))?;
                let plate = board
                    .plate(target)
                    .ok_or_else(|| illegal(IllegalMoveReason::NoPlate))?;
                if plate.is_full() {
                    return Err(illegal(IllegalMoveReason::PlateFull));
                }

                let mut next = state.clone();
                next.board_mut().set(from, Cell::Empty);
                if let Some(plate) = next.board_mut().plate_mut(target) {
                    plate.push(kind);
                }
                self.settle(&mut next, &[target]);
                Ok(next)
            }
            Move::MovePlate { from, direction } => {
                let plate = match board.get(from) {
                    None => return Err(illegal(IllegalMoveReason::OutOfBounds)),
                    Some(Cell::Plate(plate)) => plate.clone(),
                    Some(_) => return Err(illegal(IllegalMoveReason::NoPlate)),
                };
                let target = board
                    .step(from, direction)
                    .ok_or_else(|| illegal(IllegalMoveReason::OutOfBounds))?;
                if board.get(target) != Some(&Cell::Empty) {
                    return Err(illegal(IllegalMoveReason::CellOccupied));
                }

                let mut next = state.clone();
                next.board_mut().set(from, Cell::Empty);
                next.board_mut().set(target, Cell::Plate(plate));
                self.settle(&mut next, &[target]);
                Ok(next)
            }
            Move::PlacePlate { slot, at } => {
                match board.get(at) {
                    None => return Err(illegal(IllegalMoveReason::OutOfBounds)),
                    Some(Cell::Empty) => {}
                    Some(_) => return Err(illegal(IllegalMoveReason::CellOccupied)),
                }

                let mut next = state.clone();
                let plate = next
                    .tray_mut()
                    .take(slot)
                    .ok_or_else(|| illegal(IllegalMoveReason::NoTrayPlate))?;
                next.board_mut().set(at, Cell::Plate(plate));

                let mut destinations = vec![at];
                destinations.extend(merge_neighbors(&mut next, at));
                for &pos in &destinations {
                    if next.board().plate(pos).is_some_and(|p| p.is_empty()) {
                        next.board_mut().set(pos, Cell::Empty);
                    }
                }
                self.settle(&mut next, &destinations);
                Ok(next)
            }
        }
    }

    /// Lists every move that `apply_move` would accept, in generation order.
    pub fn legal_moves(&self, state: &BoardState) -> Vec<Move> {
        self.generate_moves(state).into_iter().map(|(mv, _)| mv).collect()
    }

    /// Produces every legal move together with the state it leads to.
    ///
    /// The order is deterministic: by the move's anchor cell (lowest row, then
    /// column), then by the lowest slice kind involved, then by move type and
    /// direction or tray slot. An empty result means the state is a dead end.
    pub fn generate_moves(&self, state: &BoardState) -> Vec<(Move, BoardState)> {
        let board = state.board();
        let slots = state.tray().visible().len();
        let mut candidates = Vec::new();

        for (pos, cell) in board.cells() {
            match cell {
                Cell::Slice(_) => candidates.extend(
                    Direction::ALL
                        .iter()
                        .map(|&direction| Move::PlaceSlice { from: pos, direction }),
                ),
                Cell::Plate(_) => candidates.extend(
                    Direction::ALL
                        .iter()
                        .map(|&direction| Move::MovePlate { from: pos, direction }),
                ),
                Cell::Empty => {
                    candidates.extend((0..slots).map(|slot| Move::PlacePlate { slot, at: pos }))
                }
            }
        }

        let mut successors: Vec<(Move, BoardState)> = candidates
            .into_iter()
            .filter_map(|mv| self.apply_move(state, mv).ok().map(|next| (mv, next)))
            .collect();
        successors.sort_by_key(|(mv, _)| {
            let anchor = mv.anchor();
            (anchor.row, anchor.col, move_kind(state, mv), mv.rank())
        });
        successors
    }

    // Clears every complete plate among `destinations`, each at most once.
    fn settle(&self, state: &mut BoardState, destinations: &[Position]) {
        let mut seen: Vec<Position> = Vec::with_capacity(destinations.len());
        for &pos in destinations {
            if seen.contains(&pos) {
                continue;
            }
            seen.push(pos);

            let Some(plate) = state.board().plate(pos) else {
                continue;
            };
            if !plate.is_complete() {
                continue;
            }
            let points = self
                .scoring
                .plate_clear_score(plate)
                .saturating_add(self.scoring.adjacency_bonus(state.board(), pos));
            state.board_mut().set(pos, Cell::Empty);
            state.record_clear(points);
            trace!(event = "plate_cleared", position = %pos, points = points);
        }
    }
}

fn move_kind(state: &BoardState, mv: &Move) -> Option<SliceKind> {
    match *mv {
        Move::PlaceSlice { from, .. } => match state.board().get(from) {
            Some(Cell::Slice(kind)) => Some(*kind),
            _ => None,
        },
        Move::MovePlate { from, .. } => state.board().plate(from).and_then(|p| p.dominant_kind()),
        Move::PlacePlate { slot, .. } => state
            .tray()
            .visible()
            .get(slot)
            .and_then(|p| p.dominant_kind()),
    }
}

// Moves shared kinds between the plate at `at` and its orthogonal neighbours.
// For each shared kind the slices go to whichever plate already holds more of
// it, ties to the placed plate, limited by the receiver's free slots.
// Returns the neighbours that gave or received slices.
fn merge_neighbors(state: &mut BoardState, at: Position) -> Vec<Position> {
    let mut touched = Vec::new();

    for direction in Direction::ALL {
        let Some(npos) = state.board().step(at, direction) else {
            continue;
        };
        let (Some(placed), Some(neighbor)) = (state.board().plate(at), state.board().plate(npos))
        else {
            continue;
        };
        let shared: Vec<SliceKind> = placed
            .kinds()
            .into_iter()
            .filter(|&k| neighbor.count(k) > 0)
            .collect();

        for kind in shared {
            let (Some(placed), Some(neighbor)) =
                (state.board().plate(at), state.board().plate(npos))
            else {
                break;
            };
            let (ours, theirs) = (placed.count(kind), neighbor.count(kind));
            if ours == 0 || theirs == 0 {
                continue;
            }
            let (source, target, n) = if ours >= theirs {
                (npos, at, theirs.min(placed.free_slots()))
            } else {
                (at, npos, ours.min(neighbor.free_slots()))
            };
            if n == 0 {
                continue;
            }

            let board = state.board_mut();
            let moved = board.plate_mut(source).map_or(0, |p| p.take(kind, n));
            if let Some(receiver) = board.plate_mut(target) {
                for _ in 0..moved {
                    receiver.push(kind);
                }
            }
            if moved > 0 && !touched.contains(&npos) {
                touched.push(npos);
            }
        }
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Plate, Tray, PLATE_CAPACITY};
    use crate::utils::{board_from_str_array, plate_from_str};

    fn state(rows: &[&str]) -> BoardState {
        BoardState::new(board_from_str_array(rows).unwrap(), Tray::empty())
    }

    fn state_with_tray(rows: &[&str], tray: &[&str]) -> BoardState {
        let plates: Vec<Plate> = tray.iter().map(|s| plate_from_str(s).unwrap()).collect();
        BoardState::new(board_from_str_array(rows).unwrap(), Tray::new(plates, 3))
    }

    #[test]
    fn test_eighth_vanilla_slice_clears_the_plate() {
        // Kind 0 is vanilla.
        let start = state(&["[0000000] 0"]);
        let rules = Rules::default();
        let mv = Move::PlaceSlice {
            from: Position::new(0, 1),
            direction: Direction::Left,
        };

        let next = rules.apply_move(&start, mv).unwrap();
        assert_eq!(next.score(), 8 * rules.scoring.per_slice_value);
        assert_eq!(next.cakes(), 1);
        assert_eq!(next.board().get(Position::new(0, 0)), Some(&Cell::Empty));
        assert_eq!(next.board().get(Position::new(0, 1)), Some(&Cell::Empty));
        assert_eq!(next.board().slice_count(), 0);
    }

    #[test]
    fn test_mixed_full_plate_does_not_clear_and_blocks_placement() {
        let start = state(&["[0000000] 1 0"]);
        let rules = Rules::default();
        let filled = rules
            .apply_move(
                &start,
                Move::PlaceSlice {
                    from: Position::new(0, 1),
                    direction: Direction::Left,
                },
            )
            .unwrap();
        let plate = filled.board().plate(Position::new(0, 0)).unwrap();
        assert_eq!(plate.len(), PLATE_CAPACITY);
        assert!(!plate.is_complete());
        assert_eq!(filled.score(), 0);

        // A vanilla slice next to the full plate cannot be placed.
        let mut blocked = filled.clone();
        blocked
            .board_mut()
            .set(Position::new(0, 1), Cell::Slice(SliceKind::new(0).unwrap()));
        let err = rules
            .apply_move(
                &blocked,
                Move::PlaceSlice {
                    from: Position::new(0, 1),
                    direction: Direction::Left,
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::IllegalMove {
                reason: IllegalMoveReason::PlateFull,
                ..
            }
        ));
    }

    #[test]
    fn test_illegal_moves_leave_state_unchanged() {
        let start = state(&["[01] 0", ". ."]);
        let snapshot = start.clone();
        let rules = Rules::default();

        let cases = [
            (
                Move::PlaceSlice {
                    from: Position::new(0, 1),
                    direction: Direction::Right,
                },
                IllegalMoveReason::OutOfBounds,
            ),
            (
                Move::PlaceSlice {
                    from: Position::new(0, 1),
                    direction: Direction::Down,
                },
                IllegalMoveReason::NoPlate,
            ),
            (
                Move::PlaceSlice {
                    from: Position::new(1, 0),
                    direction: Direction::Up,
                },
                IllegalMoveReason::NoSlice,
            ),
            (
                Move::MovePlate {
                    from: Position::new(0, 0),
                    direction: Direction::Right,
                },
                IllegalMoveReason::CellOccupied,
            ),
            (
                Move::MovePlate {
                    from: Position::new(0, 0),
                    direction: Direction::Up,
                },
                IllegalMoveReason::OutOfBounds,
            ),
            (
                Move::PlacePlate {
                    slot: 0,
                    at: Position::new(1, 1),
                },
                IllegalMoveReason::NoTrayPlate,
            ),
            (
                Move::PlacePlate {
                    slot: 0,
                    at: Position::new(5, 5),
                },
                IllegalMoveReason::OutOfBounds,
            ),
        ];

        for (mv, expected) in cases {
            match rules.apply_move(&start, mv) {
                Err(Error::IllegalMove { reason, .. }) => assert_eq!(reason, expected, "{}", mv),
                other => panic!("{} should be illegal, got {:?}", mv, other),
            }
        }
        assert_eq!(start, snapshot);
    }

    #[test]
    fn test_move_plate() {
        let start = state(&["[01] ."]);
        let next = Rules::default()
            .apply_move(
                &start,
                Move::MovePlate {
                    from: Position::new(0, 0),
                    direction: Direction::Right,
                },
            )
            .unwrap();
        assert_eq!(next.board().get(Position::new(0, 0)), Some(&Cell::Empty));
        assert_eq!(next.board().plate(Position::new(0, 1)).unwrap().len(), 2);
        assert_eq!(next.score(), 0);
    }

    #[test]
    fn test_clearing_is_idempotent_per_move() {
        let start = state(&["[0000000] 0 .", "[0] . ."]);
        let rules = Rules::default();
        let mv = Move::PlaceSlice {
            from: Position::new(0, 1),
            direction: Direction::Left,
        };
        let a = rules.apply_move(&start.clone(), mv).unwrap();
        let b = rules.apply_move(&start.clone(), mv).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.cakes(), 1);
        // 80 for the cake, 5 for the matching plate below it.
        assert_eq!(a.score(), 85);
    }

    #[test]
    fn test_place_plate_merges_with_neighbours() {
        let start = state_with_tray(&[". [0011]"], &["[000]"]);
        let next = Rules::default()
            .apply_move(
                &start,
                Move::PlacePlate {
                    slot: 0,
                    at: Position::new(0, 0),
                },
            )
            .unwrap();
        assert_eq!(next.board().plate(Position::new(0, 0)).unwrap().to_string(), "[00000]");
        assert_eq!(next.board().plate(Position::new(0, 1)).unwrap().to_string(), "[11]");
        assert!(next.tray().is_exhausted());
    }

    #[test]
    fn test_merge_tie_favours_placed_plate_and_removes_drained() {
        let start = state_with_tray(&[". [0]"], &["[01]"]);
        let next = Rules::default()
            .apply_move(
                &start,
                Move::PlacePlate {
                    slot: 0,
                    at: Position::new(0, 0),
                },
            )
            .unwrap();
        assert_eq!(next.board().plate(Position::new(0, 0)).unwrap().to_string(), "[001]");
        assert_eq!(next.board().get(Position::new(0, 1)), Some(&Cell::Empty));
    }

    #[test]
    fn test_merge_completes_a_cake() {
        let start = state_with_tray(&["[0000] ."], &["[0000]"]);
        let next = Rules::default()
            .apply_move(
                &start,
                Move::PlacePlate {
                    slot: 0,
                    at: Position::new(0, 1),
                },
            )
            .unwrap();
        assert_eq!(next.cakes(), 1);
        assert_eq!(next.score(), 80);
        assert_eq!(next.board().plate_count(), 0);
    }

    #[test]
    fn test_merge_respects_capacity() {
        let start = state_with_tray(&[". [0000001]"], &["[0011111]"]);
        let next = Rules::default()
            .apply_move(
                &start,
                Move::PlacePlate {
                    slot: 0,
                    at: Position::new(0, 0),
                },
            )
            .unwrap();
        for (_, plate) in next.board().plates() {
            assert!(plate.len() <= PLATE_CAPACITY);
        }
        // Kind 0 flows to the neighbour, which has room for one slice.
        // Kind 1 flows back to the placed plate.
        assert_eq!(next.board().plate(Position::new(0, 1)).unwrap().to_string(), "[0000000]");
        assert_eq!(next.board().plate(Position::new(0, 0)).unwrap().to_string(), "[0111111]");
        assert_eq!(next.board().slice_count(), 14);
    }

    #[test]
    fn test_generate_moves_respects_capacity() {
        let start = state_with_tray(
            &["[0000000] 0 .", "1 [1111111] ."],
            &["[0]", "[11]", "[2]"],
        );
        let successors = Rules::default().generate_moves(&start);
        assert!(!successors.is_empty());
        for (_, next) in &successors {
            for (_, plate) in next.board().plates() {
                assert!(plate.len() <= PLATE_CAPACITY);
            }
        }
    }

    #[test]
    fn test_generate_moves_is_ordered_and_pure() {
        let start = state_with_tray(&[". [0] 1", ". . ."], &["[2]"]);
        let snapshot = start.clone();
        let rules = Rules::default();
        let moves = rules.legal_moves(&start);

        let anchors: Vec<(usize, usize)> = moves
            .iter()
            .map(|m| (m.anchor().row, m.anchor().col))
            .collect();
        let mut sorted = anchors.clone();
        sorted.sort();
        assert_eq!(anchors, sorted);
        assert_eq!(
            moves[0],
            Move::PlacePlate {
                slot: 0,
                at: Position::new(0, 0)
            }
        );
        assert_eq!(rules.legal_moves(&start), moves);
        assert_eq!(start, snapshot);
    }

    #[test]
    fn test_generate_moves_same_anchor_orders_by_kind() {
        let start = state_with_tray(&["."], &["[2]", "[0]"]);
        let moves = Rules::default().legal_moves(&start);
        let at = Position::new(0, 0);
        assert_eq!(
            moves,
            vec![
                Move::PlacePlate { slot: 1, at },
                Move::PlacePlate { slot: 0, at },
            ]
        );
    }

    #[test]
    fn test_huge_scoring_saturates() {
        let rules = Rules::new(
            Scoring {
                per_slice_value: 1_000_000_000,
                bonus_per_neighbor: u32::MAX,
                ..Scoring::default()
            },
            MoveCosts::default(),
        );
        let start = state(&["[0000000] 0 [0]"]);
        let next = rules
            .apply_move(
                &start,
                Move::PlaceSlice {
                    from: Position::new(0, 1),
                    direction: Direction::Left,
                },
            )
            .unwrap();
        assert_eq!(next.score(), u32::MAX);
        assert_eq!(next.cakes(), 1);
    }

    #[test]
    fn test_dead_end_has_no_moves() {
        let start = state(&["[00000001] 0"]);
        assert!(Rules::default().generate_moves(&start).is_empty());
    }

    #[test]
    fn test_move_costs() {
        let costs = MoveCosts::default();
        let slide = Move::PlaceSlice {
            from: Position::new(0, 0),
            direction: Direction::Up,
        };
        let shift = Move::MovePlate {
            from: Position::new(0, 0),
            direction: Direction::Up,
        };
        assert_eq!(costs.cost(&slide), 1);
        assert_eq!(costs.cost(&shift), 2);
    }
}
