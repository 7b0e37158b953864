//! Board model for the cake sort puzzle.
//!
//! This module defines the values the rules and the search engine operate on:
//! - `SliceKind`: the flavour of a cake slice.
//! - `Plate`: a container of up to `PLATE_CAPACITY` slices.
//! - `Cell` and `Board`: the grid of empty cells, loose slices and plates.
//! - `Tray`: the queue of incoming plates with its visible window.
//! - `BoardState`: the search node, a full snapshot plus score and cake count.
//!
//! Every type here is a plain value: cloning a `BoardState` gives an independent
//! copy, and equality/hashing are structural so states can key visited maps.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::fmt;

/// Number of slices a plate holds when full. Eight uniform slices form a cake.
pub const PLATE_CAPACITY: usize = 8;

/// Number of distinct slice kinds a level may use (`0..=9`).
pub const MAX_SLICE_KINDS: u8 = 10;

/// Largest supported board dimension, for both rows and columns.
pub const MAX_BOARD_DIM: usize = 16;

/// The flavour of a cake slice.
///
/// Kinds are small integers; a level palette gives them names such as
/// "vanilla" or "chocolate". The ordering of kinds is the tie-breaker used
/// by move ordering and by `Plate::dominant_kind`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SliceKind(u8);

impl SliceKind {
    /// Creates a slice kind, returning `None` if `id >= MAX_SLICE_KINDS`.
    pub fn new(id: u8) -> Option<Self> {
        (id < MAX_SLICE_KINDS).then_some(SliceKind(id))
    }

    /// Returns the numeric identifier of this kind.
    pub fn id(&self) -> u8 {
        self.0
    }

    /// Converts the kind to its single-digit character representation.
    ///
    /// # Examples
    ///
    /// ```
    /// use cake_sort_solver::engine::SliceKind;
    /// assert_eq!(SliceKind::new(3).unwrap().to_char(), '3');
    /// ```
    pub fn to_char(&self) -> char {
        char::from(b'0' + self.0)
    }

    /// Parses a digit character into a slice kind.
    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10).and_then(|d| SliceKind::new(d as u8))
    }
}

impl fmt::Display for SliceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cell coordinate on the board, 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four orthogonal directions a slice or plate can travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in generation order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the (row, column) offset of one step in this direction.
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "u" | "up" => Ok(Direction::Up),
            "d" | "down" => Ok(Direction::Down),
            "l" | "left" => Ok(Direction::Left),
            "r" | "right" => Ok(Direction::Right),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

/// Which cells count as neighbours of a position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjacency {
    /// Up, down, left and right.
    #[default]
    Four,
    /// The four orthogonal cells plus the four diagonals.
    Eight,
}

impl Adjacency {
    fn offsets(&self) -> &'static [(isize, isize)] {
        const FOUR: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
        const EIGHT: [(isize, isize); 8] = [
            (-1, -1),
            (-1, 0),
            (-1, 1),
            (0, -1),
            (0, 1),
            (1, -1),
            (1, 0),
            (1, 1),
        ];
        match self {
            Adjacency::Four => &FOUR,
            Adjacency::Eight => &EIGHT,
        }
    }
}

/// A plate holding up to `PLATE_CAPACITY` slices.
///
/// The contents are an unordered multiset; they are kept sorted so that two
/// plates with the same slices compare and hash equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Plate {
    slices: SmallVec<[SliceKind; PLATE_CAPACITY]>,
}

impl Plate {
    /// Creates an empty plate.
    pub fn new() -> Self {
        Plate::default()
    }

    /// Creates a plate from the given slices.
    ///
    /// # Returns
    /// `None` if more than `PLATE_CAPACITY` slices are supplied.
    pub fn from_slices<I: IntoIterator<Item = SliceKind>>(slices: I) -> Option<Self> {
        let mut slices: SmallVec<[SliceKind; PLATE_CAPACITY]> = slices.into_iter().collect();
        if slices.len() > PLATE_CAPACITY {
            return None;
        }
        slices.sort_unstable();
        Some(Plate { slices })
    }

    /// Returns the slices on this plate in ascending kind order.
    pub fn slices(&self) -> &[SliceKind] {
        &self.slices
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Returns true when the plate holds `PLATE_CAPACITY` slices, uniform or not.
    pub fn is_full(&self) -> bool {
        self.slices.len() >= PLATE_CAPACITY
    }

    /// Returns the number of slices that can still be added.
    pub fn free_slots(&self) -> usize {
        PLATE_CAPACITY - self.slices.len()
    }

    /// Counts the slices of `kind` on this plate.
    pub fn count(&self, kind: SliceKind) -> usize {
        self.slices.iter().filter(|&&s| s == kind).count()
    }

    /// Returns the distinct kinds on this plate in ascending order.
    pub fn kinds(&self) -> Vec<SliceKind> {
        let mut kinds: Vec<SliceKind> = self.slices.to_vec();
        kinds.dedup();
        kinds
    }

    /// Returns the most frequent kind, ties going to the lowest kind id.
    /// `None` for an empty plate.
    pub fn dominant_kind(&self) -> Option<SliceKind> {
        let mut best: Option<(SliceKind, usize)> = None;
        for kind in self.kinds() {
            let n = self.count(kind);
            if best.map_or(true, |(_, m)| n > m) {
                best = Some((kind, n));
            }
        }
        best.map(|(kind, _)| kind)
    }

    /// Returns true if the plate is a finished cake: full and of one kind.
    pub fn is_complete(&self) -> bool {
        self.is_full() && self.slices.iter().all(|&s| s == self.slices[0])
    }

    /// Adds one slice. Returns false, leaving the plate unchanged, if it is full.
    pub fn push(&mut self, kind: SliceKind) -> bool {
        if self.is_full() {
            return false;
        }
        let idx = self.slices.partition_point(|&s| s <= kind);
        self.slices.insert(idx, kind);
        true
    }

    /// Removes up to `n` slices of `kind` and returns how many were removed.
    pub fn take(&mut self, kind: SliceKind, n: usize) -> usize {
        let mut removed = 0;
        self.slices.retain(|s| {
            if *s == kind && removed < n {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }
}

impl fmt::Display for Plate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for s in &self.slices {
            write!(f, "{}", s.to_char())?;
        }
        write!(f, "]")
    }
}

/// The contents of one board cell.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    /// A loose slice waiting to be slid onto a neighbouring plate.
    Slice(SliceKind),
    Plate(Plate),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn as_plate(&self) -> Option<&Plate> {
        match self {
            Cell::Plate(plate) => Some(plate),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => write!(f, "."),
            Cell::Slice(kind) => write!(f, "{}", kind.to_char()),
            Cell::Plate(plate) => write!(f, "{}", plate),
        }
    }
}

/// Represents the game board as a row-major grid of `Cell`s.
///
/// Dimensions vary per level. Out-of-range lookups return `None` rather than
/// panicking, so callers can treat the board edge like any other illegal target.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates a board of the given size with every cell empty.
    ///
    /// # Examples
    /// ```
    /// use cake_sort_solver::engine::{Board, Cell, Position};
    /// let board = Board::new_empty(2, 3);
    /// assert_eq!(board.get(Position::new(1, 2)), Some(&Cell::Empty));
    /// assert_eq!(board.get(Position::new(2, 0)), None);
    /// ```
    pub fn new_empty(rows: usize, cols: usize) -> Self {
        Board {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns true if `pos` lies on the board.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Returns the cell at `pos`, or `None` if `pos` is off the board.
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        if self.contains(pos) {
            self.cells.get(pos.row * self.cols + pos.col)
        } else {
            None
        }
    }

    /// Replaces the cell at `pos`.
    ///
    /// # Panics
    /// Panics if `pos` is off the board.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        assert!(self.contains(pos), "position {} is off the board", pos);
        self.cells[pos.row * self.cols + pos.col] = cell;
    }

    /// Returns the plate at `pos`, if that cell holds one.
    pub fn plate(&self, pos: Position) -> Option<&Plate> {
        self.get(pos).and_then(Cell::as_plate)
    }

    pub(crate) fn plate_mut(&mut self, pos: Position) -> Option<&mut Plate> {
        if !self.contains(pos) {
            return None;
        }
        match &mut self.cells[pos.row * self.cols + pos.col] {
            Cell::Plate(plate) => Some(plate),
            _ => None,
        }
    }

    /// Returns the neighbour one step from `pos` in `direction`, if on the board.
    pub fn step(&self, pos: Position, direction: Direction) -> Option<Position> {
        let (dr, dc) = direction.delta();
        self.offset(pos, dr, dc)
    }

    fn offset(&self, pos: Position, dr: isize, dc: isize) -> Option<Position> {
        let row = pos.row.checked_add_signed(dr)?;
        let col = pos.col.checked_add_signed(dc)?;
        let next = Position::new(row, col);
        self.contains(next).then_some(next)
    }

    /// Returns the on-board neighbours of `pos` under the given adjacency.
    pub fn neighbors(&self, pos: Position, adjacency: Adjacency) -> Vec<Position> {
        adjacency
            .offsets()
            .iter()
            .filter_map(|&(dr, dc)| self.offset(pos, dr, dc))
            .collect()
    }

    /// Iterates over every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |r| (0..self.cols).map(move |c| Position::new(r, c)))
    }

    /// Iterates over `(position, cell)` pairs in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.positions().zip(self.cells.iter())
    }

    /// Iterates over every plate with its position.
    pub fn plates(&self) -> impl Iterator<Item = (Position, &Plate)> + '_ {
        self.cells()
            .filter_map(|(pos, cell)| cell.as_plate().map(|plate| (pos, plate)))
    }

    /// Counts the plates on the board, including empty ones.
    pub fn plate_count(&self) -> usize {
        self.plates().count()
    }

    /// Counts every slice on the board: loose ones and those on plates.
    pub fn slice_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| match cell {
                Cell::Empty => 0,
                Cell::Slice(_) => 1,
                Cell::Plate(plate) => plate.len(),
            })
            .sum()
    }

    /// Counts cells that are not empty.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Returns true if no cell is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Returns the layout rows in the text format accepted by
    /// `utils::board_from_str_array`.
    pub fn layout_rows(&self) -> Vec<String> {
        (0..self.rows)
            .map(|r| {
                (0..self.cols)
                    .map(|c| self.cells[r * self.cols + c].to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    /// Renders the board with row and column numbers.
    ///
    /// If `pos` is `Some`, that cell is marked with a trailing `*`.
    pub fn to_string_with_highlight(&self, pos: Option<Position>) -> String {
        let width = self
            .cells
            .iter()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1)
            + 1;

        let mut output = String::new();
        output.push_str("   ");
        for c in 0..self.cols {
            output.push_str(&format!("{:<width$} ", c, width = width));
        }
        output.push('\n');

        for r in 0..self.rows {
            output.push_str(&format!("{:<2} ", r));
            for c in 0..self.cols {
                let here = Position::new(r, c);
                let mut token = self.cells[r * self.cols + c].to_string();
                if pos == Some(here) {
                    token.push('*');
                }
                output.push_str(&format!("{:<width$} ", token, width = width));
            }
            if r + 1 < self.rows {
                output.push('\n');
            }
        }
        output
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_highlight(None))
    }
}

/// Incoming plates waiting to be put on the board.
///
/// Up to `window` plates are visible at once; taking one refills the window
/// from the front of the queue.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tray {
    window: usize,
    visible: Vec<Plate>,
    queue: VecDeque<Plate>,
}

impl Tray {
    /// Creates a tray from all incoming plates, in arrival order.
    pub fn new(plates: Vec<Plate>, window: usize) -> Self {
        let mut tray = Tray {
            window,
            visible: Vec::new(),
            queue: plates.into(),
        };
        tray.refill();
        tray
    }

    /// A tray with no plates.
    pub fn empty() -> Self {
        Tray::new(Vec::new(), 0)
    }

    fn refill(&mut self) {
        while self.visible.len() < self.window {
            match self.queue.pop_front() {
                Some(plate) => self.visible.push(plate),
                None => break,
            }
        }
    }

    /// Returns the visible plates; their indices are the tray slots.
    pub fn visible(&self) -> &[Plate] {
        &self.visible
    }

    /// Returns the plates not yet visible, next one first.
    pub fn queued(&self) -> impl Iterator<Item = &Plate> + '_ {
        self.queue.iter()
    }

    /// Removes the plate in `slot` and refills the window.
    pub fn take(&mut self, slot: usize) -> Option<Plate> {
        if slot >= self.visible.len() {
            return None;
        }
        let plate = self.visible.remove(slot);
        self.refill();
        Some(plate)
    }

    /// Number of plates still to be placed, visible or queued.
    pub fn remaining(&self) -> usize {
        self.visible.len() + self.queue.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}

/// A search node: the full board, the tray, and the running totals.
///
/// Two states are equal when their boards, trays, scores and cake counts are
/// equal, which is what visited-state tracking relies on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoardState {
    board: Board,
    tray: Tray,
    score: u32,
    cakes: u32,
}

impl BoardState {
    /// Creates a state with zero score and no cakes cleared.
    pub fn new(board: Board, tray: Tray) -> Self {
        BoardState {
            board,
            tray,
            score: 0,
            cakes: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tray(&self) -> &Tray {
        &self.tray
    }

    /// Returns the cumulative score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Returns the number of cakes cleared so far.
    pub fn cakes(&self) -> u32 {
        self.cakes
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(crate) fn tray_mut(&mut self) -> &mut Tray {
        &mut self.tray
    }

    pub(crate) fn record_clear(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.cakes += 1;
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        write!(f, "Tray:")?;
        for (slot, plate) in self.tray.visible().iter().enumerate() {
            write!(f, " {}:{}", slot, plate)?;
        }
        writeln!(f, " (+{} queued)", self.tray.queue.len())?;
        write!(f, "Score: {}, Cakes: {}", self.score, self.cakes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(id: u8) -> SliceKind {
        SliceKind::new(id).unwrap()
    }

    #[test]
    fn test_slice_kind_bounds() {
        assert!(SliceKind::new(9).is_some());
        assert!(SliceKind::new(10).is_none());
        assert_eq!(SliceKind::from_char('7'), Some(kind(7)));
        assert_eq!(SliceKind::from_char('x'), None);
    }

    #[test]
    fn test_plate_contents_are_canonical() {
        let a = Plate::from_slices([kind(2), kind(0), kind(1)]).unwrap();
        let b = Plate::from_slices([kind(1), kind(2), kind(0)]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.slices(), &[kind(0), kind(1), kind(2)]);
        assert_eq!(a.to_string(), "[012]");
    }

    #[test]
    fn test_plate_capacity() {
        assert!(Plate::from_slices(vec![kind(0); 9]).is_none());

        let mut plate = Plate::from_slices(vec![kind(0); 7]).unwrap();
        assert_eq!(plate.free_slots(), 1);
        assert!(plate.push(kind(1)));
        assert!(plate.is_full());
        assert!(!plate.push(kind(0)), "a full plate must reject slices");
        assert_eq!(plate.len(), PLATE_CAPACITY);
    }

    #[test]
    fn test_plate_complete_only_when_uniform() {
        let uniform = Plate::from_slices(vec![kind(4); 8]).unwrap();
        assert!(uniform.is_complete());

        let mut mixed = Plate::from_slices(vec![kind(4); 7]).unwrap();
        mixed.push(kind(5));
        assert!(mixed.is_full());
        assert!(!mixed.is_complete());
    }

    #[test]
    fn test_plate_dominant_kind_ties_to_lowest() {
        let plate = Plate::from_slices([kind(3), kind(3), kind(1), kind(1), kind(2)]).unwrap();
        assert_eq!(plate.dominant_kind(), Some(kind(1)));
        assert_eq!(Plate::new().dominant_kind(), None);
    }

    #[test]
    fn test_plate_take() {
        let mut plate = Plate::from_slices([kind(1), kind(1), kind(1), kind(2)]).unwrap();
        assert_eq!(plate.take(kind(1), 2), 2);
        assert_eq!(plate.count(kind(1)), 1);
        assert_eq!(plate.take(kind(5), 3), 0);
        assert_eq!(plate.len(), 2);
    }

    #[test]
    fn test_board_bounds_and_steps() {
        let board = Board::new_empty(2, 3);
        let corner = Position::new(0, 0);
        assert_eq!(board.step(corner, Direction::Up), None);
        assert_eq!(board.step(corner, Direction::Left), None);
        assert_eq!(board.step(corner, Direction::Right), Some(Position::new(0, 1)));
        assert_eq!(board.step(Position::new(1, 2), Direction::Down), None);
        assert!(!board.contains(Position::new(2, 0)));
    }

    #[test]
    fn test_board_neighbors() {
        let board = Board::new_empty(3, 3);
        let center = Position::new(1, 1);
        assert_eq!(board.neighbors(center, Adjacency::Four).len(), 4);
        assert_eq!(board.neighbors(center, Adjacency::Eight).len(), 8);
        assert_eq!(board.neighbors(Position::new(0, 0), Adjacency::Four).len(), 2);
        assert_eq!(board.neighbors(Position::new(0, 0), Adjacency::Eight).len(), 3);
    }

    #[test]
    fn test_board_counts() {
        let mut board = Board::new_empty(2, 2);
        board.set(Position::new(0, 0), Cell::Slice(kind(0)));
        board.set(
            Position::new(1, 1),
            Cell::Plate(Plate::from_slices([kind(0), kind(1)]).unwrap()),
        );
        assert_eq!(board.slice_count(), 3);
        assert_eq!(board.plate_count(), 1);
        assert_eq!(board.occupied_count(), 2);
        assert!(!board.is_full());
        assert_eq!(board.layout_rows(), vec!["0 .", ". [01]"]);
    }

    #[test]
    fn test_display_board_formatting() {
        let mut board = Board::new_empty(2, 3);
        board.set(Position::new(1, 2), Cell::Slice(kind(2)));
        let display_str = board.to_string_with_highlight(Some(Position::new(1, 2)));
        assert_eq!(display_str.lines().count(), 3, "header plus one line per row");
        assert!(display_str.contains("2*"));
    }

    #[test]
    fn test_tray_window_refills() {
        let plates: Vec<Plate> = (0..5)
            .map(|i| Plate::from_slices([kind(i)]).unwrap())
            .collect();
        let mut tray = Tray::new(plates, 3);
        assert_eq!(tray.visible().len(), 3);
        assert_eq!(tray.remaining(), 5);

        let taken = tray.take(1).unwrap();
        assert_eq!(taken.slices(), &[kind(1)]);
        assert_eq!(tray.visible().len(), 3);
        assert_eq!(tray.visible()[2].slices(), &[kind(3)]);
        assert!(tray.take(3).is_none());

        while tray.take(0).is_some() {}
        assert!(tray.is_exhausted());
    }

    #[test]
    fn test_board_state_equality_is_structural() {
        let board = Board::new_empty(1, 2);
        let a = BoardState::new(board.clone(), Tray::empty());
        let mut b = BoardState::new(board, Tray::empty());
        assert_eq!(a, b);
        b.record_clear(80);
        assert_ne!(a, b);
        assert_eq!(b.score(), 80);
        assert_eq!(b.cakes(), 1);
    }
}
