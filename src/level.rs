//! Level definitions and the initial `BoardState` they produce.
//!
//! A level is either read from a TOML file or generated from a seed:
//!
//! ```toml
//! name = "warm up"
//! rows = 2
//! cols = 3
//! palette = ["vanilla", "chocolate"]
//! layout = [
//!     "[000000] 0 .",
//!     ".        0 [1]",
//! ]
//! tray = ["[1]", "[11]"]
//! tray_window = 3
//! goal = { cakes_at_least = 1 }
//! ```

use std::path::Path;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::{
    Board, BoardState, Cell, Plate, SliceKind, Tray, MAX_BOARD_DIM, MAX_SLICE_KINDS,
};
use crate::error::{Error, Result};
use crate::goal::Goal;
use crate::utils::{board_from_str_array, plate_from_str};

/// Plates visible in the tray at once unless a level says otherwise.
pub const DEFAULT_TRAY_WINDOW: usize = 3;

/// Plates dealt to the tray of a generated level.
pub const GENERATED_TRAY_PLATES: usize = 18;

/// Highest level of the generated ladder; higher levels reuse its settings.
pub const MAX_GENERATED_LEVEL: u32 = 5;

const FLAVOURS: [&str; MAX_SLICE_KINDS as usize] = [
    "vanilla",
    "chocolate",
    "strawberry",
    "lemon",
    "mint",
    "blueberry",
    "caramel",
    "pistachio",
    "raspberry",
    "coffee",
];

fn default_palette() -> Vec<String> {
    FLAVOURS.iter().map(|s| s.to_string()).collect()
}

fn default_tray_window() -> usize {
    DEFAULT_TRAY_WINDOW
}

/// Static description of a level. Read-only to the search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LevelConfig {
    #[serde(default)]
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    /// Flavour names; slice kind `n` is `palette[n]`.
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
    /// Initial board rows in the `board_from_str_array` format. Empty means an
    /// empty board.
    #[serde(default)]
    pub layout: Vec<String>,
    /// Incoming plates in arrival order, e.g. `"[0012]"`.
    #[serde(default)]
    pub tray: Vec<String>,
    #[serde(default = "default_tray_window")]
    pub tray_window: usize,
    #[serde(default)]
    pub goal: Goal,
}

impl LevelConfig {
    /// Loads a level from a TOML file and validates it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses a level from TOML and validates it.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: LevelConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds one of the standard generated levels.
    ///
    /// Level 1 is a 4x4 board with 5 flavours and a target of 3 cakes, growing
    /// to a 6x6 board with 9 flavours and 15 cakes at level 5. The board starts
    /// empty and the tray holds 18 plates of 1 to `min(5, level + 2)` slices.
    /// The same `level` and `seed` always give the same level.
    ///
    /// # Errors
    /// `Error::InvalidLevelConfig` for level 0.
    ///
    /// # Examples
    /// ```
    /// use cake_sort_solver::level::LevelConfig;
    ///
    /// let a = LevelConfig::generated(2, 7).unwrap();
    /// let b = LevelConfig::generated(2, 7).unwrap();
    /// assert_eq!(a, b);
    /// assert_eq!((a.rows, a.cols), (4, 5));
    /// assert_eq!(a.tray.len(), 18);
    /// ```
    pub fn generated(level: u32, seed: u64) -> Result<Self> {
        if level == 0 {
            return Err(Error::InvalidLevelConfig(
                "generated levels start at 1".to_string(),
            ));
        }
        let ladder = level.min(MAX_GENERATED_LEVEL);
        let (rows, cols) = match ladder {
            1 => (4, 4),
            2 => (4, 5),
            3 => (5, 5),
            4 => (5, 6),
            _ => (6, 6),
        };
        let cakes = match ladder {
            1 => 3,
            2 => 5,
            3 => 7,
            4 => 10,
            _ => 15,
        };
        let kinds: u8 = match ladder {
            1 | 2 => 5,
            3 | 4 => 7,
            _ => 9,
        };
        let max_slices = (ladder as usize + 2).min(5);

        let mut rng = SmallRng::seed_from_u64(seed);
        let tray = (0..GENERATED_TRAY_PLATES)
            .map(|_| {
                let n = rng.gen_range(1..=max_slices);
                (0..n)
                    .map(|_| char::from(b'0' + rng.gen_range(0..kinds)))
                    .collect::<String>()
            })
            .map(|digits| format!("[{}]", digits))
            .collect();

        Ok(LevelConfig {
            name: format!("level {} (seed {})", level, seed),
            rows,
            cols,
            palette: FLAVOURS[..kinds as usize]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            layout: Vec::new(),
            tray,
            tray_window: DEFAULT_TRAY_WINDOW,
            goal: Goal::CakesAtLeast(cakes),
        })
    }

    /// Checks the level and builds its board and tray.
    fn build(&self) -> Result<(Board, Vec<Plate>)> {
        if !(1..=MAX_BOARD_DIM).contains(&self.rows) || !(1..=MAX_BOARD_DIM).contains(&self.cols)
        {
            return Err(Error::InvalidLevelConfig(format!(
                "board is {}x{}, each side must be 1 to {}",
                self.rows, self.cols, MAX_BOARD_DIM
            )));
        }
        if self.palette.is_empty() || self.palette.len() > MAX_SLICE_KINDS as usize {
            return Err(Error::InvalidLevelConfig(format!(
                "palette has {} flavours, expected 1 to {}",
                self.palette.len(),
                MAX_SLICE_KINDS
            )));
        }

        let board = if self.layout.is_empty() {
            Board::new_empty(self.rows, self.cols)
        } else {
            let rows: Vec<&str> = self.layout.iter().map(String::as_str).collect();
            let board = board_from_str_array(&rows)?;
            if (board.rows(), board.cols()) != (self.rows, self.cols) {
                return Err(Error::InvalidLevelConfig(format!(
                    "layout is {}x{} but the level declares {}x{}",
                    board.rows(),
                    board.cols(),
                    self.rows,
                    self.cols
                )));
            }
            board
        };

        for (pos, cell) in board.cells() {
            match cell {
                Cell::Empty => {}
                Cell::Slice(kind) => self.check_kind(*kind)?,
                Cell::Plate(plate) => {
                    if plate.is_complete() {
                        return Err(Error::InvalidLevelConfig(format!(
                            "plate {} at {} is already a complete cake",
                            plate, pos
                        )));
                    }
                    for &kind in plate.slices() {
                        self.check_kind(kind)?;
                    }
                }
            }
        }

        let mut plates = Vec::with_capacity(self.tray.len());
        for (i, token) in self.tray.iter().enumerate() {
            let plate = plate_from_str(token)?;
            if plate.is_empty() {
                return Err(Error::InvalidLevelConfig(format!(
                    "tray plate {} is empty",
                    i
                )));
            }
            if plate.is_complete() {
                return Err(Error::InvalidLevelConfig(format!(
                    "tray plate {} is already a complete cake",
                    i
                )));
            }
            for &kind in plate.slices() {
                self.check_kind(kind)?;
            }
            plates.push(plate);
        }
        if !plates.is_empty() && self.tray_window == 0 {
            return Err(Error::InvalidLevelConfig(
                "tray_window must be at least 1 when the tray has plates".to_string(),
            ));
        }

        Ok((board, plates))
    }

    fn check_kind(&self, kind: SliceKind) -> Result<()> {
        if (kind.id() as usize) < self.palette.len() {
            Ok(())
        } else {
            Err(Error::InvalidLevelConfig(format!(
                "slice kind {} is not in the palette of {} flavours",
                kind,
                self.palette.len()
            )))
        }
    }

    /// Validates the level without keeping the board.
    pub fn validate(&self) -> Result<()> {
        self.build().map(|_| ())
    }

    /// The flavour name of `kind`, if the palette has one.
    pub fn flavour(&self, kind: SliceKind) -> Option<&str> {
        self.palette.get(kind.id() as usize).map(String::as_str)
    }
}

/// Builds the initial state of a level: its board, a full tray, zero score.
///
/// # Errors
/// `Error::InvalidLevelConfig` before any state is created if the dimensions,
/// palette, layout or tray are malformed, or a plate starts out complete.
pub fn initialize_board(level: &LevelConfig) -> Result<BoardState> {
    let (board, plates) = level.build()?;
    info!(
        event = "level_loaded",
        name = %level.name,
        rows = level.rows,
        cols = level.cols,
        tray = plates.len(),
        goal = %level.goal,
    );
    Ok(BoardState::new(board, Tray::new(plates, level.tray_window)))
}
