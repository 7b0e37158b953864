//! Solver configuration loaded from TOML.
//!
//! Every section is optional; missing values fall back to the defaults used by
//! `Solver::default()`.
//!
//! # Examples
//!
//! ```
//! use cake_sort_solver::config::SolverConfig;
//! use cake_sort_solver::solver::Strategy;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     strategy = "ucs"
//!
//!     [limits]
//!     node_limit = 50000
//!
//!     [costs]
//!     move_plate = 3
//! "#).unwrap();
//!
//! assert_eq!(config.strategy, Strategy::Ucs);
//! assert_eq!(config.limits.node_limit, Some(50000));
//! assert_eq!(config.costs.move_plate, 3);
//! assert_eq!(config.costs.place_slice, 1);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::PLATE_CAPACITY;
use crate::error::{Error, Result};
use crate::heuristics::HeuristicKind;
use crate::rules::{MoveCosts, Rules};
use crate::scoring::Scoring;
use crate::solver::{SearchLimits, Solver, Strategy};

/// Heuristic used by Greedy and A*.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct HeuristicConfig {
    pub kind: HeuristicKind,
    /// Multiplier applied to the heuristic in A*. 1.0 is plain A*.
    pub weight: f64,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        HeuristicConfig {
            kind: HeuristicKind::default(),
            weight: 1.0,
        }
    }
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SolverConfig {
    /// Strategy used when none is given on the command line.
    pub strategy: Strategy,
    pub limits: SearchLimits,
    pub scoring: Scoring,
    pub costs: MoveCosts,
    pub heuristic: HeuristicConfig,
}

impl SolverConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, contains invalid TOML or holds
    /// out-of-range values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(event = "config_load", path = %path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: SolverConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let weight = self.heuristic.weight;
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "heuristic weight must be a non-negative number, got {}",
                weight
            )));
        }
        if self
            .scoring
            .per_slice_value
            .checked_mul(PLATE_CAPACITY as u32)
            .is_none()
        {
            return Err(Error::InvalidConfig(format!(
                "per_slice_value {} overflows the score of a cake",
                self.scoring.per_slice_value
            )));
        }
        if self.limits.node_limit == Some(0) {
            return Err(Error::InvalidConfig(
                "node_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The rules this configuration plays by.
    pub fn rules(&self) -> Rules {
        Rules::new(self.scoring, self.costs)
    }

    /// Builds a solver with these rules, limits and heuristic.
    pub fn solver(&self) -> Solver {
        Solver::new(self.rules())
            .with_limits(self.limits)
            .with_heuristic(self.heuristic.kind, self.heuristic.weight)
    }
}
