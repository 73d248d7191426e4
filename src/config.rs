//! Engine configuration, loadable from TOML.
//!
//! ```toml
//! [search]
//! max_depth = 20
//! min_depth = 12
//! time_budget_ms = 5000
//!
//! [eval]
//! threat = 5000
//! ```

use std::path::Path;
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::eval::EvalWeights;
use crate::search::ordering::MAX_KILLER_DEPTH;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search: SearchConfig,
    pub eval: EvalWeights,
}

/// Search limits and feature toggles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Deepest iteration the engine will run
    pub max_depth: i32,
    /// Shallowest iteration bound, applied to the caller's depth hint
    pub min_depth: i32,
    /// Wall-clock budget checked between iterations
    pub time_budget_ms: u64,
    /// Transposition table entry limit
    pub tt_capacity: usize,
    /// Half-width of the aspiration window
    pub aspiration_window: i32,
    /// Stop deepening once |score| reaches this
    pub decisive_threshold: i32,
    /// Opening book is consulted while plies played <= this
    pub opening_ply_limit: usize,
    pub use_pvs: bool,
    pub use_lmr: bool,
    pub use_aspiration: bool,
    pub use_killers: bool,
    pub use_history: bool,
    pub use_opening_book: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 20,
            min_depth: 12,
            time_budget_ms: 5_000,
            tt_capacity: 1_000_000,
            aspiration_window: 50,
            decisive_threshold: 50_000,
            opening_ply_limit: 15,
            use_pvs: true,
            use_lmr: true,
            use_aspiration: true,
            use_killers: true,
            use_history: true,
            use_opening_book: true,
        }
    }
}

impl SearchConfig {
    #[inline]
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    /// Iteration bound for a caller's depth hint. `max_depth` wins when the
    /// bounds cross, so an unvalidated config never panics here.
    #[inline]
    pub fn bounded_depth(&self, depth_hint: i32) -> i32 {
        depth_hint.max(self.min_depth).min(self.max_depth)
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.search;
        if s.min_depth < 1 {
            return Err(ConfigError::Validation("search.min_depth must be >= 1".into()));
        }
        if s.max_depth < 1 {
            return Err(ConfigError::Validation("search.max_depth must be >= 1".into()));
        }
        if s.min_depth > s.max_depth {
            return Err(ConfigError::Validation(
                "search.min_depth must be <= search.max_depth".into(),
            ));
        }
        if s.max_depth as usize >= MAX_KILLER_DEPTH {
            return Err(ConfigError::Validation(format!(
                "search.max_depth must be < {MAX_KILLER_DEPTH}"
            )));
        }
        if s.tt_capacity == 0 {
            return Err(ConfigError::Validation("search.tt_capacity must be > 0".into()));
        }
        if s.time_budget_ms == 0 {
            return Err(ConfigError::Validation(
                "search.time_budget_ms must be > 0".into(),
            ));
        }
        if s.aspiration_window <= 0 {
            return Err(ConfigError::Validation(
                "search.aspiration_window must be > 0".into(),
            ));
        }
        if s.decisive_threshold <= 0 {
            return Err(ConfigError::Validation(
                "search.decisive_threshold must be > 0".into(),
            ));
        }
        if self.eval.vertical_defense_percent < 0 {
            return Err(ConfigError::Validation(
                "eval.vertical_defense_percent must be >= 0".into(),
            ));
        }
        Ok(())
    }

    /// Generate a default TOML configuration string.
    pub fn default_toml() -> String {
        // Serializing plain structs of scalars cannot fail
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}
