//! Configuration
//!
//! Plot geometry, organizer strategy and cache location. Loaded from an
//! optional JSON file; every field has a default and a couple can be
//! overridden from the environment.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::{IntervalOrganizer, JoinStrategy};
use crate::error::{BeatscriptError, Result};
use crate::plot::{Canvas, ValueDomain, MAX_TIME_TICKS};

/// Overrides `cache_dir`
pub const ENV_CACHE_DIR: &str = "BEATSCRIPT_CACHE_DIR";

/// Overrides `max_time_ticks`
pub const ENV_MAX_TICKS: &str = "BEATSCRIPT_MAX_TICKS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub canvas: Canvas,
    pub value_domain: ValueDomain,
    pub max_time_ticks: f64,
    pub strategy: JoinStrategy,
    /// Directory for the on-disk analysis cache; in-memory when unset
    pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            value_domain: ValueDomain::default(),
            max_time_ticks: MAX_TIME_TICKS,
            strategy: JoinStrategy::default(),
            cache_dir: None,
        }
    }
}

impl Config {
    /// Load a config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BeatscriptError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| BeatscriptError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config =
            serde_json::from_str(&content).map_err(|e| BeatscriptError::InvalidConfig {
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise defaults, then apply the environment.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        let config = config.with_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply `BEATSCRIPT_*` environment overrides.
    ///
    /// Unparseable values are ignored.
    pub fn with_env(mut self) -> Self {
        if let Ok(dir) = env::var(ENV_CACHE_DIR) {
            if !dir.is_empty() {
                debug!("{} overrides cache dir: {}", ENV_CACHE_DIR, dir);
                self.cache_dir = Some(PathBuf::from(dir));
            }
        }
        if let Some(ticks) = env::var(ENV_MAX_TICKS).ok().and_then(|s| s.parse().ok()) {
            debug!("{} overrides max ticks: {}", ENV_MAX_TICKS, ticks);
            self.max_time_ticks = ticks;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let canvas = &self.canvas;
        if !(canvas.width > 0.0 && canvas.height > 0.0) {
            return Err(BeatscriptError::InvalidConfig {
                reason: format!(
                    "plot area must be positive, got {}x{}",
                    canvas.width, canvas.height
                ),
            });
        }
        let margins = &canvas.margins;
        if [margins.top, margins.right, margins.bottom, margins.left]
            .iter()
            .any(|m| !(*m >= 0.0))
        {
            return Err(BeatscriptError::InvalidConfig {
                reason: "margins must not be negative".to_string(),
            });
        }
        if !(self.value_domain.min < self.value_domain.max) {
            return Err(BeatscriptError::InvalidConfig {
                reason: format!(
                    "value domain {}..{} is empty",
                    self.value_domain.min, self.value_domain.max
                ),
            });
        }
        if !(self.max_time_ticks >= 0.0) {
            return Err(BeatscriptError::InvalidConfig {
                reason: format!("max_time_ticks must not be negative, got {}", self.max_time_ticks),
            });
        }
        Ok(())
    }

    pub fn organizer(&self) -> IntervalOrganizer {
        IntervalOrganizer::new(self.strategy)
    }
}
