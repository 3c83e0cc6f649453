//! Funscript timelines
//!
//! A funscript is a list of timed position commands for a haptic device:
//! be at `pos` percent (0..100) at `at` milliseconds.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BeatscriptError, Result};
use crate::plot::Point;

pub const FUNSCRIPT_VERSION: &str = "1.0";

/// Default stroke range
pub const DEFAULT_RANGE: f64 = 90.0;

/// Position range of an action
pub const MIN_POS: f64 = 0.0;
pub const MAX_POS: f64 = 100.0;

/// One timed position command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FunscriptAction {
    /// Position in percent (0..100)
    pub pos: f64,
    /// Time to be at `pos`, in milliseconds
    pub at: f64,
}

/// A haptic timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Funscript {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub inverted: bool,
    /// Players may override this
    #[serde(default = "default_range")]
    pub range: f64,
    pub actions: Vec<FunscriptAction>,
}

fn default_version() -> String {
    FUNSCRIPT_VERSION.to_string()
}

fn default_range() -> f64 {
    DEFAULT_RANGE
}

impl Default for Funscript {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Funscript {
    pub fn new(actions: Vec<FunscriptAction>) -> Self {
        Self {
            version: default_version(),
            inverted: false,
            range: DEFAULT_RANGE,
            actions,
        }
    }

    /// Parse and validate a funscript document.
    pub fn from_json(json: &str) -> Result<Self> {
        let script: Self =
            serde_json::from_str(json).map_err(|e| BeatscriptError::InvalidFunscript {
                reason: e.to_string(),
            })?;
        script.validate()?;
        Ok(script)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a funscript from disk.
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

        Self::from_json(&content)
    }

    /// Reject negative or non-finite times and positions outside 0..100.
    pub fn validate(&self) -> Result<()> {
        for (i, action) in self.actions.iter().enumerate() {
            if !action.at.is_finite() || action.at < 0.0 {
                return Err(BeatscriptError::InvalidFunscript {
                    reason: format!("action {} has invalid time {}", i, action.at),
                });
            }
            if !(MIN_POS..=MAX_POS).contains(&action.pos) {
                return Err(BeatscriptError::InvalidFunscript {
                    reason: format!("action {} has position {} outside 0..100", i, action.pos),
                });
            }
        }
        Ok(())
    }

    /// Time of the last action, in milliseconds
    pub fn duration_ms(&self) -> f64 {
        self.actions.iter().map(|a| a.at).fold(0.0, f64::max)
    }

    /// The actions as plot points (`time = at`, `value = pos`).
    ///
    /// Inverted scripts are flipped so the plot shows what the device does.
    pub fn points(&self) -> Vec<Point> {
        self.actions
            .iter()
            .map(|action| {
                let value = if self.inverted {
                    MAX_POS - action.pos
                } else {
                    action.pos
                };
                Point::new(action.at, value)
            })
            .collect()
    }
}
