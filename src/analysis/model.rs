//! Audio analysis payload
//!
//! Mirrors the JSON document the streaming service returns for a track's
//! audio analysis. Field names follow the wire format so payloads round-trip.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::interval::{Bar, Beat, Tatum, Timed};
use crate::error::{BeatscriptError, Result};

/// Key was not detected
pub const KEY_UNKNOWN: i8 = -1;

/// Mode was not detected
pub const MODE_UNKNOWN: i8 = -1;

fn unknown() -> i8 {
    -1
}

/// A large-scale part of a track (verse, chorus, bridge, solo...).
///
/// Each section carries its own tempo, key, mode, time signature and loudness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub start: f64,
    pub duration: f64,
    #[serde(default)]
    pub confidence: f64,
    /// Average loudness in dB
    #[serde(default)]
    pub loudness: f64,
    /// Beats per minute
    #[serde(default)]
    pub tempo: f64,
    #[serde(default)]
    pub tempo_confidence: f64,
    /// Pitch class 0..11 (C, C#, ... B), -1 if undetected
    #[serde(default = "unknown")]
    pub key: i8,
    #[serde(default)]
    pub key_confidence: f64,
    /// 1 = major, 0 = minor, -1 if undetected
    #[serde(default = "unknown")]
    pub mode: i8,
    #[serde(default)]
    pub mode_confidence: f64,
    #[serde(default)]
    pub time_signature: i32,
    #[serde(default)]
    pub time_signature_confidence: f64,
}

impl Timed for Section {
    fn start(&self) -> f64 {
        self.start
    }

    fn duration(&self) -> f64 {
        self.duration
    }
}

/// A short sound entity, roughly uniform in timbre and harmony.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub duration: f64,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub loudness_start: f64,
    #[serde(default)]
    pub loudness_max_time: f64,
    /// Peak loudness within the segment
    #[serde(default)]
    pub loudness_max: f64,
    #[serde(default)]
    pub loudness_end: f64,
    /// Chroma vector over the 12 pitch classes, normalized to the strongest
    #[serde(default)]
    pub pitches: [f64; 12],
    /// Timbre coefficients, roughly centered on 0
    #[serde(default)]
    pub timbre: [f64; 12],
}

impl Timed for Segment {
    fn start(&self) -> f64 {
        self.start
    }

    fn duration(&self) -> f64 {
        self.duration
    }
}

/// Analyzer bookkeeping. Passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub analyzer_version: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub detailed_status: String,
    #[serde(default)]
    pub status_code: i64,
    /// Seconds since epoch
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub analysis_time: f64,
    #[serde(default)]
    pub input_process: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Track-level summary. Passed through untouched.
///
/// Only the fields callers commonly read are typed; fingerprint strings
/// (codestring, echoprintstring, ...) stay in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    /// Track length in seconds
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub end_of_fade_in: f64,
    #[serde(default)]
    pub start_of_fade_out: f64,
    #[serde(default)]
    pub loudness: f64,
    #[serde(default)]
    pub tempo: f64,
    #[serde(default)]
    pub tempo_confidence: f64,
    #[serde(default)]
    pub time_signature: i32,
    #[serde(default)]
    pub time_signature_confidence: f64,
    #[serde(default = "unknown")]
    pub key: i8,
    #[serde(default)]
    pub key_confidence: f64,
    #[serde(default = "unknown")]
    pub mode: i8,
    #[serde(default)]
    pub mode_confidence: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The flat audio analysis of one track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioAnalysis {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub track: TrackSummary,
    #[serde(default)]
    pub bars: Vec<Bar>,
    #[serde(default)]
    pub beats: Vec<Beat>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub tatums: Vec<Tatum>,
}

impl AudioAnalysis {
    /// Parse an analysis payload
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| BeatscriptError::InvalidAnalysis {
            reason: e.to_string(),
        })
    }

    /// Load an analysis payload from a JSON file
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
}

/// Track-level audio features (danceability, energy, ...).
///
/// Fetched separately from the analysis and only displayed, never organized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub danceability: f64,
    #[serde(default)]
    pub acousticness: f64,
    #[serde(default)]
    pub energy: f64,
    #[serde(default)]
    pub liveness: f64,
    #[serde(default)]
    pub instrumentalness: f64,
    #[serde(default)]
    pub speechiness: f64,
    #[serde(default)]
    pub valence: f64,
    #[serde(default)]
    pub loudness: f64,
    #[serde(default)]
    pub tempo: f64,
    #[serde(default = "unknown")]
    pub key: i8,
    #[serde(default = "unknown")]
    pub mode: i8,
    #[serde(default)]
    pub time_signature: i32,
    #[serde(default)]
    pub duration_ms: u64,
}

impl AudioFeatures {
    /// Parse a features payload
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| BeatscriptError::InvalidAnalysis {
            reason: format!("features: {}", e),
        })
    }
}
