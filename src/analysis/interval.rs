//! Timed intervals and the containment test
//!
//! Bars, beats and tatums all share the plain `Interval` shape. Sections and
//! segments carry extra musical attributes but are timed the same way, so the
//! organizer works against the `Timed` trait rather than concrete types.

use serde::{Deserialize, Serialize};

/// Anything positioned on the track timeline, in seconds.
pub trait Timed {
    /// Offset from the start of the track
    fn start(&self) -> f64;

    /// Length of the interval
    fn duration(&self) -> f64;

    /// End offset (`start + duration`)
    fn end(&self) -> f64 {
        self.start() + self.duration()
    }
}

/// A start/duration/confidence triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Offset from track start, in seconds
    pub start: f64,
    /// Length in seconds
    pub duration: f64,
    /// Analyzer confidence, 0..1
    #[serde(default)]
    pub confidence: f64,
}

impl Interval {
    pub fn new(start: f64, duration: f64, confidence: f64) -> Self {
        Self {
            start,
            duration,
            confidence,
        }
    }
}

impl Timed for Interval {
    fn start(&self) -> f64 {
        self.start
    }

    fn duration(&self) -> f64 {
        self.duration
    }
}

/// A bar (measure): a run of beats whose start marks a downbeat.
pub type Bar = Interval;

/// A beat, the basic time unit of a piece.
pub type Beat = Interval;

/// The lowest regular pulse a listener infers from the music.
pub type Tatum = Interval;

/// Returns true if `inner` lies within `outer`, boundaries included.
///
/// NaN positions never match.
pub fn contains<O, I>(outer: &O, inner: &I) -> bool
where
    O: Timed + ?Sized,
    I: Timed + ?Sized,
{
    inner.start() >= outer.start() && inner.end() <= outer.end()
}
