//! Audio Analysis Module
//!
//! Data model for a track's audio analysis and the organizer that nests
//! its flat markers:
//! - Timed intervals and the containment test
//! - Sections, segments, and the track/meta summaries
//! - Section → bar → beat trees

pub mod interval;
pub mod model;
pub mod organize;

pub use interval::{contains, Bar, Beat, Interval, Tatum, Timed};
pub use model::{AudioAnalysis, AudioFeatures, Meta, Section, Segment, TrackSummary};
pub use organize::{
    organize, IntervalOrganizer, JoinStrategy, NestedBar, NestedSection, StructuredAudioAnalysis,
};
