//! Beatscript - Track Structure and Haptic Timeline Plotting
//!
//! Beatscript works on the pre-computed audio analysis a streaming service
//! publishes for a track:
//! 1. Organizing - flat section/bar/beat markers become a containment tree
//! 2. Plotting - a timed series (a funscript) is scaled onto a pixel canvas
//!
//! # Architecture
//!
//! The organizer and the scales are pure functions over immutable data.
//! Caching and fetching of payloads sit outside them, behind the
//! `AnalysisCache` and `AnalysisSource` traits.

pub mod analysis;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod funscript;
pub mod plot;

pub use analysis::{organize, AudioAnalysis, IntervalOrganizer, StructuredAudioAnalysis};
pub use error::{BeatscriptError, Result};
pub use plot::{Point, SeriesScale};
