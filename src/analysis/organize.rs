//! Interval organizer
//!
//! Turns the flat `sections`, `bars` and `beats` lists of an analysis into a
//! tree: every section holds the bars it contains, every bar the beats it
//! contains. Children keep their input order. Malformed input (unsorted,
//! overlapping, empty, zero-length, NaN) only ever yields fewer children.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::interval::{contains, Bar, Beat, Interval, Tatum, Timed};
use super::model::{AudioAnalysis, Meta, Section, Segment, TrackSummary};

/// How parents find their children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinStrategy {
    /// Full filter pass over the children for every parent
    Linear,
    /// Binary search on child start times; falls back to `Linear` with a
    /// warning when the children are not sorted
    Indexed,
    /// `Indexed` when the children allow it, otherwise `Linear`
    #[default]
    Auto,
}

/// A bar together with the beats it contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedBar {
    #[serde(flatten)]
    pub bar: Bar,
    pub beats: Vec<Beat>,
}

impl Timed for NestedBar {
    fn start(&self) -> f64 {
        self.bar.start
    }

    fn duration(&self) -> f64 {
        self.bar.duration
    }
}

/// A section together with the bars it contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedSection {
    #[serde(flatten)]
    pub section: Section,
    pub bars: Vec<NestedBar>,
}

impl NestedSection {
    /// Number of beats across all bars of this section
    pub fn beat_count(&self) -> usize {
        self.bars.iter().map(|bar| bar.beats.len()).sum()
    }
}

impl Timed for NestedSection {
    fn start(&self) -> f64 {
        self.section.start
    }

    fn duration(&self) -> f64 {
        self.section.duration
    }
}

/// An analysis whose sections carry their bars and beats.
///
/// Serializes to the same document as `AudioAnalysis` plus the nested
/// `sections[i].bars` and `sections[i].bars[j].beats` arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredAudioAnalysis {
    pub meta: Meta,
    pub track: TrackSummary,
    pub bars: Vec<Bar>,
    pub beats: Vec<Beat>,
    pub sections: Vec<NestedSection>,
    pub segments: Vec<Segment>,
    pub tatums: Vec<Tatum>,
}

impl StructuredAudioAnalysis {
    /// First section containing the instant `time`
    pub fn section_at(&self, time: f64) -> Option<&NestedSection> {
        let instant = Interval::new(time, 0.0, 0.0);
        self.sections
            .iter()
            .find(|section| contains(*section, &instant))
    }

    /// Bars that no section contains. A bar placed in several overlapping
    /// sections counts once.
    pub fn unplaced_bar_count(&self) -> usize {
        self.bars
            .iter()
            .filter(|bar| !self.sections.iter().any(|nested| contains(&nested.section, *bar)))
            .count()
    }
}

/// Builds section/bar/beat trees.
///
/// Stateless apart from the join strategy; safe to share between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalOrganizer {
    strategy: JoinStrategy,
}

impl IntervalOrganizer {
    pub fn new(strategy: JoinStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> JoinStrategy {
        self.strategy
    }

    /// Nest the analysis' bars and beats under its sections.
    ///
    /// Every other field is copied through unchanged.
    pub fn organize(&self, analysis: &AudioAnalysis) -> StructuredAudioAnalysis {
        StructuredAudioAnalysis {
            meta: analysis.meta.clone(),
            track: analysis.track.clone(),
            bars: analysis.bars.clone(),
            beats: analysis.beats.clone(),
            sections: self.organize_sections(&analysis.sections, &analysis.bars, &analysis.beats),
            segments: analysis.segments.clone(),
            tatums: analysis.tatums.clone(),
        }
    }

    /// Nest `bars` under `sections` and `beats` under each placed bar.
    pub fn organize_sections(
        &self,
        sections: &[Section],
        bars: &[Bar],
        beats: &[Beat],
    ) -> Vec<NestedSection> {
        let bar_join = Join::plan(bars, self.strategy, "bars");
        let beat_join = Join::plan(beats, self.strategy, "beats");

        let mut bar_placed = vec![false; bars.len()];

        let nested: Vec<NestedSection> = sections
            .iter()
            .map(|section| {
                let children = bar_join
                    .contained_in(section)
                    .into_iter()
                    .map(|index| {
                        bar_placed[index] = true;
                        let bar = bars[index];
                        NestedBar {
                            bar,
                            beats: beat_join
                                .contained_in(&bar)
                                .into_iter()
                                .map(|beat| beats[beat])
                                .collect(),
                        }
                    })
                    .collect();

                NestedSection {
                    section: section.clone(),
                    bars: children,
                }
            })
            .collect();

        let unplaced = bar_placed.iter().filter(|placed| !**placed).count();
        debug!(
            "Organized {} sections, {} bars ({} outside every section), {} beats",
            nested.len(),
            bars.len(),
            unplaced,
            beats.len()
        );

        nested
    }
}

/// Nest the analysis with the default strategy.
pub fn organize(analysis: &AudioAnalysis) -> StructuredAudioAnalysis {
    IntervalOrganizer::default().organize(analysis)
}

/// A planned containment join over one child list.
enum Join<'a, C> {
    Linear(&'a [C]),
    Indexed(&'a [C]),
}

impl<'a, C: Timed> Join<'a, C> {
    fn plan(children: &'a [C], strategy: JoinStrategy, label: &str) -> Self {
        match strategy {
            JoinStrategy::Linear => Join::Linear(children),
            JoinStrategy::Indexed | JoinStrategy::Auto => {
                if indexable(children) {
                    Join::Indexed(children)
                } else {
                    if strategy == JoinStrategy::Indexed {
                        warn!("{} are not sorted by start, using a linear join", label);
                    } else {
                        debug!("{} are not sorted by start, using a linear join", label);
                    }
                    Join::Linear(children)
                }
            }
        }
    }

    /// Indices of the children inside `parent`, in input order.
    fn contained_in<P: Timed>(&self, parent: &P) -> Vec<usize> {
        match self {
            Join::Linear(children) => children
                .iter()
                .enumerate()
                .filter(|(_, child)| contains(parent, *child))
                .map(|(index, _)| index)
                .collect(),
            Join::Indexed(children) => {
                // A contained child starts in [parent.start, parent.end].
                let lo = children.partition_point(|child| child.start() < parent.start());
                let hi = children.partition_point(|child| child.start() <= parent.end());
                if hi <= lo {
                    return Vec::new();
                }
                (lo..hi)
                    .filter(|&index| contains(parent, &children[index]))
                    .collect()
            }
        }
    }
}

/// Sorted by start with no NaN starts and no negative or NaN durations.
fn indexable<C: Timed>(children: &[C]) -> bool {
    children
        .iter()
        .all(|child| !child.start().is_nan() && child.duration() >= 0.0)
        && children
            .windows(2)
            .all(|pair| pair[0].start() <= pair[1].start())
}
