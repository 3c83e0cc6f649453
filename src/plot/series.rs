//! Series scaling
//!
//! Maps a `(time, value)` series onto a fixed plot area. Time runs left to
//! right from 0 to the last event; values run bottom to top, so larger values
//! get smaller y coordinates.

use log::debug;
use serde::{Deserialize, Serialize};

use super::scale::{LinearScale, DEFAULT_TICKS};

/// Upper bound on labeled ticks along the time axis
pub const MAX_TIME_TICKS: f64 = 50.0;

/// Time units per axis tick (times are milliseconds, ticks are seconds)
pub const MS_PER_TICK: f64 = 1000.0;

/// One event of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub time: f64,
    pub value: f64,
}

impl Point {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Space around the plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 10.0,
            right: 30.0,
            bottom: 30.0,
            left: 60.0,
        }
    }
}

/// Plot area size plus the margins drawn around it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    /// Plot area width
    pub width: f64,
    /// Plot area height
    pub height: f64,
    pub margins: Margins,
}

impl Default for Canvas {
    /// An 800x400 drawing once the default margins are added
    fn default() -> Self {
        Self {
            width: 710.0,
            height: 360.0,
            margins: Margins::default(),
        }
    }
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margins: Margins::default(),
        }
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn outer_width(&self) -> f64 {
        self.width + self.margins.left + self.margins.right
    }

    pub fn outer_height(&self) -> f64 {
        self.height + self.margins.top + self.margins.bottom
    }
}

/// The fixed value range of a series (e.g. a 0..100 position percentage).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueDomain {
    pub min: f64,
    pub max: f64,
}

impl Default for ValueDomain {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
        }
    }
}

impl ValueDomain {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Number of labeled time ticks for a series ending at `max_time_ms`.
///
/// One per second, capped at `cap`. May be fractional for sub-second series.
pub fn time_tick_count(max_time_ms: f64, cap: f64) -> f64 {
    if !(max_time_ms > 0.0) {
        return 0.0;
    }
    (max_time_ms / MS_PER_TICK).min(cap)
}

/// Axis label for a time tick (`"2.5s"`).
pub fn format_time_tick(time_ms: f64) -> String {
    format!("{}s", time_ms / MS_PER_TICK)
}

/// Scales for plotting one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesScale {
    time: LinearScale,
    value: LinearScale,
    axis: LinearScale,
    max_time: f64,
    tick_count: f64,
}

impl SeriesScale {
    /// Derive scales for `points` on `canvas` with the default tick cap.
    pub fn new(points: &[Point], value_domain: ValueDomain, canvas: &Canvas) -> Self {
        Self::with_tick_cap(points, value_domain, canvas, MAX_TIME_TICKS)
    }

    /// Derive scales with an explicit upper bound on time-axis ticks.
    ///
    /// With no points, or a last event at or before 0, the time scale is
    /// the identity over the plot width.
    pub fn with_tick_cap(
        points: &[Point],
        value_domain: ValueDomain,
        canvas: &Canvas,
        tick_cap: f64,
    ) -> Self {
        let max_time = points
            .iter()
            .map(|point| point.time)
            .fold(f64::NEG_INFINITY, f64::max);

        let (time, max_time, tick_count) = if max_time > 0.0 && max_time.is_finite() {
            (
                LinearScale::new((0.0, max_time), (0.0, canvas.width)),
                max_time,
                time_tick_count(max_time, tick_cap),
            )
        } else {
            (LinearScale::identity(canvas.width), 0.0, 0.0)
        };

        let value = LinearScale::new((value_domain.min, value_domain.max), (canvas.height, 0.0));
        let axis = time.nice(DEFAULT_TICKS);

        debug!(
            "Scaled {} points: time 0..{} -> 0..{}, {} time ticks",
            points.len(),
            max_time,
            canvas.width,
            tick_count
        );

        Self {
            time,
            value,
            axis,
            max_time,
            tick_count,
        }
    }

    /// Horizontal pixel for a time
    pub fn time_to_x(&self, time: f64) -> f64 {
        self.time.map(time)
    }

    /// Vertical pixel for a value
    pub fn value_to_y(&self, value: f64) -> f64 {
        self.value.map(value)
    }

    pub fn project(&self, point: &Point) -> (f64, f64) {
        (self.time_to_x(point.time), self.value_to_y(point.value))
    }

    /// Pixel coordinates of every point, in order.
    pub fn polyline(&self, points: &[Point]) -> Vec<(f64, f64)> {
        points.iter().map(|point| self.project(point)).collect()
    }

    pub fn max_time(&self) -> f64 {
        self.max_time
    }

    pub fn time_scale(&self) -> &LinearScale {
        &self.time
    }

    pub fn value_scale(&self) -> &LinearScale {
        &self.value
    }

    /// Niced time scale, for drawing the time axis only
    pub fn axis_scale(&self) -> &LinearScale {
        &self.axis
    }

    pub fn tick_count(&self) -> f64 {
        self.tick_count
    }

    /// Tick positions along the time axis (domain units)
    pub fn time_ticks(&self) -> Vec<f64> {
        self.axis.ticks(self.tick_count)
    }

    /// Tick positions along the value axis
    pub fn value_ticks(&self) -> Vec<f64> {
        self.value.ticks(DEFAULT_TICKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1000.0, 50.0),
            Point::new(2000.0, 100.0),
        ]
    }

    #[test]
    fn test_reference_mapping() {
        let scale = SeriesScale::new(&ramp(), ValueDomain::default(), &Canvas::new(800.0, 400.0));

        assert_eq!(scale.time_to_x(0.0), 0.0);
        assert_eq!(scale.time_to_x(2000.0), 800.0);
        assert_eq!(scale.value_to_y(0.0), 400.0);
        assert_eq!(scale.value_to_y(100.0), 0.0);
        assert_eq!(scale.value_to_y(50.0), 200.0);
        assert_eq!(
            scale.polyline(&ramp()),
            vec![(0.0, 400.0), (400.0, 200.0), (800.0, 0.0)]
        );
    }

    #[test]
    fn test_tick_count_is_capped() {
        assert_eq!(time_tick_count(120_000.0, MAX_TIME_TICKS), 50.0);
        assert_eq!(time_tick_count(30_000.0, MAX_TIME_TICKS), 30.0);
        assert_eq!(time_tick_count(500.0, MAX_TIME_TICKS), 0.5);
        assert_eq!(time_tick_count(0.0, MAX_TIME_TICKS), 0.0);
    }

    #[test]
    fn test_unsorted_points_use_max_time() {
        let points = vec![Point::new(3000.0, 10.0), Point::new(500.0, 90.0)];
        let scale = SeriesScale::new(&points, ValueDomain::default(), &Canvas::new(600.0, 100.0));
        assert_eq!(scale.max_time(), 3000.0);
        assert_eq!(scale.time_to_x(3000.0), 600.0);
        assert_eq!(scale.tick_count(), 3.0);
    }

    #[test]
    fn test_empty_series_is_identity() {
        let scale = SeriesScale::new(&[], ValueDomain::default(), &Canvas::new(800.0, 400.0));
        assert_eq!(scale.time_to_x(0.0), 0.0);
        assert_eq!(scale.time_to_x(123.0), 123.0);
        assert_eq!(scale.tick_count(), 0.0);
        assert!(scale.time_ticks().is_empty());
    }

    #[test]
    fn test_single_point_at_zero_is_identity() {
        let scale = SeriesScale::new(&[Point::new(0.0, 40.0)], ValueDomain::default(), &Canvas::new(800.0, 400.0));
        assert_eq!(scale.time_to_x(400.0), 400.0);
        assert_eq!(scale.value_to_y(40.0), 240.0);
    }

    #[test]
    fn test_axis_is_niced_but_mapping_is_not() {
        let points = vec![Point::new(0.0, 0.0), Point::new(187_345.0, 100.0)];
        let scale = SeriesScale::new(&points, ValueDomain::default(), &Canvas::default());

        assert_eq!(scale.axis_scale().domain(), (0.0, 200_000.0));
        assert_eq!(scale.time_to_x(187_345.0), 710.0);

        let ticks = scale.time_ticks();
        assert_eq!(ticks.first(), Some(&0.0));
        assert_eq!(ticks.last(), Some(&200_000.0));
        assert!(ticks.len() <= 51);
    }

    #[test]
    fn test_monotonic() {
        let scale = SeriesScale::new(&ramp(), ValueDomain::default(), &Canvas::default());
        let xs: Vec<f64> = (0..=20).map(|i| scale.time_to_x(i as f64 * 100.0)).collect();
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
        let ys: Vec<f64> = (0..=20).map(|i| scale.value_to_y(i as f64 * 5.0)).collect();
        assert!(ys.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_format_time_tick() {
        assert_eq!(format_time_tick(10_000.0), "10s");
        assert_eq!(format_time_tick(2_500.0), "2.5s");
        assert_eq!(format_time_tick(0.0), "0s");
    }
}
