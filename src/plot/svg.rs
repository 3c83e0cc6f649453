//! SVG rendering of a scaled series
//!
//! Produces a standalone document: the series as a single path, a bottom
//! time axis labeled in seconds, and a left value axis.

use std::fmt::Write;

use super::series::{format_time_tick, Canvas, Point, SeriesScale};

const STROKE: &str = "steelblue";
const STROKE_WIDTH: f64 = 1.5;
const TICK_SIZE: f64 = 6.0;

/// Path data (`M x,y L x,y ...`) for the series.
///
/// Empty when there are no points.
pub fn path_data(points: &[Point], scale: &SeriesScale) -> String {
    let mut d = String::new();
    for (i, (x, y)) in scale.polyline(points).into_iter().enumerate() {
        let command = if i == 0 { 'M' } else { 'L' };
        // Writing into a String cannot fail
        let _ = write!(d, "{}{},{}", command, round2(x), round2(y));
    }
    d
}

/// Full SVG document for the series.
pub fn render(points: &[Point], scale: &SeriesScale, canvas: &Canvas) -> String {
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
        canvas.outer_width(),
        canvas.outer_height()
    );
    let _ = writeln!(
        svg,
        r#"<g transform="translate({},{})">"#,
        canvas.margins.left, canvas.margins.top
    );

    // time axis
    let _ = writeln!(
        svg,
        r#"<g class="axis time" transform="translate(0,{})">"#,
        canvas.height
    );
    let axis = scale.axis_scale();
    for tick in scale.time_ticks() {
        let x = round2(axis.map(tick));
        let _ = writeln!(
            svg,
            r#"<line x1="{x}" x2="{x}" y1="0" y2="{TICK_SIZE}" stroke="currentColor"/><text x="{x}" y="{}" text-anchor="middle">{}</text>"#,
            TICK_SIZE * 3.0,
            format_time_tick(tick)
        );
    }
    svg.push_str("</g>\n");

    // value axis
    svg.push_str("<g class=\"axis value\">\n");
    for tick in scale.value_ticks() {
        let y = round2(scale.value_to_y(tick));
        let _ = writeln!(
            svg,
            r#"<line x1="-{TICK_SIZE}" x2="0" y1="{y}" y2="{y}" stroke="currentColor"/><text x="-{}" y="{y}" text-anchor="end">{}</text>"#,
            TICK_SIZE * 1.5,
            tick
        );
    }
    svg.push_str("</g>\n");

    let _ = writeln!(
        svg,
        r#"<path fill="none" stroke="{STROKE}" stroke-width="{STROKE_WIDTH}" d="{}"/>"#,
        path_data(points, scale)
    );
    svg.push_str("</g>\n</svg>\n");
    svg
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
