//! Plot Tests
//!
//! Series scaling against funscript timelines.

use approx::assert_relative_eq;

use beatscript::funscript::{Funscript, FunscriptAction};
use beatscript::plot::{svg, time_tick_count, Canvas, Point, SeriesScale, ValueDomain, MAX_TIME_TICKS};

/// Strokes between 10 and 90 every `interval_ms` for `count` actions.
fn stroke_script(count: usize, interval_ms: f64) -> Funscript {
    Funscript::new(
        (0..count)
            .map(|i| FunscriptAction {
                pos: if i % 2 == 0 { 10.0 } else { 90.0 },
                at: i as f64 * interval_ms,
            })
            .collect(),
    )
}

#[test]
fn test_reference_example() {
    let points = vec![
        Point::new(0.0, 0.0),
        Point::new(1000.0, 50.0),
        Point::new(2000.0, 100.0),
    ];
    let scale = SeriesScale::new(&points, ValueDomain::new(0.0, 100.0), &Canvas::new(800.0, 400.0));

    assert_eq!(scale.time_to_x(0.0), 0.0);
    assert_eq!(scale.time_to_x(2000.0), 800.0);
    assert_eq!(scale.value_to_y(0.0), 400.0);
    assert_eq!(scale.value_to_y(100.0), 0.0);
    assert_eq!(scale.value_to_y(50.0), 200.0);
    assert_eq!(scale.tick_count(), 2.0);
}

#[test]
fn test_two_minute_track_caps_ticks() {
    assert_eq!(time_tick_count(120_000.0, MAX_TIME_TICKS), 50.0);

    let script = stroke_script(241, 500.0);
    assert_eq!(script.duration_ms(), 120_000.0);

    let scale = SeriesScale::new(&script.points(), ValueDomain::default(), &Canvas::default());
    assert_eq!(scale.tick_count(), 50.0);
    assert!(scale.time_ticks().len() <= 51);
}

#[test]
fn test_script_endpoints_hit_canvas_edges() {
    let script = stroke_script(37, 333.0);
    let canvas = Canvas::default();
    let scale = SeriesScale::new(&script.points(), ValueDomain::default(), &canvas);

    let line = scale.polyline(&script.points());
    assert_eq!(line.first().map(|p| p.0), Some(0.0));
    assert_eq!(line.last().map(|p| p.0), Some(canvas.width));
    for (x, y) in &line {
        assert!(*x >= 0.0 && *x <= canvas.width);
        assert!(*y >= 0.0 && *y <= canvas.height);
    }
    assert_relative_eq!(line[0].1, canvas.height * 0.9);
    assert_relative_eq!(line[1].1, canvas.height * 0.1);
}

#[test]
fn test_custom_value_domain() {
    let points = vec![Point::new(0.0, -1.0), Point::new(10.0, 1.0)];
    let scale = SeriesScale::new(&points, ValueDomain::new(-1.0, 1.0), &Canvas::new(100.0, 50.0));
    assert_eq!(scale.value_to_y(-1.0), 50.0);
    assert_eq!(scale.value_to_y(1.0), 0.0);
    assert_eq!(scale.value_to_y(0.0), 25.0);
    // sub-second series gets a fractional tick count
    assert_relative_eq!(scale.tick_count(), 0.01);
}

#[test]
fn test_empty_script_renders() {
    let script = Funscript::default();
    let canvas = Canvas::default();
    let scale = SeriesScale::new(&script.points(), ValueDomain::default(), &canvas);

    assert_eq!(scale.time_to_x(42.0), 42.0);
    let document = svg::render(&script.points(), &scale, &canvas);
    assert!(document.contains(r#"d="""#));
}
