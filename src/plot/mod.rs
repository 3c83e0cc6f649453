//! Plot Module
//!
//! Domain-to-pixel scaling for event series and a small SVG renderer.

pub mod scale;
pub mod series;
pub mod svg;

pub use scale::LinearScale;
pub use series::{
    format_time_tick, time_tick_count, Canvas, Margins, Point, SeriesScale, ValueDomain,
    MAX_TIME_TICKS,
};
