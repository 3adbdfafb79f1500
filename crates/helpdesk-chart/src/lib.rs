//! helpdesk-chart
//!
//! Renderer-independent chart geometry. `bar` lays out vertical bars against
//! a headroom-padded maximum; `line` normalizes an (x, y) series into pixel
//! space and emits line/area path strings; `memo` caches line geometry
//! until the series or container size changes.

pub mod bar;
pub mod line;
pub mod memo;

pub use bar::{compute_bar_geometry, effective_max, Bar, BarDatum, BarOptions};
pub use line::{compute_line_geometry, headline, LineGeometry, LineOptions, PixelPoint, Point, XValue};
pub use memo::LineChart;
