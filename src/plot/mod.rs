//! Chart exports.

pub mod chart;

pub use chart::{ChartKind, render_top_chart, y_bounds};
