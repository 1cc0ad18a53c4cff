//! Charts module - Chart rendering

mod plotter;

pub use plotter::{ChartPlotter, ALERT_COLOR, BAR_COLOR, HIGHLIGHT_COLOR, MUTED_COLOR};
