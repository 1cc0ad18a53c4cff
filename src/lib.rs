//! Bike Rental Dashboard
//!
//! Loads a table of daily bike rentals, filters it by date range, season and
//! weather, and turns it into the summaries behind each dashboard chart.

pub mod charts;
pub mod data;
pub mod gui;
pub mod logging;
pub mod settings;
pub mod stats;
