//! Data module - CSV loading, the rental table and sidebar filters

mod filter;
mod loader;
mod table;

pub use filter::{CategoryFilter, DashboardFilter, DateRange, ALL_SENTINEL};
pub use loader::{DataLoader, LoaderError};
pub use table::{
    sort_labels, Dimension, RentalRecord, RentalTable, CASUAL_COL, DATE_COL, DATE_FORMAT,
    MONTH_COL, REGISTERED_COL, SEASON_COL, TOTAL_COL, WEATHER_COL, WEEKDAY_COL, WORKINGDAY_COL,
};
pub(crate) use table::{column_counts, column_dates, column_f64, column_strings};
