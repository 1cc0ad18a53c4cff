//! Stats module - Aggregation pipeline feeding each dashboard chart

mod binning;
mod dashboard;
mod distribution;
mod grouping;
mod trend;

use polars::prelude::PolarsError;
use thiserror::Error;

pub use binning::{bin_summary, categorize, CategorySummary, RentalCategory};
pub use dashboard::{DashboardSummary, SummaryOptions, DEFAULT_HISTOGRAM_BINS};
pub use distribution::{distribution_summary, histogram, DistributionSummary, HistogramBucket};
pub use grouping::{
    grouped_average, grouped_averages, rider_composition, GroupMean, GroupedAverage,
    RiderComposition,
};
pub use trend::{rolling_trend, trailing_mean, RollingTrend, TrendPoint, DEFAULT_ROLLING_WINDOW};

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Rolling window must be at least 1, got {0}")]
    InvalidWindow(usize),
    #[error("Histogram needs at least one bin, got {0}")]
    InvalidBinCount(usize),
}
