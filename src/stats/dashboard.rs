//! Dashboard Summary
//! Runs the whole aggregation pipeline for one render pass.

use tracing::debug;

use super::binning::{bin_summary, CategorySummary};
use super::distribution::{distribution_summary, DistributionSummary};
use super::grouping::{grouped_average, rider_composition, GroupedAverage, RiderComposition};
use super::trend::{rolling_trend, RollingTrend, DEFAULT_ROLLING_WINDOW};
use super::StatsError;
use crate::data::{DashboardFilter, Dimension, RentalTable};

/// Histogram bucket count for the distribution chart.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Tunables for a summary pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    pub histogram_bins: usize,
    pub rolling_window: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            rolling_window: DEFAULT_ROLLING_WINDOW,
        }
    }
}

/// Every chart input for the current filters.
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    /// Full-table distribution; ignores the sidebar filters.
    pub distribution: DistributionSummary,
    pub trend: RollingTrend,
    pub composition: Option<RiderComposition>,
    pub by_weekday: GroupedAverage,
    pub by_month: GroupedAverage,
    pub by_workingday: GroupedAverage,
    pub by_weather: GroupedAverage,
    pub by_season: GroupedAverage,
    pub bins: Vec<CategorySummary>,
    /// Rows left after filtering.
    pub row_count: usize,
}

impl DashboardSummary {
    pub fn compute(
        full: &RentalTable,
        filter: &DashboardFilter,
        options: &SummaryOptions,
    ) -> Result<Self, StatsError> {
        let filtered = filter.apply(full)?;
        debug!(
            rows = filtered.height(),
            total = full.height(),
            "Recomputing dashboard summary"
        );

        Ok(Self {
            distribution: distribution_summary(full, options.histogram_bins)?,
            trend: rolling_trend(&filtered, options.rolling_window)?,
            composition: rider_composition(&filtered)?,
            by_weekday: grouped_average(&filtered, Dimension::Weekday)?,
            by_month: grouped_average(&filtered, Dimension::Month)?,
            by_workingday: grouped_average(&filtered, Dimension::WorkingDay)?,
            by_weather: grouped_average(&filtered, Dimension::Weather)?,
            by_season: grouped_average(&filtered, Dimension::Season)?,
            bins: bin_summary(&filtered)?,
            row_count: filtered.height(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Grouped averages in display order.
    pub fn grouped(&self) -> [&GroupedAverage; 5] {
        [
            &self.by_weekday,
            &self.by_month,
            &self.by_workingday,
            &self.by_weather,
            &self.by_season,
        ]
    }
}
