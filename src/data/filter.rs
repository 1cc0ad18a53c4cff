//! Filter Module
//! Sidebar filters: inclusive date range plus season and weather selections.
//!
//! Filters never touch the source table; each one returns a new
//! `RentalTable` holding the matching rows.

use chrono::NaiveDate;
use polars::prelude::*;

use super::table::{Dimension, RentalTable, DATE_COL};

/// Selection value meaning "do not filter this dimension".
pub const ALL_SENTINEL: &str = "All";

/// Inclusive date range. Missing bounds fall back to the table's own
/// earliest/latest date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Concrete bounds against `table`, or `None` if it has no dates at all.
    pub fn resolve(&self, table: &RentalTable) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => {
                let (min, max) = table.date_bounds()?;
                Some((self.start.unwrap_or(min), self.end.unwrap_or(max)))
            }
        }
    }

    /// Keep rows dated within the range. Undated rows never match.
    pub fn apply(&self, table: &RentalTable) -> PolarsResult<RentalTable> {
        let mut predicate = col(DATE_COL).is_not_null();
        if let Some((start, end)) = self.resolve(table) {
            predicate = predicate
                .and(col(DATE_COL).gt_eq(lit(start)))
                .and(col(DATE_COL).lt_eq(lit(end)));
        }
        table.filter(predicate)
    }
}

/// Multi-select over one categorical dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFilter {
    pub dimension: Dimension,
    pub selected: Vec<String>,
}

impl CategoryFilter {
    /// A filter that lets every row through.
    pub fn all(dimension: Dimension) -> Self {
        Self {
            dimension,
            selected: vec![ALL_SENTINEL.to_string()],
        }
    }

    pub fn with_values<I, S>(dimension: Dimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dimension,
            selected: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Empty selections and selections containing "All" do not filter.
    pub fn is_unrestricted(&self) -> bool {
        self.selected.is_empty() || self.selected.iter().any(|s| s == ALL_SENTINEL)
    }

    pub fn apply(&self, table: &RentalTable) -> PolarsResult<RentalTable> {
        if self.is_unrestricted() {
            return Ok(table.clone());
        }

        let column = self.dimension.column();
        let predicate = self
            .selected
            .iter()
            .map(|value| col(column).eq(lit(value.as_str())))
            .reduce(|acc, expr| acc.or(expr))
            .unwrap_or_else(|| lit(true));

        table.filter(predicate)
    }
}

/// Full set of sidebar filters.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardFilter {
    pub date_range: DateRange,
    pub seasons: CategoryFilter,
    pub weather: CategoryFilter,
}

impl Default for DashboardFilter {
    fn default() -> Self {
        Self {
            date_range: DateRange::default(),
            seasons: CategoryFilter::all(Dimension::Season),
            weather: CategoryFilter::all(Dimension::Weather),
        }
    }
}

impl DashboardFilter {
    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.date_range = DateRange::new(start, end);
        self
    }

    pub fn with_seasons<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seasons = CategoryFilter::with_values(Dimension::Season, values);
        self
    }

    pub fn with_weather<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.weather = CategoryFilter::with_values(Dimension::Weather, values);
        self
    }

    /// Date range first, then season, then weather.
    pub fn apply(&self, table: &RentalTable) -> PolarsResult<RentalTable> {
        let filtered = self.date_range.apply(table)?;
        let filtered = self.seasons.apply(&filtered)?;
        self.weather.apply(&filtered)
    }
}
