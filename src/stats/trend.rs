//! Rolling Trend
//! Daily totals with a trailing moving average.

use chrono::NaiveDate;
use polars::prelude::*;

use super::StatsError;
use crate::data::{column_dates, column_f64, RentalTable, DATE_COL, TOTAL_COL};

/// Window used by the dashboard trend chart.
pub const DEFAULT_ROLLING_WINDOW: usize = 7;

const DAILY_TOTAL: &str = "daily_total";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub daily_total: f64,
    /// `None` until the window is fully populated.
    pub rolling_mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RollingTrend {
    pub window: usize,
    pub points: Vec<TrendPoint>,
}

impl RollingTrend {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points that carry a rolling value, as `(date, mean)`.
    pub fn defined(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|p| p.rolling_mean.map(|m| (p.date, m)))
    }
}

/// Sum totals per date, order chronologically, then apply a trailing mean.
pub fn rolling_trend(table: &RentalTable, window: usize) -> Result<RollingTrend, StatsError> {
    if window == 0 {
        return Err(StatsError::InvalidWindow(window));
    }

    let daily = table
        .frame()
        .clone()
        .lazy()
        .filter(col(DATE_COL).is_not_null())
        .group_by([col(DATE_COL)])
        .agg([col(TOTAL_COL).sum().alias(DAILY_TOTAL)])
        .sort([DATE_COL], SortMultipleOptions::default())
        .collect()?;

    let dates = column_dates(&daily, DATE_COL)?;
    let totals: Vec<f64> = column_f64(&daily, DAILY_TOTAL)?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect();
    let means = trailing_mean(&totals, window);

    let points = dates
        .into_iter()
        .zip(totals)
        .zip(means)
        .filter_map(|((date, daily_total), rolling_mean)| {
            Some(TrendPoint {
                date: date?,
                daily_total,
                rolling_mean,
            })
        })
        .collect();

    Ok(RollingTrend { window, points })
}

/// Trailing mean over `window` observations; the first `window - 1`
/// outputs are `None`.
pub fn trailing_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if window == 0 || i + 1 < window {
                None
            } else {
                let slice = &values[i + 1 - window..=i];
                Some(slice.iter().sum::<f64>() / window as f64)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RentalRecord;
    use approx::assert_relative_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2011, 1, d).unwrap()
    }

    fn record(d: u32, total: f64) -> RentalRecord {
        RentalRecord {
            date: Some(day(d)),
            total_rentals: total,
            ..Default::default()
        }
    }

    #[test]
    fn test_trailing_mean_window_seven() {
        let values: Vec<f64> = (1..=10).map(|v| v as f64 * 100.0).collect();
        let means = trailing_mean(&values, 7);

        assert!(means[..6].iter().all(Option::is_none));
        for i in 6..values.len() {
            let expected = values[i - 6..=i].iter().sum::<f64>() / 7.0;
            assert_relative_eq!(means[i].unwrap(), expected);
        }
        assert_relative_eq!(means[6].unwrap(), 400.0);
    }

    #[test]
    fn test_trailing_mean_short_series() {
        assert_eq!(trailing_mean(&[1.0, 2.0, 3.0], 7), vec![None, None, None]);
        assert!(trailing_mean(&[], 7).is_empty());
    }

    #[test]
    fn test_rolling_trend_sorts_and_sums_by_date() {
        // Out of order, with a duplicated date
        let records: Vec<RentalRecord> = vec![
            record(3, 300.0),
            record(1, 100.0),
            record(2, 200.0),
            record(2, 50.0),
            record(4, 400.0),
            record(5, 500.0),
            record(6, 600.0),
            record(7, 700.0),
            record(8, 800.0),
        ];
        let table = RentalTable::from_records(&records).unwrap();
        let trend = rolling_trend(&table, 7).unwrap();

        assert_eq!(trend.points.len(), 8);
        assert_eq!(trend.points[0].date, day(1));
        assert_relative_eq!(trend.points[1].daily_total, 250.0);
        assert!(trend.points[..6].iter().all(|p| p.rolling_mean.is_none()));
        assert_relative_eq!(trend.points[6].rolling_mean.unwrap(), 2850.0 / 7.0);
        assert_relative_eq!(trend.points[7].rolling_mean.unwrap(), 3550.0 / 7.0);
        assert_eq!(trend.defined().count(), 2);
    }

    #[test]
    fn test_rolling_trend_empty_table() {
        let table = RentalTable::from_records(&[]).unwrap();
        let trend = rolling_trend(&table, 7).unwrap();
        assert!(trend.is_empty());
    }

    #[test]
    fn test_zero_window_rejected() {
        let table = RentalTable::from_records(&[record(1, 1.0)]).unwrap();
        assert!(matches!(
            rolling_trend(&table, 0),
            Err(StatsError::InvalidWindow(0))
        ));
    }
}
