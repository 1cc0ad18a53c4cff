//! Grouped Statistics
//! Per-category mean rentals and the casual/registered composition.

use polars::prelude::*;
use std::cmp::Ordering;

use super::StatsError;
use crate::data::{
    column_counts, column_f64, column_strings, sort_labels, Dimension, RentalTable,
    CASUAL_COL, REGISTERED_COL, TOTAL_COL,
};

const MEAN: &str = "mean";
const COUNT: &str = "count";

/// Mean daily rentals for one category value.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub label: String,
    pub mean: f64,
    pub count: usize,
}

/// Group means for one dimension, sorted ascending by mean.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedAverage {
    pub dimension: Dimension,
    pub groups: Vec<GroupMean>,
}

impl GroupedAverage {
    /// The group with the highest mean: always the last entry.
    pub fn highlight(&self) -> Option<&GroupMean> {
        self.groups.last()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Group rows by `dimension` and average `total_rentals` per group.
///
/// Groups are sorted ascending by mean. Labels are pre-sorted naturally so
/// that equal means keep a stable order, but which of several maximal groups
/// ends up last is not part of the contract.
pub fn grouped_average(
    table: &RentalTable,
    dimension: Dimension,
) -> Result<GroupedAverage, StatsError> {
    let column = dimension.column();
    let grouped = table
        .dated()?
        .frame()
        .clone()
        .lazy()
        .filter(col(column).is_not_null())
        .group_by([col(column)])
        .agg([
            col(TOTAL_COL).mean().alias(MEAN),
            col(TOTAL_COL).count().alias(COUNT),
        ])
        .collect()?;

    let labels = column_strings(&grouped, column)?;
    let means = column_f64(&grouped, MEAN)?;
    let counts = column_counts(&grouped, COUNT)?;

    let mut groups: Vec<GroupMean> = labels
        .into_iter()
        .zip(means)
        .zip(counts)
        .filter_map(|((label, mean), count)| {
            Some(GroupMean {
                label: label?,
                mean: mean.filter(|m| m.is_finite())?,
                count,
            })
        })
        .collect();

    let mut order: Vec<String> = groups.iter().map(|g| g.label.clone()).collect();
    sort_labels(&mut order);
    groups.sort_by_key(|g| order.iter().position(|l| l == &g.label));
    groups.sort_by(|a, b| a.mean.partial_cmp(&b.mean).unwrap_or(Ordering::Equal));

    Ok(GroupedAverage { dimension, groups })
}

/// Grouped averages for every dashboard dimension.
pub fn grouped_averages(table: &RentalTable) -> Result<Vec<GroupedAverage>, StatsError> {
    Dimension::ALL
        .iter()
        .map(|&d| grouped_average(table, d))
        .collect()
}

/// Mean casual and registered rentals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiderComposition {
    pub casual_mean: f64,
    pub registered_mean: f64,
}

impl RiderComposition {
    /// Percentage shares `(casual, registered)` of the two means.
    pub fn shares(&self) -> Option<(f64, f64)> {
        let total = self.casual_mean + self.registered_mean;
        if total > 0.0 {
            Some((
                self.casual_mean / total * 100.0,
                self.registered_mean / total * 100.0,
            ))
        } else {
            None
        }
    }
}

/// Column means of casual and registered counts; `None` for an empty table.
pub fn rider_composition(table: &RentalTable) -> Result<Option<RiderComposition>, StatsError> {
    let means = table
        .dated()?
        .frame()
        .clone()
        .lazy()
        .select([col(CASUAL_COL).mean(), col(REGISTERED_COL).mean()])
        .collect()?;

    let casual = column_f64(&means, CASUAL_COL)?.first().copied().flatten();
    let registered = column_f64(&means, REGISTERED_COL)?.first().copied().flatten();

    Ok(match (casual, registered) {
        (Some(casual_mean), Some(registered_mean)) => Some(RiderComposition {
            casual_mean,
            registered_mean,
        }),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RentalRecord;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn record(d: u32, total: f64, weekday: &str, season: &str) -> RentalRecord {
        RentalRecord {
            date: NaiveDate::from_ymd_opt(2012, 3, d),
            total_rentals: total,
            casual_count: total * 0.25,
            registered_count: total * 0.75,
            season: season.to_string(),
            weathersit: "1".to_string(),
            weekday: weekday.to_string(),
            month: "3".to_string(),
            workingday: if weekday == "Sun" { "0" } else { "1" }.to_string(),
        }
    }

    fn sample_table() -> RentalTable {
        RentalTable::from_records(&[
            record(1, 4000.0, "Thu", "Spring"),
            record(2, 5000.0, "Fri", "Spring"),
            record(3, 2000.0, "Sat", "Spring"),
            record(4, 1000.0, "Sun", "Spring"),
            record(8, 6000.0, "Thu", "Summer"),
            record(9, 3000.0, "Fri", "Summer"),
        ])
        .unwrap()
    }

    #[test]
    fn test_grouped_average_sorted_ascending() {
        let avg = grouped_average(&sample_table(), Dimension::Weekday).unwrap();
        let labels: Vec<&str> = avg.groups.iter().map(|g| g.label.as_str()).collect();

        assert_eq!(labels, vec!["Sun", "Sat", "Fri", "Thu"]);
        assert_relative_eq!(avg.groups[2].mean, 4000.0);
        assert_eq!(avg.groups[3].count, 2);
    }

    #[test]
    fn test_highlight_is_maximum() {
        let table = sample_table();
        for dimension in Dimension::ALL {
            let avg = grouped_average(&table, dimension).unwrap();
            let top = avg.highlight().unwrap();
            assert!(avg.groups.iter().all(|g| top.mean >= g.mean));
        }
    }

    #[test]
    fn test_workingday_groups() {
        let avg = grouped_average(&sample_table(), Dimension::WorkingDay).unwrap();
        assert_eq!(avg.groups.len(), 2);
        assert_eq!(avg.groups[0].label, "0");
        assert_relative_eq!(avg.highlight().unwrap().mean, 4000.0);
    }

    #[test]
    fn test_grouped_averages_cover_all_dimensions() {
        let all = grouped_averages(&sample_table()).unwrap();
        let dims: Vec<Dimension> = all.iter().map(|g| g.dimension).collect();
        assert_eq!(dims, Dimension::ALL.to_vec());
    }

    #[test]
    fn test_grouped_average_empty_table() {
        let empty = RentalTable::from_records(&[]).unwrap();
        let avg = grouped_average(&empty, Dimension::Season).unwrap();
        assert!(avg.is_empty());
        assert!(avg.highlight().is_none());
    }

    #[test]
    fn test_rider_composition_means() {
        let table = RentalTable::from_records(&[
            RentalRecord {
                date: NaiveDate::from_ymd_opt(2011, 1, 1),
                total_rentals: 100.0,
                casual_count: 10.0,
                registered_count: 90.0,
                ..Default::default()
            },
            RentalRecord {
                date: NaiveDate::from_ymd_opt(2011, 1, 2),
                total_rentals: 100.0,
                casual_count: 20.0,
                registered_count: 80.0,
                ..Default::default()
            },
        ])
        .unwrap();

        let composition = rider_composition(&table).unwrap().unwrap();
        assert_relative_eq!(composition.casual_mean, 15.0);
        assert_relative_eq!(composition.registered_mean, 85.0);

        let (casual, registered) = composition.shares().unwrap();
        assert_relative_eq!(casual, 15.0, epsilon = 1e-9);
        assert_relative_eq!(registered, 85.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rider_composition_empty_table() {
        let empty = RentalTable::from_records(&[]).unwrap();
        assert!(rider_composition(&empty).unwrap().is_none());
    }
}
