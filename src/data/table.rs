//! Rental Table Module
//! Immutable daily rental table backed by a Polars DataFrame.

use chrono::NaiveDate;
use polars::prelude::*;
use std::cmp::Ordering;
use std::fmt;

use super::loader::LoaderError;

/// Calendar date of the aggregated row.
pub const DATE_COL: &str = "date_day";
/// Total combined rentals for the day.
pub const TOTAL_COL: &str = "total_rentals_agg";
pub const CASUAL_COL: &str = "casual_agg";
pub const REGISTERED_COL: &str = "registered_agg";
pub const SEASON_COL: &str = "season";
pub const WEATHER_COL: &str = "weathersit";
pub const WEEKDAY_COL: &str = "weekday";
pub const MONTH_COL: &str = "month";
pub const WORKINGDAY_COL: &str = "workingday";

/// Older exports name the rider columns `*_ratio`.
pub const COLUMN_ALIASES: [(&str, &str); 2] = [
    ("casual_ratio", CASUAL_COL),
    ("registered_ratio", REGISTERED_COL),
];

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const VALUE_COLS: [&str; 3] = [TOTAL_COL, CASUAL_COL, REGISTERED_COL];

/// Categorical dimensions the dashboard groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Weekday,
    Month,
    WorkingDay,
    Weather,
    Season,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Weekday,
        Dimension::Month,
        Dimension::WorkingDay,
        Dimension::Weather,
        Dimension::Season,
    ];

    /// Source column for this dimension.
    pub fn column(self) -> &'static str {
        match self {
            Dimension::Weekday => WEEKDAY_COL,
            Dimension::Month => MONTH_COL,
            Dimension::WorkingDay => WORKINGDAY_COL,
            Dimension::Weather => WEATHER_COL,
            Dimension::Season => SEASON_COL,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Dimension::Weekday => "Day of Week",
            Dimension::Month => "Month",
            Dimension::WorkingDay => "Working Day vs Holiday",
            Dimension::Weather => "Weather Condition",
            Dimension::Season => "Season",
        }
    }

    /// Display label for a raw category value.
    pub fn display_label(self, value: &str) -> String {
        match (self, value) {
            (Dimension::WorkingDay, "0") => "Non-Working Day".to_string(),
            (Dimension::WorkingDay, "1") => "Working Day".to_string(),
            _ => value.to_string(),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// One aggregated day of rentals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RentalRecord {
    pub date: Option<NaiveDate>,
    pub total_rentals: f64,
    pub casual_count: f64,
    pub registered_count: f64,
    pub season: String,
    pub weathersit: String,
    pub weekday: String,
    pub month: String,
    pub workingday: String,
}

/// Immutable table of daily rental records.
///
/// Every filter or aggregation produces a new value; the wrapped frame is
/// never modified after construction. Cloning is cheap because Polars
/// columns are reference counted.
#[derive(Debug, Clone)]
pub struct RentalTable {
    df: DataFrame,
}

impl RentalTable {
    /// Normalize a raw frame into the dashboard schema.
    ///
    /// Resolves column aliases, checks required columns, parses the date
    /// column (invalid dates become null) and casts categorical columns to
    /// strings.
    pub fn from_frame(mut df: DataFrame) -> Result<Self, LoaderError> {
        for (alias, canonical) in COLUMN_ALIASES {
            if df.get_column_index(canonical).is_none() && df.get_column_index(alias).is_some() {
                df.rename(alias, canonical.into())?;
                // polars 0.46 `rename` leaves a stale cached schema behind
                df.clear_schema();
            }
        }

        let required = Self::required_columns();
        if let Some(missing) = required
            .iter()
            .find(|name| df.get_column_index(name).is_none())
        {
            return Err(LoaderError::MissingColumn(missing.to_string()));
        }

        let date_options = StrptimeOptions {
            format: Some(DATE_FORMAT.into()),
            strict: false,
            ..Default::default()
        };

        let mut casts: Vec<Expr> = vec![col(DATE_COL)
            .cast(DataType::String)
            .str()
            .to_date(date_options)];
        casts.extend(VALUE_COLS.iter().map(|c| col(*c).cast(DataType::Float64)));
        casts.extend(
            Dimension::ALL
                .iter()
                .map(|d| col(d.column()).cast(DataType::String)),
        );

        let df = df
            .lazy()
            .with_columns(casts)
            .select(required.iter().map(|c| col(*c)).collect::<Vec<_>>())
            .collect()?;

        Ok(Self { df })
    }

    /// Build a table from in-memory records.
    pub fn from_records(records: &[RentalRecord]) -> Result<Self, LoaderError> {
        let dates: Vec<Option<String>> = records
            .iter()
            .map(|r| r.date.map(|d| d.format(DATE_FORMAT).to_string()))
            .collect();

        let df = DataFrame::new(vec![
            Column::new(DATE_COL.into(), dates),
            Column::new(
                TOTAL_COL.into(),
                records.iter().map(|r| r.total_rentals).collect::<Vec<f64>>(),
            ),
            Column::new(
                CASUAL_COL.into(),
                records.iter().map(|r| r.casual_count).collect::<Vec<f64>>(),
            ),
            Column::new(
                REGISTERED_COL.into(),
                records
                    .iter()
                    .map(|r| r.registered_count)
                    .collect::<Vec<f64>>(),
            ),
            Column::new(
                SEASON_COL.into(),
                records.iter().map(|r| r.season.clone()).collect::<Vec<_>>(),
            ),
            Column::new(
                WEATHER_COL.into(),
                records.iter().map(|r| r.weathersit.clone()).collect::<Vec<_>>(),
            ),
            Column::new(
                WEEKDAY_COL.into(),
                records.iter().map(|r| r.weekday.clone()).collect::<Vec<_>>(),
            ),
            Column::new(
                MONTH_COL.into(),
                records.iter().map(|r| r.month.clone()).collect::<Vec<_>>(),
            ),
            Column::new(
                WORKINGDAY_COL.into(),
                records.iter().map(|r| r.workingday.clone()).collect::<Vec<_>>(),
            ),
        ])?;

        Self::from_frame(df)
    }

    pub fn required_columns() -> [&'static str; 9] {
        [
            DATE_COL,
            TOTAL_COL,
            CASUAL_COL,
            REGISTERED_COL,
            SEASON_COL,
            WEATHER_COL,
            WEEKDAY_COL,
            MONTH_COL,
            WORKINGDAY_COL,
        ]
    }

    /// Get a reference to the underlying DataFrame.
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Number of rows whose date could not be parsed.
    pub fn missing_date_count(&self) -> usize {
        self.df
            .column(DATE_COL)
            .map(|c| c.null_count())
            .unwrap_or(0)
    }

    /// New table holding the rows that satisfy `predicate`.
    pub fn filter(&self, predicate: Expr) -> PolarsResult<Self> {
        let df = self.df.clone().lazy().filter(predicate).collect()?;
        Ok(Self { df })
    }

    /// Rows with a parsed date. Aggregations only ever see these.
    pub fn dated(&self) -> PolarsResult<Self> {
        if self.missing_date_count() == 0 {
            return Ok(self.clone());
        }
        self.filter(col(DATE_COL).is_not_null())
    }

    pub fn dates(&self) -> PolarsResult<Vec<Option<NaiveDate>>> {
        column_dates(&self.df, DATE_COL)
    }

    /// Earliest and latest parsed date, if any row has one.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates = self.dates().ok()?;
        let min = dates.iter().flatten().min().copied()?;
        let max = dates.iter().flatten().max().copied()?;
        Some((min, max))
    }

    /// Non-null values of a numeric column.
    pub fn values(&self, column: &str) -> PolarsResult<Vec<f64>> {
        Ok(column_f64(&self.df, column)?.into_iter().flatten().collect())
    }

    /// Distinct non-null values of a dimension, naturally sorted.
    pub fn unique_values(&self, dimension: Dimension) -> Vec<String> {
        let mut values: Vec<String> = column_strings(&self.df, dimension.column())
            .map(|v| v.into_iter().flatten().collect())
            .unwrap_or_default();
        sort_labels(&mut values);
        values.dedup();
        values
    }

    /// Materialize the rows back into records.
    pub fn records(&self) -> PolarsResult<Vec<RentalRecord>> {
        let dates = self.dates()?;
        let totals = column_f64(&self.df, TOTAL_COL)?;
        let casual = column_f64(&self.df, CASUAL_COL)?;
        let registered = column_f64(&self.df, REGISTERED_COL)?;
        let season = column_strings(&self.df, SEASON_COL)?;
        let weather = column_strings(&self.df, WEATHER_COL)?;
        let weekday = column_strings(&self.df, WEEKDAY_COL)?;
        let month = column_strings(&self.df, MONTH_COL)?;
        let workingday = column_strings(&self.df, WORKINGDAY_COL)?;

        Ok((0..self.height())
            .map(|i| RentalRecord {
                date: dates[i],
                total_rentals: totals[i].unwrap_or(f64::NAN),
                casual_count: casual[i].unwrap_or(f64::NAN),
                registered_count: registered[i].unwrap_or(f64::NAN),
                season: season[i].clone().unwrap_or_default(),
                weathersit: weather[i].clone().unwrap_or_default(),
                weekday: weekday[i].clone().unwrap_or_default(),
                month: month[i].clone().unwrap_or_default(),
                workingday: workingday[i].clone().unwrap_or_default(),
            })
            .collect())
    }
}

pub(crate) fn column_f64(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

pub(crate) fn column_strings(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let series = df.column(name)?.as_materialized_series();
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

pub(crate) fn column_counts(df: &DataFrame, name: &str) -> PolarsResult<Vec<usize>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::UInt64)?;
    Ok(series
        .u64()?
        .into_iter()
        .map(|v| v.unwrap_or(0) as usize)
        .collect())
}

pub(crate) fn column_dates(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<NaiveDate>>> {
    let series = df.column(name)?.as_materialized_series();
    Ok(series.date()?.as_date_iter().collect())
}

/// Sort category labels numerically when every label is a number,
/// lexically otherwise.
pub fn sort_labels(labels: &mut [String]) {
    let all_numeric = labels.iter().all(|l| l.trim().parse::<f64>().is_ok());
    if all_numeric {
        labels.sort_by(|a, b| {
            let a: f64 = a.trim().parse().unwrap_or(f64::NAN);
            let b: f64 = b.trim().parse().unwrap_or(f64::NAN);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        });
    } else {
        labels.sort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2011, 1, d).unwrap()
    }

    fn record(d: u32, total: f64, season: &str) -> RentalRecord {
        RentalRecord {
            date: Some(day(d)),
            total_rentals: total,
            casual_count: total * 0.2,
            registered_count: total * 0.8,
            season: season.to_string(),
            weathersit: "1".to_string(),
            weekday: "Mon".to_string(),
            month: "1".to_string(),
            workingday: "1".to_string(),
        }
    }

    #[test]
    fn test_from_records_round_trips_rows() {
        let records = vec![record(1, 985.0, "Spring"), record(2, 801.0, "Spring")];
        let table = RentalTable::from_records(&records).unwrap();

        assert_eq!(table.height(), 2);
        assert_eq!(table.frame().column(DATE_COL).unwrap().dtype(), &DataType::Date);
        assert_eq!(table.records().unwrap(), records);
        assert_eq!(table.date_bounds(), Some((day(1), day(2))));
    }

    #[test]
    fn test_ratio_aliases_are_renamed() {
        let df = df!(
            DATE_COL => ["2011-01-01"],
            TOTAL_COL => [985i64],
            "casual_ratio" => [331i64],
            "registered_ratio" => [654i64],
            SEASON_COL => [1i64],
            WEATHER_COL => [2i64],
            WEEKDAY_COL => ["Sat"],
            MONTH_COL => [1i64],
            WORKINGDAY_COL => [0i64],
        )
        .unwrap();

        let table = RentalTable::from_frame(df).unwrap();
        assert_eq!(table.values(CASUAL_COL).unwrap(), vec![331.0]);
        assert_eq!(table.values(REGISTERED_COL).unwrap(), vec![654.0]);
        assert_eq!(table.unique_values(Dimension::Season), vec!["1"]);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let df = df!(
            DATE_COL => ["2011-01-01"],
            TOTAL_COL => [985.0],
        )
        .unwrap();

        match RentalTable::from_frame(df) {
            Err(LoaderError::MissingColumn(name)) => assert_eq!(name, CASUAL_COL),
            other => panic!("expected missing column error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_dates_become_null() {
        let mut records = vec![record(1, 100.0, "Spring"), record(3, 300.0, "Spring")];
        records[1].date = None;
        let table = RentalTable::from_records(&records).unwrap();

        assert_eq!(table.height(), 2);
        assert_eq!(table.missing_date_count(), 1);
        assert_eq!(table.dated().unwrap().height(), 1);
    }

    #[test]
    fn test_unique_values_sorted_naturally() {
        let mut records = Vec::new();
        for (i, month) in ["10", "2", "1", "2"].iter().enumerate() {
            let mut r = record(i as u32 + 1, 100.0, "Fall");
            r.month = month.to_string();
            records.push(r);
        }
        let table = RentalTable::from_records(&records).unwrap();
        assert_eq!(table.unique_values(Dimension::Month), vec!["1", "2", "10"]);
    }

    #[test]
    fn test_workingday_display_labels() {
        assert_eq!(Dimension::WorkingDay.display_label("0"), "Non-Working Day");
        assert_eq!(Dimension::WorkingDay.display_label("1"), "Working Day");
        assert_eq!(Dimension::Season.display_label("Summer"), "Summer");
    }
}
