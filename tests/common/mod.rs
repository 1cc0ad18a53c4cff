//! Shared fixtures for the integration tests

use std::io::Write;
use tempfile::NamedTempFile;

pub const HEADER: &str = "date_day,total_rentals_agg,casual_agg,registered_agg,season,weathersit,weekday,month,workingday";

/// Builder for daily rental CSV fixtures
pub struct CsvBuilder {
    header: String,
    rows: Vec<String>,
}

#[allow(dead_code)]
impl CsvBuilder {
    pub fn new() -> Self {
        Self {
            header: HEADER.to_string(),
            rows: Vec::new(),
        }
    }

    pub fn with_header(mut self, header: &str) -> Self {
        self.header = header.to_string();
        self
    }

    /// Append a row; casual and registered riders split the total 20/80.
    pub fn day(mut self, date: &str, total: f64, season: &str, weather: u8) -> Self {
        let casual = total * 0.2;
        let registered = total - casual;
        let (weekday, month, workingday) = calendar(date);
        self.rows.push(format!(
            "{},{},{},{},{},{},{},{},{}",
            date, total, casual, registered, season, weather, weekday, month, workingday
        ));
        self
    }

    pub fn raw_row(mut self, row: &str) -> Self {
        self.rows.push(row.to_string());
        self
    }

    pub fn write(&self) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("rentals-")
            .suffix(".csv")
            .tempfile()
            .unwrap();
        writeln!(file, "{}", self.header).unwrap();
        for row in &self.rows {
            writeln!(file, "{}", row).unwrap();
        }
        file.flush().unwrap();
        file
    }
}

fn calendar(date: &str) -> (u32, u32, u8) {
    use chrono::{Datelike, NaiveDate};
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => {
            let weekday = d.weekday().num_days_from_sunday();
            let workingday = u8::from((1..=5).contains(&weekday));
            (weekday, d.month(), workingday)
        }
        Err(_) => (0, 1, 0),
    }
}

/// Two weeks of January 2011 with a steady climb in rentals.
#[allow(dead_code)]
pub fn two_weeks() -> CsvBuilder {
    (1..=14).fold(CsvBuilder::new(), |builder, day| {
        let weather = if day >= 10 && day % 2 == 0 { 2 } else { 1 };
        builder.day(
            &format!("2011-01-{:02}", day),
            800.0 + 100.0 * day as f64,
            "Spring",
            weather,
        )
    })
}
