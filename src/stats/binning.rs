//! Rental Category Binning
//! Buckets daily totals into Low / Medium / High and summarizes each bucket.

use std::fmt;

use super::StatsError;
use crate::data::{column_f64, RentalTable, TOTAL_COL};

/// Ordinal rental volume category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RentalCategory {
    Low,
    Medium,
    High,
}

impl RentalCategory {
    pub const ALL: [RentalCategory; 3] = [
        RentalCategory::Low,
        RentalCategory::Medium,
        RentalCategory::High,
    ];

    /// Half-open bounds `(lower, upper]`.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            RentalCategory::Low => (0.0, 1_000.0),
            RentalCategory::Medium => (1_000.0, 5_000.0),
            RentalCategory::High => (5_000.0, 10_000.0),
        }
    }

    /// Category for a daily total; values outside `(0, 10000]` have none.
    pub fn classify(total: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| {
            let (lower, upper) = c.bounds();
            total > lower && total <= upper
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            RentalCategory::Low => "Low",
            RentalCategory::Medium => "Medium",
            RentalCategory::High => "High",
        }
    }
}

impl fmt::Display for RentalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Row count and mean total for one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategorySummary {
    pub category: RentalCategory,
    pub count: usize,
    /// `None` when no row falls in the category.
    pub mean: Option<f64>,
}

/// Category of every dated row, in row order. A fresh vector: the table is
/// not annotated.
pub fn categorize(table: &RentalTable) -> Result<Vec<Option<RentalCategory>>, StatsError> {
    let dated = table.dated()?;
    Ok(column_f64(dated.frame(), TOTAL_COL)?
        .into_iter()
        .map(|v| v.and_then(RentalCategory::classify))
        .collect())
}

/// Per-category frequency and mean, in ordinal order. Uncategorized rows are
/// left out.
pub fn bin_summary(table: &RentalTable) -> Result<Vec<CategorySummary>, StatsError> {
    let dated = table.dated()?;
    let totals = column_f64(dated.frame(), TOTAL_COL)?;

    let mut sums = [0.0f64; 3];
    let mut counts = [0usize; 3];
    for total in totals.into_iter().flatten() {
        if let Some(category) = RentalCategory::classify(total) {
            let idx = category as usize;
            sums[idx] += total;
            counts[idx] += 1;
        }
    }

    Ok(RentalCategory::ALL
        .into_iter()
        .map(|category| {
            let idx = category as usize;
            CategorySummary {
                category,
                count: counts[idx],
                mean: (counts[idx] > 0).then(|| sums[idx] / counts[idx] as f64),
            }
        })
        .collect())
}
