//! Distribution Summary
//! Histogram, mean and kernel density of daily totals over the full table.

use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

use super::StatsError;
use crate::data::{RentalTable, TOTAL_COL};

/// Number of points sampled for the density curve.
const DENSITY_POINTS: usize = 200;
/// Bandwidths the density curve extends past the data on each side.
const DENSITY_CUT: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl HistogramBucket {
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Overall distribution of `total_rentals`.
#[derive(Debug, Clone, Default)]
pub struct DistributionSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub buckets: Vec<HistogramBucket>,
    /// Gaussian KDE as `[x, expected count per bucket]` pairs.
    pub density: Vec<[f64; 2]>,
}

impl DistributionSummary {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

pub fn distribution_summary(
    table: &RentalTable,
    bins: usize,
) -> Result<DistributionSummary, StatsError> {
    if bins == 0 {
        return Err(StatsError::InvalidBinCount(bins));
    }

    let values: Vec<f64> = table
        .dated()?
        .values(TOTAL_COL)?
        .into_iter()
        .filter(|v| v.is_finite())
        .collect();

    if values.is_empty() {
        return Ok(DistributionSummary::default());
    }

    let mean = values.iter().mean();
    let std_dev = if values.len() > 1 {
        Some(values.iter().std_dev())
    } else {
        None
    };

    let buckets = histogram(&values, bins);
    let bucket_width = buckets.first().map(|b| b.width()).unwrap_or(1.0);
    let density = std_dev
        .map(|std| kernel_density(&values, std, bucket_width))
        .unwrap_or_default();

    Ok(DistributionSummary {
        count: values.len(),
        mean: Some(mean),
        std_dev,
        buckets,
        density,
    })
}

/// Equal-width buckets spanning [min, max]; the last bucket is closed.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBucket> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // Degenerate range: widen around the single value
    let (lo, hi) = if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBucket {
            lower: lo + i as f64 * width,
            upper: lo + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

/// Gaussian KDE with Scott's bandwidth, scaled to histogram counts.
fn kernel_density(values: &[f64], std_dev: f64, bucket_width: f64) -> Vec<[f64; 2]> {
    let n = values.len() as f64;
    let bandwidth = std_dev * n.powf(-0.2);
    if bandwidth.is_nan() || bandwidth <= 0.0 {
        return Vec::new();
    }
    let Ok(kernel) = Normal::new(0.0, 1.0) else {
        return Vec::new();
    };

    let min = values.iter().copied().fold(f64::INFINITY, f64::min) - DENSITY_CUT * bandwidth;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + DENSITY_CUT * bandwidth;
    let step = (max - min) / (DENSITY_POINTS - 1) as f64;

    (0..DENSITY_POINTS)
        .map(|i| {
            let x = min + i as f64 * step;
            let pdf = values
                .iter()
                .map(|&xi| kernel.pdf((x - xi) / bandwidth))
                .sum::<f64>()
                / (n * bandwidth);
            [x, pdf * n * bucket_width]
        })
        .collect()
}
