//! Exploratory summaries: per-column statistics and correlations.

use serde::Serialize;
use statrs::statistics::Statistics;

use crate::data::frame::{Column, Dataset, ModelFrame};

/// Descriptive statistics for one dataset column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub numeric: bool,
    pub present: usize,
    pub missing: usize,
    pub mean: Option<f64>,
    pub sd: Option<f64>,
    pub min: Option<f64>,
    pub median: Option<f64>,
    pub max: Option<f64>,
}

/// Pearson correlations between the columns of a model frame.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    /// Row-major, `names.len() × names.len()`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        Some(self.values[i][j])
    }
}

/// Mean and sample standard deviation (`n - 1` denominator).
///
/// The standard deviation is `NaN` for fewer than two values.
pub fn mean_sd(values: &[f64]) -> (f64, f64) {
    (values.iter().mean(), values.iter().std_dev())
}

/// Quantile of already-sorted data (linear interpolation, R's type 7).
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let h = (sorted.len() as f64 - 1.0) * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    v
}

/// Pearson correlation; `NaN` if either series is constant.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    let (a, b) = (&a[..n], &b[..n]);
    let (sa, sb) = (a.iter().std_dev(), b.iter().std_dev());
    if !(sa > 0.0 && sb > 0.0) {
        return f64::NAN;
    }
    a.iter().covariance(b.iter()) / (sa * sb)
}

pub fn summarize_dataset(dataset: &Dataset) -> Vec<ColumnSummary> {
    dataset
        .columns()
        .map(|(name, column)| match column {
            Column::Numeric(cells) => {
                let present: Vec<f64> = cells.iter().flatten().copied().collect();
                let sorted = sorted_copy(&present);
                let (mean, sd) = mean_sd(&present);
                ColumnSummary {
                    name: name.to_string(),
                    numeric: true,
                    present: present.len(),
                    missing: cells.len() - present.len(),
                    mean: finite(mean),
                    sd: finite(sd),
                    min: sorted.first().copied(),
                    median: quantile_sorted(&sorted, 0.5),
                    max: sorted.last().copied(),
                }
            }
            Column::Text(cells) => {
                let present = cells.iter().filter(|c| !c.is_empty()).count();
                ColumnSummary {
                    name: name.to_string(),
                    numeric: false,
                    present,
                    missing: cells.len() - present,
                    mean: None,
                    sd: None,
                    min: None,
                    median: None,
                    max: None,
                }
            }
        })
        .collect()
}

pub fn correlation_matrix(frame: &ModelFrame) -> CorrelationMatrix {
    let cols: Vec<(&str, &[f64])> = frame.columns().collect();
    let values = cols
        .iter()
        .map(|(_, a)| cols.iter().map(|(_, b)| pearson(a, b)).collect())
        .collect();
    CorrelationMatrix {
        names: cols.iter().map(|(n, _)| n.to_string()).collect(),
        values,
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}
