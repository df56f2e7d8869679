// benchtrend - Benchmark history across revisions
// Copyright (c) 2025 Oliver Seifert
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Summary statistics over repeated benchmark runs.
//!
//! Quartiles use the R8 estimator (median-unbiased), so the outlier fences
//! match what `benchstat` reports for the same runs.

/// Summary of every value recorded for one (file, benchmark, unit).
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub unit: String,
    /// Values in the order they were read
    pub values: Vec<f64>,
    /// Mean of `values` with outliers removed
    pub mean: f64,
}

impl Metrics {
    pub fn new(unit: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            unit: unit.into(),
            mean: mean(&remove_outliers(&values)),
            values,
        }
    }
}

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Quantile `p` in `[0, 1]` of already sorted values (R8).
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let (Some(&first), Some(&last)) = (sorted.first(), sorted.last()) else {
        return 0.0;
    };
    if p <= 0.0 {
        return first;
    }
    if p >= 1.0 {
        return last;
    }

    let n = 1.0 / 3.0 + p * (sorted.len() as f64 + 1.0 / 3.0);
    let k = n.trunc() as usize;
    let frac = n.fract();
    if k == 0 {
        first
    } else if k >= sorted.len() {
        last
    } else {
        sorted[k - 1] + frac * (sorted[k] - sorted[k - 1])
    }
}

/// Drop values outside `[Q1 - 1.5 IQR, Q3 + 1.5 IQR]`, keeping input order.
pub fn remove_outliers(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let (lo, hi) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    values
        .iter()
        .copied()
        .filter(|v| (lo..=hi).contains(v))
        .collect()
}
