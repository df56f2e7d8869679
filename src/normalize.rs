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

//! Output transforms applied to the matrix.
//!
//! Every mode walks the commit dates oldest first and keeps running state per
//! benchmark. Missing cells stay `None` throughout the walk and only turn into
//! the mode's default value when a cell is finalized.

use crate::matrix::ResultMatrix;
use crate::timeline::Timestamp;
use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// Ratios closer to zero than this are treated as zero.
pub const EPSILON: f64 = 1e-8;

pub fn almost_zero(v: f64) -> bool {
    v.abs() <= EPSILON
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Raw values
    #[default]
    Absolute,
    /// Ratio to the first non-zero value of each benchmark
    Relative,
    /// Ratio to the mean of the previous `window` non-zero values
    Rolling { window: NonZeroUsize },
}

impl Mode {
    /// `relative` wins over `rolling`; a rolling window of 0 means absolute.
    pub fn from_flags(relative: bool, rolling: usize) -> Self {
        if relative {
            return Mode::Relative;
        }
        match NonZeroUsize::new(rolling) {
            Some(window) => Mode::Rolling { window },
            None => Mode::Absolute,
        }
    }

    /// Value reported for a cell with nothing recorded.
    pub fn default_value(self) -> f64 {
        match self {
            Mode::Absolute => 0.0,
            Mode::Relative | Mode::Rolling { .. } => 1.0,
        }
    }
}

/// Fixed-capacity FIFO of recent non-zero values.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    values: VecDeque<f64>,
}

impl RollingWindow {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity: capacity.get(),
            values: VecDeque::with_capacity(capacity.get() + 1),
        }
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }

    /// Record `value` unless it is zero, evicting the oldest entry when full.
    pub fn push(&mut self, value: f64) {
        if almost_zero(value) {
            return;
        }
        self.values.push_back(value);
        if self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-benchmark state carried along the date walk.
#[derive(Debug, Clone)]
enum State {
    Absolute,
    Relative { baseline: Option<f64> },
    Rolling(RollingWindow),
}

impl State {
    fn new(mode: Mode) -> Self {
        match mode {
            Mode::Absolute => State::Absolute,
            Mode::Relative => State::Relative { baseline: None },
            Mode::Rolling { window } => State::Rolling(RollingWindow::new(window)),
        }
    }

    /// Transform the raw cell at the next date. `None` means "use the default".
    fn step(&mut self, raw: Option<f64>) -> Option<f64> {
        match self {
            State::Absolute => raw,
            State::Relative { baseline } => {
                let raw = raw?;
                if baseline.is_none() && !almost_zero(raw) {
                    *baseline = Some(raw);
                }
                let ratio = raw / (*baseline)?;
                Some(if almost_zero(ratio) { 1.0 } else { ratio })
            }
            State::Rolling(window) => {
                let raw = raw?;
                let out = match window.mean() {
                    Some(mean) => raw / mean,
                    None => 1.0,
                };
                window.push(raw);
                Some(out)
            }
        }
    }
}

/// Matrix of output values, one row per date, one column per benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMatrix {
    /// Sorted benchmark names, the column order of every row
    pub benchmarks: Vec<String>,
    pub rows: Vec<NormalizedRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub date: Timestamp,
    pub values: Vec<f64>,
}

impl NormalizedMatrix {
    /// Column of `benchmark`, in date order.
    pub fn column(&self, benchmark: &str) -> Option<Vec<f64>> {
        let idx = self.benchmarks.iter().position(|b| b == benchmark)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }
}

/// Apply `mode` to every cell of `matrix`.
pub fn normalize(matrix: &ResultMatrix, mode: Mode) -> NormalizedMatrix {
    let benchmarks = matrix.benchmarks();
    let mut states: Vec<State> = benchmarks.iter().map(|_| State::new(mode)).collect();
    let default = mode.default_value();

    let rows = matrix
        .dates()
        .into_iter()
        .map(|date| {
            let values = benchmarks
                .iter()
                .zip(states.iter_mut())
                .map(|(name, state)| state.step(matrix.get(name, &date)).unwrap_or(default))
                .collect();
            NormalizedRow { date, values }
        })
        .collect();

    NormalizedMatrix {
        benchmarks: benchmarks.into_iter().map(str::to_string).collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn window(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    /// One benchmark with a value per consecutive day; `None` leaves a gap
    /// that is filled by a second benchmark so the date still exists.
    fn series(values: &[Option<f64>]) -> ResultMatrix {
        let start = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap().fixed_offset();
        let mut m = ResultMatrix::new();
        for (i, v) in values.iter().enumerate() {
            let date = start + Duration::days(i as i64);
            m.insert("Pad", date, 1.0);
            if let Some(v) = v {
                m.insert("Foo", date, *v);
            }
        }
        m
    }

    fn foo(matrix: &ResultMatrix, mode: Mode) -> Vec<f64> {
        normalize(matrix, mode).column("Foo").unwrap()
    }

    #[test]
    fn test_mode_precedence() {
        assert_eq!(Mode::from_flags(false, 0), Mode::Absolute);
        assert_eq!(Mode::from_flags(true, 0), Mode::Relative);
        assert_eq!(Mode::from_flags(true, 3), Mode::Relative);
        assert_eq!(Mode::from_flags(false, 3), Mode::Rolling { window: window(3) });
    }

    #[test]
    fn test_absolute_passes_values_through() {
        let m = series(&[Some(100.0), None, Some(0.0), Some(250.5)]);
        assert_eq!(foo(&m, Mode::Absolute), vec![100.0, 0.0, 0.0, 250.5]);
    }

    #[test]
    fn test_relative_to_first_nonzero() {
        let m = series(&[None, Some(0.0), Some(50.0), Some(100.0), None, Some(25.0)]);
        assert_eq!(
            foo(&m, Mode::Relative),
            vec![1.0, 1.0, 1.0, 2.0, 1.0, 0.5]
        );
    }

    #[test]
    fn test_relative_zero_after_baseline_reads_as_one() {
        let m = series(&[Some(100.0), Some(0.0), Some(1e-12)]);
        assert_eq!(foo(&m, Mode::Relative), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_relative_baseline_within_epsilon() {
        let m = series(&[Some(3.0), Some(7.0)]);
        let out = foo(&m, Mode::Relative);
        assert!((out[0] - 1.0).abs() <= EPSILON);
        assert!((out[1] - 7.0 / 3.0).abs() <= EPSILON);
    }

    #[test]
    fn test_rolling_first_is_one() {
        let m = series(&[Some(100.0), Some(200.0)]);
        assert_eq!(foo(&m, Mode::Rolling { window: window(1) }), vec![1.0, 2.0]);
    }

    #[test]
    fn test_rolling_window_keeps_most_recent() {
        let m = series(&[Some(10.0), Some(20.0), Some(30.0), Some(50.0)]);
        let out = foo(&m, Mode::Rolling { window: window(2) });
        // 20 / 10, 30 / mean(10, 20), 50 / mean(20, 30)
        assert_eq!(out, vec![1.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_rolling_skips_gaps_and_zeros() {
        let m = series(&[Some(10.0), None, Some(0.0), Some(30.0)]);
        let out = foo(&m, Mode::Rolling { window: window(3) });
        // The gap reads as 1, the zero is reported but never enters the window
        assert_eq!(out, vec![1.0, 1.0, 0.0, 3.0]);
    }

    #[test]
    fn test_rolling_window_push() {
        let mut w = RollingWindow::new(window(2));
        assert_eq!(w.mean(), None);
        w.push(0.0);
        assert!(w.is_empty());
        w.push(2.0);
        w.push(4.0);
        w.push(6.0);
        assert_eq!(w.len(), 2);
        assert_eq!(w.mean(), Some(5.0));
    }

    #[test]
    fn test_shape() {
        let m = series(&[Some(1.0), Some(2.0), Some(3.0)]);
        let out = normalize(&m, Mode::Absolute);
        assert_eq!(out.benchmarks, vec!["Foo", "Pad"]);
        assert_eq!(out.rows.len(), 3);
        assert!(out.rows.windows(2).all(|w| w[0].date < w[1].date));
        assert!(out.rows.iter().all(|r| r.values.len() == 2));
    }

    #[test]
    fn test_empty_matrix() {
        let out = normalize(&ResultMatrix::new(), Mode::Relative);
        assert!(out.benchmarks.is_empty());
        assert!(out.rows.is_empty());
    }
}
