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

//! Benchmark × commit date matrix.

use crate::benchfmt::Table;
use crate::error::{Error, Result};
use crate::timeline::{Timeline, Timestamp};
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Results committed before this date are ignored unless `--since` says otherwise.
pub const DEFAULT_SINCE: &str = "2020-07-18";

/// Which samples make it into the matrix.
#[derive(Debug, Clone)]
pub struct Filter {
    /// Unit to keep, e.g. `ns/op`
    pub metric: String,
    /// Benchmark names must match somewhere
    pub pattern: Regex,
    /// Samples dated before this are dropped
    pub since: Timestamp,
}

impl Filter {
    pub fn new(metric: impl Into<String>, pattern: &str, since: &str) -> Result<Self> {
        Ok(Self {
            metric: metric.into(),
            pattern: Regex::new(pattern)?,
            since: parse_since(since)?,
        })
    }
}

/// Midnight UTC of a `YYYY-MM-DD` date.
pub fn parse_since(date: &str) -> Result<Timestamp> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| Error::Config(format!("invalid cutoff date {date:?}: {e}")))?;
    Ok(day.and_time(NaiveTime::MIN).and_utc().fixed_offset())
}

/// Revision a result file belongs to: its file name without the extension.
pub fn revision_of(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

/// Sparse map of mean values, keyed by benchmark then commit date.
#[derive(Debug, Clone, Default)]
pub struct ResultMatrix {
    cells: BTreeMap<String, BTreeMap<Timestamp, f64>>,
    dates: BTreeSet<Timestamp>,
}

impl ResultMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value, replacing and returning any earlier one for the same cell.
    pub fn insert(&mut self, benchmark: &str, date: Timestamp, value: f64) -> Option<f64> {
        self.dates.insert(date);
        self.cells
            .entry(benchmark.to_string())
            .or_default()
            .insert(date, value)
    }

    pub fn get(&self, benchmark: &str, date: &Timestamp) -> Option<f64> {
        self.cells.get(benchmark)?.get(date).copied()
    }

    /// Distinct benchmark names, sorted.
    pub fn benchmarks(&self) -> Vec<&str> {
        self.cells.keys().map(String::as_str).collect()
    }

    /// Distinct commit dates, oldest first.
    pub fn dates(&self) -> Vec<Timestamp> {
        self.dates.iter().copied().collect()
    }

    /// Number of recorded cells.
    pub fn len(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Join parsed tables against commit dates.
///
/// `files` must be in the order they were added to the collection that
/// produced `tables`: the metrics at index `i` of a row are dated by
/// `files[i]`, whatever file the row's name first appeared in. Files whose
/// revision is not in the timeline contribute nothing.
pub fn build<P: AsRef<Path>>(
    files: &[P],
    tables: &[Table],
    timeline: &Timeline,
    filter: &Filter,
) -> ResultMatrix {
    let dates: Vec<Option<Timestamp>> = files
        .iter()
        .map(|file| {
            let file = file.as_ref();
            let date = revision_of(file).and_then(|rev| timeline.date_of(rev));
            if date.is_none() {
                log::debug!("No commit date for {}, skipping", file.display());
            }
            date
        })
        .collect();

    let mut matrix = ResultMatrix::new();
    let mut too_old = 0usize;

    for table in tables {
        for row in &table.rows {
            for (i, metrics) in row.metrics.iter().enumerate() {
                let Some(metrics) = metrics else { continue };
                let Some(date) = dates.get(i).copied().flatten() else {
                    continue;
                };
                if metrics.unit != filter.metric || !filter.pattern.is_match(&row.benchmark) {
                    continue;
                }
                if date < filter.since {
                    too_old += 1;
                    continue;
                }
                matrix.insert(&row.benchmark, date, metrics.mean);
            }
        }
    }

    if too_old > 0 {
        log::debug!("Dropped {} results dated before {}", too_old, filter.since);
    }
    log::info!(
        "Collected {} results for {} benchmarks across {} commits",
        matrix.len(),
        matrix.cells.len(),
        matrix.dates.len()
    );

    matrix
}
