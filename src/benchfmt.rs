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

//! Go benchmark output parsing.
//!
//! Reads the text produced by `go test -bench`:
//!
//! ```text
//! goos: linux
//! pkg: example.com/server
//! BenchmarkEncode-8    1000    1234 ns/op    512 B/op    4 allocs/op
//! PASS
//! ```
//!
//! Every file added to a [`Collection`] is one configuration. Tables come out
//! aligned: column `i` of every row holds the metrics from the `i`-th file
//! added, or `None` if that file never ran the benchmark.

use crate::error::{Error, Result};
use crate::stats::Metrics;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};

/// One `value unit` pair read from a benchmark line.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub value: f64,
    pub unit: String,
}

/// A parsed benchmark result line.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchLine {
    /// Name without the `Benchmark` prefix, e.g. `Encode-8`
    pub name: String,
    pub iterations: u64,
    pub measurements: Vec<Measurement>,
}

/// Parse one line of benchmark output. Returns `None` for anything that is not
/// a result line.
///
/// `value unit` pairs whose value does not parse are skipped on their own, as
/// is a trailing field without a unit; the remaining pairs are kept.
pub fn parse_line(line: &str) -> Option<BenchLine> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return None;
    }

    let name = fields[0].strip_prefix("Benchmark")?;
    if name.is_empty() {
        return None;
    }

    let iterations: u64 = fields[1].parse().ok()?;
    if iterations == 0 {
        return None;
    }

    let measurements: Vec<Measurement> = fields[2..]
        .chunks_exact(2)
        .filter_map(|pair| {
            pair[0].parse::<f64>().ok().map(|value| Measurement {
                value,
                unit: pair[1].to_string(),
            })
        })
        .collect();
    if measurements.is_empty() {
        return None;
    }

    Some(BenchLine {
        name: name.to_string(),
        iterations,
        measurements,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Key {
    config: usize,
    benchmark: String,
    unit: String,
}

/// Raw values grouped by file, benchmark and unit.
#[derive(Debug, Default)]
pub struct Collection {
    configs: Vec<String>,
    benchmarks: Vec<String>,
    units: Vec<String>,
    values: HashMap<Key, Vec<f64>>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every benchmark line from `reader` as configuration `name`.
    ///
    /// The configuration index is assigned even when the file holds no
    /// benchmarks, so indices always line up with the order of calls.
    pub fn add_file(&mut self, name: &str, reader: impl Read) -> Result<()> {
        let config = self.configs.len();
        self.configs.push(name.to_string());

        // Test logs interleaved with results are not always UTF-8.
        let mut lines = 0usize;
        for raw in BufReader::new(reader).split(b'\n') {
            let raw = raw.map_err(|e| Error::io(name, e))?;
            let line = String::from_utf8_lossy(&raw);
            if let Some(bench) = parse_line(&line) {
                self.add_line(config, bench);
                lines += 1;
            }
        }

        log::debug!("{}: {} benchmark lines", name, lines);
        Ok(())
    }

    fn add_line(&mut self, config: usize, line: BenchLine) {
        if !self.benchmarks.contains(&line.name) {
            self.benchmarks.push(line.name.clone());
        }
        for m in line.measurements {
            if !self.units.contains(&m.unit) {
                self.units.push(m.unit.clone());
            }
            self.values
                .entry(Key {
                    config,
                    benchmark: line.name.clone(),
                    unit: m.unit,
                })
                .or_default()
                .push(m.value);
        }
    }

    /// Names of the added files, in order.
    pub fn configs(&self) -> &[String] {
        &self.configs
    }

    /// One table per unit, in order of first appearance.
    pub fn tables(&self) -> Vec<Table> {
        self.units
            .iter()
            .map(|unit| {
                let rows = self
                    .benchmarks
                    .iter()
                    .filter_map(|benchmark| self.row(benchmark, unit))
                    .collect();
                Table {
                    unit: unit.clone(),
                    rows,
                }
            })
            .collect()
    }

    fn row(&self, benchmark: &str, unit: &str) -> Option<Row> {
        let metrics: Vec<Option<Metrics>> = (0..self.configs.len())
            .map(|config| {
                let key = Key {
                    config,
                    benchmark: benchmark.to_string(),
                    unit: unit.to_string(),
                };
                self.values
                    .get(&key)
                    .map(|values| Metrics::new(unit, values.clone()))
            })
            .collect();

        // Benchmarks that never reported this unit get no row.
        if metrics.iter().all(Option::is_none) {
            return None;
        }

        Some(Row {
            benchmark: benchmark.to_string(),
            metrics,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    pub unit: String,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone)]
pub struct Row {
    pub benchmark: String,
    /// Indexed by configuration
    pub metrics: Vec<Option<Metrics>>,
}
