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

//! CSV rendering of a normalized matrix.

use crate::error::Result;
use crate::normalize::NormalizedMatrix;
use crate::timeline::{Timeline, Timestamp};
use std::io::Write;

pub const REVISION_COLUMN: &str = "SHA";
pub const DATE_COLUMN: &str = "Date";

/// Shortest decimal form that reads back to the same value, e.g. `100`, `1.5`.
pub fn format_value(v: f64) -> String {
    v.to_string()
}

pub fn format_date(date: &Timestamp) -> String {
    date.format("%Y-%m-%d %H:%M:%S %z").to_string()
}

/// Write the header and one row per date to `out`.
///
/// Dates without a known revision get an empty revision cell.
pub fn write_csv<W: Write>(out: W, matrix: &NormalizedMatrix, timeline: &Timeline) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let header = [REVISION_COLUMN, DATE_COLUMN]
        .into_iter()
        .chain(matrix.benchmarks.iter().map(String::as_str));
    writer.write_record(header)?;

    for row in &matrix.rows {
        let mut record = Vec::with_capacity(row.values.len() + 2);
        record.push(timeline.revision_at(&row.date).unwrap_or_default().to_string());
        record.push(format_date(&row.date));
        record.extend(row.values.iter().copied().map(format_value));
        writer.write_record(&record)?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
