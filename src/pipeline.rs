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

//! End-to-end run: commit log + result files in, CSV out.

use crate::benchfmt::Collection;
use crate::error::{Error, Result};
use crate::matrix::{self, DEFAULT_SINCE, Filter};
use crate::normalize::{self, Mode, NormalizedMatrix};
use crate::report;
use crate::timeline::Timeline;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    /// Output of `git log --format="format:%H,%cD" --date-order`
    pub commit_dates: PathBuf,
    /// Result files, each named after the revision it measured
    pub files: Vec<PathBuf>,
    pub metric: String,
    pub regex: String,
    /// `YYYY-MM-DD`; older commits are ignored
    pub since: String,
    pub mode: Mode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            commit_dates: PathBuf::new(),
            files: Vec::new(),
            metric: "ns/op".to_string(),
            regex: ".".to_string(),
            since: DEFAULT_SINCE.to_string(),
            mode: Mode::Absolute,
        }
    }
}

impl Config {
    pub fn filter(&self) -> Result<Filter> {
        Filter::new(&self.metric, &self.regex, &self.since)
    }
}

/// Parse every result file into one collection, in order.
///
/// `on_file` is called after each file has been read.
pub fn read_results<P: AsRef<Path>>(
    files: &[P],
    mut on_file: impl FnMut(&Path),
) -> Result<Collection> {
    let mut collection = Collection::new();
    for path in files {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        collection.add_file(&path.to_string_lossy(), file)?;
        on_file(path);
    }
    Ok(collection)
}

/// Build, normalize and write the report.
///
/// Nothing is written to `out` until every input has been read, so a bad
/// file never leaves a truncated table behind.
pub fn run<W: Write>(
    config: &Config,
    out: W,
    on_file: impl FnMut(&Path),
) -> Result<NormalizedMatrix> {
    if config.commit_dates.as_os_str().is_empty() {
        return Err(Error::Config("require commit-dates".to_string()));
    }
    let filter = config.filter()?;

    let timeline = Timeline::load(&config.commit_dates)?;
    let collection = read_results(&config.files, on_file)?;
    log::info!("Parsed {} result files", collection.configs().len());

    let matrix = matrix::build(&config.files, &collection.tables(), &timeline, &filter);
    if matrix.is_empty() {
        log::warn!(
            "No {} results matched {:?} since {}",
            filter.metric,
            config.regex,
            config.since
        );
    }

    let normalized = normalize::normalize(&matrix, config.mode);
    report::write_csv(out, &normalized, &timeline)?;
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_commit_dates() {
        let err = run(&Config::default(), Vec::new(), |_| {}).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_bad_regex_reported_before_io() {
        let config = Config {
            commit_dates: PathBuf::from("/nonexistent/commits"),
            regex: "[".to_string(),
            ..Config::default()
        };
        let err = run(&config, Vec::new(), |_| {}).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern(_)));
    }

    #[test]
    fn test_missing_result_file() {
        let err = read_results(&["/nonexistent/abc.txt"], |_| {}).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
