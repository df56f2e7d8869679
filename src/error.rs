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

//! Error types shared by every stage of the pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the crate error type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing or contradictory configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Timeline line without a `revision,date` split
    #[error("unexpected split on line {line}: {text:?}")]
    MalformedTimeline { line: usize, text: String },

    /// Timeline line whose date is not RFC 2822
    #[error("failed to parse date on line {line} ({text:?}): {source}")]
    InvalidDate {
        line: usize,
        text: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Benchmark name filter that does not compile
    #[error("invalid benchmark pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write report: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
