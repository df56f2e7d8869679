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

//! Revision ↔ commit date lookup.
//!
//! The input is the output of
//! `git log --format="format:%H,%cD" --date-order`: one `revision,date` pair
//! per line, with the date in RFC 2822 form. Only the first comma separates
//! the two fields, since the date itself contains one.

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Commit date of a revision. Compared and ordered by instant.
pub type Timestamp = DateTime<FixedOffset>;

#[derive(Debug, Clone, Default)]
pub struct Timeline {
    by_revision: HashMap<String, Timestamp>,
    by_date: HashMap<Timestamp, String>,
}

impl Timeline {
    /// Parse a commit log.
    ///
    /// Blank lines are skipped. Any other line must split into a revision and
    /// a valid RFC 2822 date or the whole log is rejected. When two revisions
    /// share a commit date, the later line owns that date in reverse lookups.
    pub fn parse(text: &str) -> Result<Self> {
        let mut timeline = Timeline::default();

        for (idx, raw) in text.split('\n').enumerate() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            if line.is_empty() {
                continue;
            }

            let (revision, date) = line.split_once(',').ok_or_else(|| Error::MalformedTimeline {
                line: idx + 1,
                text: line.to_string(),
            })?;

            let date = DateTime::parse_from_rfc2822(date).map_err(|source| Error::InvalidDate {
                line: idx + 1,
                text: line.to_string(),
                source,
            })?;

            if let Some(previous) = timeline.by_date.insert(date, revision.to_string()) {
                if previous != revision {
                    log::debug!(
                        "Commit date {} shared by {} and {}, keeping {}",
                        date,
                        previous,
                        revision,
                        revision
                    );
                }
            }
            timeline.by_revision.insert(revision.to_string(), date);
        }

        Ok(timeline)
    }

    /// Read and parse a commit log from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let timeline = Self::parse(&text)?;
        log::info!(
            "Loaded {} revisions from {}",
            timeline.len(),
            path.display()
        );
        Ok(timeline)
    }

    /// Commit date of `revision`, if it appears in the log.
    pub fn date_of(&self, revision: &str) -> Option<Timestamp> {
        self.by_revision.get(revision).copied()
    }

    /// Revision committed at exactly `date`, if any.
    pub fn revision_at(&self, date: &Timestamp) -> Option<&str> {
        self.by_date.get(date).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_revision.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_revision.is_empty()
    }
}
