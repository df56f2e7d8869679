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

//! # benchtrend
//!
//! Follow Go benchmark results across a repository's history.
//!
//! Each result file is named after the revision it measured
//! (`<sha>.txt`). Together with the commit log, the files are turned into a
//! time-ordered table with one column per benchmark:
//!
//! ```text
//! SHA,Date,Decode-8,Encode-8
//! 3f2a…,2021-01-04 10:12:00 +0000,1,1
//! 9c81…,2021-01-05 16:40:00 +0000,0.98,1.12
//! ```
//!
//! Values are either raw means, ratios to the first recorded value, or
//! ratios to a rolling average of previous commits (see [`Mode`]).
//!
//! ```no_run
//! use benchtrend::{Config, Mode};
//!
//! let config = Config {
//!     commit_dates: "/tmp/bench/commits".into(),
//!     files: vec!["/tmp/bench/3f2a.txt".into(), "/tmp/bench/9c81.txt".into()],
//!     mode: Mode::Relative,
//!     ..Config::default()
//! };
//! benchtrend::run(&config, std::io::stdout().lock(), |_| {})?;
//! # Ok::<(), benchtrend::Error>(())
//! ```

pub mod benchfmt;
pub mod error;
pub mod matrix;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod timeline;

pub use error::{Error, Result};
pub use matrix::{Filter, ResultMatrix};
pub use normalize::{Mode, NormalizedMatrix, normalize};
pub use pipeline::{Config, run};
pub use timeline::{Timeline, Timestamp};
