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

//! # Benchmark History Report
//!
//! Turns a directory of `go test -bench` outputs, one per commit, into a CSV
//! time series on stdout.
//!
//! Features:
//! - Absolute, relative-to-first and rolling-average output
//! - Benchmark name and metric unit filtering
//! - Commits before `--since` are dropped as unreliable history
//!
//! Usage:
//!   git log --format="format:%H,%cD" --date-order > commits
//!   cargo run --bin benchtrend --features cli -- --commit-dates commits [--relative | --rolling <n>] results/*.txt

use anyhow::{Context, Result};
use benchtrend::{Config, Mode};
use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "benchtrend")]
#[command(about = "Benchmark results across commits as a CSV time series", long_about = None)]
#[command(version)]
struct Args {
    /// File containing `git log --format="format:%H,%cD" --date-order`
    #[arg(long)]
    commit_dates: Option<PathBuf>,

    /// Metric unit to fetch
    #[arg(long, default_value = "ns/op")]
    metric: String,

    /// Benchmarks to include (regular expression)
    #[arg(long, default_value = ".")]
    regex: String,

    /// Report each value relative to the benchmark's first result
    #[arg(long, default_value = "false")]
    relative: bool,

    /// Number of previous commits to compare to (0 = disabled)
    #[arg(long, default_value = "0")]
    rolling: usize,

    /// Ignore commits before this date (YYYY-MM-DD)
    #[arg(long, default_value = benchtrend::matrix::DEFAULT_SINCE)]
    since: String,

    /// Hide the progress bar
    #[arg(short, long, default_value = "false")]
    quiet: bool,

    /// Benchmark result files, named <revision>.<ext>
    files: Vec<PathBuf>,
}

impl Args {
    fn into_config(self) -> Config {
        Config {
            commit_dates: self.commit_dates.unwrap_or_default(),
            files: self.files,
            metric: self.metric,
            regex: self.regex,
            since: self.since,
            mode: Mode::from_flags(self.relative, self.rolling),
        }
    }
}

fn progress_bar(len: usize, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::with_draw_target(Some(len as u64), ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{prefix:.cyan} {bar:40} {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );
    pb.set_prefix("📄 Reading results");
    pb
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let quiet = args.quiet;
    let config = args.into_config();

    log::info!("Mode: {:?}", config.mode);
    log::info!("Metric: {} (benchmarks matching {:?})", config.metric, config.regex);

    let pb = progress_bar(config.files.len(), quiet);
    let stdout = io::stdout();
    let report = benchtrend::run(&config, stdout.lock(), |_| pb.inc(1))
        .context("Failed to build benchmark report")?;
    pb.finish_and_clear();

    log::info!(
        "✓ Wrote {} commits × {} benchmarks",
        report.rows.len(),
        report.benchmarks.len()
    );
    Ok(())
}
