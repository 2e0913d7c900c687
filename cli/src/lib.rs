/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

use std::io::Write;
use std::time::Duration;
use std::time::SystemTime;

use anyhow::{anyhow, bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use revchain::comp::CompConfig;
use revchain::knapsack::{Solver, Strategy};
use revchain::retrieve::MissingPolicy;

pub mod analyze;
pub mod compress;
pub mod get;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
/// Enum for solver families.
///
/// It is used to implement [`ValueEnum`] here instead of in `revchain`.
pub enum PrivSolver {
    Exact,
    Heuristic,
}

impl From<PrivSolver> for Solver {
    fn from(value: PrivSolver) -> Self {
        match value {
            PrivSolver::Exact => Solver::Exact,
            PrivSolver::Heuristic => Solver::Heuristic,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
/// Enum for heuristic strategies.
pub enum PrivStrategy {
    Auto,
    Greedy,
    Fptas,
    Sparse,
}

impl From<PrivStrategy> for Strategy {
    fn from(value: PrivStrategy) -> Self {
        match value {
            PrivStrategy::Auto => Strategy::Auto,
            PrivStrategy::Greedy => Strategy::Greedy,
            PrivStrategy::Fptas => Strategy::Fptas,
            PrivStrategy::Sparse => Strategy::Sparse,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
/// Enum for missing-revid policies.
pub enum PrivMissingPolicy {
    Error,
    Warn,
    Ignore,
}

impl From<PrivMissingPolicy> for MissingPolicy {
    fn from(value: PrivMissingPolicy) -> Self {
        match value {
            PrivMissingPolicy::Error => MissingPolicy::Error,
            PrivMissingPolicy::Warn => MissingPolicy::Warn,
            PrivMissingPolicy::Ignore => MissingPolicy::Ignore,
        }
    }
}

/// Shared CLI arguments exposing the tuning knobs of the compression
/// engine.
#[derive(Args, Debug)]
pub struct SolverArgs {
    #[arg(long, value_enum, default_value_t = PrivSolver::Heuristic)]
    /// The solver family used to select delta transitions.
    pub solver: PrivSolver,

    #[arg(long, value_enum, default_value_t = PrivStrategy::Auto)]
    /// The heuristic strategy (ignored with --solver exact).
    pub strategy: PrivStrategy,

    #[arg(long, default_value_t = 0.1)]
    /// The approximation parameter of the FPTAS strategy.
    pub eps: f64,

    #[arg(long, default_value_t = 100_000)]
    /// The state cap of the sparse strategy.
    pub max_states: usize,

    #[arg(long)]
    /// The retrieval-time budget; defaults to the square of the number of
    /// revisions.
    pub time_budget: Option<u64>,
}

impl SolverArgs {
    pub fn to_config(&self) -> CompConfig {
        CompConfig {
            time_budget: self.time_budget,
            solver: self.solver.into(),
            strategy: self.strategy.into(),
            eps: self.eps,
            max_states: self.max_states,
        }
    }
}

/// Parses a duration from a string.
/// If no suffix is given, it is assumed to be in milliseconds.
/// You can use suffixes, the available ones are:
/// - `s` for seconds
/// - `m` for minutes
/// - `h` for hours
/// - `d` for days
fn parse_duration(value: &str) -> Result<Duration> {
    if value.is_empty() {
        bail!("Empty duration string, if you want every 0 milliseconds use `0`.");
    }
    let mut duration = Duration::from_secs(0);
    let mut acc = String::new();
    for c in value.chars() {
        if c.is_ascii_digit() {
            acc.push(c);
        } else if c.is_whitespace() {
            continue;
        } else {
            let dur = acc.parse::<u64>()?;
            match c {
                's' => duration += Duration::from_secs(dur),
                'm' => duration += Duration::from_secs(dur * 60),
                'h' => duration += Duration::from_secs(dur * 60 * 60),
                'd' => duration += Duration::from_secs(dur * 60 * 60 * 24),
                _ => return Err(anyhow!("Invalid duration suffix: {}", c)),
            }
            acc.clear();
        }
    }
    if !acc.is_empty() {
        let dur = acc.parse::<u64>()?;
        duration += Duration::from_millis(dur);
    }
    Ok(duration)
}

/// Initializes the `env_logger` logger with a custom format including
/// timestamps.
pub fn init_env_logger() -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.format(move |buf, record| {
        let Ok(ts) = jiff::Timestamp::try_from(SystemTime::now()) else {
            return Err(std::io::Error::other("Failed to get timestamp"));
        };
        let style = buf.default_level_style(record.level());
        writeln!(
            buf,
            "{} {style}{}{style:#} [{:?}] {} - {}",
            ts.strftime("%F %T%.3f"),
            record.level(),
            std::thread::current().id(),
            record.target(),
            record.args()
        )
    });
    builder.init();
    Ok(())
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    #[arg(long, value_parser = parse_duration, global=true, display_order = 1000)]
    /// How often to log progress. Default is 10s. You can use the suffixes
    /// "s" for seconds, "m" for minutes, "h" for hours, and "d" for days.
    /// If no suffix is provided it is assumed to be in milliseconds.
    pub log_interval: Option<Duration>,
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    Compress(compress::CliArgs),
    #[command(subcommand)]
    Get(get::SubCommands),
    Analyze(analyze::CliArgs),
}

#[derive(Parser, Debug)]
#[command(name = "revchain", version)]
/// Revchain tools to compress, retrieve, and analyze revision histories.
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
    #[clap(flatten)]
    pub args: GlobalArgs,
}

/// The entry point of the command-line interface.
pub fn cli_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = std::time::Instant::now();
    let cli = Cli::parse_from(args);
    match cli.command {
        SubCommands::Compress(args) => {
            compress::main(cli.args, args)?;
        }
        SubCommands::Get(args) => {
            get::main(cli.args, args)?;
        }
        SubCommands::Analyze(args) => {
            analyze::main(cli.args, args)?;
        }
    }

    log::info!(
        "The command took {:.3} seconds",
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
