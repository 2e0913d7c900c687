/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use revchain::retrieve::retrieve_by_time;

use super::{emit, load_artifact};
use crate::GlobalArgs;

/// Validates a window bound: either a date (`YYYY-MM-DD`) or a full
/// ISO-8601 timestamp.
fn parse_time_bound(value: &str) -> Result<String> {
    if value.len() == 10 {
        value.parse::<jiff::civil::Date>()?;
    } else {
        value.parse::<jiff::Timestamp>()?;
    }
    Ok(value.to_owned())
}

#[derive(Parser, Debug)]
#[command(name = "time", about = "Retrieve all revisions in a timestamp window.", long_about = None)]
pub struct CliArgs {
    /// The artifact to retrieve from.
    pub artifact: PathBuf,

    #[arg(long, value_parser = parse_time_bound)]
    /// The start of the window, as `YYYY-MM-DD` (expanded to T00:00:00Z) or
    /// a full ISO-8601 timestamp. Unbounded when omitted.
    pub start: Option<String>,

    #[arg(long, value_parser = parse_time_bound)]
    /// The end of the window, as `YYYY-MM-DD` (expanded to T23:59:59Z) or a
    /// full ISO-8601 timestamp. Unbounded when omitted.
    pub end: Option<String>,

    #[arg(long)]
    /// Exclude the window bounds instead of including them.
    pub exclusive: bool,
}

pub fn main(_global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let artifact = load_artifact(&args.artifact)?;
    let texts = retrieve_by_time(
        &artifact,
        args.start.as_deref(),
        args.end.as_deref(),
        !args.exclusive,
    )?;
    log::info!("Retrieved {} revisions in the window", texts.len());
    emit(&texts)
}
