/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use dsi_progress_logger::prelude::*;
use revchain::analytics::{scan_artifacts, summarize, ArtifactSummary};
use revchain::artifact::ARTIFACT_EXTENSION;

use crate::GlobalArgs;

#[derive(Parser, Debug)]
#[command(name = "analyze", about = "Summarize a directory of artifacts.", long_about = None)]
pub struct CliArgs {
    /// The directory containing the artifacts.
    pub dir: PathBuf,

    #[arg(long, default_value_t = format!(".{}", ARTIFACT_EXTENSION))]
    /// Only consider files whose name ends with this suffix.
    pub suffix: String,

    #[arg(long)]
    /// Emit the summaries as a JSON array instead of a table.
    pub json: bool,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let paths = scan_artifacts(&args.dir, &args.suffix)?;
    if paths.is_empty() {
        log::warn!(
            "No artifact matching *{} under {}",
            args.suffix,
            args.dir.display()
        );
        return Ok(());
    }

    let mut pl = ProgressLogger::default();
    pl.item_name("artifact")
        .expected_updates(Some(paths.len()));
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }
    pl.start("Analyzing artifacts...");
    let mut summaries = Vec::with_capacity(paths.len());
    for path in &paths {
        // one bad artifact must not sink the whole sweep
        match summarize(path) {
            Ok(summary) => summaries.push(summary),
            Err(error) => log::warn!("Skipping {}: {:#}", path.display(), error),
        }
        pl.update();
    }
    pl.done();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    print_table(&summaries);
    Ok(())
}

fn print_table(summaries: &[ArtifactSummary]) {
    println!(
        "{:<32} {:>8} {:>8} {:>8} {:>9} {:>12} {:>12} {:>7}",
        "title", "revs", "anchors", "chains", "maxchain", "space", "orig", "ratio"
    );
    for summary in summaries {
        println!(
            "{:<32} {:>8} {:>8} {:>8} {:>9} {:>12} {:>12} {:>7}",
            summary.title,
            summary.num_revisions,
            summary.num_anchors,
            summary.num_chains,
            summary.max_chain_len,
            summary.space_cost,
            summary.orig_size,
            summary
                .compression_ratio
                .map(|ratio| format!("{:.3}", ratio))
                .unwrap_or_else(|| "-".to_owned()),
        );
    }

    let total_orig: u64 = summaries.iter().map(|s| s.orig_size).sum();
    let total_space: u64 = summaries.iter().map(|s| s.space_cost).sum();
    let total_revs: usize = summaries.iter().map(|s| s.num_revisions).sum();
    let total_anchors: usize = summaries.iter().map(|s| s.num_anchors).sum();
    println!(
        "total: {} artifacts, {} revisions, {} anchors, space cost {} of {} bytes{}",
        summaries.len(),
        total_revs,
        total_anchors,
        total_space,
        total_orig,
        if total_orig > 0 {
            format!(" (ratio {:.3})", total_space as f64 / total_orig as f64)
        } else {
            String::new()
        },
    );
}
