/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use revchain::artifact::ARTIFACT_EXTENSION;
use revchain::comp::compress;
use revchain::sources::{JsonLinesSource, RevisionSource};

use crate::{GlobalArgs, SolverArgs};

#[derive(Parser, Debug)]
#[command(name = "compress", about = "Compress a JSON-lines revision stream into an artifact.", long_about = None)]
pub struct CliArgs {
    /// The input file: one {"revid", "timestamp", "text"} JSON object per
    /// line, in chronological order.
    pub input: PathBuf,

    #[arg(short, long)]
    /// The output artifact path. Defaults to the input path with the
    /// extension replaced by `.rvc.zst`.
    pub output: Option<PathBuf>,

    #[arg(long)]
    /// The document title stored in the artifact. Defaults to the input
    /// file stem.
    pub title: Option<String>,

    #[clap(flatten)]
    pub solver: SolverArgs,
}

pub fn main(_global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let title = match &args.title {
        Some(title) => title.clone(),
        None => args
            .input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension(ARTIFACT_EXTENSION));

    let revisions = JsonLinesSource::new(&args.input).into_revisions()?;
    let artifact = compress(&title, revisions, &args.solver.to_config())?;
    artifact
        .store(&output)
        .with_context(|| format!("Could not store artifact at {}", output.display()))?;

    info!(
        "Stored artifact at {} ({} revisions, {} anchors, space cost {} of {} bytes)",
        output.display(),
        artifact.meta.count,
        artifact.anchors.len(),
        artifact.meta.space_cost,
        artifact.meta.orig_size,
    );
    Ok(())
}
