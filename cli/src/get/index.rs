/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use revchain::retrieve::retrieve_range;

use super::{emit, load_artifact};
use crate::GlobalArgs;

#[derive(Parser, Debug)]
#[command(name = "index", about = "Retrieve a revision, or a contiguous range, by position.", long_about = None)]
pub struct CliArgs {
    /// The artifact to retrieve from.
    pub artifact: PathBuf,
    /// The position of the first revision to retrieve.
    pub index: usize,

    #[arg(short, long, default_value_t = 0)]
    /// How many revisions to retrieve after the first one.
    pub length: usize,
}

pub fn main(_global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let artifact = load_artifact(&args.artifact)?;
    let texts = retrieve_range(&artifact, args.index, args.length)?;
    log::info!(
        "Retrieved {} revisions starting at position {}",
        texts.len(),
        args.index
    );
    emit(&texts)
}
