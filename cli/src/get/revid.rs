/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use revchain::retrieve::retrieve_by_revid;

use super::{emit, load_artifact};
use crate::{GlobalArgs, PrivMissingPolicy};

#[derive(Parser, Debug)]
#[command(name = "revid", about = "Retrieve revisions by upstream revision identifier.", long_about = None)]
pub struct CliArgs {
    /// The artifact to retrieve from.
    pub artifact: PathBuf,
    /// The revision identifiers to retrieve, in the desired output order.
    #[arg(required = true, num_args = 1..)]
    pub revids: Vec<u64>,

    #[arg(long, value_enum, default_value_t = PrivMissingPolicy::Warn)]
    /// What to do with identifiers that are not in the artifact.
    pub missing: PrivMissingPolicy,
}

pub fn main(_global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let artifact = load_artifact(&args.artifact)?;
    let texts = retrieve_by_revid(&artifact, &args.revids, args.missing.into())?;
    log::info!(
        "Retrieved {} of {} requested revisions",
        texts.len(),
        args.revids.len()
    );
    emit(&texts)
}
