/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Retrieval commands.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use revchain::artifact::Artifact;

use super::GlobalArgs;

pub mod index;
pub mod revid;
pub mod time;

#[derive(Subcommand, Debug)]
#[command(name = "get")]
/// Retrieve revisions from an artifact.
pub enum SubCommands {
    Index(index::CliArgs),
    Revid(revid::CliArgs),
    Time(time::CliArgs),
}

pub fn main(global_args: GlobalArgs, subcommand: SubCommands) -> Result<()> {
    match subcommand {
        SubCommands::Index(args) => index::main(global_args, args),
        SubCommands::Revid(args) => revid::main(global_args, args),
        SubCommands::Time(args) => time::main(global_args, args),
    }
}

/// Loads the artifact at `path`, with context on failure.
pub(crate) fn load_artifact(path: &Path) -> Result<Artifact> {
    Artifact::load(path).with_context(|| format!("Could not load artifact {}", path.display()))
}

/// Writes the retrieved texts to standard output, in order.
pub(crate) fn emit(texts: &[String]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for text in texts {
        out.write_all(text.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}
