/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Summary metrics over stored artifacts.
//!
//! These are the numbers behind the `revchain analyze` command: per-artifact
//! partition statistics and model costs, with fallback recomputation for
//! artifacts written before the costs were stored in metadata.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::artifact::{Artifact, Meta};
use crate::comp::cost;
use crate::knapsack::{Solver, Strategy};

/// Summary metrics of a single artifact.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactSummary {
    pub path: PathBuf,
    pub title: String,
    pub page_id: Option<u64>,
    pub num_revisions: usize,
    pub num_anchors: usize,
    pub num_chains: usize,
    pub avg_chain_len: f64,
    pub max_chain_len: usize,
    pub space_cost: u64,
    pub time_cost: u64,
    pub orig_size: u64,
    /// `space_cost / orig_size`; `None` for empty histories.
    pub compression_ratio: Option<f64>,
    /// `num_anchors / num_revisions`; `None` for empty histories.
    pub anchor_density: Option<f64>,
    pub solver: Solver,
    pub strategy: Strategy,
    pub time_budget: Option<u64>,
}

/// The number of revisions, inferred from aligned metadata when `count` is
/// absent (artifacts written by older versions).
fn count_or_infer(meta: &Meta) -> usize {
    if meta.count != 0 {
        return meta.count;
    }
    meta.revids
        .as_ref()
        .map(Vec::len)
        .or_else(|| meta.timestamps.as_ref().map(Vec::len))
        .or_else(|| meta.sizes.as_ref().map(Vec::len))
        .unwrap_or_else(|| meta.partitions.iter().map(Vec::len).sum())
}

/// Summarizes an already loaded artifact.
pub fn summarize_artifact(path: &Path, artifact: &Artifact) -> ArtifactSummary {
    let meta = &artifact.meta;
    let chains = &meta.partitions;
    let num_revisions = count_or_infer(meta);

    let max_chain_len = chains.iter().map(Vec::len).max().unwrap_or(0);
    let avg_chain_len = if chains.is_empty() {
        0.0
    } else {
        chains.iter().map(Vec::len).sum::<usize>() as f64 / chains.len() as f64
    };

    let (mut space_cost, mut time_cost, mut orig_size) =
        (meta.space_cost, meta.time_cost, meta.orig_size);
    if space_cost == 0 && time_cost == 0 && orig_size == 0 && num_revisions > 0 {
        // legacy artifact without stored costs; recompute from sizes
        if let Some(sizes) = &meta.sizes {
            space_cost = cost::space_cost(sizes, chains);
            time_cost = cost::time_cost(sizes, chains);
            orig_size = cost::orig_size(sizes);
        }
    }

    ArtifactSummary {
        path: path.to_owned(),
        title: if meta.title.is_empty() {
            artifact.title.clone()
        } else {
            meta.title.clone()
        },
        page_id: meta.page_id,
        num_revisions,
        num_anchors: artifact.anchors.len(),
        num_chains: chains.len(),
        avg_chain_len,
        max_chain_len,
        space_cost,
        time_cost,
        orig_size,
        compression_ratio: (orig_size > 0).then(|| space_cost as f64 / orig_size as f64),
        anchor_density: (num_revisions > 0)
            .then(|| artifact.anchors.len() as f64 / num_revisions as f64),
        solver: meta.solver,
        strategy: meta.strategy,
        time_budget: meta.time_budget,
    }
}

/// Loads and summarizes the artifact at `path`.
pub fn summarize(path: impl AsRef<Path>) -> Result<ArtifactSummary> {
    let path = path.as_ref();
    let artifact = Artifact::load(path)
        .with_context(|| format!("Could not load artifact {}", path.display()))?;
    Ok(summarize_artifact(path, &artifact))
}

/// Collects the artifact files directly under `dir` whose name ends with
/// `suffix`, sorted by path.
pub fn scan_artifacts(dir: impl AsRef<Path>, suffix: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut paths = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("Could not read directory {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file()
            && path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().ends_with(suffix))
        {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
