/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The revision-chain compression engine.
//!
//! [`compress`] turns a finite sequence of revisions into a write-once
//! [`Artifact`]: the size vector is mapped to per-transition selection costs
//! by the [cost model](cost::CostModel), a knapsack solver chooses which
//! transitions to store as deltas under the time budget, the
//! [partitioner](partition::Partition) derives anchors and chains, and a
//! line-level [patch](crate::patch::Patch) is built for every in-chain
//! transition.
//!
//! The time budget bounds the *model* retrieval cost of the partition, not
//! wall-clock time: a larger budget allows longer chains (less space, slower
//! retrieval), while a budget of zero stores every revision as an anchor.
//! When no budget is given it defaults to n², an empirical default that
//! allows chains of moderate length on typical histories.

use std::collections::{BTreeMap, BTreeSet};

use dsi_progress_logger::prelude::*;
use itertools::Itertools;

use crate::artifact::{Artifact, Meta, SIZE_UNIT};
use crate::knapsack::{self, CapacityOverflow, Solver, Strategy};
use crate::patch::Patch;
use crate::sources::Revision;

pub mod cost;
pub mod partition;

use partition::Partition;

/// Configuration of a compression run.
///
/// The default configuration uses the heuristic solver with automatic
/// strategy selection and a time budget of n².
#[derive(Debug, Clone)]
pub struct CompConfig {
    /// The time budget; defaults to n² when `None`.
    pub time_budget: Option<u64>,
    /// The solver family.
    pub solver: Solver,
    /// The heuristic strategy (ignored by the exact solver).
    pub strategy: Strategy,
    /// The approximation parameter of the FPTAS strategy.
    pub eps: f64,
    /// The state cap of the sparse strategy.
    pub max_states: usize,
}

impl Default for CompConfig {
    fn default() -> Self {
        CompConfig {
            time_budget: None,
            solver: Solver::Heuristic,
            strategy: Strategy::Auto,
            eps: 0.1,
            max_states: 100_000,
        }
    }
}

impl CompConfig {
    /// Sets the time budget.
    pub fn with_time_budget(mut self, time_budget: u64) -> Self {
        self.time_budget = Some(time_budget);
        self
    }

    /// Sets the solver family.
    pub fn with_solver(mut self, solver: Solver) -> Self {
        self.solver = solver;
        self
    }

    /// Sets the heuristic strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the approximation parameter of the FPTAS strategy.
    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// Sets the state cap of the sparse strategy.
    pub fn with_max_states(mut self, max_states: usize) -> Self {
        self.max_states = max_states;
        self
    }
}

/// Compresses a revision history into an [`Artifact`].
///
/// Revisions are consumed exactly once; positions are assigned in arrival
/// order and stored metadata (revision identifiers, timestamps, sizes) is
/// aligned with them. An empty history yields an empty artifact, which is
/// not an error.
///
/// The only failure mode is [`CapacityOverflow`] from the exact solver, in
/// which case the caller should retry with a heuristic.
pub fn compress(
    title: &str,
    revisions: impl IntoIterator<Item = Revision>,
    config: &CompConfig,
) -> Result<Artifact, CapacityOverflow> {
    let revs: Vec<Revision> = revisions.into_iter().collect();
    let n = revs.len();
    let time_budget = config
        .time_budget
        .unwrap_or_else(|| (n as u64).saturating_mul(n as u64));

    if n == 0 {
        log::info!("Nothing to compress for {:?}: empty revision history", title);
        return Ok(empty_artifact(title, config));
    }

    let sizes: Vec<u64> = revs.iter().map(Revision::size).collect();
    let model = cost::CostModel::from_sizes(&sizes);

    let chosen_local = if model.is_empty() {
        Vec::new()
    } else {
        match config.solver {
            Solver::Exact => knapsack::exact(&model.values, &model.weights, time_budget)?,
            Solver::Heuristic => knapsack::heuristic(
                &model.values,
                &model.weights,
                time_budget,
                config.strategy,
                config.eps,
                config.max_states,
            ),
        }
    };
    let chosen: BTreeSet<usize> = chosen_local.iter().map(|&j| model.transitions[j]).collect();
    let partition = Partition::from_transitions(n, &chosen);

    let mut pl = ProgressLogger::default();
    pl.item_name("patch").expected_updates(Some(chosen.len()));
    pl.start("Building patches...");
    let mut patches = BTreeMap::new();
    for chain in partition.chains() {
        for (&u, &v) in chain.iter().tuple_windows() {
            patches.insert((u, v), Patch::between(&revs[u].text, &revs[v].text));
            pl.light_update();
        }
    }
    pl.done();

    let base_texts: BTreeMap<usize, String> = partition
        .anchors()
        .iter()
        .map(|&a| (a, revs[a].text.clone()))
        .collect();
    let anchors = partition.anchors().to_vec();
    let chains = partition.into_chains();

    let meta = Meta {
        title: title.to_owned(),
        count: n,
        partitions: chains.clone(),
        revids: Some(revs.iter().map(|r| r.revid).collect()),
        timestamps: Some(revs.iter().map(|r| r.timestamp.clone()).collect()),
        sizes: Some(sizes.clone()),
        orig_size: cost::orig_size(&sizes),
        space_cost: cost::space_cost(&sizes, &chains),
        time_cost: cost::time_cost(&sizes, &chains),
        solver: config.solver,
        strategy: config.strategy,
        time_budget: Some(time_budget),
        chain_lengths: Some(chains.iter().map(Vec::len).collect()),
        page_id: revs[0].page_id,
        size_unit: SIZE_UNIT.to_owned(),
        extra: BTreeMap::new(),
    };

    log::info!(
        "Compressed {} revisions of {:?} into {} chains ({} anchors, {} patches, space cost {} / {} bytes)",
        n,
        title,
        meta.partitions.len(),
        anchors.len(),
        patches.len(),
        meta.space_cost,
        meta.orig_size,
    );

    Ok(Artifact {
        title: title.to_owned(),
        anchors,
        patches,
        meta,
        base_texts,
    })
}

fn empty_artifact(title: &str, config: &CompConfig) -> Artifact {
    Artifact {
        title: title.to_owned(),
        anchors: Vec::new(),
        patches: BTreeMap::new(),
        meta: Meta {
            title: title.to_owned(),
            count: 0,
            partitions: Vec::new(),
            revids: Some(Vec::new()),
            timestamps: Some(Vec::new()),
            sizes: Some(Vec::new()),
            orig_size: 0,
            space_cost: 0,
            time_cost: 0,
            solver: config.solver,
            strategy: config.strategy,
            time_budget: config.time_budget,
            chain_lengths: Some(Vec::new()),
            page_id: None,
            size_unit: SIZE_UNIT.to_owned(),
            extra: BTreeMap::new(),
        },
        base_texts: BTreeMap::new(),
    }
}
