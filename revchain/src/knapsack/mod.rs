/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! 0/1 knapsack solvers used to select delta transitions under a time
//! budget.
//!
//! All solvers share the same contract: given per-item values and weights
//! (both positive) and an integer capacity, return a set of item indices
//! whose total weight does not exceed the capacity. The [`exact()`] solver
//! maximizes the total value; the heuristic solvers ([`greedy()`],
//! [`fptas()`], and [`sparse()`]) trade optimality for bounded time and
//! memory, and are the
//! right choice when the exact dynamic-programming table would not fit in
//! memory.
//!
//! Chosen subsets are always returned sorted by item index, and every solver
//! is deterministic: ties are broken by item index.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod exact;
pub mod fptas;
pub mod greedy;
pub mod sparse;

pub use exact::exact;
pub use fptas::fptas;
pub use greedy::greedy;
pub use sparse::sparse;

#[derive(Error, Debug, Clone)]
/// The exact solver would exceed its table safety bound.
///
/// Retry with [`Solver::Heuristic`], whose strategies have bounded memory.
#[error("exact 0/1 knapsack would allocate {cells} table cells (safety bound: {bound}); use a heuristic strategy instead")]
pub struct CapacityOverflow {
    /// The number of cells the dynamic-programming table would require.
    pub cells: u128,
    /// The configured safety bound on table cells.
    pub bound: u128,
}

/// The family of solvers used to select delta transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Solver {
    /// Exact 0/1 dynamic programming; optimal but `O(m·C)` time and space.
    Exact,
    /// One of the heuristic strategies of [`Strategy`].
    #[default]
    Heuristic,
}

/// The heuristic strategy used when [`Solver::Heuristic`] is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Pick a strategy from the problem shape; see [`heuristic`].
    #[default]
    Auto,
    /// Ratio greedy with best-single check and 1-swap improvement.
    Greedy,
    /// Value-scaling (1 − ε)-approximation scheme.
    Fptas,
    /// Sparse dynamic programming with dominance pruning.
    Sparse,
}

impl core::fmt::Display for Solver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Solver::Exact => "exact",
            Solver::Heuristic => "heuristic",
        })
    }
}

impl core::fmt::Display for Strategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Strategy::Auto => "auto",
            Strategy::Greedy => "greedy",
            Strategy::Fptas => "fptas",
            Strategy::Sparse => "sparse",
        })
    }
}

/// Solves the knapsack with the given heuristic strategy.
///
/// With [`Strategy::Auto`] the strategy is picked from the problem shape:
/// sparse dynamic programming for small instances (at most 200 items and
/// capacity at most 200 000), where it is usually exact in practice; the
/// FPTAS for large instances (at least 2000 items), to bound time and
/// memory; ratio greedy with 1-swap improvement otherwise.
pub fn heuristic(
    values: &[u64],
    weights: &[u64],
    capacity: u64,
    strategy: Strategy,
    eps: f64,
    max_states: usize,
) -> Vec<usize> {
    match strategy {
        Strategy::Greedy => greedy(values, weights, capacity),
        Strategy::Fptas => fptas(values, weights, capacity, eps),
        Strategy::Sparse => sparse(values, weights, capacity, max_states),
        Strategy::Auto => {
            let num_items = values.len();
            if num_items <= 200 && capacity <= 200_000 {
                sparse(values, weights, capacity, max_states)
            } else if num_items >= 2000 {
                fptas(values, weights, capacity, eps)
            } else {
                greedy(values, weights, capacity)
            }
        }
    }
}
