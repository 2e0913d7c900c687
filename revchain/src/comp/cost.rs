/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The cost models of the compression engine.
//!
//! Two distinct models live here. The *selection* model ([`CostModel`])
//! turns the size vector into per-transition (value, weight) pairs fed to
//! the knapsack solvers: the value estimates the bytes saved by storing a
//! delta instead of a full anchor, the weight estimates the retrieval work
//! of crossing the transition. The *analytics* model ([`space_cost`],
//! [`time_cost`], [`orig_size`]) estimates the stored bytes and retrieval
//! work of a finished partition; it is recorded in artifact metadata and
//! used for regression, not for byte-accurate accounting.

use itertools::Itertools;

/// Per-transition selection costs derived from the size vector.
///
/// For each transition i ∈ [1, n), the approximate diff magnitude is
/// dᵢ = 2·|sᵢ − sᵢ₋₁|, the value is vᵢ = dᵢ − sᵢ₋₁, and the weight is
/// wᵢ = sᵢ₋₁ + dᵢ. Transitions with non-positive value or weight can never
/// beneficially be selected and are filtered out; `transitions` maps the
/// filtered items back to their original transition index.
#[derive(Debug, Clone, Default)]
pub struct CostModel {
    /// Value of each kept item.
    pub values: Vec<u64>,
    /// Weight of each kept item.
    pub weights: Vec<u64>,
    /// For each kept item, the original transition index in [1, n).
    pub transitions: Vec<usize>,
}

impl CostModel {
    /// Derives the selection costs from the size vector.
    pub fn from_sizes(sizes: &[u64]) -> Self {
        let mut model = CostModel::default();
        for i in 1..sizes.len() {
            let diff = 2 * sizes[i].abs_diff(sizes[i - 1]);
            let value = diff as i128 - sizes[i - 1] as i128;
            let weight = sizes[i - 1] + diff;
            if value > 0 && weight > 0 {
                model.values.push(value as u64);
                model.weights.push(weight);
                model.transitions.push(i);
            }
        }
        model
    }

    /// The number of items that survived filtering.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no transition can beneficially be selected.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The total size of the uncompressed history, in bytes.
pub fn orig_size(sizes: &[u64]) -> u64 {
    sizes.iter().sum()
}

/// Approximate stored bytes of a partition: for each chain, the size of its
/// anchor plus the absolute size difference across each in-chain
/// transition.
pub fn space_cost(sizes: &[u64], partitions: &[Vec<usize>]) -> u64 {
    let mut total = 0;
    for part in partitions {
        let Some(&first) = part.first() else { continue };
        total += sizes[first];
        for (&a, &b) in part.iter().tuple_windows() {
            total += sizes[b].abs_diff(sizes[a]);
        }
    }
    total
}

/// Approximate retrieval work of a partition: 1 per chain, plus, for each
/// in-chain transition, the size of the source revision and the absolute
/// size difference.
pub fn time_cost(sizes: &[u64], partitions: &[Vec<usize>]) -> u64 {
    let mut total = 0;
    for part in partitions {
        if part.is_empty() {
            continue;
        }
        let mut subtotal = 1;
        for (&a, &b) in part.iter().tuple_windows() {
            subtotal += sizes[a] + sizes[b].abs_diff(sizes[a]);
        }
        total += subtotal;
    }
    total
}
