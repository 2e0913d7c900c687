/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Sparse 0/1 knapsack dynamic programming with dominance pruning.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy)]
struct State {
    value: u64,
    /// Weight of the state this one was reached from.
    parent_weight: u64,
    /// Layer of the parent state; layer i is the map before item i is
    /// considered.
    parent_layer: usize,
    /// The item whose selection created this state, if any.
    item: Option<usize>,
}

/// Returns a feasible subset by layered dynamic programming over reachable
/// weights.
///
/// One layer is kept per item, mapping each reachable weight to the best
/// value achieving it, together with a back-pointer. After every layer,
/// dominated states (those with another state of weight ≤ and value ≥) are
/// pruned, which keeps values strictly increasing with weight. When a layer
/// still exceeds `max_states`, it is thinned by a deterministic stride; the
/// result remains feasible but loses any optimality claim. On small
/// instances with no thinning the result is exact in practice.
pub fn sparse(values: &[u64], weights: &[u64], capacity: u64, max_states: usize) -> Vec<usize> {
    debug_assert_eq!(values.len(), weights.len());
    let num_items = values.len();
    if num_items == 0 || capacity == 0 {
        return Vec::new();
    }
    let max_states = max_states.max(1);

    let mut layers: Vec<BTreeMap<u64, State>> = Vec::with_capacity(num_items + 1);
    layers.push(BTreeMap::from([(
        0,
        State {
            value: 0,
            parent_weight: 0,
            parent_layer: 0,
            item: None,
        },
    )]));

    for i in 0..num_items {
        let (value, weight) = (values[i], weights[i]);
        let cur = &layers[i];
        // skipping item i keeps every state of the current layer
        let mut next = cur.clone();
        for (&state_weight, state) in cur.iter() {
            let Some(new_weight) = state_weight.checked_add(weight) else {
                continue;
            };
            if new_weight > capacity {
                continue;
            }
            let new_value = state.value + value;
            let better = match next.get(&new_weight) {
                Some(existing) => new_value > existing.value,
                None => true,
            };
            if better {
                next.insert(
                    new_weight,
                    State {
                        value: new_value,
                        parent_weight: state_weight,
                        parent_layer: i,
                        item: Some(i),
                    },
                );
            }
        }

        // dominance pruning: walking weights upward, keep only states of
        // strictly increasing value
        let mut pruned = BTreeMap::new();
        let mut best_value = None;
        for (state_weight, state) in next {
            if best_value.is_none_or(|best| state.value > best) {
                best_value = Some(state.value);
                pruned.insert(state_weight, state);
            }
        }

        if pruned.len() > max_states {
            let stride = (pruned.len() / max_states).max(1);
            pruned = pruned
                .into_iter()
                .enumerate()
                .filter(|(rank, _)| rank % stride == 0)
                .map(|(_, entry)| entry)
                .collect();
        }

        layers.push(pruned);
    }

    // after pruning, values increase strictly with weight, so the heaviest
    // state of the final layer is the best feasible one
    let Some((&best_weight, _)) = layers[num_items].iter().next_back() else {
        return Vec::new();
    };

    let mut chosen = Vec::new();
    let mut cur_weight = best_weight;
    let mut cur_layer = num_items;
    while let Some(state) = layers[cur_layer].get(&cur_weight) {
        match state.item {
            None => break,
            Some(i) => {
                chosen.push(i);
                cur_weight = state.parent_weight;
                cur_layer = state.parent_layer;
            }
        }
    }
    chosen.sort_unstable();
    chosen
}
