/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Ratio greedy with best-single check and 1-swap local improvement.

use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Returns a feasible subset by value/weight-ratio greedy selection,
/// followed by 1-swap local improvement.
///
/// Items are inserted in order of decreasing value/weight ratio (zero-weight
/// items first) while the capacity permits; the result is compared against
/// the single best item that fits alone, and the better of the two is then
/// improved by swapping one chosen item for one unchosen item as long as a
/// swap is feasible and strictly increases the total value. Ties are broken
/// by item index throughout.
pub fn greedy(values: &[u64], weights: &[u64], capacity: u64) -> Vec<usize> {
    debug_assert_eq!(values.len(), weights.len());
    let num_items = values.len();
    if num_items == 0 || capacity == 0 {
        return Vec::new();
    }

    let ratio = |i: usize| {
        if weights[i] == 0 {
            f64::INFINITY
        } else {
            values[i] as f64 / weights[i] as f64
        }
    };
    let mut order: Vec<usize> = (0..num_items).collect();
    order.sort_by(|&a, &b| ratio(b).total_cmp(&ratio(a)).then(a.cmp(&b)));

    let mut chosen = BTreeSet::new();
    let mut total_weight = 0u64;
    for &i in &order {
        if total_weight.saturating_add(weights[i]) <= capacity {
            chosen.insert(i);
            total_weight += weights[i];
        }
    }

    // the greedy fill can be arbitrarily bad without this check
    let best_single = (0..num_items)
        .filter(|&i| weights[i] <= capacity)
        .max_by_key(|&i| (values[i], Reverse(i)));
    if let Some(single) = best_single {
        let total_value: u64 = chosen.iter().map(|&i| values[i]).sum();
        if values[single] > total_value {
            chosen = BTreeSet::from([single]);
        }
    }

    let mut total_weight: u64 = chosen.iter().map(|&i| weights[i]).sum();
    let mut total_value: u64 = chosen.iter().map(|&i| values[i]).sum();
    loop {
        let mut improved = false;
        'swap: for &out in chosen.clone().iter() {
            for cand in 0..num_items {
                if chosen.contains(&cand) {
                    continue;
                }
                let new_weight = total_weight - weights[out] + weights[cand];
                if new_weight <= capacity {
                    let new_value = total_value - values[out] + values[cand];
                    if new_value > total_value {
                        chosen.remove(&out);
                        chosen.insert(cand);
                        total_weight = new_weight;
                        total_value = new_value;
                        improved = true;
                        break 'swap;
                    }
                }
            }
        }
        if !improved {
            break;
        }
    }

    chosen.into_iter().collect()
}
