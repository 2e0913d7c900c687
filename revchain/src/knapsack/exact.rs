/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Exact 0/1 knapsack by classical dynamic programming.

use super::CapacityOverflow;

/// Safety bound on the number of cells of the dynamic-programming table
/// (one `u64` per cell). The bound is a knob, not a contract: it exists so
/// that an oversized capacity fails fast instead of aborting on allocation.
pub const MAX_TABLE_CELLS: u128 = 1 << 27;

/// Returns a subset of items of maximum total value among those of total
/// weight at most `capacity`.
///
/// The subset is returned as a sorted list of item indices. Ties are broken
/// by preferring lower-index items. Runs in `O(m·C)` time and space; fails
/// with [`CapacityOverflow`] when the `(m + 1) × (C + 1)` table would exceed
/// [`MAX_TABLE_CELLS`].
pub fn exact(
    values: &[u64],
    weights: &[u64],
    capacity: u64,
) -> Result<Vec<usize>, CapacityOverflow> {
    debug_assert_eq!(values.len(), weights.len());
    let num_items = values.len();
    if num_items == 0 || capacity == 0 {
        return Ok(Vec::new());
    }
    let cells = (num_items as u128 + 1) * (capacity as u128 + 1);
    if cells > MAX_TABLE_CELLS {
        return Err(CapacityOverflow {
            cells,
            bound: MAX_TABLE_CELLS,
        });
    }

    let cols = capacity as usize + 1;
    // table[i * cols + c]: best total value using the first i items within
    // capacity c
    let mut table = vec![0u64; (num_items + 1) * cols];
    for i in 1..=num_items {
        let value = values[i - 1];
        let weight = weights[i - 1] as usize;
        let (prev_row, row) = table.split_at_mut(i * cols);
        let prev_row = &prev_row[(i - 1) * cols..];
        for c in 0..cols {
            let skip = prev_row[c];
            row[c] = if weight <= c {
                let take = value + prev_row[c - weight];
                // on ties the item is skipped, so backtracking keeps
                // lower-index items
                if take > skip { take } else { skip }
            } else {
                skip
            };
        }
    }

    let mut chosen = Vec::new();
    let mut c = capacity as usize;
    for i in (1..=num_items).rev() {
        if table[i * cols + c] != table[(i - 1) * cols + c] {
            chosen.push(i - 1);
            c -= weights[i - 1] as usize;
        }
    }
    chosen.reverse();
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small() {
        // items {1, 2} fit in capacity 4 with value 7
        let chosen = exact(&[5, 4, 3], &[3, 2, 2], 4).unwrap();
        assert_eq!(chosen, vec![1, 2]);
    }

    #[test]
    fn test_empty_and_zero_capacity() {
        assert!(exact(&[], &[], 10).unwrap().is_empty());
        assert!(exact(&[1, 2], &[1, 1], 0).unwrap().is_empty());
    }

    #[test]
    fn test_overflow() {
        let err = exact(&[1; 1000], &[1; 1000], u64::MAX / 2).unwrap_err();
        assert!(err.cells > err.bound);
    }
}
