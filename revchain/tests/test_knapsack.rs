/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use revchain::knapsack::{exact, fptas, greedy, heuristic, sparse, Strategy};

fn total(values: &[u64], chosen: &[usize]) -> u64 {
    chosen.iter().map(|&i| values[i]).sum()
}

#[test]
fn test_exact_vs_heuristics() -> Result<()> {
    // exact picks {1, 2} with total value 7
    let values = [5, 4, 3];
    let weights = [3, 2, 2];
    let capacity = 4;

    let best = exact(&values, &weights, capacity)?;
    assert_eq!(total(&values, &best), 7);

    for strategy in [
        Strategy::Auto,
        Strategy::Greedy,
        Strategy::Fptas,
        Strategy::Sparse,
    ] {
        let chosen = heuristic(&values, &weights, capacity, strategy, 0.1, 100_000);
        assert!(
            total(&weights, &chosen) <= capacity,
            "{:?} is infeasible",
            strategy
        );
        assert!(
            total(&values, &chosen) <= 7,
            "{:?} beats the optimum",
            strategy
        );
    }

    // the FPTAS guarantees (1 - eps) of the optimum
    let approx = fptas(&values, &weights, capacity, 0.1);
    assert!(total(&values, &approx) as f64 >= 0.9 * 7.0);
    Ok(())
}

#[test]
fn test_feasibility_random() -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    for _ in 0..50 {
        let num_items = rng.random_range(1..20);
        let values: Vec<u64> = (0..num_items).map(|_| rng.random_range(1..50)).collect();
        let weights: Vec<u64> = (0..num_items).map(|_| rng.random_range(1..30)).collect();
        let capacity = rng.random_range(1..100);

        let best = exact(&values, &weights, capacity)?;
        assert!(total(&weights, &best) <= capacity);
        let best_value = total(&values, &best);

        for chosen in [
            greedy(&values, &weights, capacity),
            fptas(&values, &weights, capacity, 0.1),
            sparse(&values, &weights, capacity, 100_000),
        ] {
            assert!(total(&weights, &chosen) <= capacity);
            assert!(total(&values, &chosen) <= best_value);
        }

        // sparse without thinning is exact
        assert_eq!(
            total(&values, &sparse(&values, &weights, capacity, 100_000)),
            best_value
        );
    }
    Ok(())
}

#[test]
fn test_determinism() {
    let mut rng = SmallRng::seed_from_u64(42);
    let values: Vec<u64> = (0..30).map(|_| rng.random_range(1..100)).collect();
    let weights: Vec<u64> = (0..30).map(|_| rng.random_range(1..50)).collect();
    for strategy in [Strategy::Greedy, Strategy::Fptas, Strategy::Sparse] {
        let first = heuristic(&values, &weights, 200, strategy, 0.1, 1000);
        let second = heuristic(&values, &weights, 200, strategy, 0.1, 1000);
        assert_eq!(first, second, "{:?} is not deterministic", strategy);
    }
}

#[test]
fn test_exact_value_monotone_in_capacity() -> Result<()> {
    let values = [10, 7, 9, 4, 6];
    let weights = [8, 5, 7, 2, 4];
    let mut last = 0;
    for capacity in 0..30 {
        let value = total(&values, &exact(&values, &weights, capacity)?);
        assert!(value >= last);
        last = value;
    }
    Ok(())
}

#[test]
fn test_capacity_overflow() {
    let values = vec![1u64; 10_000];
    let weights = vec![1u64; 10_000];
    let err = exact(&values, &weights, 1 << 40).unwrap_err();
    assert!(err.cells > err.bound);
}

#[test]
fn test_thinning_is_feasible_not_optimal() {
    // with a tiny state cap the sparse solver must stay feasible
    let values: Vec<u64> = (1..=64).collect();
    let weights: Vec<u64> = (1..=64).map(|w| w * 2 + 1).collect();
    let capacity = 1000;
    let chosen = sparse(&values, &weights, capacity, 8);
    let weight: u64 = chosen.iter().map(|&i| weights[i]).sum();
    assert!(weight <= capacity);
}
