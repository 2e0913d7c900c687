/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use revchain::comp::{compress, CompConfig};
use revchain::knapsack::{Solver, Strategy};
use revchain::retrieve::retrieve_range;
use revchain::sources::Revision;

fn history(texts: &[&str]) -> Vec<Revision> {
    texts
        .iter()
        .enumerate()
        .map(|(i, &text)| {
            Revision::new(
                100 + i as u64,
                format!("2024-01-{:02}T00:00:00Z", i + 1),
                text,
            )
        })
        .collect()
}

#[test]
fn test_trivial_history() -> Result<()> {
    let config = CompConfig::default()
        .with_time_budget(9)
        .with_strategy(Strategy::Greedy);
    let artifact = compress("trivial", history(&["a", "ab", "abc"]), &config)?;

    assert!(artifact.anchors.contains(&0));
    for (i, expected) in ["a", "ab", "abc"].iter().enumerate() {
        assert_eq!(retrieve_range(&artifact, i, 0)?, vec![expected.to_string()]);
    }
    assert_eq!(
        retrieve_range(&artifact, 0, 2)?,
        vec!["a".to_string(), "ab".to_string(), "abc".to_string()]
    );
    Ok(())
}

#[test]
fn test_single_revision() -> Result<()> {
    let artifact = compress("single", history(&["x"]), &CompConfig::default())?;
    assert_eq!(artifact.anchors, vec![0]);
    assert!(artifact.patches.is_empty());
    assert_eq!(retrieve_range(&artifact, 0, 0)?, vec!["x".to_string()]);
    Ok(())
}

#[test]
fn test_empty_history() -> Result<()> {
    let artifact = compress("empty", Vec::<Revision>::new(), &CompConfig::default())?;
    assert!(artifact.anchors.is_empty());
    assert!(artifact.patches.is_empty());
    assert_eq!(artifact.meta.count, 0);
    assert!(retrieve_range(&artifact, 0, 0).is_err());
    Ok(())
}

#[test]
fn test_no_beneficial_delta() -> Result<()> {
    // sizes shrink so fast that every value is non-positive: every position
    // becomes an anchor and no patch is stored
    let texts = [
        "x".repeat(100),
        "x".repeat(60),
        "x".repeat(40),
        "x".repeat(30),
        "x".repeat(20),
    ];
    let revisions = history(&texts.iter().map(String::as_str).collect::<Vec<_>>());
    let artifact = compress("shrinking", revisions, &CompConfig::default())?;

    assert_eq!(artifact.anchors, vec![0, 1, 2, 3, 4]);
    assert!(artifact.patches.is_empty());
    assert_eq!(
        retrieve_range(&artifact, 2, 1)?,
        vec![texts[2].clone(), texts[3].clone()]
    );
    Ok(())
}

#[test]
fn test_partition_covers_everything() -> Result<()> {
    let texts: Vec<String> = (0..40)
        .map(|i| "line\n".repeat(10 + (i * 7) % 23))
        .collect();
    let revisions = history(&texts.iter().map(String::as_str).collect::<Vec<_>>());
    let artifact = compress("cover", revisions, &CompConfig::default())?;

    let flat: Vec<usize> = artifact
        .meta
        .partitions
        .iter()
        .flatten()
        .copied()
        .collect();
    assert_eq!(flat, (0..40).collect::<Vec<_>>());

    let starts: Vec<usize> = artifact
        .meta
        .partitions
        .iter()
        .map(|chain| chain[0])
        .collect();
    assert_eq!(starts, artifact.anchors);
    assert_eq!(artifact.anchors[0], 0);

    // every anchor has a base text, every in-chain transition a patch
    for anchor in &artifact.anchors {
        assert!(artifact.base_texts.contains_key(anchor));
    }
    for chain in artifact.chains() {
        for pair in chain.windows(2) {
            assert!(artifact.patches.contains_key(&(pair[0], pair[1])));
        }
    }
    Ok(())
}

#[test]
fn test_meta_is_aligned() -> Result<()> {
    let revisions = history(&["a", "ab", "abcd", "abc"]);
    let revids: Vec<u64> = revisions.iter().map(|r| r.revid).collect();
    let artifact = compress("aligned", revisions, &CompConfig::default())?;

    let meta = &artifact.meta;
    assert_eq!(meta.count, 4);
    assert_eq!(meta.revids.as_ref().unwrap(), &revids);
    assert_eq!(meta.timestamps.as_ref().unwrap().len(), 4);
    assert_eq!(meta.sizes.as_ref().unwrap(), &[1, 2, 4, 3]);
    assert_eq!(meta.orig_size, 10);
    assert_eq!(meta.size_unit, "bytes");
    assert_eq!(
        meta.chain_lengths.as_ref().unwrap(),
        &meta
            .partitions
            .iter()
            .map(Vec::len)
            .collect::<Vec<usize>>()
    );
    Ok(())
}

#[test]
fn test_exact_space_cost_monotone_in_budget() -> Result<()> {
    let texts: Vec<String> = [4, 8, 16, 32, 64]
        .iter()
        .map(|&len| "y".repeat(len))
        .collect();
    let mut last_space_cost = None;
    for budget in [0, 12, 36, 84, 180] {
        let config = CompConfig::default()
            .with_solver(Solver::Exact)
            .with_time_budget(budget);
        let revisions = history(&texts.iter().map(String::as_str).collect::<Vec<_>>());
        let artifact = compress("budgeted", revisions, &config)?;
        if let Some(last) = last_space_cost {
            assert!(
                artifact.meta.space_cost <= last,
                "space cost increased from {} to {} when the budget grew to {}",
                last,
                artifact.meta.space_cost,
                budget
            );
        }
        last_space_cost = Some(artifact.meta.space_cost);
    }
    Ok(())
}
