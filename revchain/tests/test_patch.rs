/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use revchain::patch::Patch;

fn random_text(rng: &mut SmallRng, max_lines: usize, trailing_newline: bool) -> String {
    let lines = rng.random_range(0..=max_lines);
    let mut text = String::new();
    for _ in 0..lines {
        text.push_str(&format!("w{}\n", rng.random_range(0..8)));
    }
    if !trailing_newline && !text.is_empty() {
        text.pop();
    }
    text
}

#[test]
fn test_roundtrip_random_pairs() {
    let mut rng = SmallRng::seed_from_u64(7);
    for _ in 0..500 {
        let old_trailing = rng.random_bool(0.8);
        let old = random_text(&mut rng, 12, old_trailing);
        let new_trailing = rng.random_bool(0.8);
        let new = random_text(&mut rng, 12, new_trailing);
        let patch = Patch::between(&old, &new);
        assert_eq!(
            patch.apply(&old).unwrap(),
            new,
            "round trip failed for {:?} -> {:?}",
            old,
            new
        );
    }
}

#[test]
fn test_patch_is_forward_only() {
    // a patch built for one transition must not silently apply to an
    // unrelated text of a different line count
    let patch = Patch::between("a\nb\nc\n", "a\nc\n");
    assert!(patch.apply("a\nb\nc\nd\n").is_err());
}

#[test]
fn test_patch_wire_form() {
    // the serde form is a plain array of tagged ops
    let patch = Patch::between("a\nb\n", "a\nc\n");
    let json = serde_json::to_string(&patch).unwrap();
    let back: Patch = serde_json::from_str(&json).unwrap();
    assert_eq!(back, patch);
    assert!(json.starts_with('['), "unexpected wire form: {}", json);
}
