/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Self-contained line-level forward patches.
//!
//! A [`Patch`] transforms the text at position *u* into the text at position
//! *u* + 1 of the same chain. It is a sequence of tagged operations over
//! lines (line terminators included, so reconstruction is byte-exact even
//! for texts without a trailing newline): [`Keep`](PatchOp::Keep) copies the
//! next *k* lines of the base text, [`Delete`](PatchOp::Delete) skips them,
//! and [`Insert`](PatchOp::Insert) emits new bytes. The operations of a
//! patch always account for every line of the base text, which gives a cheap
//! integrity check at application time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// The patch does not account for the text it was applied to.
#[error("patch does not fit the text it is applied to")]
pub struct PatchMismatch;

/// A single patch operation over lines of the base text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchOp {
    /// Copy the next `k` lines of the base text to the output.
    Keep(usize),
    /// Emit these bytes (one or more whole lines) to the output.
    Insert(String),
    /// Skip the next `k` lines of the base text.
    Delete(usize),
}

/// A line-level forward diff between two texts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch {
    ops: Vec<PatchOp>,
}

/// Splits a text into lines, keeping the terminators, so that the
/// concatenation of the parts is the original text.
fn lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

fn push_keep(ops: &mut Vec<PatchOp>, k: usize) {
    if k == 0 {
        return;
    }
    if let Some(PatchOp::Keep(last)) = ops.last_mut() {
        *last += k;
    } else {
        ops.push(PatchOp::Keep(k));
    }
}

fn push_delete(ops: &mut Vec<PatchOp>, k: usize) {
    if k == 0 {
        return;
    }
    if let Some(PatchOp::Delete(last)) = ops.last_mut() {
        *last += k;
    } else {
        ops.push(PatchOp::Delete(k));
    }
}

fn push_insert(ops: &mut Vec<PatchOp>, line: &str) {
    if let Some(PatchOp::Insert(last)) = ops.last_mut() {
        last.push_str(line);
    } else {
        ops.push(PatchOp::Insert(line.to_owned()));
    }
}

impl Patch {
    /// Computes the forward diff turning `old` into `new`.
    ///
    /// Common leading and trailing lines are stripped before running a
    /// longest-common-subsequence alignment on the remaining lines, so the
    /// quadratic table is proportional to the changed region, not to the
    /// whole text.
    pub fn between(old: &str, new: &str) -> Self {
        let old_lines = lines(old);
        let new_lines = lines(new);

        let mut prefix = 0;
        while prefix < old_lines.len()
            && prefix < new_lines.len()
            && old_lines[prefix] == new_lines[prefix]
        {
            prefix += 1;
        }
        let mut suffix = 0;
        while suffix < old_lines.len() - prefix
            && suffix < new_lines.len() - prefix
            && old_lines[old_lines.len() - 1 - suffix] == new_lines[new_lines.len() - 1 - suffix]
        {
            suffix += 1;
        }

        let old_mid = &old_lines[prefix..old_lines.len() - suffix];
        let new_mid = &new_lines[prefix..new_lines.len() - suffix];

        let mut ops = Vec::new();
        push_keep(&mut ops, prefix);

        // lcs[i * (cols + 1) + j] is the LCS length of old_mid[i..] and
        // new_mid[j..].
        let rows = old_mid.len();
        let cols = new_mid.len();
        let mut lcs = vec![0u32; (rows + 1) * (cols + 1)];
        for i in (0..rows).rev() {
            for j in (0..cols).rev() {
                lcs[i * (cols + 1) + j] = if old_mid[i] == new_mid[j] {
                    lcs[(i + 1) * (cols + 1) + j + 1] + 1
                } else {
                    lcs[(i + 1) * (cols + 1) + j].max(lcs[i * (cols + 1) + j + 1])
                };
            }
        }

        let (mut i, mut j) = (0, 0);
        while i < rows && j < cols {
            if old_mid[i] == new_mid[j] {
                push_keep(&mut ops, 1);
                i += 1;
                j += 1;
            } else if lcs[(i + 1) * (cols + 1) + j] >= lcs[i * (cols + 1) + j + 1] {
                // deletions before insertions on ties
                push_delete(&mut ops, 1);
                i += 1;
            } else {
                push_insert(&mut ops, new_mid[j]);
                j += 1;
            }
        }
        push_delete(&mut ops, rows - i);
        for line in &new_mid[j..] {
            push_insert(&mut ops, line);
        }

        push_keep(&mut ops, suffix);
        Patch { ops }
    }

    /// Applies the patch to `base`, returning the patched text.
    ///
    /// Fails with [`PatchMismatch`] if the operations do not account for
    /// exactly the lines of `base`.
    pub fn apply(&self, base: &str) -> Result<String, PatchMismatch> {
        let base_lines = lines(base);
        let mut out = String::with_capacity(base.len());
        let mut cursor: usize = 0;
        for op in &self.ops {
            match op {
                PatchOp::Keep(k) => {
                    let end = cursor.checked_add(*k).ok_or(PatchMismatch)?;
                    if end > base_lines.len() {
                        return Err(PatchMismatch);
                    }
                    for line in &base_lines[cursor..end] {
                        out.push_str(line);
                    }
                    cursor = end;
                }
                PatchOp::Delete(k) => {
                    let end = cursor.checked_add(*k).ok_or(PatchMismatch)?;
                    if end > base_lines.len() {
                        return Err(PatchMismatch);
                    }
                    cursor = end;
                }
                PatchOp::Insert(text) => out.push_str(text),
            }
        }
        if cursor != base_lines.len() {
            return Err(PatchMismatch);
        }
        Ok(out)
    }

    /// The operations of this patch.
    pub fn ops(&self) -> &[PatchOp] {
        &self.ops
    }

    /// Returns true if the patch has no operations (the diff of two empty
    /// texts).
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(old: &str, new: &str) {
        let patch = Patch::between(old, new);
        assert_eq!(patch.apply(old).unwrap(), new, "{:?} -> {:?}", old, new);
    }

    #[test]
    fn test_roundtrip() {
        roundtrip("", "");
        roundtrip("", "a\n");
        roundtrip("a\n", "");
        roundtrip("a\nb\nc\n", "a\nb\nc\n");
        roundtrip("a\nb\nc\n", "a\nx\nc\n");
        roundtrip("a\nb\nc\n", "c\nb\na\n");
        roundtrip("a\nb\nc\n", "a\nb\nc\nd\ne\n");
        roundtrip("one\ntwo\nthree\n", "two\n");
    }

    #[test]
    fn test_no_trailing_newline() {
        roundtrip("a", "ab");
        roundtrip("a\nb", "a\nb\n");
        roundtrip("a\nb\n", "a\nb");
        roundtrip("x", "y");
    }

    #[test]
    fn test_identical_is_single_keep() {
        let patch = Patch::between("a\nb\n", "a\nb\n");
        assert_eq!(patch.ops(), &[PatchOp::Keep(2)]);
    }

    #[test]
    fn test_runs_are_merged() {
        let patch = Patch::between("a\nb\nc\nd\n", "a\nx\ny\nd\n");
        for pair in patch.ops().windows(2) {
            assert!(
                std::mem::discriminant(&pair[0]) != std::mem::discriminant(&pair[1]),
                "adjacent ops of the same kind: {:?}",
                patch.ops()
            );
        }
        assert_eq!(patch.apply("a\nb\nc\nd\n").unwrap(), "a\nx\ny\nd\n");
    }

    #[test]
    fn test_mismatch() {
        let patch = Patch::between("a\nb\n", "a\nc\n");
        assert_eq!(patch.apply("a\n"), Err(PatchMismatch));
        assert_eq!(patch.apply("a\nb\nc\n"), Err(PatchMismatch));
    }
}
