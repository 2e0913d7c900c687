/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Reconstruction of revisions from an artifact.
//!
//! [`retrieve_range`] is the basic walker: it seeds the text of the chain
//! anchor, applies in-chain patches up to the requested position, and keeps
//! walking forward, resetting at every anchor it crosses. The cost of a call
//! is one patch application per position between the starting anchor and the
//! end of the range. The lookup queries by revision identifier and by
//! timestamp range are in [`query`].

use thiserror::Error;

use crate::artifact::Artifact;

pub mod query;
pub use query::{
    retrieve_by_index, retrieve_by_indices, retrieve_by_revid, retrieve_by_time, MissingPolicy,
};

#[derive(Error, Debug)]
/// An artifact integrity violation or an unsatisfiable request discovered
/// during retrieval.
pub enum RetrievalError {
    /// No stored base text for an anchor the walk needs.
    #[error("no stored base text for anchor {anchor}")]
    MissingBase { anchor: usize },
    /// An expected in-chain patch is absent.
    #[error("missing patch for transition {u} -> {v}")]
    MissingPatch { u: usize, v: usize },
    /// A stored patch does not fit the text it reconstructs from.
    #[error("patch for transition {u} -> {v} does not fit its base text")]
    Corrupt { u: usize, v: usize },
    /// The requested position does not exist.
    #[error("revision index {index} out of range (the artifact has {count} revisions)")]
    OutOfRange { index: usize, count: usize },
    /// The artifact lacks a meta field required by the query.
    #[error("artifact metadata lacks {field:?}, which this query requires; recompress with a current version")]
    StaleArtifact { field: &'static str },
    /// A requested revision identifier is not in the artifact (only with
    /// [`MissingPolicy::Error`]).
    #[error("revid {revid} not found in this artifact")]
    UnknownRevid { revid: u64 },
    /// A timestamp (stored or requested) could not be parsed as ISO-8601.
    #[error("unparsable timestamp {value:?}: {source}")]
    BadTimestamp { value: String, source: jiff::Error },
}

fn apply_patch(
    artifact: &Artifact,
    u: usize,
    v: usize,
    text: &str,
) -> Result<String, RetrievalError> {
    let patch = artifact
        .patches
        .get(&(u, v))
        .ok_or(RetrievalError::MissingPatch { u, v })?;
    patch
        .apply(text)
        .map_err(|_| RetrievalError::Corrupt { u, v })
}

fn anchor_text<'a>(artifact: &'a Artifact, anchor: usize) -> Result<&'a str, RetrievalError> {
    artifact
        .base_texts
        .get(&anchor)
        .map(String::as_str)
        .ok_or(RetrievalError::MissingBase { anchor })
}

/// Materializes the revisions at positions `start`, `start + 1`, ...,
/// `start + length`, in ascending position order.
///
/// The range is truncated at the last revision of the artifact, so the
/// result has `length + 1` elements unless `start + length` runs past the
/// end. `start` itself must be a valid position.
pub fn retrieve_range(
    artifact: &Artifact,
    start: usize,
    length: usize,
) -> Result<Vec<String>, RetrievalError> {
    let count = artifact.meta.count;
    if start >= count {
        return Err(RetrievalError::OutOfRange {
            index: start,
            count,
        });
    }
    let chains = &artifact.meta.partitions;

    // the chain containing start is the last one whose anchor is <= start
    let position = chains.partition_point(|chain| chain.first().is_some_and(|&a| a <= start));
    let Some(mut chain_idx) = position.checked_sub(1) else {
        return Err(RetrievalError::StaleArtifact {
            field: "partitions",
        });
    };
    let mut chain = &chains[chain_idx];
    let anchor = match chain.first() {
        Some(&a) => a,
        None => {
            return Err(RetrievalError::StaleArtifact {
                field: "partitions",
            })
        }
    };

    // walk from the anchor up to start; chains are contiguous, so the
    // offset inside the chain is just the position difference
    let offset = start - anchor;
    if offset >= chain.len() {
        return Err(RetrievalError::StaleArtifact {
            field: "partitions",
        });
    }
    let mut text = anchor_text(artifact, anchor)?.to_owned();
    for k in 1..=offset {
        text = apply_patch(artifact, chain[k - 1], chain[k], &text)?;
    }

    let mut result = Vec::with_capacity(length.saturating_add(1).min(count - start));
    result.push(text.clone());

    let mut pos_in_chain = offset;
    for position in start + 1..=start.saturating_add(length) {
        if position >= count {
            break;
        }
        if pos_in_chain + 1 < chain.len() {
            text = apply_patch(artifact, chain[pos_in_chain], chain[pos_in_chain + 1], &text)?;
            pos_in_chain += 1;
        } else {
            // position starts the next chain
            chain_idx += 1;
            chain = chains.get(chain_idx).ok_or(RetrievalError::StaleArtifact {
                field: "partitions",
            })?;
            let anchor = match chain.first() {
                Some(&a) => a,
                None => {
                    return Err(RetrievalError::StaleArtifact {
                        field: "partitions",
                    })
                }
            };
            text = anchor_text(artifact, anchor)?.to_owned();
            pos_in_chain = 0;
        }
        result.push(text.clone());
    }
    Ok(result)
}
