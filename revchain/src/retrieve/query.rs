/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Lookup queries over artifact metadata.

use std::collections::HashMap;

use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::Timestamp;

use super::{retrieve_range, RetrievalError};
use crate::artifact::Artifact;

/// What to do when a requested revision identifier is not in the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
    /// Fail the whole query with
    /// [`UnknownRevid`](RetrievalError::UnknownRevid).
    Error,
    /// Log a warning and skip the identifier.
    #[default]
    Warn,
    /// Silently skip the identifier.
    Ignore,
}

/// Materializes the revision at `index`.
pub fn retrieve_by_index(artifact: &Artifact, index: usize) -> Result<String, RetrievalError> {
    let mut texts = retrieve_range(artifact, index, 0)?;
    texts.pop().ok_or(RetrievalError::OutOfRange {
        index,
        count: artifact.meta.count,
    })
}

/// Materializes arbitrary positions, in the order they are given.
pub fn retrieve_by_indices(
    artifact: &Artifact,
    indices: &[usize],
) -> Result<Vec<String>, RetrievalError> {
    indices
        .iter()
        .map(|&index| retrieve_by_index(artifact, index))
        .collect()
}

/// Materializes revisions by their upstream identifiers, preserving the
/// caller's order.
///
/// Identifiers not present in the artifact are handled according to
/// `missing`. Requires `meta.revids`.
pub fn retrieve_by_revid(
    artifact: &Artifact,
    revids: &[u64],
    missing: MissingPolicy,
) -> Result<Vec<String>, RetrievalError> {
    let ids = artifact
        .meta
        .revids
        .as_ref()
        .ok_or(RetrievalError::StaleArtifact { field: "revids" })?;
    let index_of: HashMap<u64, usize> = ids
        .iter()
        .enumerate()
        .map(|(index, &revid)| (revid, index))
        .collect();

    let mut texts = Vec::with_capacity(revids.len());
    for &revid in revids {
        match index_of.get(&revid) {
            Some(&index) => texts.push(retrieve_by_index(artifact, index)?),
            None => match missing {
                MissingPolicy::Error => return Err(RetrievalError::UnknownRevid { revid }),
                MissingPolicy::Warn => {
                    log::warn!(
                        "revid {} not found in artifact {:?}",
                        revid,
                        artifact.title
                    );
                }
                MissingPolicy::Ignore => {}
            },
        }
    }
    Ok(texts)
}

fn parse_timestamp(value: &str) -> Result<Timestamp, RetrievalError> {
    value
        .parse::<Timestamp>()
        .map_err(|source| RetrievalError::BadTimestamp {
            value: value.to_owned(),
            source,
        })
}

/// Parses a window bound: a date-only string expands to the corresponding
/// UTC day boundary.
fn parse_bound(value: &str, end_of_day: bool) -> Result<Timestamp, RetrievalError> {
    if value.len() == 10 {
        let as_error = |source| RetrievalError::BadTimestamp {
            value: value.to_owned(),
            source,
        };
        let date: Date = value.parse().map_err(as_error)?;
        let time = if end_of_day {
            date.at(23, 59, 59, 0)
        } else {
            date.at(0, 0, 0, 0)
        };
        return time
            .to_zoned(TimeZone::UTC)
            .map(|zoned| zoned.timestamp())
            .map_err(as_error);
    }
    parse_timestamp(value)
}

/// Materializes all revisions whose timestamp falls in the window
/// `[start, end]`, in ascending position order.
///
/// Either bound may be omitted; date-only bounds expand to UTC day
/// boundaries (`start` to `T00:00:00Z`, `end` to `T23:59:59Z`). With
/// `inclusive` false the window is open at both ends. An empty window is
/// not an error. Requires `meta.timestamps`.
pub fn retrieve_by_time(
    artifact: &Artifact,
    start: Option<&str>,
    end: Option<&str>,
    inclusive: bool,
) -> Result<Vec<String>, RetrievalError> {
    let timestamps = artifact
        .meta
        .timestamps
        .as_ref()
        .ok_or(RetrievalError::StaleArtifact {
            field: "timestamps",
        })?;
    let window_start = start.map(|value| parse_bound(value, false)).transpose()?;
    let window_end = end.map(|value| parse_bound(value, true)).transpose()?;

    let mut indices = Vec::new();
    for (index, stored) in timestamps.iter().enumerate() {
        let timestamp = parse_timestamp(stored)?;
        let after_start = match window_start {
            None => true,
            Some(bound) if inclusive => timestamp >= bound,
            Some(bound) => timestamp > bound,
        };
        let before_end = match window_end {
            None => true,
            Some(bound) if inclusive => timestamp <= bound,
            Some(bound) => timestamp < bound,
        };
        if after_start && before_end {
            indices.push(index);
        }
    }
    retrieve_by_indices(artifact, &indices)
}
