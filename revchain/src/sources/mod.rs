/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Revision records and the sources that produce them.
//!
//! The compression engine only sees a finite, chronologically ordered
//! sequence of [`Revision`]s; where the sequence comes from is the business
//! of a [`RevisionSource`]. This crate ships an in-memory source
//! ([`VecSource`]) and a JSON-lines file source ([`JsonLinesSource`]), which
//! is the ingestion format of the command-line interface.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A single revision of a document.
///
/// The position of a revision in its sequence is the authoritative identifier
/// inside an artifact; `revid` and `timestamp` are carried along for the
/// lookup queries of [`crate::retrieve::query`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    /// The upstream revision identifier.
    pub revid: u64,
    /// ISO-8601 timestamp of the revision.
    pub timestamp: String,
    /// The full text of the revision.
    pub text: String,
    /// The upstream page identifier, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<u64>,
}

impl Revision {
    /// Creates a new revision with no page identifier.
    pub fn new(revid: u64, timestamp: impl Into<String>, text: impl Into<String>) -> Self {
        Revision {
            revid,
            timestamp: timestamp.into(),
            text: text.into(),
            page_id: None,
        }
    }

    /// The size of the revision text, in bytes of its UTF-8 encoding.
    ///
    /// This is the canonical size measure used by the cost model and by all
    /// artifact metadata.
    pub fn size(&self) -> u64 {
        self.text.len() as u64
    }
}

/// A finite producer of revisions in chronological order.
///
/// Sources are consumed exactly once; positions are assigned in arrival
/// order by the compressor.
pub trait RevisionSource {
    /// Consumes the source, returning all revisions in chronological order.
    fn into_revisions(self) -> Result<Vec<Revision>>;
}

/// An in-memory revision source, mostly useful in tests.
#[derive(Debug, Clone, Default)]
pub struct VecSource(pub Vec<Revision>);

impl RevisionSource for VecSource {
    fn into_revisions(self) -> Result<Vec<Revision>> {
        Ok(self.0)
    }
}

/// A revision source reading a JSON-lines file: one [`Revision`] object per
/// line, blank lines ignored.
#[derive(Debug, Clone)]
pub struct JsonLinesSource {
    path: PathBuf,
}

impl JsonLinesSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonLinesSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RevisionSource for JsonLinesSource {
    fn into_revisions(self) -> Result<Vec<Revision>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Could not open revision file {}", self.path.display()))?;
        let mut revisions = Vec::new();
        for (line_idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line
                .with_context(|| format!("Could not read line from {}", self.path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            let revision = serde_json::from_str::<Revision>(&line).with_context(|| {
                format!(
                    "{}:{}: invalid revision record",
                    self.path.display(),
                    line_idx + 1
                )
            })?;
            revisions.push(revision);
        }
        log::debug!(
            "Read {} revisions from {}",
            revisions.len(),
            self.path.display()
        );
        Ok(revisions)
    }
}
