/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The on-disk artifact container.
//!
//! An artifact is the single compressed representation of one document's
//! revision history. On disk it is a self-describing JSON document wrapped
//! in a zstd stream:
//!
//! ```text
//! { "version": "1",
//!   "title": ...,
//!   "anchors": [0, 5, ...],
//!   "patches": { "0-1": [...], "1-2": [...], ... },
//!   "meta": { "title", "count", "partitions", "revids", "timestamps",
//!             "sizes", "orig_size", "space_cost", "time_cost", "solver",
//!             "strategy", "time_budget", ... },
//!   "base_texts": { "0": "...", "5": "...", ... } }
//! ```
//!
//! The string keys of `patches` and `base_texts` are an encoding detail: in
//! memory, patches are keyed by `(u, v)` pairs and base texts by anchor
//! position. The format is versioned; readers reject a different major
//! version and ignore unknown fields, so minor additions are
//! backward-compatible. Unknown `meta` fields survive a decode/encode round
//! trip.
//!
//! Artifacts are write-once: [`Artifact::store`] writes to a temporary file
//! in the target directory and renames it into place, so concurrent readers
//! observe either a complete artifact or none at all.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::knapsack::{Solver, Strategy};
use crate::patch::Patch;

/// The format version written in every artifact; readers reject a different
/// major version.
pub const FORMAT_VERSION: &str = "1";

/// The canonical size measure recorded in [`Meta::size_unit`]: byte length
/// of the UTF-8 encoding of the revision text.
pub const SIZE_UNIT: &str = "bytes";

/// Conventional extension of artifact files.
pub const ARTIFACT_EXTENSION: &str = "rvc.zst";

#[derive(Error, Debug)]
/// An error while encoding, decoding, storing, or loading an artifact.
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Bad envelope or schema mismatch.
    #[error("malformed artifact: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The artifact was written by an incompatible major format version.
    #[error("unsupported artifact format version {found:?}")]
    UnsupportedVersion { found: String },
    #[error("malformed patch key {key:?}: expected \"u-v\" with integer positions")]
    BadPatchKey { key: String },
    #[error("malformed base text key {key:?}: expected a decimal anchor position")]
    BadAnchorKey { key: String },
}

fn default_size_unit() -> String {
    SIZE_UNIT.to_owned()
}

/// Artifact metadata, aligned with revision positions.
///
/// `revids`, `timestamps`, and `sizes` all have length `count` and are
/// indexed by position. They are optional only to accommodate artifacts
/// written by older versions; the compressor always fills them, and queries
/// that need an absent field fail with
/// [`StaleArtifact`](crate::retrieve::RetrievalError::StaleArtifact).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub title: String,
    /// The number of revisions in the artifact.
    #[serde(default)]
    pub count: usize,
    /// The chains of the partition, in ascending order of their anchors.
    #[serde(default)]
    pub partitions: Vec<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revids: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<u64>>,
    /// Total size of the uncompressed history.
    #[serde(default)]
    pub orig_size: u64,
    /// Model estimate of the stored bytes; see [`crate::comp::cost`].
    #[serde(default)]
    pub space_cost: u64,
    /// Model estimate of the retrieval work; see [`crate::comp::cost`].
    #[serde(default)]
    pub time_cost: u64,
    #[serde(default)]
    pub solver: Solver,
    #[serde(default)]
    pub strategy: Strategy,
    /// The time budget the transitions were selected under.
    #[serde(default)]
    pub time_budget: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_lengths: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<u64>,
    /// The size measure used throughout the artifact; see [`SIZE_UNIT`].
    #[serde(default = "default_size_unit")]
    pub size_unit: String,
    /// Meta fields this version does not know about, preserved across a
    /// decode/encode round trip.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// The in-memory form of a stored revision history.
///
/// Artifacts are created once, by [`compress`](crate::comp::compress), and
/// thereafter read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub title: String,
    /// Positions stored as full text, ascending.
    pub anchors: Vec<usize>,
    /// Forward patches, keyed by in-chain transition.
    pub patches: BTreeMap<(usize, usize), Patch>,
    pub meta: Meta,
    /// Full texts of the anchors, keyed by position.
    pub base_texts: BTreeMap<usize, String>,
}

/// Owned wire form, used for decoding.
#[derive(Deserialize)]
struct ArtifactDoc {
    version: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    anchors: Vec<usize>,
    #[serde(default)]
    patches: BTreeMap<String, Patch>,
    meta: Meta,
    #[serde(default)]
    base_texts: BTreeMap<String, String>,
}

/// Borrowed wire form, used for encoding.
#[derive(Serialize)]
struct ArtifactDocRef<'a> {
    version: &'a str,
    title: &'a str,
    anchors: &'a [usize],
    patches: BTreeMap<String, &'a Patch>,
    meta: &'a Meta,
    base_texts: BTreeMap<String, &'a str>,
}

fn parse_patch_key(key: &str) -> Option<(usize, usize)> {
    let (u, v) = key.split_once('-')?;
    Some((u.parse().ok()?, v.parse().ok()?))
}

fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}

impl Artifact {
    /// Encodes the artifact into `writer` as a zstd-wrapped JSON document.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), StoreError> {
        let doc = ArtifactDocRef {
            version: FORMAT_VERSION,
            title: &self.title,
            anchors: &self.anchors,
            patches: self
                .patches
                .iter()
                .map(|(&(u, v), patch)| (format!("{}-{}", u, v), patch))
                .collect(),
            meta: &self.meta,
            base_texts: self
                .base_texts
                .iter()
                .map(|(&a, text)| (a.to_string(), text.as_str()))
                .collect(),
        };
        let mut encoder =
            zstd::stream::write::Encoder::new(writer, zstd::DEFAULT_COMPRESSION_LEVEL)?;
        serde_json::to_writer(&mut encoder, &doc)?;
        encoder.finish()?;
        Ok(())
    }

    /// Decodes an artifact from `reader`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StoreError> {
        let decoder = zstd::stream::read::Decoder::new(reader)?;
        let doc: ArtifactDoc = serde_json::from_reader(decoder)?;
        if major(&doc.version) != major(FORMAT_VERSION) {
            return Err(StoreError::UnsupportedVersion { found: doc.version });
        }

        let mut patches = BTreeMap::new();
        for (key, patch) in doc.patches {
            match parse_patch_key(&key) {
                Some(transition) => {
                    patches.insert(transition, patch);
                }
                None => return Err(StoreError::BadPatchKey { key }),
            }
        }
        let mut base_texts = BTreeMap::new();
        for (key, text) in doc.base_texts {
            match key.parse::<usize>() {
                Ok(anchor) => {
                    base_texts.insert(anchor, text);
                }
                Err(_) => return Err(StoreError::BadAnchorKey { key }),
            }
        }

        Ok(Artifact {
            title: doc.title,
            anchors: doc.anchors,
            patches,
            meta: doc.meta,
            base_texts,
        })
    }

    /// Encodes the artifact into a byte vector.
    pub fn to_vec(&self) -> Result<Vec<u8>, StoreError> {
        let mut buf = Vec::new();
        self.to_writer(&mut buf)?;
        Ok(buf)
    }

    /// Decodes an artifact from a byte slice.
    pub fn from_slice(data: &[u8]) -> Result<Self, StoreError> {
        Self::from_reader(data)
    }

    /// Stores the artifact at `path`, atomically.
    ///
    /// The artifact is written to a temporary file in the same directory and
    /// renamed into place, so a reader never observes a partially written
    /// artifact at `path`.
    pub fn store(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let tmp = tempfile::NamedTempFile::new_in(dir)?;
        let mut writer = BufWriter::new(tmp.as_file());
        self.to_writer(&mut writer)?;
        writer.flush()?;
        drop(writer);
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
        log::debug!("Stored artifact {:?} at {}", self.title, path.display());
        Ok(())
    }

    /// Loads an artifact from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// The chains of the partition; an alias for `meta.partitions`.
    pub fn chains(&self) -> &[Vec<usize>] {
        &self.meta.partitions
    }
}
