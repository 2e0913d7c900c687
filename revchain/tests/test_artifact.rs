/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use revchain::artifact::{Artifact, StoreError, ARTIFACT_EXTENSION};
use revchain::comp::{compress, CompConfig};
use revchain::retrieve::retrieve_range;
use revchain::sources::Revision;

fn sample_artifact() -> Result<Artifact> {
    let revisions = vec![
        Revision::new(11, "2024-03-01T00:00:00Z", "a\nb\n"),
        Revision::new(12, "2024-03-02T00:00:00Z", "a\nb\nc\nd\n"),
        Revision::new(13, "2024-03-03T00:00:00Z", "a\nc\nd\n"),
        Revision::new(14, "2024-03-04T00:00:00Z", "a\nc\nd\ne\nf\ng\nh\n"),
    ];
    Ok(compress("sample", revisions, &CompConfig::default())?)
}

#[test]
fn test_encode_decode_idempotence() -> Result<()> {
    let artifact = sample_artifact()?;
    let bytes = artifact.to_vec()?;
    let decoded = Artifact::from_slice(&bytes)?;
    assert_eq!(decoded, artifact);
    // and once more through the wire form
    assert_eq!(Artifact::from_slice(&decoded.to_vec()?)?, artifact);
    Ok(())
}

#[test]
fn test_store_load() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(format!("sample.{}", ARTIFACT_EXTENSION));
    let artifact = sample_artifact()?;
    artifact.store(&path)?;

    let loaded = Artifact::load(&path)?;
    assert_eq!(loaded, artifact);
    assert_eq!(
        retrieve_range(&loaded, 0, 3)?,
        retrieve_range(&artifact, 0, 3)?
    );
    Ok(())
}

#[test]
fn test_store_leaves_no_temporary_behind() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("single.rvc.zst");
    let artifact = sample_artifact()?;
    artifact.store(&path)?;
    // overwriting must also be atomic
    artifact.store(&path)?;

    let entries: Vec<_> = std::fs::read_dir(dir.path())?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<std::io::Result<_>>()?;
    assert_eq!(entries, vec![std::ffi::OsString::from("single.rvc.zst")]);
    Ok(())
}

#[test]
fn test_rejects_unknown_major_version() -> Result<()> {
    let doc = serde_json::json!({
        "version": "2",
        "title": "future",
        "anchors": [],
        "patches": {},
        "meta": {
            "title": "future", "count": 0, "partitions": [],
            "orig_size": 0, "space_cost": 0, "time_cost": 0,
            "solver": "heuristic", "strategy": "auto", "time_budget": null
        },
        "base_texts": {}
    });
    let bytes = zstd::encode_all(serde_json::to_vec(&doc)?.as_slice(), 0)?;
    assert!(matches!(
        Artifact::from_slice(&bytes),
        Err(StoreError::UnsupportedVersion { .. })
    ));
    Ok(())
}

#[test]
fn test_tolerates_and_preserves_unknown_meta_fields() -> Result<()> {
    let doc = serde_json::json!({
        "version": "1",
        "title": "forward",
        "anchors": [0],
        "patches": {},
        "meta": {
            "title": "forward", "count": 1, "partitions": [[0]],
            "revids": [7], "timestamps": ["2024-01-01T00:00:00Z"], "sizes": [2],
            "orig_size": 2, "space_cost": 2, "time_cost": 1,
            "solver": "heuristic", "strategy": "auto", "time_budget": 1,
            "somebody_elses_field": {"nested": true}
        },
        "base_texts": {"0": "hi"}
    });
    let bytes = zstd::encode_all(serde_json::to_vec(&doc)?.as_slice(), 0)?;
    let artifact = Artifact::from_slice(&bytes)?;
    assert!(artifact.meta.extra.contains_key("somebody_elses_field"));
    assert_eq!(retrieve_range(&artifact, 0, 0)?, vec!["hi".to_string()]);

    // the unknown field survives a re-encode
    let again = Artifact::from_slice(&artifact.to_vec()?)?;
    assert_eq!(again.meta.extra, artifact.meta.extra);
    Ok(())
}

#[test]
fn test_malformed_envelope() {
    assert!(matches!(
        Artifact::from_slice(b"not a zstd stream"),
        Err(StoreError::Io(_) | StoreError::Malformed(_))
    ));
}

#[test]
fn test_bad_patch_key() -> Result<()> {
    let doc = serde_json::json!({
        "version": "1",
        "title": "bad",
        "anchors": [0],
        "patches": {"zero-one": []},
        "meta": {
            "title": "bad", "count": 2, "partitions": [[0, 1]],
            "orig_size": 0, "space_cost": 0, "time_cost": 0,
            "solver": "heuristic", "strategy": "auto", "time_budget": null
        },
        "base_texts": {"0": ""}
    });
    let bytes = zstd::encode_all(serde_json::to_vec(&doc)?.as_slice(), 0)?;
    assert!(matches!(
        Artifact::from_slice(&bytes),
        Err(StoreError::BadPatchKey { .. })
    ));
    Ok(())
}

#[test]
fn test_empty_artifact_roundtrip() -> Result<()> {
    let artifact = compress("empty", Vec::<Revision>::new(), &CompConfig::default())?;
    let decoded = Artifact::from_slice(&artifact.to_vec()?)?;
    assert_eq!(decoded, artifact);
    assert_eq!(decoded.meta.count, 0);
    Ok(())
}
