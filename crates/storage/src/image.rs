// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk image of the job cache.
//!
//! The image is a versioned JSON document. Writes go to a sibling temp file
//! that is fsynced and then renamed over the image, so a crash leaves either
//! the old image or the new one.

use chrono::{DateTime, Utc};
use gr_core::{JobKey, JobRecord};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Current cache image schema version
pub const CURRENT_CACHE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CacheEntry {
    pub key: JobKey,
    pub record: JobRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CacheImage {
    #[serde(rename = "v")]
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub jobs: Vec<CacheEntry>,
}

impl CacheImage {
    pub fn new(jobs: Vec<CacheEntry>) -> Self {
        Self { version: CURRENT_CACHE_VERSION, saved_at: Utc::now(), jobs }
    }
}

/// Outcome of decoding an image file.
pub(crate) enum Decoded {
    Image(CacheImage),
    UnknownVersion(u64),
    Corrupt(String),
}

pub(crate) fn decode(bytes: &[u8]) -> Decoded {
    let value: serde_json::Value = match serde_json::from_slice(bytes) {
        Ok(v) => v,
        Err(e) => return Decoded::Corrupt(e.to_string()),
    };
    match value.get("v").and_then(serde_json::Value::as_u64) {
        Some(v) if v != u64::from(CURRENT_CACHE_VERSION) => return Decoded::UnknownVersion(v),
        _ => {}
    }
    match serde_json::from_value(value) {
        Ok(image) => Decoded::Image(image),
        Err(e) => Decoded::Corrupt(e.to_string()),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!("{name}.tmp"))
}

/// Write `bytes` to `path` via temp file, fsync and rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    let result = File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .and_then(|_| fs::rename(&tmp, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        // Persist the rename itself; not supported on every platform.
        let _ = File::open(parent).and_then(|dir| dir.sync_all());
    }
    Ok(())
}

const MAX_BAK_FILES: u32 = 3;

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
///
/// Keeps up to [`MAX_BAK_FILES`] backups: `.bak`, `.bak.2`, `.bak.3`.
pub(crate) fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }

    bak(1)
}

#[cfg(test)]
#[path = "image_tests.rs"]
mod tests;
