// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable job cache.
//!
//! The whole cache is held in memory and rewritten to disk on every
//! mutation. A mutation updates memory only after the new image is durably
//! on disk, so readers never see state that a restart would lose.

use crate::image::{self, CacheEntry, CacheImage, Decoded};
use gr_core::{JobKey, JobRecord};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("job cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("job cache serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("job cache {path} has unsupported version {version}")]
    UnsupportedVersion { path: PathBuf, version: u64 },
}

/// Job records keyed by request, persisted to a single image file.
#[derive(Debug)]
pub struct JobCache {
    path: PathBuf,
    jobs: BTreeMap<JobKey, JobRecord>,
}

impl JobCache {
    /// Open the cache at `path`, loading any existing image.
    ///
    /// A missing file yields an empty cache. A corrupt image is moved to a
    /// rotating `.bak` file and the cache starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no job cache image, starting empty");
                return Ok(Self { path, jobs: BTreeMap::new() });
            }
            Err(source) => return Err(CacheError::Io { path, source }),
        };

        let jobs = match image::decode(&bytes) {
            Decoded::Image(image) => {
                image.jobs.into_iter().map(|entry| (entry.key, entry.record)).collect()
            }
            Decoded::UnknownVersion(version) => {
                return Err(CacheError::UnsupportedVersion { path, version });
            }
            Decoded::Corrupt(reason) => {
                let bak = image::rotate_bak_path(&path);
                warn!(
                    path = %path.display(),
                    backup = %bak.display(),
                    %reason,
                    "corrupt job cache image, moving aside and starting empty"
                );
                fs::rename(&path, &bak).map_err(|source| CacheError::Io {
                    path: path.clone(),
                    source,
                })?;
                BTreeMap::new()
            }
        };

        Ok(Self { path, jobs })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &JobKey) -> Option<&JobRecord> {
        self.jobs.get(key)
    }

    pub fn contains(&self, key: &JobKey) -> bool {
        self.jobs.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&JobKey, &JobRecord)> {
        self.jobs.iter()
    }

    /// Insert or replace the record for `key`, returning the previous one.
    pub fn insert(
        &mut self,
        key: JobKey,
        record: JobRecord,
    ) -> Result<Option<JobRecord>, CacheError> {
        let mut next = self.jobs.clone();
        let previous = next.insert(key, record);
        self.commit(next)?;
        Ok(previous)
    }

    /// Remove the record for `key`. Absent keys are not written.
    pub fn remove(&mut self, key: &JobKey) -> Result<Option<JobRecord>, CacheError> {
        if !self.jobs.contains_key(key) {
            return Ok(None);
        }
        let mut next = self.jobs.clone();
        let previous = next.remove(key);
        self.commit(next)?;
        Ok(previous)
    }

    fn commit(&mut self, next: BTreeMap<JobKey, JobRecord>) -> Result<(), CacheError> {
        let entries = next
            .iter()
            .map(|(key, record)| CacheEntry { key: key.clone(), record: record.clone() })
            .collect();
        let bytes = serde_json::to_vec_pretty(&CacheImage::new(entries))?;
        image::write_atomic(&self.path, &bytes)
            .map_err(|source| CacheError::Io { path: self.path.clone(), source })?;
        self.jobs = next;
        Ok(())
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
