//! Dependency record sidecar for the hash method.
//!
//! The record is stored as `<stamp>.dep.sha1` next to the stamp file. It is a
//! flat JSON object mapping absolute dependency paths to the SHA-1 of their
//! contents when the stamp was last written. The whole map is rewritten after
//! every run; a dependency missing from it has never been seen and is stale.
//!
//! Paths that are not valid UTF-8 cannot be JSON keys as they are. They are
//! stored as `hex:` followed by the hex of their raw encoding, which no
//! absolute path starts with.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use jobstamp_common::FileDigest;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Content digests of one stamp's dependencies, keyed by absolute path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyRecord {
    hashes: BTreeMap<String, FileDigest>,
}

/// Prefix of keys holding a raw-encoded path.
const RAW_KEY_PREFIX: &str = "hex:";

impl DependencyRecord {
    /// Loads the record at `path`, returning `None` if the file doesn't
    /// exist or can't be parsed.
    ///
    /// An unreadable record is logged and treated like a missing one, which
    /// makes every dependency stale on the next check.
    pub fn load(path: &Path) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        target: "jobstamp",
                        path = %path.display(),
                        error = %err,
                        "failed to read dependency record; treating all dependencies as stale"
                    );
                }
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(
                    target: "jobstamp",
                    path = %path.display(),
                    error = %err,
                    "corrupt dependency record; treating all dependencies as stale"
                );
                None
            }
        }
    }

    /// Hashes every dependency that currently exists.
    ///
    /// Dependencies that have vanished are skipped, so they drop out of the
    /// record and count as new if they come back.
    pub fn capture(dependencies: &[PathBuf]) -> Result<Self, CacheError> {
        let mut hashes = BTreeMap::new();
        for dep in dependencies {
            if !dep.exists() {
                continue;
            }
            let digest = FileDigest::from_file(dep).map_err(|e| CacheError::io(dep.clone(), e))?;
            hashes.insert(record_key(dep), digest);
        }
        Ok(Self { hashes })
    }

    /// Returns the recorded digest for `path`, if any.
    pub fn get(&self, path: &Path) -> Option<&FileDigest> {
        self.hashes.get(&record_key(path))
    }

    #[cfg(test)]
    pub(crate) fn insert(&mut self, path: &Path, digest: FileDigest) {
        self.hashes.insert(record_key(path), digest);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.hashes.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Overwrites the record file at `path`.
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        let json = serde_json::to_string(self).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;
        std::fs::write(path, json).map_err(|e| CacheError::io(path, e))
    }
}

/// Normalizes a dependency path to the absolute form used as a record key.
fn record_key(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    match absolute.to_str() {
        Some(key) => key.to_string(),
        None => raw_key(absolute.as_os_str()),
    }
}

#[cfg(unix)]
fn raw_key(path: &OsStr) -> String {
    use std::os::unix::ffi::OsStrExt;
    format!("{RAW_KEY_PREFIX}{}", hex::encode(path.as_bytes()))
}

#[cfg(windows)]
fn raw_key(path: &OsStr) -> String {
    use std::os::windows::ffi::OsStrExt;
    let units: Vec<u8> = path.encode_wide().flat_map(u16::to_be_bytes).collect();
    format!("{RAW_KEY_PREFIX}{}", hex::encode(units))
}

#[cfg(not(any(unix, windows)))]
fn raw_key(path: &OsStr) -> String {
    path.to_string_lossy().into_owned()
}
