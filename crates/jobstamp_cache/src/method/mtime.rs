//! Modification-time staleness.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::CacheError;
use crate::method::StalenessMethod;

/// Compares dependency modification times against the stamp file's.
///
/// Nothing extra is recorded after a run: rewriting the stamp moves its
/// modification time forward. On filesystems with coarse timestamps, a
/// dependency written in the same tick as the stamp looks unchanged; use
/// [`HashMethod`](crate::method::HashMethod) where that matters.
#[derive(Debug, Clone)]
pub struct MTimeMethod {
    stamp_mtime: Option<SystemTime>,
}

impl MTimeMethod {
    /// Captures the modification time of the stamp at `stamp_path`.
    ///
    /// A missing stamp has no time, and every dependency is stale against it.
    pub fn load(stamp_path: &Path) -> Result<Self, CacheError> {
        let stamp_mtime = match std::fs::metadata(stamp_path) {
            Ok(meta) => Some(meta.modified().map_err(|e| CacheError::io(stamp_path, e))?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(CacheError::io(stamp_path, e)),
        };
        Ok(Self { stamp_mtime })
    }
}

impl StalenessMethod for MTimeMethod {
    fn is_dependency_fresh(&self, dependency: &Path) -> Result<bool, CacheError> {
        let Some(stamp_mtime) = self.stamp_mtime else {
            return Ok(false);
        };
        let modified = std::fs::metadata(dependency)
            .and_then(|meta| meta.modified())
            .map_err(|e| CacheError::io(dependency, e))?;
        Ok(modified <= stamp_mtime)
    }

    fn on_successful_run(&self, _dependencies: &[PathBuf]) -> Result<(), CacheError> {
        Ok(())
    }
}
