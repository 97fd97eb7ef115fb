//! Content-hash staleness.

use std::path::{Path, PathBuf};

use jobstamp_common::FileDigest;

use crate::error::CacheError;
use crate::method::StalenessMethod;
use crate::record::DependencyRecord;
use crate::store::StampStore;

/// Compares dependency contents against digests recorded at the last run.
///
/// Survives files being copied, touched, or checked out again without a
/// change in content, at the cost of reading every dependency.
#[derive(Debug, Clone)]
pub struct HashMethod {
    record_path: PathBuf,
    record: DependencyRecord,
}

impl HashMethod {
    /// Loads the dependency record kept beside the stamp at `stamp_path`.
    ///
    /// Without a record every dependency is stale.
    pub fn load(stamp_path: &Path) -> Self {
        let record_path = StampStore::sidecar_path(stamp_path);
        let record = DependencyRecord::load(&record_path).unwrap_or_default();
        Self {
            record_path,
            record,
        }
    }
}

impl StalenessMethod for HashMethod {
    fn is_dependency_fresh(&self, dependency: &Path) -> Result<bool, CacheError> {
        let Some(stored) = self.record.get(dependency) else {
            return Ok(false);
        };
        let current =
            FileDigest::from_file(dependency).map_err(|e| CacheError::io(dependency, e))?;
        Ok(*stored == current)
    }

    fn on_successful_run(&self, dependencies: &[PathBuf]) -> Result<(), CacheError> {
        DependencyRecord::capture(dependencies)?.save(&self.record_path)
    }
}
