//! Dependency staleness checks.
//!
//! A [`StalenessMethod`] is built fresh for every stamp decision from what is
//! on disk at that moment. The engine checks that a dependency exists before
//! asking the method about it, and calls [`StalenessMethod::on_successful_run`]
//! only after a new result has been stamped.

mod hash;
mod mtime;

use std::path::{Path, PathBuf};

use jobstamp_common::StampMethod;

use crate::error::CacheError;

pub use hash::HashMethod;
pub use mtime::MTimeMethod;

/// A policy deciding whether a dependency changed since a stamp was written.
pub trait StalenessMethod {
    /// Returns `true` if `dependency` has not changed since the stamp was
    /// produced. `dependency` must exist.
    fn is_dependency_fresh(&self, dependency: &Path) -> Result<bool, CacheError>;

    /// Records whatever the next check needs, after a fresh result has been
    /// written to the stamp.
    fn on_successful_run(&self, dependencies: &[PathBuf]) -> Result<(), CacheError>;
}

/// Builds the method selected by `method` for the stamp at `stamp_path`.
pub fn load(method: StampMethod, stamp_path: &Path) -> Result<Box<dyn StalenessMethod>, CacheError> {
    Ok(match method {
        StampMethod::MTime => Box::new(MTimeMethod::load(stamp_path)?),
        StampMethod::Hash => Box::new(HashMethod::load(stamp_path)),
    })
}
