//! The seam between the stamp engine and the work it memoizes.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::call::JobCall;
use crate::error::CacheError;

/// A unit of idempotent work whose result can be stamped and replayed.
///
/// Implementors describe their own call signature, so the fingerprint is
/// built from the same inputs the job runs with. Closures can be stamped
/// directly with [`Stamper::run`](crate::Stamper::run) instead.
pub trait Job {
    /// The value produced by the job and stored in the stamp.
    type Output: Serialize + DeserializeOwned;

    /// The job's own failure type. Stamp errors convert into it.
    type Error: From<CacheError>;

    /// Returns the identity and arguments of this invocation.
    fn call(&self) -> JobCall;

    /// Performs the work.
    fn execute(self) -> Result<Self::Output, Self::Error>;
}
