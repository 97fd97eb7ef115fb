//! Memoization of idempotent jobs behind on-disk stamp files.
//!
//! A job call is fingerprinted from its identity and argument
//! representations. The fingerprint names a stamp file holding the job's last
//! result. On each call the [`Stamper`] checks the stamp, the declared output
//! files, and the declared dependencies. If anything is out of date the job
//! runs and its result is stamped, otherwise the stamped result is replayed.

#![warn(missing_docs)]

pub mod call;
pub mod engine;
pub mod error;
pub mod job;
pub mod method;
pub mod record;
pub mod store;

pub use call::JobCall;
pub use engine::{default_cache_directory, StampOptions, Stamper, Trigger};
pub use error::CacheError;
pub use job::Job;
pub use method::{HashMethod, MTimeMethod, StalenessMethod};
pub use record::DependencyRecord;
pub use store::StampStore;

pub use jobstamp_common::{FileDigest, Fingerprint, StampMethod};
pub use jobstamp_config::Switches;
