//! Shared foundational types used across the jobstamp crates.
//!
//! This crate provides the call fingerprint used to name stamp files, the
//! content digest recorded for dependencies, and the tag selecting how
//! dependency staleness is detected.

#![warn(missing_docs)]

pub mod hash;
pub mod method;

pub use hash::{FileDigest, Fingerprint};
pub use method::{ParseStampMethodError, StampMethod};
