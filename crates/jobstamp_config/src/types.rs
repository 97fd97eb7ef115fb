//! Configuration types deserialized from `jobstamp.toml`.

use jobstamp_common::StampMethod;
use serde::Deserialize;
use std::path::PathBuf;

/// The top-level configuration parsed from `jobstamp.toml`.
///
/// Every section is optional; an empty file is a valid configuration that
/// leaves all defaults in place.
#[derive(Debug, Default, Deserialize)]
pub struct StampConfig {
    /// Where stamps are kept and how dependencies are checked.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Switches that are otherwise set through the environment.
    #[serde(default)]
    pub switches: SwitchConfig,
}

/// The `[cache]` section.
#[derive(Debug, Default, Deserialize)]
pub struct CacheConfig {
    /// Directory for stamp files, overriding `<temp>/jobstamps`.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// Default staleness method when the caller does not choose one.
    #[serde(default)]
    pub method: Option<StampMethod>,
}

/// The `[switches]` section.
///
/// Each flag is OR-ed with the matching environment variable, so the file
/// can turn a switch on but never off.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SwitchConfig {
    /// Trace every stamp decision.
    #[serde(default)]
    pub debug: bool,
    /// Force the hash method regardless of the caller's choice.
    #[serde(default)]
    pub always_use_hashes: bool,
    /// Never replay cached results.
    #[serde(default)]
    pub disabled: bool,
}
