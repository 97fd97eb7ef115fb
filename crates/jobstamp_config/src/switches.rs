//! Process-wide switches read from the environment.

use crate::types::SwitchConfig;

/// Environment variable enabling decision tracing.
pub const DEBUG_VAR: &str = "JOBSTAMPS_DEBUG";

/// Environment variable forcing the hash staleness method.
pub const ALWAYS_USE_HASHES_VAR: &str = "JOBSTAMPS_ALWAYS_USE_HASHES";

/// Environment variable disabling result replay.
pub const DISABLED_VAR: &str = "JOBSTAMPS_DISABLED";

/// Overrides that apply to every stamped job in the process.
///
/// Captured once and passed to the engine explicitly, so nothing below the
/// entry point reads the environment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Switches {
    /// Emit "re-running because ..." and "using cached value" notices.
    pub debug: bool,
    /// Use the hash method even when the caller asked for timestamps.
    pub always_use_hashes: bool,
    /// Treat every job as out of date.
    pub disabled: bool,
}

impl Switches {
    /// Reads the switches from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Reads the switches through an arbitrary variable lookup.
    ///
    /// A switch is on when its variable is set to a non-empty value.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let is_set = |name: &str| lookup(name).is_some_and(|v| !v.is_empty());
        Self {
            debug: is_set(DEBUG_VAR),
            always_use_hashes: is_set(ALWAYS_USE_HASHES_VAR),
            disabled: is_set(DISABLED_VAR),
        }
    }

    /// Combines these switches with the `[switches]` file section.
    pub fn merge(self, file: &SwitchConfig) -> Self {
        Self {
            debug: self.debug || file.debug,
            always_use_hashes: self.always_use_hashes || file.always_use_hashes,
            disabled: self.disabled || file.disabled,
        }
    }
}
