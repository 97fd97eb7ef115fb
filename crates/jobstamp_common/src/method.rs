//! Selection of the dependency staleness check.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a job's dependencies are compared against its last stamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StampMethod {
    /// A dependency is stale if it was modified after the stamp file.
    #[default]
    MTime,
    /// A dependency is stale if its content hash differs from the one
    /// recorded when the stamp was written.
    Hash,
}

impl fmt::Display for StampMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StampMethod::MTime => f.write_str("mtime"),
            StampMethod::Hash => f.write_str("hash"),
        }
    }
}

/// Error type for parsing stamp method names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStampMethodError {
    /// The input string that failed to parse.
    pub input: String,
}

impl fmt::Display for ParseStampMethodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid stamp method: '{}' (expected 'mtime' or 'hash')",
            self.input
        )
    }
}

impl std::error::Error for ParseStampMethodError {}

impl FromStr for StampMethod {
    type Err = ParseStampMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mtime" => Ok(StampMethod::MTime),
            "hash" => Ok(StampMethod::Hash),
            _ => Err(ParseStampMethodError {
                input: s.to_string(),
            }),
        }
    }
}
