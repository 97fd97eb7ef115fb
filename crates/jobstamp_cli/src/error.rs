//! Errors surfaced by the `jobstamp` command.

use std::path::PathBuf;

use jobstamp_cache::CacheError;
use jobstamp_config::ConfigError;

/// Failures of the command-line front end.
///
/// A command that runs and exits non-zero is not an error; its exit code is
/// cached and forwarded like any other result.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The stamp engine failed (for example, the stamp directory is a file).
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Nothing was given after `--`.
    #[error("must specify command after '--'")]
    EmptyCommand,

    /// The program is neither an existing path nor found on `PATH`.
    #[error("command not found: {program}")]
    NotFound {
        /// The program name as given.
        program: String,
    },

    /// The program file could not be inspected for a shebang line.
    #[error("failed to read {}: {source}", path.display())]
    Shebang {
        /// The resolved program path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The process could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// The executable that was launched.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Replaying captured output to our own stdout/stderr failed.
    #[error("failed to write command output: {0}")]
    Output(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_not_found() {
        let err = CommandError::NotFound {
            program: "nonexistent-tool".to_string(),
        };
        assert_eq!(err.to_string(), "command not found: nonexistent-tool");
    }

    #[test]
    fn display_cache_error_is_transparent() {
        let err = CommandError::from(CacheError::NotADirectory {
            path: PathBuf::from("/tmp/file"),
        });
        assert_eq!(err.to_string(), "/tmp/file exists and is not a directory");
    }

    #[test]
    fn display_empty_command() {
        assert_eq!(
            CommandError::EmptyCommand.to_string(),
            "must specify command after '--'"
        );
    }
}
