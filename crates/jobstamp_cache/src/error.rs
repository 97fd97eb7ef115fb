//! Error types for stamp operations.

use std::path::PathBuf;

/// Errors that can occur while checking or writing stamps.
///
/// A missing dependency or stamp is never an error: both simply make the
/// job out of date. These variants cover configuration mistakes and I/O or
/// decoding failures that the engine cannot recover from.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing stamp files.
    #[error("stamp I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The cache directory path exists but is not a directory.
    #[error("{} exists and is not a directory", path.display())]
    NotADirectory {
        /// The offending cache directory path.
        path: PathBuf,
    },

    /// A stamp file has an invalid or missing header.
    #[error("invalid stamp header in {path}: {reason}")]
    InvalidHeader {
        /// The stamp file path.
        path: PathBuf,
        /// Description of the header problem.
        reason: String,
    },

    /// The stamp format version does not match the current version.
    #[error("version mismatch in {path}: expected {expected}, got {actual}")]
    VersionMismatch {
        /// The stamp file path.
        path: PathBuf,
        /// The expected format version.
        expected: u32,
        /// The actual format version found in the file.
        actual: u32,
    },

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = CacheError::Io {
            path: PathBuf::from("/tmp/jobstamps/0a1b"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("stamp I/O error"));
        assert!(msg.contains("0a1b"));
    }

    #[test]
    fn not_a_directory_display() {
        let err = CacheError::NotADirectory {
            path: PathBuf::from("/tmp/cache"),
        };
        assert_eq!(err.to_string(), "/tmp/cache exists and is not a directory");
    }

    #[test]
    fn invalid_header_display() {
        let err = CacheError::InvalidHeader {
            path: PathBuf::from("stamp"),
            reason: "missing magic bytes".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("invalid stamp header"));
        assert!(msg.contains("missing magic bytes"));
    }

    #[test]
    fn version_mismatch_display() {
        let err = CacheError::VersionMismatch {
            path: PathBuf::from("stamp"),
            expected: 2,
            actual: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("expected 2"));
        assert!(msg.contains("got 1"));
    }

    #[test]
    fn serialization_error_display() {
        let err = CacheError::Serialization {
            reason: "unexpected end of input".to_string(),
        };
        assert!(err.to_string().contains("unexpected end of input"));
    }
}
