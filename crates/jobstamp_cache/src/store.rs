//! Stamp file storage.
//!
//! Each stamp lives at `<cache_dir>/<fingerprint-hex>` and holds the job's
//! last result encoded with bincode behind a short header (magic bytes and a
//! format version). The encoding is private to this crate; it is not meant
//! to be read by other tools. Values must round-trip through serde without
//! `deserialize_any`, which rules out self-describing types such as
//! `serde_json::Value`.

use std::io::Write;
use std::path::{Path, PathBuf};

use jobstamp_common::Fingerprint;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CacheError;

/// Magic bytes identifying a jobstamp stamp file.
const STAMP_MAGIC: [u8; 4] = *b"JSTP";

/// Current stamp format version. Increment on breaking changes to the
/// header or payload encoding.
const STAMP_FORMAT_VERSION: u32 = 1;

/// Magic plus little-endian version.
const HEADER_LEN: usize = 8;

/// Suffix of the dependency hash sidecar written next to a stamp.
pub const SIDECAR_SUFFIX: &str = ".dep.sha1";

/// Reads and writes stamp files inside one cache directory.
#[derive(Debug, Clone)]
pub struct StampStore {
    cache_dir: PathBuf,
}

impl StampStore {
    /// Creates a store rooted at `cache_dir`. Nothing is touched on disk.
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
        }
    }

    /// Returns the stamp file path for `fingerprint`.
    pub fn path_for(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.cache_dir.join(fingerprint.to_hex())
    }

    /// Returns the dependency hash sidecar path for a stamp file.
    pub fn sidecar_path(stamp_path: &Path) -> PathBuf {
        let mut name = stamp_path.as_os_str().to_os_string();
        name.push(SIDECAR_SUFFIX);
        PathBuf::from(name)
    }

    /// Creates the cache directory tree if it does not exist yet.
    ///
    /// A directory that already exists (including one created concurrently
    /// by another process) is accepted. A non-directory at that path is a
    /// configuration error.
    pub fn ensure_directory(&self) -> Result<(), CacheError> {
        let dir = &self.cache_dir;
        if let Err(e) = std::fs::create_dir_all(dir) {
            if !dir.is_dir() {
                if dir.exists() {
                    return Err(CacheError::NotADirectory { path: dir.clone() });
                }
                return Err(CacheError::io(dir.clone(), e));
            }
        }
        if !dir.is_dir() {
            return Err(CacheError::NotADirectory { path: dir.clone() });
        }
        Ok(())
    }

    /// Decodes the value stored in the stamp at `path`.
    ///
    /// The caller must already know the stamp exists. A missing or damaged
    /// stamp is reported as an error rather than treated as a miss.
    pub fn read<T: DeserializeOwned>(&self, path: &Path) -> Result<T, CacheError> {
        let raw = std::fs::read(path).map_err(|e| CacheError::io(path, e))?;

        if raw.len() < HEADER_LEN {
            return Err(CacheError::InvalidHeader {
                path: path.to_path_buf(),
                reason: format!("file is {} bytes, shorter than the header", raw.len()),
            });
        }
        if raw[..4] != STAMP_MAGIC {
            return Err(CacheError::InvalidHeader {
                path: path.to_path_buf(),
                reason: "missing magic bytes".to_string(),
            });
        }
        let mut version = [0_u8; 4];
        version.copy_from_slice(&raw[4..HEADER_LEN]);
        let version = u32::from_le_bytes(version);
        if version != STAMP_FORMAT_VERSION {
            return Err(CacheError::VersionMismatch {
                path: path.to_path_buf(),
                expected: STAMP_FORMAT_VERSION,
                actual: version,
            });
        }

        let (value, _) =
            bincode::serde::decode_from_slice(&raw[HEADER_LEN..], bincode::config::standard())
                .map_err(|e| CacheError::Serialization {
                    reason: e.to_string(),
                })?;
        Ok(value)
    }

    /// Truncates the stamp at `path` and writes `value` into it.
    pub fn write<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), CacheError> {
        let payload = bincode::serde::encode_to_vec(value, bincode::config::standard())
            .map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })?;

        let mut output = Vec::with_capacity(HEADER_LEN + payload.len());
        output.extend_from_slice(&STAMP_MAGIC);
        output.extend_from_slice(&STAMP_FORMAT_VERSION.to_le_bytes());
        output.extend_from_slice(&payload);

        let mut file = std::fs::File::create(path).map_err(|e| CacheError::io(path, e))?;
        file.write_all(&output)
            .map_err(|e| CacheError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn make_store() -> (tempfile::TempDir, StampStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = StampStore::new(dir.path());
        (dir, store)
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Captured {
        stdout: Vec<u8>,
        stderr: Vec<u8>,
        code: i32,
    }

    #[test]
    fn path_for_joins_hex_name() {
        let store = StampStore::new(Path::new("/tmp/jobstamps"));
        let fp = Fingerprint::from_bytes(b"job");
        let path = store.path_for(&fp);
        assert_eq!(path.parent().unwrap(), Path::new("/tmp/jobstamps"));
        assert_eq!(path.file_name().unwrap().to_str().unwrap(), fp.to_hex());
    }

    #[test]
    fn sidecar_path_appends_suffix() {
        let sidecar = StampStore::sidecar_path(Path::new("/tmp/jobstamps/abcd"));
        assert_eq!(sidecar, PathBuf::from("/tmp/jobstamps/abcd.dep.sha1"));
    }

    #[test]
    fn ensure_directory_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("stamps");
        StampStore::new(&nested).ensure_directory().unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn ensure_directory_accepts_existing() {
        let (_dir, store) = make_store();
        store.ensure_directory().unwrap();
        store.ensure_directory().unwrap();
    }

    #[test]
    fn ensure_directory_rejects_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("cache");
        std::fs::write(&file, "Regular file").unwrap();

        let err = StampStore::new(&file).ensure_directory().unwrap_err();
        assert!(matches!(err, CacheError::NotADirectory { .. }));
    }

    #[test]
    fn write_then_read_string() {
        let (dir, store) = make_store();
        let path = dir.path().join("stamp");
        store.write(&path, &"expected".to_string()).unwrap();
        let back: String = store.read(&path).unwrap();
        assert_eq!(back, "expected");
    }

    #[test]
    fn write_then_read_binary_struct() {
        let (dir, store) = make_store();
        let path = dir.path().join("stamp");
        let value = Captured {
            stdout: vec![0, 159, 146, 150],
            stderr: b"warning\n".to_vec(),
            code: 2,
        };
        store.write(&path, &value).unwrap();
        let back: Captured = store.read(&path).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn write_truncates_previous_value() {
        let (dir, store) = make_store();
        let path = dir.path().join("stamp");
        store.write(&path, &vec![7_u8; 4096]).unwrap();
        store.write(&path, &vec![1_u8]).unwrap();
        let back: Vec<u8> = store.read(&path).unwrap();
        assert_eq!(back, vec![1]);
    }

    #[test]
    fn read_missing_is_io_error() {
        let (dir, store) = make_store();
        let err = store.read::<String>(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
    }

    #[test]
    fn read_rejects_bad_magic() {
        let (dir, store) = make_store();
        let path = dir.path().join("stamp");
        std::fs::write(&path, b"NOPE\x01\x00\x00\x00payload").unwrap();
        let err = store.read::<String>(&path).unwrap_err();
        assert!(matches!(err, CacheError::InvalidHeader { .. }));
    }

    #[test]
    fn read_rejects_short_file() {
        let (dir, store) = make_store();
        let path = dir.path().join("stamp");
        std::fs::write(&path, b"JS").unwrap();
        let err = store.read::<String>(&path).unwrap_err();
        assert!(matches!(err, CacheError::InvalidHeader { .. }));
    }

    #[test]
    fn read_rejects_future_version() {
        let (dir, store) = make_store();
        let path = dir.path().join("stamp");
        let mut raw = STAMP_MAGIC.to_vec();
        raw.extend_from_slice(&99_u32.to_le_bytes());
        std::fs::write(&path, raw).unwrap();
        let err = store.read::<String>(&path).unwrap_err();
        assert!(matches!(
            err,
            CacheError::VersionMismatch {
                expected: 1,
                actual: 99,
                ..
            }
        ));
    }

    #[test]
    fn read_rejects_truncated_payload() {
        let (dir, store) = make_store();
        let path = dir.path().join("stamp");
        store.write(&path, &"a longer string value".to_string()).unwrap();
        let raw = std::fs::read(&path).unwrap();
        std::fs::write(&path, &raw[..raw.len() - 5]).unwrap();
        let err = store.read::<String>(&path).unwrap_err();
        assert!(matches!(err, CacheError::Serialization { .. }));
    }
}
