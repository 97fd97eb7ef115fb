//! Hashing for call fingerprints and dependency contents.

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// A 128-bit fingerprint computed using XXH3 identifying one job call.
///
/// Fingerprints address stamp files on disk and are not a security boundary:
/// two calls with the same canonical signature bytes always map to the same
/// fingerprint, and distinct signatures are assumed not to collide.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint([u8; 16]);

impl Fingerprint {
    /// Computes a fingerprint from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Returns the lowercase hex form used as the stamp file name.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

/// A SHA-1 digest of a file's full contents, stored as lowercase hex.
///
/// Used by the hash-based staleness check, where a timestamp is not a
/// trustworthy signal of change (copied or re-checked-out files).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileDigest(String);

impl FileDigest {
    /// Computes the digest of an in-memory byte slice.
    pub fn from_bytes(data: impl AsRef<[u8]>) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(data.as_ref());
        Self(hex::encode(hasher.finalize()))
    }

    /// Computes the digest of everything read from `reader`.
    pub fn from_reader(mut reader: impl Read) -> std::io::Result<Self> {
        let mut hasher = Sha1::new();
        let mut buf = [0_u8; 64 * 1024];
        loop {
            let read = reader.read(&mut buf)?;
            if read == 0 {
                break;
            }
            hasher.update(&buf[..read]);
        }
        Ok(Self(hex::encode(hasher.finalize())))
    }

    /// Computes the digest of a file, streaming its contents.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }
}

impl fmt::Display for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
