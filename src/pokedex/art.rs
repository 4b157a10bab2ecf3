//! Art storage and codec collaborators.
//!
//! The category index only stores an `index` per pokemon. The art itself
//! lives in an [`ArtStore`] as compressed bytes and is turned back into text
//! by an [`ArtCodec`].

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for art storage operations
pub type ArtResult<T> = Result<T, ArtError>;

/// Errors raised while fetching or decoding art.
#[derive(Debug, Error)]
pub enum ArtError {
    /// No art is stored for the index.
    #[error("No art stored for index {index} at {path:?}")]
    NotFound {
        /// The requested index
        index: usize,
        /// Where the art was expected
        path: PathBuf,
    },

    /// Compression or decompression failed.
    #[error("Art codec error: {0}")]
    Codec(String),

    /// Decompressed art is not valid UTF-8.
    #[error("Art is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// IO errors while reading or writing art files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Looks up compressed art bytes by entry index.
pub trait ArtStore {
    /// Returns the stored bytes for `index`.
    fn lookup(&self, index: usize) -> ArtResult<Vec<u8>>;
}

/// Compresses art text for storage and restores it.
pub trait ArtCodec {
    /// Compresses art text.
    fn compress(&self, text: &str) -> ArtResult<Vec<u8>>;

    /// Restores art text from stored bytes.
    fn decompress(&self, bytes: &[u8]) -> ArtResult<String>;
}

/// Art files stored one per entry as `<dir>/<index>.<extension>`.
#[derive(Debug, Clone)]
pub struct DirectoryArtStore {
    dir: PathBuf,
    extension: String,
}

impl DirectoryArtStore {
    /// Creates a store rooted at `dir`.
    pub fn new<P: AsRef<Path>, E: Into<String>>(dir: P, extension: E) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            extension: extension.into(),
        }
    }

    /// Path of the art file for `index`.
    pub fn entry_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{index}.{}", self.extension))
    }

    /// Stores `bytes` as the art for `index`, replacing any previous file.
    pub fn store(&self, index: usize, bytes: &[u8]) -> ArtResult<()> {
        std::fs::write(self.entry_path(index), bytes)?;
        Ok(())
    }
}

impl ArtStore for DirectoryArtStore {
    fn lookup(&self, index: usize) -> ArtResult<Vec<u8>> {
        let path = self.entry_path(index);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ArtError::NotFound { index, path })
            }
            Err(e) => Err(ArtError::Io(e)),
        }
    }
}

/// Zstandard art codec.
#[derive(Debug, Clone, Copy)]
pub struct ZstdCodec {
    level: i32,
}

impl ZstdCodec {
    /// Creates a codec compressing at `level`.
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self::new(zstd::DEFAULT_COMPRESSION_LEVEL)
    }
}

impl ArtCodec for ZstdCodec {
    fn compress(&self, text: &str) -> ArtResult<Vec<u8>> {
        zstd::encode_all(text.as_bytes(), self.level).map_err(|e| ArtError::Codec(e.to_string()))
    }

    fn decompress(&self, bytes: &[u8]) -> ArtResult<String> {
        let raw = zstd::decode_all(bytes).map_err(|e| ArtError::Codec(e.to_string()))?;
        Ok(String::from_utf8(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zstd_round_trip() {
        let codec = ZstdCodec::new(3);
        let art = "  /\\_/\\\n ( o.o )\n  > ^ <\n";
        let compressed = codec.compress(art).unwrap();
        assert_eq!(codec.decompress(&compressed).unwrap(), art);
    }

    #[test]
    fn test_zstd_rejects_garbage() {
        let codec = ZstdCodec::default();
        assert!(matches!(
            codec.decompress(b"not zstd"),
            Err(ArtError::Codec(_))
        ));
    }

    #[test]
    fn test_directory_store_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryArtStore::new(dir.path(), "cow");

        assert_eq!(store.entry_path(7), dir.path().join("7.cow"));
        assert!(matches!(
            store.lookup(7),
            Err(ArtError::NotFound { index: 7, .. })
        ));

        store.store(7, b"bytes").unwrap();
        assert_eq!(store.lookup(7).unwrap(), b"bytes");
    }
}
