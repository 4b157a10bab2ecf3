//! Serialization for the category trie.
//!
//! Two encodings are driven by the same serde model:
//!
//! * a JSON text form, compact or indented, used for inspection and diffs
//! * a binary form for the persisted index: the `MAGIC` bytes, a format
//!   version byte, then the bincode encoding of the trie
//!
//! Decoding re-checks the trie invariants, so a decoded trie behaves exactly
//! like the one that was written. Nodes nested deeper than
//! [`MAX_PATH_DEPTH`](super::MAX_PATH_DEPTH) are refused in both forms.

use std::path::Path;

use bincode::Options;
use serde::Serialize;
use tracing::debug;

use super::{CategoryTrie, CategoryTrieError, CategoryTrieResult};

/// Leading bytes of every persisted index.
pub const MAGIC: &[u8; 4] = b"PKDX";

/// Version of the binary layout following the header.
pub const FORMAT_VERSION: u8 = 1;

/// Default cap on the size of a persisted index accepted by the decoder.
pub const DEFAULT_DECODE_LIMIT: u64 = 64 * 1024 * 1024;

impl CategoryTrie {
    /// Renders the trie as JSON.
    ///
    /// Empty entry lists render as `null`. With `indent` set, the output is
    /// multi-line with that many spaces per nesting level; otherwise it is
    /// the compact form. Both carry the same data.
    pub fn to_json(&self, indent: Option<usize>) -> CategoryTrieResult<String> {
        let encoded = match indent {
            None => serde_json::to_vec(self),
            Some(width) => {
                let indent = " ".repeat(width);
                let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
                let mut buf = Vec::new();
                let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
                self.serialize(&mut serializer).map(|()| buf)
            }
        }
        .map_err(|e| CategoryTrieError::Encode(e.to_string()))?;

        String::from_utf8(encoded).map_err(|e| CategoryTrieError::Encode(e.to_string()))
    }

    /// Parses a trie from either JSON form produced by [`CategoryTrie::to_json`].
    pub fn from_json(text: &str) -> CategoryTrieResult<Self> {
        serde_json::from_str(text).map_err(|e| CategoryTrieError::Decode(e.to_string()))
    }

    /// Encodes the whole trie into the persisted binary form.
    pub fn to_bytes(&self) -> CategoryTrieResult<Vec<u8>> {
        let body = bincode::DefaultOptions::new()
            .serialize(self)
            .map_err(|e| CategoryTrieError::Encode(e.to_string()))?;

        let mut bytes = Vec::with_capacity(MAGIC.len() + 1 + body.len());
        bytes.extend_from_slice(MAGIC);
        bytes.push(FORMAT_VERSION);
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    /// Decodes a trie from the persisted binary form using the default size limit.
    pub fn from_bytes(bytes: &[u8]) -> CategoryTrieResult<Self> {
        Self::from_bytes_with_limit(bytes, DEFAULT_DECODE_LIMIT)
    }

    /// Decodes a trie from the persisted binary form.
    ///
    /// # Arguments
    ///
    /// * `bytes` - The encoded index.
    /// * `limit` - Largest input, in bytes, the decoder will accept.
    ///
    /// # Returns
    ///
    /// * `Ok(CategoryTrie)` - The decoded trie.
    /// * `Err(CategoryTrieError::Decode)` - The input is malformed, truncated,
    ///   too large, of another format version, or violates a trie invariant.
    pub fn from_bytes_with_limit(bytes: &[u8], limit: u64) -> CategoryTrieResult<Self> {
        if bytes.len() as u64 > limit {
            return Err(CategoryTrieError::Decode(format!(
                "index is {} bytes, limit is {limit}",
                bytes.len()
            )));
        }

        let body = bytes
            .strip_prefix(MAGIC.as_slice())
            .ok_or_else(|| CategoryTrieError::Decode("missing index header".to_string()))?;
        let (&version, body) = body
            .split_first()
            .ok_or_else(|| CategoryTrieError::Decode("missing format version".to_string()))?;
        if version != FORMAT_VERSION {
            return Err(CategoryTrieError::Decode(format!(
                "unsupported format version {version}, expected {FORMAT_VERSION}"
            )));
        }

        let trie: CategoryTrie = bincode::DefaultOptions::new()
            .with_limit(limit)
            .deserialize(body)
            .map_err(|e| CategoryTrieError::Decode(e.to_string()))?;

        debug!(
            bytes = bytes.len(),
            entries = trie.len(),
            key_paths = trie.key_paths().len(),
            "decoded category trie"
        );
        Ok(trie)
    }

    /// Writes the persisted binary form to `path`.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> CategoryTrieResult<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), &bytes)?;
        debug!(path = ?path.as_ref(), bytes = bytes.len(), "wrote category trie");
        Ok(())
    }

    /// Reads and decodes a persisted index from `path`.
    pub fn read_from_file<P: AsRef<Path>>(path: P, limit: u64) -> CategoryTrieResult<Self> {
        let path = path.as_ref();
        let size = std::fs::metadata(path)?.len();
        if size > limit {
            return Err(CategoryTrieError::Decode(format!(
                "index file {path:?} is {size} bytes, limit is {limit}"
            )));
        }
        let bytes = std::fs::read(path)?;
        Self::from_bytes_with_limit(&bytes, limit)
    }
}
