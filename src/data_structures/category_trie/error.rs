//! Error types for the category trie.
//!
//! This module defines the error types that can occur while building,
//! querying, or (de)serializing a category trie.

/// Errors that can occur in category trie operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryTrieError {
    /// Error when an insert is attempted with no labels.
    #[error("Empty key path not allowed")]
    EmptyPath,

    /// Error when an insert path has more labels than a trie may nest.
    #[error("Key path has {depth} labels, at most {max} allowed")]
    PathTooDeep {
        /// Labels in the rejected path
        depth: usize,
        /// Deepest path accepted
        max: usize,
    },

    /// Error when a lookup by path, label token, or value token matched nothing.
    #[error("No match found for {0}")]
    NotFound(String),

    /// Error when persisted bytes or text cannot be turned back into a trie.
    #[error("Failed to decode category trie: {0}")]
    Decode(String),

    /// Error when the trie cannot be encoded.
    #[error("Failed to encode category trie: {0}")]
    Encode(String),

    /// IO errors while reading or writing an index file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CategoryTrieError {
    /// Builds a `NotFound` error for a label path, rendered as `a/b/c`.
    pub(crate) fn path_not_found<S: AsRef<str>>(path: &[S]) -> Self {
        let rendered = path
            .iter()
            .map(|label| label.as_ref())
            .collect::<Vec<_>>()
            .join("/");
        Self::NotFound(format!("key path '{rendered}'"))
    }

    /// Builds a `NotFound` error for a substring token.
    pub(crate) fn token_not_found(token: &str) -> Self {
        Self::NotFound(format!("token '{token}'"))
    }

    /// Returns `true` for the `NotFound` variant.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
