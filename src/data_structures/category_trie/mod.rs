//! Category Trie Implementation
//!
//! This module provides a multi-key trie that stores entries under ordered
//! label paths such as `["generation-1", "legendary"]`. It supports:
//!
//! * subtree retrieval by exact (possibly partial) label path
//! * substring search over labels and over entry values
//! * a deduplicated, insertion-ordered catalogue of every inserted path
//! * a compact binary encoding and a JSON text form that round-trip losslessly
//!
//! The trie is built once, persisted, and loaded read-only afterwards. There
//! is no removal.
//!
//! # Traversal order
//!
//! Subtree collection and value search walk the trie depth-first. A node's
//! own entries come first, in insertion order, followed by its children in
//! lexicographic label order. The order is stable for a given trie.
//!
//! # Example
//!
//! ```
//! use pokesay_lib::data_structures::category_trie::{CategoryTrie, Entry};
//!
//! let mut trie = CategoryTrie::new();
//! trie.insert(&["small", "g1", "r"], Entry::new(0, "pikachu")).unwrap();
//! trie.insert(&["big", "g1"], Entry::new(1, "charmander")).unwrap();
//!
//! let small = trie.find_by_key_path(&["small"]).unwrap();
//! assert_eq!(small[0].value(), "pikachu");
//! assert!(trie.find("mew").is_err());
//! ```

mod codec;
mod entry;
mod error;
mod node;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub use codec::{DEFAULT_DECODE_LIMIT, FORMAT_VERSION, MAGIC};
pub use entry::Entry;
pub use error::CategoryTrieError;
pub use node::{TrieNode, MAX_PATH_DEPTH};

/// Result type for category trie operations
pub type CategoryTrieResult<T> = Result<T, CategoryTrieError>;

/// An entry matched by value search, with the path of the node that holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrieMatch<'a> {
    /// The matching entry
    pub entry: &'a Entry,

    /// Full label path of the owning node
    pub path: Vec<String>,
}

/// A trie of entries keyed by label paths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "TrieRepr")]
pub struct CategoryTrie {
    /// The root node, addressed by the empty path
    root: TrieNode,

    /// Number of accepted inserts, duplicates included
    len: usize,

    /// Distinct inserted paths in first-insertion order
    keys: Vec<Vec<String>>,

    /// Set view of `keys`, rebuilt on load
    #[serde(skip_serializing)]
    seen: HashSet<Vec<String>>,
}

impl CategoryTrie {
    /// Creates a new empty `CategoryTrie`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry at the given label path.
    ///
    /// Missing nodes along the path are created. The entry is appended to the
    /// node's data, so repeated inserts at one path accumulate. The path is
    /// recorded in the key catalogue the first time it is seen.
    ///
    /// # Arguments
    ///
    /// * `path` - Non-empty sequence of labels.
    /// * `entry` - The entry to store.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The entry was stored.
    /// * `Err(CategoryTrieError::EmptyPath)` - `path` had no labels; the trie is unchanged.
    /// * `Err(CategoryTrieError::PathTooDeep)` - `path` has more than
    ///   [`MAX_PATH_DEPTH`] labels; the trie is unchanged.
    pub fn insert<S: AsRef<str>>(&mut self, path: &[S], entry: Entry) -> CategoryTrieResult<()> {
        if path.is_empty() {
            return Err(CategoryTrieError::EmptyPath);
        }
        if path.len() > MAX_PATH_DEPTH {
            return Err(CategoryTrieError::PathTooDeep {
                depth: path.len(),
                max: MAX_PATH_DEPTH,
            });
        }

        let mut node = &mut self.root;
        for label in path {
            node = node.child_or_insert(label.as_ref());
        }
        tracing::trace!(value = entry.value(), index = entry.index(), "inserting entry");
        node.data.push(entry);

        self.len += 1;

        let owned: Vec<String> = path.iter().map(|label| label.as_ref().to_string()).collect();
        if !self.seen.contains(&owned) {
            self.seen.insert(owned.clone());
            self.keys.push(owned);
        }

        Ok(())
    }

    /// Returns the node addressed by `path`, or `None` if any label is missing.
    ///
    /// The empty path addresses the root.
    pub fn node<S: AsRef<str>>(&self, path: &[S]) -> Option<&TrieNode> {
        path.iter()
            .try_fold(&self.root, |node, label| node.child(label.as_ref()))
    }

    /// Returns every entry in the subtree rooted at `path`.
    ///
    /// A partial path returns everything nested beneath it, at any depth.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<&Entry>)` - Entries in traversal order (see module docs).
    /// * `Err(CategoryTrieError::NotFound)` - Some label of `path` does not exist.
    pub fn find_by_key_path<S: AsRef<str>>(&self, path: &[S]) -> CategoryTrieResult<Vec<&Entry>> {
        let node = self
            .node(path)
            .ok_or_else(|| CategoryTrieError::path_not_found(path))?;

        let mut entries = Vec::new();
        node.collect_entries(&mut entries);
        Ok(entries)
    }

    /// Returns the stored paths having at least one label that contains `token`.
    ///
    /// Matching is a case-sensitive substring test. Paths keep their
    /// insertion order.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<&[String]>)` - Non-empty list of matching paths.
    /// * `Err(CategoryTrieError::NotFound)` - No path matched.
    pub fn find_key_paths(&self, token: &str) -> CategoryTrieResult<Vec<&[String]>> {
        let matches: Vec<&[String]> = self
            .keys
            .iter()
            .filter(|path| path.iter().any(|label| label.contains(token)))
            .map(Vec::as_slice)
            .collect();

        if matches.is_empty() {
            return Err(CategoryTrieError::token_not_found(token));
        }
        Ok(matches)
    }

    /// Returns every entry whose value contains `token`, paired with its path.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<TrieMatch>)` - Matches in traversal order (see module docs).
    /// * `Err(CategoryTrieError::NotFound)` - No entry value matched.
    pub fn find(&self, token: &str) -> CategoryTrieResult<Vec<TrieMatch<'_>>> {
        let mut matches = Vec::new();
        let mut path = Vec::new();
        Self::find_in(&self.root, token, &mut path, &mut matches);

        if matches.is_empty() {
            return Err(CategoryTrieError::token_not_found(token));
        }
        Ok(matches)
    }

    /// Depth-first value search, tracking the labels walked so far in `path`.
    fn find_in<'a>(
        node: &'a TrieNode,
        token: &str,
        path: &mut Vec<&'a str>,
        matches: &mut Vec<TrieMatch<'a>>,
    ) {
        for entry in node.data.iter().filter(|entry| entry.value().contains(token)) {
            matches.push(TrieMatch {
                entry,
                path: path.iter().map(|label| label.to_string()).collect(),
            });
        }

        for (label, child) in node.children() {
            path.push(label);
            Self::find_in(child, token, path, matches);
            path.pop();
        }
    }

    /// All distinct inserted paths, in first-insertion order.
    pub fn key_paths(&self) -> &[Vec<String>] {
        &self.keys
    }

    /// Total number of inserts accepted, duplicate paths included.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing was ever inserted.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The root node.
    pub fn root(&self) -> &TrieNode {
        &self.root
    }
}

impl PartialEq for CategoryTrie {
    fn eq(&self, other: &Self) -> bool {
        // `seen` is derived from `keys`
        self.root == other.root && self.len == other.len && self.keys == other.keys
    }
}

impl Eq for CategoryTrie {}

/// Persisted shape of a trie, checked before it becomes a `CategoryTrie`.
#[derive(Deserialize)]
struct TrieRepr {
    root: TrieNode,
    len: usize,
    keys: Vec<Vec<String>>,
}

impl TryFrom<TrieRepr> for CategoryTrie {
    type Error = CategoryTrieError;

    fn try_from(repr: TrieRepr) -> Result<Self, Self::Error> {
        let TrieRepr { root, len, keys } = repr;

        if !root.data.is_empty() {
            return Err(CategoryTrieError::Decode(
                "root node cannot hold entries".to_string(),
            ));
        }

        if keys.len() > len {
            return Err(CategoryTrieError::Decode(format!(
                "{} key paths recorded for only {len} inserts",
                keys.len()
            )));
        }

        let entries = root.entry_count();
        if entries != len {
            return Err(CategoryTrieError::Decode(format!(
                "trie holds {entries} entries but records {len} inserts"
            )));
        }

        let mut seen = HashSet::with_capacity(keys.len());
        for path in &keys {
            if path.is_empty() {
                return Err(CategoryTrieError::Decode("empty key path".to_string()));
            }
            if path
                .iter()
                .try_fold(&root, |node, label| node.child(label))
                .is_none()
            {
                return Err(CategoryTrieError::Decode(format!(
                    "key path '{}' has no node",
                    path.join("/")
                )));
            }
            if !seen.insert(path.clone()) {
                return Err(CategoryTrieError::Decode(format!(
                    "duplicate key path '{}'",
                    path.join("/")
                )));
            }
        }

        Ok(Self {
            root,
            len,
            keys,
            seen,
        })
    }
}
