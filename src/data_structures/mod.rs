//! Data structures for pokesay.
//!
//! This module contains the category trie that indexes the pokemon
//! collection. It is built once at index-build time and only read afterwards.

pub mod category_trie;

// Re-export common data structures
pub use category_trie::{CategoryTrie, CategoryTrieError, CategoryTrieResult, Entry, TrieMatch};
