//! Entry records stored in the category trie.

use serde::{Deserialize, Serialize};

/// A display value paired with the key of its art in external storage.
///
/// Entries are immutable once built: the fields are private and only
/// exposed through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    value: String,
    index: usize,
}

impl Entry {
    /// Creates a new entry.
    ///
    /// # Arguments
    ///
    /// * `index` - Reference key into the art store.
    /// * `value` - Display value (the pokemon name).
    pub fn new<V: Into<String>>(index: usize, value: V) -> Self {
        Self {
            value: value.into(),
            index,
        }
    }

    /// The display value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The art store key.
    pub fn index(&self) -> usize {
        self.index
    }
}
