//! Node implementation for the category trie.
//!
//! Every node has the same shape: a map of labels to child nodes and a list
//! of entries attached to the node itself. Entries may live at any depth,
//! so a node can carry data and children at the same time.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, DeserializeSeed, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::entry::Entry;

/// Deepest label path a trie accepts, on insert and on decode.
///
/// Every level costs two nesting levels in the JSON form, so this stays well
/// under the JSON parser's recursion ceiling.
pub const MAX_PATH_DEPTH: usize = 48;

/// A node in the category trie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrieNode {
    /// Child nodes keyed by label, in lexicographic order
    pub(crate) children: BTreeMap<String, TrieNode>,

    /// Entries attached to this node, in insertion order
    #[serde(serialize_with = "nullable_data::serialize")]
    pub(crate) data: Vec<Entry>,
}

impl TrieNode {
    /// Creates a new empty trie node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the child stored under `label`, if any.
    pub fn child(&self, label: &str) -> Option<&TrieNode> {
        self.children.get(label)
    }

    /// Iterates the children in label order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &TrieNode)> {
        self.children.iter().map(|(label, node)| (label.as_str(), node))
    }

    /// Entries attached directly to this node.
    pub fn data(&self) -> &[Entry] {
        &self.data
    }

    /// Returns the child for `label`, creating an empty one if missing.
    pub(crate) fn child_or_insert(&mut self, label: &str) -> &mut TrieNode {
        self.children.entry(label.to_string()).or_default()
    }

    /// Collects this node's entries and those of every descendant,
    /// depth-first, own data before children.
    pub(crate) fn collect_entries<'a>(&'a self, out: &mut Vec<&'a Entry>) {
        out.extend(self.data.iter());
        for child in self.children.values() {
            child.collect_entries(out);
        }
    }

    /// Number of entries held in this subtree.
    pub(crate) fn entry_count(&self) -> usize {
        self.data.len()
            + self
                .children
                .values()
                .map(TrieNode::entry_count)
                .sum::<usize>()
    }
}

impl<'de> Deserialize<'de> for TrieNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        NodeSeed { depth: 0 }.deserialize(deserializer)
    }
}

const NODE_FIELDS: &[&str] = &["children", "data"];

/// Deserializes a node `depth` labels below the root.
///
/// Nesting past [`MAX_PATH_DEPTH`] is rejected before descending, so hostile
/// input cannot exhaust the stack.
struct NodeSeed {
    depth: usize,
}

impl<'de> DeserializeSeed<'de> for NodeSeed {
    type Value = TrieNode;

    fn deserialize<D>(self, deserializer: D) -> Result<TrieNode, D::Error>
    where
        D: Deserializer<'de>,
    {
        if self.depth > MAX_PATH_DEPTH {
            return Err(de::Error::custom(format!(
                "node nesting exceeds {MAX_PATH_DEPTH} levels"
            )));
        }
        deserializer.deserialize_struct("TrieNode", NODE_FIELDS, self)
    }
}

impl<'de> Visitor<'de> for NodeSeed {
    type Value = TrieNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a trie node")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<TrieNode, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let children = seq
            .next_element_seed(ChildrenSeed { depth: self.depth })?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let data = seq
            .next_element::<NullableData>()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        Ok(TrieNode {
            children,
            data: data.0,
        })
    }

    fn visit_map<A>(self, mut map: A) -> Result<TrieNode, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut children = None;
        let mut data = None;
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "children" => {
                    if children.is_some() {
                        return Err(de::Error::duplicate_field("children"));
                    }
                    children = Some(map.next_value_seed(ChildrenSeed { depth: self.depth })?);
                }
                "data" => {
                    if data.is_some() {
                        return Err(de::Error::duplicate_field("data"));
                    }
                    data = Some(map.next_value::<NullableData>()?.0);
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(TrieNode {
            children: children.ok_or_else(|| de::Error::missing_field("children"))?,
            data: data.unwrap_or_default(),
        })
    }
}

/// Deserializes the children map of a node at `depth`.
struct ChildrenSeed {
    depth: usize,
}

impl<'de> DeserializeSeed<'de> for ChildrenSeed {
    type Value = BTreeMap<String, TrieNode>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for ChildrenSeed {
    type Value = BTreeMap<String, TrieNode>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of labels to trie nodes")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut children = BTreeMap::new();
        while let Some(label) = map.next_key::<String>()? {
            let child = map.next_value_seed(NodeSeed {
                depth: self.depth + 1,
            })?;
            children.insert(label, child);
        }
        Ok(children)
    }
}

/// Entry list that may be encoded as `null`.
struct NullableData(Vec<Entry>);

impl<'de> Deserialize<'de> for NullableData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        nullable_data::deserialize(deserializer).map(NullableData)
    }
}

/// Encodes an empty data list as `null` and reads `null` back as empty.
///
/// Used for both the JSON and the binary encoding so the two stay aligned.
mod nullable_data {
    use super::*;

    pub fn serialize<S>(data: &[Entry], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if data.is_empty() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(data)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Entry>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Vec<Entry>>::deserialize(deserializer)?.unwrap_or_default())
    }
}
