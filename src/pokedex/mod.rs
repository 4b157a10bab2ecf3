//! Pokemon collection built on the category trie.
//!
//! [`PokemonTrie`] stores pokemon entries under category paths such as
//! `["generation-1", "legendary"]` and is the query surface used by the
//! command line. It wraps a [`CategoryTrie`] and adds nothing but naming,
//! name-ordered matches, and selection helpers.

pub mod art;
pub mod builder;
pub mod select;

use std::collections::BTreeSet;
use std::path::Path;

use crate::data_structures::category_trie::{
    CategoryTrie, CategoryTrieError, CategoryTrieResult, Entry,
};

pub use art::{ArtCodec, ArtError, ArtResult, ArtStore, DirectoryArtStore, ZstdCodec};
pub use builder::{BuildError, BuildSummary, IndexBuilder};
pub use select::{FixedSelector, RandomSelector, Selector};

/// A pokemon entry together with the category path it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokemonMatch<'a> {
    /// The pokemon entry
    pub entry: &'a Entry,

    /// Category labels, outermost first
    pub categories: Vec<String>,
}

/// Category index of the pokemon collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PokemonTrie {
    trie: CategoryTrie,
}

impl PokemonTrie {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing category trie.
    pub fn from_trie(trie: CategoryTrie) -> Self {
        Self { trie }
    }

    /// The underlying category trie.
    pub fn trie(&self) -> &CategoryTrie {
        &self.trie
    }

    /// Decodes a collection from persisted index bytes.
    pub fn from_bytes(bytes: &[u8], limit: u64) -> CategoryTrieResult<Self> {
        CategoryTrie::from_bytes_with_limit(bytes, limit).map(Self::from_trie)
    }

    /// Reads a persisted index file.
    pub fn read_from_file<P: AsRef<Path>>(path: P, limit: u64) -> CategoryTrieResult<Self> {
        CategoryTrie::read_from_file(path, limit).map(Self::from_trie)
    }

    /// Writes the persisted index file.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> CategoryTrieResult<()> {
        self.trie.write_to_file(path)
    }

    /// Adds a pokemon under a category path.
    pub fn insert<S: AsRef<str>>(&mut self, categories: &[S], entry: Entry) -> CategoryTrieResult<()> {
        self.trie.insert(categories, entry)
    }

    /// All pokemon at or below a category path.
    pub fn get_category<S: AsRef<str>>(&self, categories: &[S]) -> CategoryTrieResult<Vec<&Entry>> {
        self.trie.find_by_key_path(categories)
    }

    /// Category paths having a label that contains `token`.
    pub fn get_category_paths(&self, token: &str) -> CategoryTrieResult<Vec<&[String]>> {
        self.trie.find_key_paths(token)
    }

    /// Pokemon whose name contains `token`, sorted by name.
    ///
    /// Each match carries the category path of the node holding it.
    pub fn match_name_token(&self, token: &str) -> CategoryTrieResult<Vec<PokemonMatch<'_>>> {
        let mut matches: Vec<PokemonMatch<'_>> = self
            .trie
            .find(token)?
            .into_iter()
            .map(|m| PokemonMatch {
                entry: m.entry,
                categories: m.path,
            })
            .collect();
        matches.sort_by(|a, b| a.entry.value().cmp(b.entry.value()));
        Ok(matches)
    }

    /// Every distinct category path, in first-insertion order.
    pub fn categories(&self) -> &[Vec<String>] {
        self.trie.key_paths()
    }

    /// Every distinct category label used in any path, sorted.
    pub fn category_labels(&self) -> Vec<&str> {
        self.categories()
            .iter()
            .flatten()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Picks a category path, then a pokemon at or below it.
    ///
    /// With a `token`, only paths having a label that contains it are
    /// candidates; otherwise every path is.
    pub fn choose_by_category(
        &self,
        token: Option<&str>,
        selector: &mut dyn Selector,
    ) -> CategoryTrieResult<PokemonMatch<'_>> {
        let paths: Vec<&[String]> = match token {
            Some(token) => self.get_category_paths(token)?,
            None => self.categories().iter().map(Vec::as_slice).collect(),
        };
        if paths.is_empty() {
            return Err(CategoryTrieError::NotFound("any category".to_string()));
        }

        let path = paths[pick(selector, paths.len())];
        let entries = self.get_category(path)?;
        if entries.is_empty() {
            return Err(CategoryTrieError::path_not_found(path));
        }
        let entry = entries[pick(selector, entries.len())];

        tracing::debug!(name = entry.value(), categories = ?path, "chose pokemon by category");
        Ok(PokemonMatch {
            entry,
            categories: path.to_vec(),
        })
    }

    /// Picks one of the pokemon whose name contains `token`.
    pub fn choose_by_name(
        &self,
        token: &str,
        selector: &mut dyn Selector,
    ) -> CategoryTrieResult<PokemonMatch<'_>> {
        let mut matches = self.match_name_token(token)?;
        let chosen = matches.swap_remove(pick(selector, matches.len()));

        tracing::debug!(name = chosen.entry.value(), "chose pokemon by name");
        Ok(chosen)
    }
}

/// Asks `selector` for a position among `len > 0` candidates, clamped into range.
fn pick(selector: &mut dyn Selector, len: usize) -> usize {
    selector.select(len).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pokedex() -> PokemonTrie {
        let mut pokedex = PokemonTrie::new();
        pokedex
            .insert(&["small", "gen-1", "regular"], Entry::new(0, "pikachu"))
            .unwrap();
        pokedex
            .insert(&["small", "gen-1", "shiny"], Entry::new(1, "pikachu-shiny"))
            .unwrap();
        pokedex
            .insert(&["big", "gen-1", "regular"], Entry::new(2, "charizard"))
            .unwrap();
        pokedex
            .insert(&["big", "gen-2"], Entry::new(3, "abra"))
            .unwrap();
        pokedex
    }

    #[test]
    fn test_get_category_delegates() {
        let pokedex = pokedex();
        let small = pokedex.get_category(&["small"]).unwrap();
        assert_eq!(small.len(), 2);
        assert!(pokedex.get_category(&["medium"]).unwrap_err().is_not_found());
    }

    #[test]
    fn test_match_name_token_sorted_with_categories() {
        let pokedex = pokedex();
        let matches = pokedex.match_name_token("a").unwrap();
        let names: Vec<&str> = matches.iter().map(|m| m.entry.value()).collect();

        assert_eq!(names, vec!["abra", "charizard", "pikachu", "pikachu-shiny"]);
        assert_eq!(matches[0].categories, vec!["big", "gen-2"]);
        assert_eq!(matches[3].categories, vec!["small", "gen-1", "shiny"]);
    }

    #[test]
    fn test_category_labels_are_unique_and_sorted() {
        assert_eq!(
            pokedex().category_labels(),
            vec!["big", "gen-1", "gen-2", "regular", "shiny", "small"]
        );
    }

    #[test]
    fn test_choose_by_category_with_token() {
        let pokedex = pokedex();
        let chosen = pokedex
            .choose_by_category(Some("shiny"), &mut FixedSelector(0))
            .unwrap();

        assert_eq!(chosen.entry.value(), "pikachu-shiny");
        assert_eq!(chosen.categories, vec!["small", "gen-1", "shiny"]);
    }

    #[test]
    fn test_choose_by_category_can_pick_last_path() {
        let pokedex = pokedex();
        let chosen = pokedex
            .choose_by_category(None, &mut FixedSelector(usize::MAX))
            .unwrap();

        assert_eq!(chosen.categories, vec!["big", "gen-2"]);
        assert_eq!(chosen.entry.value(), "abra");
    }

    #[test]
    fn test_choose_on_empty_collection() {
        let pokedex = PokemonTrie::new();
        let err = pokedex
            .choose_by_category(None, &mut RandomSelector)
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(pokedex.choose_by_name("pika", &mut RandomSelector).is_err());
    }

    #[test]
    fn test_choose_by_name() {
        let pokedex = pokedex();
        let chosen = pokedex.choose_by_name("pika", &mut FixedSelector(1)).unwrap();
        assert_eq!(chosen.entry.value(), "pikachu-shiny");
        assert!(pokedex.choose_by_name("mew", &mut RandomSelector).is_err());
    }

    /// Returns a position past the end of every candidate list.
    struct OutOfRange;

    impl Selector for OutOfRange {
        fn select(&mut self, len: usize) -> usize {
            len + 7
        }
    }

    #[test]
    fn test_choose_clamps_out_of_range_selection() {
        let pokedex = pokedex();

        let chosen = pokedex.choose_by_category(None, &mut OutOfRange).unwrap();
        assert_eq!(chosen.entry.value(), "abra");

        let chosen = pokedex.choose_by_name("pika", &mut OutOfRange).unwrap();
        assert_eq!(chosen.entry.value(), "pikachu-shiny");
    }
}
