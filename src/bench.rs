//! Benchmarking support for pokesay.
//!
//! Synthetic collections shaped like a real pokedex, used by the criterion
//! benchmarks under `benches/`.

use crate::data_structures::category_trie::{CategoryTrieResult, Entry};
use crate::pokedex::PokemonTrie;

/// Size classes used as the first category level.
const SIZES: [&str; 3] = ["small", "medium", "big"];

/// Variants used as the last category level.
const VARIANTS: [&str; 2] = ["regular", "shiny"];

/// Number of generations spread across the collection.
const GENERATIONS: usize = 8;

/// Builds a collection of `entries` pokemon under `size/gen-N/variant` paths.
pub fn synthetic_pokedex(entries: usize) -> CategoryTrieResult<PokemonTrie> {
    let mut pokedex = PokemonTrie::new();
    for index in 0..entries {
        let path = [
            SIZES[index % SIZES.len()].to_string(),
            format!("gen-{}", index % GENERATIONS + 1),
            VARIANTS[index % VARIANTS.len()].to_string(),
        ];
        pokedex.insert(&path, Entry::new(index, format!("pokemon-{index:05}")))?;
    }
    Ok(pokedex)
}
