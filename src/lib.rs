//! Pokesay Library
//!
//! This library contains the components behind the `pokesay` binary: the
//! category trie that indexes the pokemon collection, the art store and
//! index builder, the speech bubble renderer, configuration, and errors.
//!
//! # Architecture
//!
//! - The category index is built once, persisted, and loaded read-only
//! - Lookups are deterministic; randomness is injected through a `Selector`
//! - Art storage and compression sit behind traits
//! - Errors are explicit values; only the binary decides what is fatal

// Re-export public modules
pub mod bubble;
pub mod config;
pub mod data_structures;
pub mod error;
pub mod pokedex;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

// Feature-gated modules
#[cfg(feature = "benchmarking")]
pub mod bench;

/// Version information for pokesay.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
