//! Build-time packing of art files into an index and an art store.
//!
//! A source tree such as
//!
//! ```text
//! cows/
//!   gen-1/
//!     regular/pikachu.cow
//!     shiny/pikachu.cow
//!   gen-2/chikorita.cow
//! ```
//!
//! becomes one compressed art file per pokemon, `<output>/<index>.cow`, and
//! a category index `<output>/pokedex.bin` in which each pokemon sits under
//! the directories that contain it.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use super::art::{ArtCodec, ArtError, DirectoryArtStore, ZstdCodec};
use super::PokemonTrie;
use crate::data_structures::category_trie::{CategoryTrieError, Entry};

/// File name of the index written into the output directory.
pub const INDEX_FILE_NAME: &str = "pokedex.bin";

/// Category given to art placed directly in the source root.
pub const ROOT_CATEGORY: &str = "uncategorised";

/// Errors raised while building an index.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The source tree holds no art files.
    #[error("No art files with extension '{extension}' found under {dir:?}")]
    Empty {
        /// The scanned directory
        dir: PathBuf,
        /// The extension searched for
        extension: String,
    },

    /// A file or directory name is not valid UTF-8.
    #[error("Path is not valid UTF-8: {0:?}")]
    InvalidName(PathBuf),

    /// Art could not be compressed or stored.
    #[error("Art error: {0}")]
    Art(#[from] ArtError),

    /// The index could not be built or written.
    #[error("Index error: {0}")]
    Index(#[from] CategoryTrieError),

    /// IO errors while scanning the source tree.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    /// Number of pokemon packed
    pub entries: usize,

    /// Number of distinct category paths
    pub categories: usize,

    /// Where the index was written
    pub index_path: PathBuf,
}

/// One art file found in the source tree.
#[derive(Debug)]
struct SourceArt {
    categories: Vec<String>,
    name: String,
    path: PathBuf,
}

/// Packs a tree of art files into an art store and a category index.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    codec: ZstdCodec,
    extension: String,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new(ZstdCodec::default(), "cow")
    }
}

impl IndexBuilder {
    /// Creates a builder reading and writing files with `extension`.
    pub fn new<E: Into<String>>(codec: ZstdCodec, extension: E) -> Self {
        Self {
            codec,
            extension: extension.into(),
        }
    }

    /// Builds the index for `source` into `output`.
    ///
    /// Files are visited in sorted path order, so a given tree always yields
    /// the same indexes. Symlinked directories are not followed. Numbered art
    /// files in `output` beyond the new entry count are removed.
    ///
    /// # Returns
    ///
    /// * `Ok(BuildSummary)` - Counts and the index location.
    /// * `Err(BuildError)` - The tree was empty or a file could not be processed.
    pub fn build<S: AsRef<Path>, O: AsRef<Path>>(
        &self,
        source: S,
        output: O,
    ) -> Result<BuildSummary, BuildError> {
        let source = source.as_ref();
        let output = output.as_ref();

        let mut found = Vec::new();
        self.scan(source, &mut Vec::new(), &mut found)?;
        if found.is_empty() {
            return Err(BuildError::Empty {
                dir: source.to_path_buf(),
                extension: self.extension.clone(),
            });
        }

        std::fs::create_dir_all(output)?;
        let store = DirectoryArtStore::new(output, self.extension.clone());
        let mut pokedex = PokemonTrie::new();

        for (index, art) in found.into_iter().enumerate() {
            let text = std::fs::read_to_string(&art.path)?;
            store.store(index, &self.codec.compress(&text)?)?;

            let categories = if art.categories.is_empty() {
                vec![ROOT_CATEGORY.to_string()]
            } else {
                art.categories
            };
            debug!(index, name = %art.name, categories = ?categories, "packed art");
            pokedex.insert(&categories, Entry::new(index, art.name))?;
        }

        let index_path = output.join(INDEX_FILE_NAME);
        pokedex.write_to_file(&index_path)?;
        self.prune_stale(output, pokedex.trie().len())?;

        let summary = BuildSummary {
            entries: pokedex.trie().len(),
            categories: pokedex.categories().len(),
            index_path,
        };
        info!(
            entries = summary.entries,
            categories = summary.categories,
            index = ?summary.index_path,
            "built pokedex index"
        );
        Ok(summary)
    }

    /// Recursively collects art files below `dir`, in sorted order.
    fn scan(
        &self,
        dir: &Path,
        categories: &mut Vec<String>,
        found: &mut Vec<SourceArt>,
    ) -> Result<(), BuildError> {
        let mut paths = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        paths.sort();

        for path in paths {
            let link = std::fs::symlink_metadata(&path)?.file_type().is_symlink();
            if link && path.is_dir() {
                debug!(path = ?path, "skipping symlinked directory");
            } else if path.is_dir() {
                categories.push(file_label(&path, path.file_name())?);
                self.scan(&path, categories, found)?;
                categories.pop();
            } else if path.extension().and_then(|ext| ext.to_str()) == Some(self.extension.as_str()) {
                found.push(SourceArt {
                    categories: categories.clone(),
                    name: file_label(&path, path.file_stem())?,
                    path,
                });
            }
        }
        Ok(())
    }

    /// Removes art files numbered `count` or above left by an earlier, larger build.
    fn prune_stale(&self, output: &Path, count: usize) -> Result<(), BuildError> {
        for entry in std::fs::read_dir(output)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            let stale = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<usize>().ok())
                .is_some_and(|index| index >= count);
            if stale && path.is_file() {
                debug!(path = ?path, "removing stale art");
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

/// Turns a path component into a UTF-8 label.
fn file_label(path: &Path, component: Option<&std::ffi::OsStr>) -> Result<String, BuildError> {
    component
        .and_then(|c| c.to_str())
        .map(str::to_string)
        .ok_or_else(|| BuildError::InvalidName(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pokedex::ArtStore;
    use std::fs;

    fn write(path: &Path, text: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_build_packs_tree() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(&source.path().join("gen-1/regular/pikachu.cow"), "pika art\n");
        write(&source.path().join("gen-1/shiny/pikachu.cow"), "shiny art\n");
        write(&source.path().join("gen-2/chikorita.cow"), "chiko art\n");
        write(&source.path().join("missingno.cow"), "glitch\n");
        write(&source.path().join("gen-2/notes.txt"), "ignored");

        let builder = IndexBuilder::new(ZstdCodec::new(3), "cow");
        let summary = builder.build(source.path(), output.path()).unwrap();

        assert_eq!(summary.entries, 4);
        assert_eq!(summary.categories, 4);
        assert_eq!(summary.index_path, output.path().join(INDEX_FILE_NAME));

        let pokedex = PokemonTrie::read_from_file(&summary.index_path, u64::MAX).unwrap();
        assert_eq!(
            pokedex.categories(),
            &[
                vec!["gen-1", "regular"],
                vec!["gen-1", "shiny"],
                vec!["gen-2"],
                vec![ROOT_CATEGORY],
            ]
        );

        let chosen = pokedex.get_category(&["gen-2"]).unwrap();
        assert_eq!(chosen.len(), 1);
        assert_eq!(chosen[0].value(), "chikorita");

        let store = DirectoryArtStore::new(output.path(), "cow");
        let codec = ZstdCodec::default();
        let art = codec.decompress(&store.lookup(chosen[0].index()).unwrap()).unwrap();
        assert_eq!(art, "chiko art\n");
    }

    #[test]
    fn test_build_empty_source() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(&source.path().join("readme.txt"), "nothing here");

        let err = IndexBuilder::default()
            .build(source.path(), output.path())
            .unwrap_err();
        assert!(matches!(err, BuildError::Empty { .. }));
    }

    #[test]
    fn test_rebuild_removes_stale_art() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        for name in ["abra", "bulbasaur", "charmander"] {
            write(&source.path().join(format!("gen-1/{name}.cow")), name);
        }
        let builder = IndexBuilder::new(ZstdCodec::new(3), "cow");
        builder.build(source.path(), output.path()).unwrap();
        assert!(output.path().join("2.cow").exists());

        fs::remove_file(source.path().join("gen-1/bulbasaur.cow")).unwrap();
        fs::remove_file(source.path().join("gen-1/charmander.cow")).unwrap();
        write(&output.path().join("notes.cow"), "kept");
        let summary = builder.build(source.path(), output.path()).unwrap();

        assert_eq!(summary.entries, 1);
        assert!(output.path().join("0.cow").exists());
        assert!(!output.path().join("1.cow").exists());
        assert!(!output.path().join("2.cow").exists());
        assert!(output.path().join("notes.cow").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_build_skips_symlinked_directories() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(&source.path().join("gen-1/pikachu.cow"), "pika art\n");
        std::os::unix::fs::symlink(source.path(), source.path().join("gen-1/loop")).unwrap();

        let summary = IndexBuilder::new(ZstdCodec::new(3), "cow")
            .build(source.path(), output.path())
            .unwrap();

        assert_eq!(summary.entries, 1);
        assert_eq!(summary.categories, 1);
    }
}
