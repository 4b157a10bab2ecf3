//! Index and art storage configuration module.
//!
//! This module defines where the persisted category index and the compressed
//! art files live, and the limits applied when loading them.

use super::{ConfigResult, Validate};
use crate::data_structures::category_trie::DEFAULT_DECODE_LIMIT;
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Compression levels supported by zstd.
const COMPRESSION_LEVELS: RangeInclusive<i32> = 1..=22;

/// Index configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Path of the persisted category index
    pub path: PathBuf,

    /// Directory holding one compressed art file per entry
    pub art_dir: PathBuf,

    /// Extension of art files, without the dot
    pub art_extension: String,

    /// Largest index file accepted, in bytes
    pub max_index_bytes: u64,

    /// zstd level used when packing art
    pub compression_level: i32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("build/pokedex.bin"),
            art_dir: PathBuf::from("build"),
            art_extension: "cow".to_string(),
            max_index_bytes: DEFAULT_DECODE_LIMIT,
            compression_level: 19,
        }
    }
}

impl Validate for IndexConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "index path cannot be empty".to_string(),
            ));
        }

        if self.art_extension.is_empty() || self.art_extension.contains('.') {
            return Err(ConfigError::ValidationError(format!(
                "art_extension must be a non-empty extension without a dot, got '{}'",
                self.art_extension
            )));
        }

        if self.max_index_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "max_index_bytes must be greater than 0".to_string(),
            ));
        }

        if !COMPRESSION_LEVELS.contains(&self.compression_level) {
            return Err(ConfigError::ValueOutOfRange {
                key: "index.compression_level".to_string(),
                message: format!(
                    "must be within {}..={}, got {}",
                    COMPRESSION_LEVELS.start(),
                    COMPRESSION_LEVELS.end(),
                    self.compression_level
                ),
            });
        }

        Ok(())
    }
}
