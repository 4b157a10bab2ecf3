//! Speech bubble configuration module.
//!
//! This module defines how text read from stdin is framed: bubble width,
//! wrapping, and tab handling.

use super::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Largest tab expansion accepted.
const MAX_TAB_WIDTH: usize = 16;

/// Speech bubble configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BubbleConfig {
    /// Inner width of the bubble in characters
    pub width: usize,

    /// Number of spaces each tab is replaced with
    pub tab_width: usize,

    /// Disable word wrapping
    pub no_wrap: bool,

    /// Keep tab characters as they are
    pub no_tab_spaces: bool,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            width: 80,
            tab_width: 4,
            no_wrap: false,
            no_tab_spaces: false,
        }
    }
}

impl Validate for BubbleConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 {
            return Err(ConfigError::ValidationError(
                "bubble width must be greater than 0".to_string(),
            ));
        }

        if self.tab_width > MAX_TAB_WIDTH {
            return Err(ConfigError::ValueOutOfRange {
                key: "bubble.tab_width".to_string(),
                message: format!("must be at most {MAX_TAB_WIDTH}, got {}", self.tab_width),
            });
        }

        Ok(())
    }
}
