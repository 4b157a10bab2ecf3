//! Test modules for pokesay.
//!
//! This module contains crate-level testing infrastructure:
//! - Property-based tests for the category trie using proptest
//! - Configuration loading and validation tests
//! - Error reporting tests
//! - Shared fixtures and strategies

pub mod config_tests;
pub mod error_tests;

// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{entry_strategy, key_path_strategy, label_strategy, TestFixture};
