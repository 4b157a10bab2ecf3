//! Error module for pokesay.
//!
//! This module gathers the component error types into one top-level error
//! and provides context-carrying error reporting through `tracing`.

use std::fmt::{Display, Formatter};
use thiserror::Error;

use crate::data_structures::category_trie::CategoryTrieError;
use crate::pokedex::{ArtError, BuildError};

pub mod config;

/// Result type alias used throughout pokesay.
pub type PokesayResult<T> = Result<T, PokesayError>;

/// Core error enum for pokesay.
#[derive(Error, Debug)]
pub enum PokesayError {
    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Errors from the category index: lookups that matched nothing or a bad index file.
    #[error("Index error: {0}")]
    Index(#[from] CategoryTrieError),

    /// Errors fetching or decoding art.
    #[error("Art error: {0}")]
    Art(#[from] ArtError),

    /// Errors building an index from art files.
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// IO errors that may occur during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Custom error with message for cases where specific error types are not defined.
    #[error("{0}")]
    Custom(String),
}

/// Error reporting structure to provide context and debugging information.
#[derive(Debug)]
pub struct ErrorContext {
    /// The original error that occurred.
    pub error: PokesayError,

    /// The component where the error occurred.
    pub component: String,

    /// Additional context information to help with debugging.
    pub details: Option<String>,
}

impl ErrorContext {
    /// Creates a new error context with the given error and component.
    ///
    /// # Arguments
    ///
    /// * `error` - The error that occurred
    /// * `component` - The component where the error occurred
    pub fn new<S: Into<String>>(error: PokesayError, component: S) -> Self {
        Self {
            error,
            component: component.into(),
            details: None,
        }
    }

    /// Adds detail information to the error context.
    pub fn with_details<S: Into<String>>(mut self, details: S) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error in {}: {}", self.component, self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }
        Ok(())
    }
}

/// Error reporter trait for reporting errors to various sinks.
pub trait ErrorReporter: std::fmt::Debug {
    /// Report an error with context.
    fn report(&self, context: ErrorContext);
}

/// A simple error reporter implementation that logs errors using the tracing framework.
#[derive(Default, Debug)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, context: ErrorContext) {
        tracing::error!(
            error = %context.error,
            component = %context.component,
            details = context.details.as_deref().unwrap_or("None"),
            "Error reported"
        );
    }
}
