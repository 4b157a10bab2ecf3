//! Tests for the error module.
//!
//! This module contains tests for error handling and error types.

use crate::data_structures::category_trie::CategoryTrieError;
use crate::error::{ErrorContext, ErrorReporter, PokesayError, TracingErrorReporter};
use crate::pokedex::ArtError;
use std::cell::Cell;

/// Test that error context can be created and displayed properly.
#[test]
fn test_error_context_display() {
    let error = PokesayError::Custom("test error".to_string());
    let context = ErrorContext::new(error, "test_component").with_details("additional details");

    let display_string = format!("{context}");
    assert!(display_string.contains("test error"));
    assert!(display_string.contains("test_component"));
    assert!(display_string.contains("additional details"));
}

/// Test that component errors convert and keep their message.
#[test]
fn test_nested_errors() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error = PokesayError::from(io_error);
    assert!(format!("{error}").contains("file not found"));

    let error = PokesayError::from(CategoryTrieError::token_not_found("mew"));
    assert!(matches!(error, PokesayError::Index(ref e) if e.is_not_found()));
    assert_eq!(error.to_string(), "Index error: No match found for token 'mew'");

    let error = PokesayError::from(ArtError::Codec("bad frame".to_string()));
    assert_eq!(error.to_string(), "Art error: Art codec error: bad frame");
}

/// Mock error reporter for testing.
#[derive(Debug, Default)]
struct MockErrorReporter {
    reported_count: Cell<usize>,
}

impl ErrorReporter for MockErrorReporter {
    fn report(&self, _context: ErrorContext) {
        self.reported_count.set(self.reported_count.get() + 1);
    }
}

/// Test that a reporter receives reported errors.
#[test]
fn test_error_reporter() {
    let reporter = MockErrorReporter::default();
    let context = ErrorContext::new(PokesayError::Custom("test error".to_string()), "cli");

    reporter.report(context);

    assert_eq!(reporter.reported_count.get(), 1);
}

/// Test that the default tracing error reporter can be used.
#[test]
fn test_tracing_error_reporter() {
    let reporter = TracingErrorReporter;
    let error = PokesayError::Custom("test error".to_string());
    let context = ErrorContext::new(error, "test_component");

    // Just make sure this doesn't panic
    reporter.report(context);
}
