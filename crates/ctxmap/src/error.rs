//! Error types for ctxmap operations.
//!
//! This module provides the main error type [`CtxmapError`] which wraps
//! the error conditions that can occur while loading, checking and editing
//! models.

use std::io;

use thiserror::Error;

use ctxmap_parser::ParseError;

use crate::{session::EditError, validate::ValidationReport};

/// The main error type for ctxmap operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant contains structured error information with source code
/// spans together with the source itself, so that callers can render
/// snippets or compute line and column numbers.
#[derive(Debug, Error)]
pub enum CtxmapError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("validation failed: {0}")]
    Validation(ValidationReport),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CtxmapError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
