//! Error types for NxSchema operations.
//!
//! This module provides the main error type [`NxSchemaError`] which wraps
//! the failures that can occur while loading and building a catalog.

use std::io;

use thiserror::Error;

use nxschema_parser::error::ParseError;

use crate::source::SourceError;

/// The main error type for NxSchema operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries the schema source text next to the
/// structured diagnostics, so callers can render labelled source excerpts.
#[derive(Debug, Error)]
pub enum NxSchemaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Schema source error: {0}")]
    Source(#[from] SourceError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl NxSchemaError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
