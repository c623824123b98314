//! Error type definitions for the sportsmaster pipeline
//!
//! Uses `thiserror` for automatic trait implementations and error chaining.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Source handling errors (fetch, decompress, parse)
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// No playlist source produced any usable channel after merging.
    /// This is the only pipeline-level failure; everything else degrades.
    #[error("no usable channel sources remain after merge")]
    NoUsableSources,

    /// Filesystem errors while writing output artifacts
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Source handling specific errors
#[derive(Error, Debug)]
pub enum SourceError {
    /// Network connection timeouts
    #[error("Connection timeout: {url}")]
    Timeout { url: String },

    /// Parsing errors for source data
    #[error("Parse error: {source_type} - {message}")]
    ParseError {
        source_type: String,
        message: String,
    },

    /// Decompression failures for compressed EPG payloads
    #[error("Decompression failed: {message}")]
    Decompression { message: String },

    /// HTTP errors from external sources
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },
}

impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a source parse error
    pub fn source_error<T: Into<String>, M: Into<String>>(source_type: T, message: M) -> Self {
        Self::Source(SourceError::ParseError {
            source_type: source_type.into(),
            message: message.into(),
        })
    }
}
