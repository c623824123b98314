//! Centralized error handling for sportsmaster
//!
//! Errors are split into a top-level [`AppError`] and a [`SourceError`]
//! sub-hierarchy for everything that can go wrong while acquiring or parsing
//! an external playlist/EPG source. Most source-level failures are recovered
//! locally (the offending source or record is skipped); only an empty merge
//! result is fatal to a pipeline run.

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;
