//! Error types for ingestion operations.
//!
//! This module provides the [`IngestError`] type for fatal, run-terminating
//! conditions and the [`Result`] convenience type. Per-line conditions that
//! are recovered locally are represented by [`crate::parser::ParseFailure`]
//! instead, so that skipping a bad line is an ordinary branch rather than a
//! recovered error.

use thiserror::Error;

/// Error type for fatal ingestion failures.
///
/// Only I/O-level failures terminate a streaming run. A line that fails to
/// parse, or a record that fails the completeness check, is absorbed by the
/// stream driver and never surfaces here.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The input resource cannot be opened, or a read failed mid-stream.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`IngestError`].
pub type Result<T> = std::result::Result<T, IngestError>;
