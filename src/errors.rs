/*!
 * Error types for the omstream application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Matching misses and malformed chapter blocks are not errors: they surface
 * as `None` or as dropped chapters.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised when a source document cannot provide any text
#[derive(Error, Debug)]
pub enum SourceError {
    /// The document does not exist
    #[error("Source document not found: {0}")]
    NotFound(PathBuf),

    /// Every extraction mechanism failed on the document
    #[error("Source document {path} is unreadable: {reason}")]
    Unreadable {
        /// Document path
        path: PathBuf,
        /// Failure reported by the last mechanism tried
        reason: String,
    },

    /// The document was read but yielded no text at all
    #[error("No text could be extracted from {0}")]
    Empty(PathBuf),
}

/// Errors raised while loading or persisting the audio map
#[derive(Error, Debug)]
pub enum AudioMapError {
    /// The map file exists but could not be read
    #[error("Failed to read audio map {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The map file is not valid JSON for the expected shape
    #[error("Failed to parse audio map {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The map file could not be written
    #[error("Failed to write audio map {path}: {reason}")]
    Write {
        path: PathBuf,
        reason: String,
    },
}

/// Errors raised while loading the episode catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised at the synthesis and mixing boundary
#[derive(Error, Debug)]
pub enum NarrationError {
    /// Speech synthesis failed
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    /// Audio post-processing failed
    #[error("Audio mixing failed: {0}")]
    Mixing(String),

    /// An external command did not finish in time
    #[error("External command timed out after {0} seconds")]
    Timeout(u64),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Source document unavailable
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Audio map persistence failure
    #[error("Audio map error: {0}")]
    AudioMap(#[from] AudioMapError),

    /// Catalog loading failure
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Synthesis or mixing failure
    #[error("Narration error: {0}")]
    Narration(#[from] NarrationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
