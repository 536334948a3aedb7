// src/error.rs

//! Error types for wingetpack
//!
//! A single crate-wide error enum. Per-row catalog failures are logged and
//! skipped by the catalog builder and never reach the caller; everything else
//! propagates through [`Result`].

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A URL field in a text record did not parse as an absolute URI
    #[error("invalid URL in '{field}': '{value}' ({reason})")]
    InvalidUrl {
        field: String,
        value: String,
        reason: String,
    },

    /// Malformed manifest, configuration or snapshot content
    #[error("parse error: {0}")]
    ParseError(String),

    /// No installer variant satisfied the selection preferences
    #[error(
        "no installer found for {identifier} {version} (architecture: {architecture}, context: {context}, type: {installer_type})"
    )]
    NoMatchingInstaller {
        identifier: String,
        version: String,
        architecture: String,
        context: String,
        installer_type: String,
    },

    #[error("not found: {0}")]
    NotFoundError(String),

    /// Archive entry would be written outside the extraction directory
    #[error("path traversal rejected: {0}")]
    PathTraversal(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Network failure while downloading
    #[error("download failed: {0}")]
    DownloadError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("archive error: {0}")]
    ArchiveError(#[from] zip::result::ZipError),

    /// The external package tool exited unsuccessfully
    #[error("command failed: {0}")]
    CommandFailed(String),

    /// Cooperative cancellation was observed
    #[error("operation cancelled")]
    Cancelled,
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl Error {
    /// Whether this error is the cancellation signal rather than a failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
