// src/error.rs

//! Crate-wide error type
//!
//! Each subsystem owns its own error enum; this type wraps them so callers
//! that drive the whole pipeline can propagate with `?`.

use thiserror::Error;

use crate::archive::ArchiveError;
use crate::config::ConfigError;

/// Errors surfaced by distcheck operations
#[derive(Error, Debug)]
pub enum Error {
    /// Archive could not be recognised, read, or extracted
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Configuration could not be loaded or validated
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Filesystem error outside of archive handling (scratch directories etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error belongs to the "archive unreadable" category that
    /// the CLI reports with its own exit status.
    pub fn is_archive_error(&self) -> bool {
        matches!(self, Self::Archive(_))
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
