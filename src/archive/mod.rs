// src/archive/mod.rs

//! Archive reading for package distributions
//!
//! Normalizes the container formats Python and conda packages ship in into
//! one entry model:
//!
//! - `.zip` / `.whl`: plain zip archives
//! - `.tar.gz` / `.tgz`: gzip-compressed tarballs
//! - `.tar.bz2`: bzip2-compressed tarballs
//! - `.conda`: a zip holding metadata plus zstd-compressed tarballs
//!   (`info-*.tar.zst`, `pkg-*.tar.zst`) whose members are merged into the
//!   outer listing
//!
//! Each regular file is classified by its first bytes (see [`content`]) so
//! compiled objects are found regardless of their file extension.

pub mod content;
mod entry;
mod extract;
pub mod path;
mod reader;

pub use content::{classify, ContentFormat};
pub use entry::{file_extension, DirectoryEntry, FileEntry, NO_EXTENSION};
pub use extract::extract_subset;
pub use reader::{read_archive, ArchiveContents};

use crate::compression::CompressionFormat;
use std::fmt;
use std::io;
use thiserror::Error;

/// Errors raised while reading or extracting an archive
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error(
        "File '{filename}' does not appear to be a package distribution in one of the formats \
         supported by distcheck. Supported formats: .conda, .tar.bz2, .tar.gz, .tgz, .whl, .zip"
    )]
    UnsupportedFormat { filename: String },

    #[error("Failed to read '{path}': {details}")]
    Corrupt { path: String, details: String },

    #[error(
        "'{member}' was listed in '{path}' but could not be found during extraction. \
         This is a bug in distcheck."
    )]
    MemberNotFound { path: String, member: String },

    #[error("Failed to access '{path}': {source}")]
    Io { path: String, source: io::Error },
}

impl ArchiveError {
    pub(crate) fn corrupt(path: impl Into<String>, details: impl fmt::Display) -> Self {
        Self::Corrupt {
            path: path.into(),
            details: details.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Container formats distcheck can read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    Bzip2Tar,
    Conda,
    GzipTar,
    Zip,
}

/// Suffixes checked in order; the most specific suffix for a format comes
/// first so e.g. `.tar.bz2` never falls through to a shorter match.
const SUFFIXES: &[(&str, ArchiveFormat)] = &[
    (".conda", ArchiveFormat::Conda),
    (".tar.bz2", ArchiveFormat::Bzip2Tar),
    (".bz2", ArchiveFormat::Bzip2Tar),
    (".tar.gz", ArchiveFormat::GzipTar),
    (".tgz", ArchiveFormat::GzipTar),
    (".gz", ArchiveFormat::GzipTar),
    (".zip", ArchiveFormat::Zip),
    (".whl", ArchiveFormat::Zip),
];

impl ArchiveFormat {
    /// Work out the archive format from a file name (case-insensitive)
    pub fn detect(filename: &str) -> Result<Self, ArchiveError> {
        let lower = filename.to_lowercase();
        SUFFIXES
            .iter()
            .find(|(suffix, _)| lower.ends_with(suffix))
            .map(|(_, format)| *format)
            .ok_or_else(|| ArchiveError::UnsupportedFormat {
                filename: filename.to_string(),
            })
    }

    /// Compression wrapping the tar stream, for tar-based formats
    pub fn tar_compression(&self) -> Option<CompressionFormat> {
        match self {
            Self::Bzip2Tar => Some(CompressionFormat::Bzip2),
            Self::GzipTar => Some(CompressionFormat::Gzip),
            Self::Conda | Self::Zip => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bzip2Tar => ".tar.bz2",
            Self::Conda => ".conda",
            Self::GzipTar => ".tar.gz",
            Self::Zip => ".zip",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a conda outer-zip member is one of the nested zstd tarballs
pub(crate) fn is_conda_payload(name: &str) -> bool {
    name.to_lowercase().ends_with("tar.zst")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_supported_formats() {
        assert_eq!(ArchiveFormat::detect("pkg-1.0-py3-none-any.whl").unwrap(), ArchiveFormat::Zip);
        assert_eq!(ArchiveFormat::detect("pkg-1.0.zip").unwrap(), ArchiveFormat::Zip);
        assert_eq!(ArchiveFormat::detect("pkg-1.0.tar.gz").unwrap(), ArchiveFormat::GzipTar);
        assert_eq!(ArchiveFormat::detect("pkg-1.0.tgz").unwrap(), ArchiveFormat::GzipTar);
        assert_eq!(ArchiveFormat::detect("pkg-1.0.tar.bz2").unwrap(), ArchiveFormat::Bzip2Tar);
        assert_eq!(ArchiveFormat::detect("pkg-1.0-0.conda").unwrap(), ArchiveFormat::Conda);
    }

    #[test]
    fn test_detect_is_case_insensitive() {
        assert_eq!(ArchiveFormat::detect("PKG.TAR.GZ").unwrap(), ArchiveFormat::GzipTar);
        assert_eq!(ArchiveFormat::detect("Pkg.WHL").unwrap(), ArchiveFormat::Zip);
        assert_eq!(ArchiveFormat::detect("pkg.CONDA").unwrap(), ArchiveFormat::Conda);
    }

    #[test]
    fn test_detect_rejects_unknown_suffix() {
        for name in ["pkg.rar", "pkg.tar", "pkg.tar.xz", "pkg", "pkg.zip.txt"] {
            match ArchiveFormat::detect(name) {
                Err(ArchiveError::UnsupportedFormat { filename }) => assert_eq!(filename, name),
                other => panic!("expected UnsupportedFormat for {}, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_unsupported_format_message_lists_formats() {
        let err = ArchiveFormat::detect("thing.rar").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'thing.rar'"));
        assert!(msg.contains(".conda, .tar.bz2, .tar.gz, .tgz, .whl, .zip"));
    }

    #[test]
    fn test_tar_compression() {
        assert_eq!(ArchiveFormat::GzipTar.tar_compression(), Some(CompressionFormat::Gzip));
        assert_eq!(ArchiveFormat::Bzip2Tar.tar_compression(), Some(CompressionFormat::Bzip2));
        assert_eq!(ArchiveFormat::Zip.tar_compression(), None);
        assert_eq!(ArchiveFormat::Conda.tar_compression(), None);
    }

    #[test]
    fn test_conda_payload_names() {
        assert!(is_conda_payload("pkg-thing-1.0-0.tar.zst"));
        assert!(is_conda_payload("info-thing-1.0-0.TAR.ZST"));
        assert!(!is_conda_payload("metadata.json"));
    }
}
