// src/summary.rs

//! Aggregated view of one distribution
//!
//! A [`DistributionSummary`] owns every member enumerated from one archive
//! and derives the statistics checks and the inspect report need. It is
//! built once and never mutated; the grouping by extension is computed on
//! first use and cached.

use crate::archive::{read_archive, ArchiveError, ArchiveFormat, DirectoryEntry, FileEntry};
use std::cell::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Normalized contents of one package distribution
#[derive(Debug, Clone)]
pub struct DistributionSummary {
    archive_format: ArchiveFormat,
    compressed_size_bytes: u64,
    files: Vec<FileEntry>,
    directories: Vec<DirectoryEntry>,
    source_path: PathBuf,
    // extension -> indices into `files`, in first-encounter order
    by_extension: OnceCell<Vec<(String, Vec<usize>)>>,
}

impl DistributionSummary {
    /// Read and summarize the archive at `path`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let path = path.as_ref();
        let archive_name = path.display().to_string();
        let archive_format = ArchiveFormat::detect(&archive_name)?;
        let compressed_size_bytes = fs::metadata(path)
            .map_err(|e| ArchiveError::io(&archive_name, e))?
            .len();

        let contents = read_archive(path, archive_format)?;
        debug!(
            "Summarized {}: {} bytes compressed, {} files",
            archive_name,
            compressed_size_bytes,
            contents.files.len()
        );

        Ok(Self::from_parts(
            archive_format,
            compressed_size_bytes,
            contents.files,
            contents.directories,
            path,
        ))
    }

    /// Build a summary from already-enumerated members
    pub fn from_parts(
        archive_format: ArchiveFormat,
        compressed_size_bytes: u64,
        files: Vec<FileEntry>,
        directories: Vec<DirectoryEntry>,
        source_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            archive_format,
            compressed_size_bytes,
            files,
            directories,
            source_path: source_path.into(),
            by_extension: OnceCell::new(),
        }
    }

    pub fn archive_format(&self) -> ArchiveFormat {
        self.archive_format
    }

    /// Size of the archive file on disk
    pub fn compressed_size_bytes(&self) -> u64 {
        self.compressed_size_bytes
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn directories(&self) -> &[DirectoryEntry] {
        &self.directories
    }

    /// Archive this summary was read from, for re-extraction
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn num_files(&self) -> usize {
        self.files.len()
    }

    pub fn num_directories(&self) -> usize {
        self.directories.len()
    }

    /// Sum of the uncompressed sizes of every file
    pub fn uncompressed_size_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.uncompressed_size_bytes).sum()
    }

    /// Files whose content looked like ELF, Mach-O or PE
    pub fn compiled_objects(&self) -> Vec<&FileEntry> {
        self.files.iter().filter(|f| f.is_compiled()).collect()
    }

    pub fn file_paths(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.path.as_str()).collect()
    }

    pub fn directory_paths(&self) -> Vec<&str> {
        self.directories.iter().map(|d| d.path.as_str()).collect()
    }

    /// File paths followed by directory paths, in enumeration order
    pub fn all_paths(&self) -> Vec<&str> {
        let mut paths = self.file_paths();
        paths.extend(self.directory_paths());
        paths
    }

    fn extension_groups(&self) -> &[(String, Vec<usize>)] {
        self.by_extension.get_or_init(|| {
            let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
            for (idx, file) in self.files.iter().enumerate() {
                match groups.iter_mut().find(|(ext, _)| *ext == file.extension) {
                    Some((_, members)) => members.push(idx),
                    None => groups.push((file.extension.clone(), vec![idx])),
                }
            }
            groups
        })
    }

    /// Files grouped by extension, groups in first-encounter order
    pub fn files_by_extension(&self) -> Vec<(&str, Vec<&FileEntry>)> {
        self.extension_groups()
            .iter()
            .map(|(ext, members)| (ext.as_str(), members.iter().map(|&i| &self.files[i]).collect()))
            .collect()
    }

    /// Number of files per extension, in first-encounter order
    pub fn count_by_extension(&self) -> Vec<(&str, usize)> {
        self.extension_groups()
            .iter()
            .map(|(ext, members)| (ext.as_str(), members.len()))
            .collect()
    }

    /// Number of files with exactly this extension
    pub fn extension_count(&self, extension: &str) -> usize {
        self.extension_groups()
            .iter()
            .find(|(ext, _)| ext == extension)
            .map_or(0, |(_, members)| members.len())
    }

    /// Total uncompressed bytes per extension, largest first.
    ///
    /// Extensions with equal totals keep first-encounter order.
    pub fn size_by_extension(&self) -> Vec<(&str, u64)> {
        let mut sizes: Vec<(&str, u64)> = self
            .extension_groups()
            .iter()
            .map(|(ext, members)| {
                let total = members.iter().map(|&i| self.files[i].uncompressed_size_bytes).sum();
                (ext.as_str(), total)
            })
            .collect();
        sizes.sort_by(|a, b| b.1.cmp(&a.1));
        sizes
    }

    /// The `n` largest files, largest first; equal sizes keep archive order
    pub fn largest_files(&self, n: usize) -> Vec<&FileEntry> {
        let mut files: Vec<&FileEntry> = self.files.iter().collect();
        files.sort_by(|a, b| b.uncompressed_size_bytes.cmp(&a.uncompressed_size_bytes));
        files.truncate(n);
        files
    }

    /// Fraction of the uncompressed size saved by compression.
    ///
    /// `None` when the distribution holds no bytes at all. Negative when the
    /// archive is bigger than its contents.
    pub fn space_saving(&self) -> Option<f64> {
        let uncompressed = self.uncompressed_size_bytes();
        if uncompressed == 0 {
            return None;
        }
        Some(1.0 - (self.compressed_size_bytes as f64 / uncompressed as f64))
    }
}
