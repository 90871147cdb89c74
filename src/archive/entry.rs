// src/archive/entry.rs

//! Uniform member model shared by every archive format

use super::content::ContentFormat;

/// Extension recorded for files without one
pub const NO_EXTENSION: &str = "no-extension";

/// A regular file inside an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Archive-relative path, exactly as stored in the archive
    pub path: String,
    /// Suffix of the final path component including the dot (`.py`),
    /// or [`NO_EXTENSION`]
    pub extension: String,
    pub uncompressed_size_bytes: u64,
    pub content_format: ContentFormat,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, uncompressed_size_bytes: u64, content_format: ContentFormat) -> Self {
        let path = path.into();
        let extension = file_extension(&path);
        Self {
            path,
            extension,
            uncompressed_size_bytes,
            content_format,
        }
    }

    /// Whether the content looked like a compiled object
    pub fn is_compiled(&self) -> bool {
        self.content_format.is_compiled()
    }
}

/// A directory inside an archive.
///
/// Zip archives keep a trailing `/` on directory names, tarballs do not;
/// both spellings reach this type untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub path: String,
}

impl DirectoryEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Extension of the final component of an archive path.
///
/// Dotfiles (`.gitignore`), names ending in a dot, and names without a dot
/// have no extension.
pub fn file_extension(path: &str) -> String {
    let name = path.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx < name.len() - 1 => name[idx..].to_string(),
        _ => NO_EXTENSION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("pkg/module.py"), ".py");
        assert_eq!(file_extension("pkg/archive.tar.gz"), ".gz");
        assert_eq!(file_extension("pkg/Image.JPG"), ".JPG");
        assert_eq!(file_extension("setup.cfg"), ".cfg");
        assert_eq!(file_extension("pkg/.hidden.txt"), ".txt");
    }

    #[test]
    fn test_file_extension_missing() {
        assert_eq!(file_extension("pkg/PKG-INFO"), NO_EXTENSION);
        assert_eq!(file_extension("pkg/.gitignore"), NO_EXTENSION);
        assert_eq!(file_extension("pkg/trailing."), NO_EXTENSION);
        assert_eq!(file_extension("pkg.d/LICENSE"), NO_EXTENSION);
    }

    #[test]
    fn test_file_entry_new() {
        let entry = FileEntry::new("lib/_core.so", 2048, ContentFormat::Elf);
        assert_eq!(entry.extension, ".so");
        assert_eq!(entry.uncompressed_size_bytes, 2048);
        assert!(entry.is_compiled());

        let entry = FileEntry::new("lib/README", 10, ContentFormat::Other);
        assert_eq!(entry.extension, NO_EXTENSION);
        assert!(!entry.is_compiled());
    }
}
