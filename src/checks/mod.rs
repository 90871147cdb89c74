// src/checks/mod.rs

//! Check catalog
//!
//! A [`Check`] inspects one [`DistributionSummary`] and returns
//! human-readable violation messages, each prefixed with `[check-name]`.
//! Checks are independent of each other; the engine decides which run.
//!
//! | Name | Flags |
//! |------|-------|
//! | `compiled-objects-have-debug-symbols` | compiled objects still carrying debug symbols |
//! | `distro-too-large-compressed` | archive bigger than the allowed size |
//! | `distro-too-large-uncompressed` | contents bigger than the allowed size |
//! | `expected-files` | required file/directory patterns with no match |
//! | `files-only-differ-by-case` | paths that collide on case-insensitive filesystems |
//! | `mixed-file-extensions` | `.jpg` next to `.jpeg`, `.yml` next to `.yaml`, ... |
//! | `path-contains-non-ascii-characters` | non-ASCII paths |
//! | `path-contains-spaces` | paths with spaces |
//! | `path-too-long` | paths over the length limit |
//! | `too-many-files` | more files than allowed |
//! | `unexpected-files` | files/directories matching `!`-prefixed patterns |

mod debug_symbols;
mod extensions;
mod paths;
mod patterns;
mod size;

pub use debug_symbols::CompiledObjectsHaveDebugSymbols;
pub use extensions::MixedFileExtensions;
pub use paths::{FilesOnlyDifferByCase, PathContainsNonAscii, PathContainsSpaces, PathTooLong};
pub use patterns::{ExpectedFiles, UnexpectedFiles};
pub use size::{DistroTooLargeCompressed, DistroTooLargeUncompressed, TooManyFiles};

use crate::config::{CheckSettings, ConfigError};
use crate::debug_symbols::DebugSymbolDetector;
use crate::summary::DistributionSummary;
use crate::Result;

/// Names of every check, sorted
pub const ALL_CHECKS: [&str; 11] = [
    "compiled-objects-have-debug-symbols",
    "distro-too-large-compressed",
    "distro-too-large-uncompressed",
    "expected-files",
    "files-only-differ-by-case",
    "mixed-file-extensions",
    "path-contains-non-ascii-characters",
    "path-contains-spaces",
    "path-too-long",
    "too-many-files",
    "unexpected-files",
];

/// A named rule evaluated against one distribution
pub trait Check: Send + Sync {
    /// Unique name used in messages and in `select` / `ignore`
    fn name(&self) -> &'static str;

    /// Violation messages for `summary`; empty when the rule holds.
    ///
    /// Errors mean the check could not be evaluated (for example, the
    /// archive could not be re-read), not that it failed.
    fn run(&self, summary: &DistributionSummary) -> Result<Vec<String>>;
}

/// Build every check from resolved settings, in [`ALL_CHECKS`] order
pub fn registry(
    settings: &CheckSettings,
    detector: DebugSymbolDetector,
) -> std::result::Result<Vec<Box<dyn Check>>, ConfigError> {
    Ok(vec![
        Box::new(CompiledObjectsHaveDebugSymbols::new(detector)),
        Box::new(DistroTooLargeCompressed::new(settings)),
        Box::new(DistroTooLargeUncompressed::new(settings)),
        Box::new(ExpectedFiles::new(&settings.expected_directories, &settings.expected_files)?),
        Box::new(FilesOnlyDifferByCase),
        Box::new(MixedFileExtensions),
        Box::new(PathContainsNonAscii),
        Box::new(PathContainsSpaces),
        Box::new(PathTooLong::new(settings.max_path_length)),
        Box::new(TooManyFiles::new(settings.max_allowed_files)),
        Box::new(UnexpectedFiles::new(&settings.expected_directories, &settings.expected_files)?),
    ])
}
