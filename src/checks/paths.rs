// src/checks/paths.rs

//! Checks on member paths that break installs on some platforms

use super::Check;
use crate::summary::DistributionSummary;
use crate::Result;
use std::collections::{BTreeSet, HashMap};

/// Flags paths that only differ by case; they overwrite each other on
/// case-insensitive filesystems (macOS, Windows).
#[derive(Debug, Clone, Copy, Default)]
pub struct FilesOnlyDifferByCase;

impl Check for FilesOnlyDifferByCase {
    fn name(&self) -> &'static str {
        "files-only-differ-by-case"
    }

    fn run(&self, summary: &DistributionSummary) -> Result<Vec<String>> {
        let mut by_lowercase: HashMap<String, BTreeSet<&str>> = HashMap::new();
        for path in summary.all_paths() {
            by_lowercase.entry(path.to_lowercase()).or_default().insert(path);
        }

        let mut collisions: Vec<&str> = by_lowercase
            .into_values()
            .filter(|group| group.len() > 1)
            .flatten()
            .collect();
        if collisions.is_empty() {
            return Ok(Vec::new());
        }
        collisions.sort_unstable();

        Ok(vec![format!(
            "[{}] Found files which differ only by case. Files: {}",
            self.name(),
            collisions.join(",")
        )])
    }
}

/// Flags paths with characters outside ASCII
#[derive(Debug, Clone, Copy, Default)]
pub struct PathContainsNonAscii;

impl Check for PathContainsNonAscii {
    fn name(&self) -> &'static str {
        "path-contains-non-ascii-characters"
    }

    fn run(&self, summary: &DistributionSummary) -> Result<Vec<String>> {
        Ok(summary
            .all_paths()
            .into_iter()
            .filter(|path| !path.is_ascii())
            .map(|path| {
                let printable: String = path
                    .chars()
                    .map(|c| if c.is_ascii() { c } else { '?' })
                    .collect();
                format!(
                    "[{}] Found file path containing non-ASCII characters: '{}'",
                    self.name(),
                    printable
                )
            })
            .collect())
    }
}

/// Flags paths containing a space
#[derive(Debug, Clone, Copy, Default)]
pub struct PathContainsSpaces;

impl Check for PathContainsSpaces {
    fn name(&self) -> &'static str {
        "path-contains-spaces"
    }

    fn run(&self, summary: &DistributionSummary) -> Result<Vec<String>> {
        Ok(summary
            .all_paths()
            .into_iter()
            .filter(|path| path.contains(' '))
            .map(|path| format!("[{}] Found path with spaces: '{}'", self.name(), path))
            .collect())
    }
}

/// Flags paths longer than the configured number of characters
#[derive(Debug, Clone)]
pub struct PathTooLong {
    max_path_length: usize,
}

impl PathTooLong {
    pub fn new(max_path_length: usize) -> Self {
        Self { max_path_length }
    }
}

impl Check for PathTooLong {
    fn name(&self) -> &'static str {
        "path-too-long"
    }

    fn run(&self, summary: &DistributionSummary) -> Result<Vec<String>> {
        let mut out = Vec::new();
        for path in summary.all_paths() {
            // characters, not bytes
            let length = path.chars().count();
            if length > self.max_path_length {
                out.push(format!(
                    "[{}] Path too long ({} > {}): '{}'",
                    self.name(),
                    length,
                    self.max_path_length,
                    path
                ));
            }
        }
        Ok(out)
    }
}
