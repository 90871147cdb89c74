// src/checks/patterns.rs

//! Expected / unexpected file and directory patterns
//!
//! Patterns are shell-style globs matched case-sensitively against the full
//! archive-relative path; `*` also matches `/`. A pattern prefixed with `!`
//! is an unexpected-path pattern, any other pattern is an expected-path one.
//! Directory names carry a trailing `/` in some formats and not in others,
//! so directory patterns are tried with and without it.
//!
//! Pattern syntax is fnmatch's, which is looser than the glob crate's: `**`
//! is just `*`, and a `[` that never closes is an ordinary character. Those
//! spellings are rewritten before compiling.

use super::Check;
use crate::config::ConfigError;
use crate::summary::DistributionSummary;
use crate::Result;
use glob::Pattern;

/// One compiled glob, keeping the spelling used in messages
#[derive(Debug, Clone)]
struct PathPattern {
    source: String,
    pattern: Pattern,
    // `pattern` + "/", for directory names stored with a trailing slash
    with_slash: Pattern,
}

impl PathPattern {
    fn new(source: &str) -> std::result::Result<Self, ConfigError> {
        let compile = |p: &str| {
            Pattern::new(p).map_err(|e| ConfigError::InvalidPattern {
                pattern: source.to_string(),
                details: e.to_string(),
            })
        };
        let translated = fnmatch_to_glob(source);
        Ok(Self {
            source: source.to_string(),
            pattern: compile(&translated)?,
            with_slash: compile(&format!("{}/", translated))?,
        })
    }

    fn matches_file(&self, path: &str) -> bool {
        self.pattern.matches(path)
    }

    fn matches_directory(&self, path: &str) -> bool {
        self.pattern.matches(path) || self.with_slash.matches(path)
    }
}

/// Rewrite fnmatch syntax into something `glob::Pattern` reads the same way
fn fnmatch_to_glob(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                out.push('*');
                while chars.get(i + 1) == Some(&'*') {
                    i += 1;
                }
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.extend(&chars[i..=end]);
                    i = end;
                }
                None => out.push_str("[[]"),
            },
            c => out.push(c),
        }
        i += 1;
    }
    out
}

/// Index of the `]` closing the class opened at `start`. A `]` right after
/// `[` or `[!` belongs to the class.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut first = start + 1;
    if chars.get(first) == Some(&'!') {
        first += 1;
    }
    if chars.get(first) == Some(&']') {
        first += 1;
    }
    chars
        .get(first..)?
        .iter()
        .position(|&c| c == ']')
        .map(|offset| first + offset)
}

fn compile_patterns<'a>(
    patterns: impl Iterator<Item = &'a str>,
) -> std::result::Result<Vec<PathPattern>, ConfigError> {
    patterns.map(PathPattern::new).collect()
}

fn expected(patterns: &[String]) -> impl Iterator<Item = &str> {
    patterns.iter().map(String::as_str).filter(|p| !p.starts_with('!'))
}

fn unexpected(patterns: &[String]) -> impl Iterator<Item = &str> {
    patterns.iter().filter_map(|p| p.strip_prefix('!'))
}

/// Flags expected patterns that match nothing in the distribution
#[derive(Debug, Clone)]
pub struct ExpectedFiles {
    directory_patterns: Vec<PathPattern>,
    file_patterns: Vec<PathPattern>,
}

impl ExpectedFiles {
    /// Keeps only the patterns without a `!` prefix
    pub fn new(
        directory_patterns: &[String],
        file_patterns: &[String],
    ) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            directory_patterns: compile_patterns(expected(directory_patterns))?,
            file_patterns: compile_patterns(expected(file_patterns))?,
        })
    }
}

impl Check for ExpectedFiles {
    fn name(&self) -> &'static str {
        "expected-files"
    }

    fn run(&self, summary: &DistributionSummary) -> Result<Vec<String>> {
        let mut out = Vec::new();

        let files = summary.file_paths();
        for pattern in &self.file_patterns {
            if !files.iter().any(|path| pattern.matches_file(path)) {
                out.push(format!(
                    "[{}] Did not find any files matching pattern '{}'.",
                    self.name(),
                    pattern.source
                ));
            }
        }

        let directories = summary.directory_paths();
        for pattern in &self.directory_patterns {
            if !directories.iter().any(|path| pattern.matches_directory(path)) {
                out.push(format!(
                    "[{}] Did not find any directories matching pattern '{}'.",
                    self.name(),
                    pattern.source
                ));
            }
        }

        Ok(out)
    }
}

/// Flags members matching a `!`-prefixed pattern
#[derive(Debug, Clone)]
pub struct UnexpectedFiles {
    directory_patterns: Vec<PathPattern>,
    file_patterns: Vec<PathPattern>,
}

impl UnexpectedFiles {
    /// Keeps only the `!`-prefixed patterns, with the prefix removed
    pub fn new(
        directory_patterns: &[String],
        file_patterns: &[String],
    ) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            directory_patterns: compile_patterns(unexpected(directory_patterns))?,
            file_patterns: compile_patterns(unexpected(file_patterns))?,
        })
    }
}

impl Check for UnexpectedFiles {
    fn name(&self) -> &'static str {
        "unexpected-files"
    }

    fn run(&self, summary: &DistributionSummary) -> Result<Vec<String>> {
        let mut out = Vec::new();

        // one message per member, however many patterns it matches
        for path in summary.file_paths() {
            if self.file_patterns.iter().any(|p| p.matches_file(path)) {
                out.push(format!("[{}] Found unexpected file '{}'.", self.name(), path));
            }
        }
        for path in summary.directory_paths() {
            if self.directory_patterns.iter().any(|p| p.matches_directory(path)) {
                out.push(format!("[{}] Found unexpected directory '{}'.", self.name(), path));
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{ArchiveFormat, ContentFormat, DirectoryEntry, FileEntry};
    use crate::config::Config;

    fn summary(files: &[&str], dirs: &[&str]) -> DistributionSummary {
        DistributionSummary::from_parts(
            ArchiveFormat::Zip,
            1,
            files.iter().map(|p| FileEntry::new(*p, 1, ContentFormat::Other)).collect(),
            dirs.iter().map(|d| DirectoryEntry::new(*d)).collect(),
            "pkg.zip",
        )
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_expected_files_missing() {
        let check = ExpectedFiles::new(&strings(&["*/tests", "!*/.git"]), &strings(&["*/LICENSE", "*.py"])).unwrap();
        let s = summary(&["pkg/module.py"], &["pkg/"]);
        assert_eq!(
            check.run(&s).unwrap(),
            vec![
                "[expected-files] Did not find any files matching pattern '*/LICENSE'.",
                "[expected-files] Did not find any directories matching pattern '*/tests'.",
            ]
        );
    }

    #[test]
    fn test_expected_directory_with_and_without_slash() {
        let check = ExpectedFiles::new(&strings(&["pkg/tests"]), &[]).unwrap();
        assert!(check.run(&summary(&[], &["pkg/tests/"])).unwrap().is_empty());
        assert!(check.run(&summary(&[], &["pkg/tests"])).unwrap().is_empty());
    }

    #[test]
    fn test_star_crosses_directories() {
        let check = ExpectedFiles::new(&[], &strings(&["*LICENSE"])).unwrap();
        assert!(check.run(&summary(&["a/b/c/LICENSE"], &[])).unwrap().is_empty());
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let check = ExpectedFiles::new(&[], &strings(&["*/license"])).unwrap();
        assert_eq!(check.run(&summary(&["pkg/LICENSE"], &[])).unwrap().len(), 1);
    }

    #[test]
    fn test_unexpected_defaults() {
        let config = Config::default();
        let check = UnexpectedFiles::new(&config.expected_directories, &config.expected_files).unwrap();
        let s = summary(
            &["pkg/.gitignore", "pkg/module.py", "pkg/.DS_Store"],
            &["pkg/", "pkg/.github/", "pkg/.git"],
        );
        assert_eq!(
            check.run(&s).unwrap(),
            vec![
                "[unexpected-files] Found unexpected file 'pkg/.gitignore'.",
                "[unexpected-files] Found unexpected file 'pkg/.DS_Store'.",
                "[unexpected-files] Found unexpected directory 'pkg/.github/'.",
                "[unexpected-files] Found unexpected directory 'pkg/.git'.",
            ]
        );
    }

    #[test]
    fn test_expected_ignores_negated_patterns() {
        let check = ExpectedFiles::new(&strings(&["!*/.git"]), &strings(&["!*/.gitignore"])).unwrap();
        assert!(check.run(&summary(&[], &[])).unwrap().is_empty());
    }

    #[test]
    fn test_fnmatch_rewrites() {
        assert_eq!(fnmatch_to_glob("*/**.pyc"), "*/*.pyc");
        assert_eq!(fnmatch_to_glob("***"), "*");
        assert_eq!(fnmatch_to_glob("*/[abc"), "*/[[]abc");
        assert_eq!(fnmatch_to_glob("*/[ab]c"), "*/[ab]c");
        assert_eq!(fnmatch_to_glob("[!]x]"), "[!]x]");
        assert_eq!(fnmatch_to_glob("[]"), "[[]]");
    }

    #[test]
    fn test_double_star_is_single_star() {
        let check = UnexpectedFiles::new(&[], &strings(&["!*/**.pyc"])).unwrap();
        let s = summary(&["pkg/a.pyc", "pkg/sub/b.pyc", "pkg/c.py"], &[]);
        assert_eq!(
            check.run(&s).unwrap(),
            vec![
                "[unexpected-files] Found unexpected file 'pkg/a.pyc'.",
                "[unexpected-files] Found unexpected file 'pkg/sub/b.pyc'.",
            ]
        );
    }

    #[test]
    fn test_unclosed_bracket_is_literal() {
        let check = UnexpectedFiles::new(&strings(&["!*/[abc"]), &strings(&["!*/[abc"])).unwrap();
        let s = summary(&["pkg/[abc", "pkg/a"], &["pkg/[abc/"]);
        assert_eq!(
            check.run(&s).unwrap(),
            vec![
                "[unexpected-files] Found unexpected file 'pkg/[abc'.",
                "[unexpected-files] Found unexpected directory 'pkg/[abc/'.",
            ]
        );

        let expected = ExpectedFiles::new(&[], &strings(&["*/[abc"])).unwrap();
        assert!(expected.run(&s).unwrap().is_empty());
    }

    #[test]
    fn test_bracket_class_still_works() {
        let check = ExpectedFiles::new(&[], &strings(&["pkg/[!x]*.py", "pkg/[]]*"])).unwrap();
        let s = summary(&["pkg/a.py", "pkg/]b"], &[]);
        assert!(check.run(&s).unwrap().is_empty());
    }
}
