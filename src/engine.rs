// src/engine.rs

//! Check engine
//!
//! Decides which checks run (`select` / `ignore`), runs them against each
//! distribution, and pools their messages in sorted order so output does not
//! depend on check order.
//!
//! Archives are processed one after another. A failure on one archive is
//! recorded in its [`ArchiveReport`] and the batch carries on; the batch
//! [`Outcome`] is the worst seen.

use crate::checks::{registry, Check, ALL_CHECKS};
use crate::config::{Config, ConfigError};
use crate::debug_symbols::DebugSymbolDetector;
use crate::summary::DistributionSummary;
use crate::{Error, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Result category of a check run, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Outcome {
    Clean,
    Violations,
    /// The archive was unsupported or could not be read
    ArchiveError,
}

impl Outcome {
    /// Process exit status for this outcome
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Clean => 0,
            Self::Violations => 1,
            Self::ArchiveError => 3,
        }
    }
}

/// What happened to one archive
#[derive(Debug)]
pub struct ArchiveReport {
    pub path: PathBuf,
    /// Present when the archive could be read
    pub summary: Option<DistributionSummary>,
    /// Sorted violation messages, or why the archive could not be read
    pub result: Result<Vec<String>>,
}

impl ArchiveReport {
    pub fn outcome(&self) -> Outcome {
        match &self.result {
            Ok(messages) if messages.is_empty() => Outcome::Clean,
            Ok(_) => Outcome::Violations,
            Err(_) => Outcome::ArchiveError,
        }
    }
}

/// Reports for every archive in a batch, in input order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub reports: Vec<ArchiveReport>,
}

impl BatchReport {
    /// Worst outcome across the batch; `Clean` for an empty batch
    pub fn outcome(&self) -> Outcome {
        self.reports
            .iter()
            .map(ArchiveReport::outcome)
            .max()
            .unwrap_or(Outcome::Clean)
    }

    pub fn total_violations(&self) -> usize {
        self.reports
            .iter()
            .filter_map(|r| r.result.as_ref().ok())
            .map(Vec::len)
            .sum()
    }
}

/// Runs the active subset of checks
pub struct CheckEngine {
    checks: Vec<Box<dyn Check>>,
}

impl std::fmt::Debug for CheckEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckEngine")
            .field("checks", &self.active_checks())
            .finish()
    }
}

impl CheckEngine {
    /// Engine for `config`, probing debug symbols with the tools on `PATH`
    pub fn new(config: &Config) -> std::result::Result<Self, ConfigError> {
        Self::with_detector(config, DebugSymbolDetector::new())
    }

    pub fn with_detector(
        config: &Config,
        detector: DebugSymbolDetector,
    ) -> std::result::Result<Self, ConfigError> {
        // unknown names are reported ahead of bad values
        validate_check_names(&config.select, &config.ignore)?;
        let settings = config.check_settings()?;
        let checks = registry(&settings, detector)?;
        Ok(Self::filtered(checks, &config.select, &config.ignore))
    }

    /// Filter an explicit list of checks.
    ///
    /// With a non-empty `select`, only selected checks run, even ones also
    /// named in `ignore`. Otherwise everything not in `ignore` runs. Names
    /// that match no check are rejected together, sorted.
    pub fn from_checks(
        checks: Vec<Box<dyn Check>>,
        select: &[String],
        ignore: &[String],
    ) -> std::result::Result<Self, ConfigError> {
        validate_check_names(select, ignore)?;
        Ok(Self::filtered(checks, select, ignore))
    }

    fn filtered(checks: Vec<Box<dyn Check>>, select: &[String], ignore: &[String]) -> Self {
        let checks: Vec<Box<dyn Check>> = if select.is_empty() {
            checks
                .into_iter()
                .filter(|c| !ignore.iter().any(|name| name == c.name()))
                .collect()
        } else {
            checks
                .into_iter()
                .filter(|c| select.iter().any(|name| name == c.name()))
                .collect()
        };

        let engine = Self { checks };
        debug!("Active checks: {:?}", engine.active_checks());
        engine
    }

    /// Names of the checks that will run, in registry order
    pub fn active_checks(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Run every active check; messages come back sorted.
    ///
    /// A check that fails is logged and contributes nothing; the others
    /// still report.
    pub fn run(&self, summary: &DistributionSummary) -> Vec<String> {
        let mut messages = Vec::new();
        for check in &self.checks {
            match check.run(summary) {
                Ok(found) => {
                    if !found.is_empty() {
                        debug!("{}: {} violation(s)", check.name(), found.len());
                    }
                    messages.extend(found);
                }
                Err(e) => warn!(
                    "{} could not complete on {}: {}",
                    check.name(),
                    summary.source_path().display(),
                    e
                ),
            }
        }
        messages.sort();
        messages
    }

    /// Read one archive and run the checks against it
    pub fn check_file(&self, path: impl AsRef<Path>) -> ArchiveReport {
        let path = path.as_ref().to_path_buf();
        match DistributionSummary::from_file(&path) {
            Ok(summary) => {
                let messages = self.run(&summary);
                ArchiveReport {
                    path,
                    summary: Some(summary),
                    result: Ok(messages),
                }
            }
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                ArchiveReport {
                    path,
                    summary: None,
                    result: Err(Error::from(e)),
                }
            }
        }
    }

    /// Check each archive in turn; a failing archive does not stop the batch
    pub fn check_files<P: AsRef<Path>>(&self, paths: &[P]) -> BatchReport {
        BatchReport {
            reports: paths.iter().map(|p| self.check_file(p)).collect(),
        }
    }
}

fn validate_check_names(select: &[String], ignore: &[String]) -> std::result::Result<(), ConfigError> {
    let unknown: BTreeSet<&String> = select
        .iter()
        .chain(ignore)
        .filter(|name| !ALL_CHECKS.contains(&name.as_str()))
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    Err(ConfigError::UnknownChecks {
        names: unknown.into_iter().cloned().collect(),
    })
}
