// src/lib.rs

//! distcheck
//!
//! Inspects Python and conda package distributions (`.whl`, `.zip`,
//! `.tar.gz`, `.tgz`, `.tar.bz2`, `.conda`) and reports problems that make
//! them hard to install or needlessly large.
//!
//! # Architecture
//!
//! - `archive`: reads every supported container into one file/directory
//!   model, classifying compiled objects by their header bytes
//! - `summary`: per-distribution aggregates (sizes, extensions, largest files)
//! - `checks`: the catalog of named rules, each producing violation messages
//! - `debug_symbols`: probes compiled objects with external binutils-style tools
//! - `engine`: select/ignore filtering, message pooling, batch runs
//! - `config`: defaults plus `[tool.distcheck]` from `pyproject.toml`

pub mod archive;
pub mod checks;
pub mod compression;
pub mod config;
pub mod debug_symbols;
pub mod engine;
mod error;
pub mod inspect;
pub mod size;
pub mod summary;

pub use archive::{ArchiveError, ArchiveFormat, ContentFormat, DirectoryEntry, FileEntry};
pub use checks::{Check, ALL_CHECKS};
pub use config::{CheckSettings, Config, ConfigError, ConfigOverrides};
pub use debug_symbols::{CommandRunner, DebugSymbolDetector, ProbeFailure, SystemCommandRunner};
pub use engine::{ArchiveReport, BatchReport, CheckEngine, Outcome};
pub use error::{Error, Result};
pub use size::{FileSize, SizeParseError, SizeUnit};
pub use summary::DistributionSummary;
