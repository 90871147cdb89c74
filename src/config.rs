// src/config.rs

//! Configuration for distcheck
//!
//! Values come from three layers, highest precedence first:
//!
//! 1. command-line flags
//! 2. the `[tool.distcheck]` table of a TOML file (`pyproject.toml` by default)
//! 3. built-in defaults
//!
//! Each layer is expressed as a [`ConfigOverrides`] and applied over the
//! previous one. In the TOML file, option names may be spelled with either
//! hyphens or underscores (`max-path-length` == `max_path_length`).
//!
//! # Example
//!
//! ```toml
//! [tool.distcheck]
//! ignore = ["path-contains-spaces"]
//! max-allowed-files = 500
//! max_allowed_size_compressed = "5M"
//! expected_files = ["*/LICENSE", "!*/.gitignore"]
//! ```

use crate::size::{FileSize, SizeUnit};
use serde::Deserialize;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Every option name accepted in a config file, in underscore spelling
pub const ALLOWED_OPTIONS: [&str; 11] = [
    "expected_directories",
    "expected_files",
    "ignore",
    "inspect",
    "max_allowed_files",
    "max_allowed_size_compressed",
    "max_allowed_size_uncompressed",
    "max_path_length",
    "output_file_size_precision",
    "output_file_size_unit",
    "select",
];

const DEFAULT_EXPECTED_DIRECTORIES: &[&str] = &[
    "!*/.appveyor",
    "!*/.binder",
    "!*/.circleci",
    "!*/.git",
    "!*/.github",
    "!*/.idea",
    "!*/.pytest_cache",
    "!*/.mypy_cache",
];

const DEFAULT_EXPECTED_FILES: &[&str] = &[
    "!*/appveyor.yml",
    "!*/.appveyor.yml",
    "!*/azure-pipelines.yml",
    "!*/.azure-pipelines.yml",
    "!*/.cirrus.star",
    "!*/.cirrus.yml",
    "!*/codecov.yml",
    "!*/.codecov.yml",
    "!*/.DS_Store",
    "!*/.gitignore",
    "!*/.gitpod.yml",
    "!*/.hadolint.yaml",
    "!*/.lycheecache",
    "!*/.lycheeignore",
    "!*/.readthedocs.yaml",
    "!*/.travis.yml",
    "!*/vsts-ci.yml",
    "!*/.vsts-ci.yml",
];

/// Default location of the config file
pub const DEFAULT_CONFIG_FILE: &str = "pyproject.toml";

/// Configuration errors; all of them are reported before any archive is opened
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration value '{0}' is not recognized by distcheck")]
    UnknownOption(String),

    #[error("Invalid value for '{option}': {details}")]
    InvalidValue { option: String, details: String },

    #[error("Invalid glob pattern '{pattern}': {details}")]
    InvalidPattern { pattern: String, details: String },

    #[error("Found the following unrecognized check names: {}", names.join(", "))]
    UnknownChecks { names: Vec<String> },

    #[error("Failed to parse '{path}': {source}")]
    Parse { path: String, source: toml::de::Error },

    #[error("Failed to read '{path}': {source}")]
    Io { path: String, source: io::Error },
}

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory patterns; `!`-prefixed ones must not match anything
    pub expected_directories: Vec<String>,
    /// File patterns; `!`-prefixed ones must not match anything
    pub expected_files: Vec<String>,
    pub ignore: Vec<String>,
    /// Print a size/contents report for each distribution
    pub inspect: bool,
    pub max_allowed_files: usize,
    pub max_allowed_size_compressed: String,
    pub max_allowed_size_uncompressed: String,
    pub max_path_length: usize,
    pub output_file_size_precision: usize,
    /// A size unit, or `auto`
    pub output_file_size_unit: String,
    pub select: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            expected_directories: DEFAULT_EXPECTED_DIRECTORIES.iter().map(|s| s.to_string()).collect(),
            expected_files: DEFAULT_EXPECTED_FILES.iter().map(|s| s.to_string()).collect(),
            ignore: Vec::new(),
            inspect: false,
            max_allowed_files: 2000,
            max_allowed_size_compressed: "50M".to_string(),
            max_allowed_size_uncompressed: "75M".to_string(),
            max_path_length: 200,
            output_file_size_precision: 3,
            output_file_size_unit: "auto".to_string(),
            select: Vec::new(),
        }
    }
}

/// A partial configuration layer; `None` leaves the current value alone
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub expected_directories: Option<Vec<String>>,
    pub expected_files: Option<Vec<String>>,
    pub ignore: Option<Vec<String>>,
    pub inspect: Option<bool>,
    pub max_allowed_files: Option<usize>,
    pub max_allowed_size_compressed: Option<String>,
    pub max_allowed_size_uncompressed: Option<String>,
    pub max_path_length: Option<usize>,
    pub output_file_size_precision: Option<usize>,
    pub output_file_size_unit: Option<String>,
    pub select: Option<Vec<String>>,
}

impl Config {
    /// Apply a layer of overrides on top of this configuration
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        let ConfigOverrides {
            expected_directories,
            expected_files,
            ignore,
            inspect,
            max_allowed_files,
            max_allowed_size_compressed,
            max_allowed_size_uncompressed,
            max_path_length,
            output_file_size_precision,
            output_file_size_unit,
            select,
        } = overrides;

        if let Some(v) = expected_directories {
            self.expected_directories = v;
        }
        if let Some(v) = expected_files {
            self.expected_files = v;
        }
        if let Some(v) = ignore {
            self.ignore = v;
        }
        if let Some(v) = inspect {
            self.inspect = v;
        }
        if let Some(v) = max_allowed_files {
            self.max_allowed_files = v;
        }
        if let Some(v) = max_allowed_size_compressed {
            self.max_allowed_size_compressed = v;
        }
        if let Some(v) = max_allowed_size_uncompressed {
            self.max_allowed_size_uncompressed = v;
        }
        if let Some(v) = max_path_length {
            self.max_path_length = v;
        }
        if let Some(v) = output_file_size_precision {
            self.output_file_size_precision = v;
        }
        if let Some(v) = output_file_size_unit {
            self.output_file_size_unit = v;
        }
        if let Some(v) = select {
            self.select = v;
        }
    }

    /// Apply the `[tool.distcheck]` table of a TOML file.
    ///
    /// A missing file or a file without that table changes nothing.
    pub fn update_from_toml(&mut self, path: &Path) -> Result<(), ConfigError> {
        let config_name = path.display().to_string();
        if !path.exists() {
            debug!("No config file at {}", config_name);
            return Ok(());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: config_name.clone(),
            source,
        })?;
        self.update_from_toml_str(&content, &config_name)
    }

    /// Same as [`Config::update_from_toml`] for TOML already in memory;
    /// `origin` names the source in error messages.
    pub fn update_from_toml_str(&mut self, content: &str, origin: &str) -> Result<(), ConfigError> {
        let document: toml::Table = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;

        let Some(section) = document.get("tool").and_then(|tool| tool.get("distcheck")) else {
            return Ok(());
        };
        let table = section.as_table().ok_or_else(|| ConfigError::InvalidValue {
            option: "tool.distcheck".to_string(),
            details: "expected a table".to_string(),
        })?;

        let overrides = overrides_from_table(table)?;
        debug!("Loaded [tool.distcheck] from {}", origin);
        self.apply(overrides);
        Ok(())
    }

    /// Resolve size strings and the output unit into typed settings
    pub fn check_settings(&self) -> Result<CheckSettings, ConfigError> {
        Ok(CheckSettings {
            expected_directories: self.expected_directories.clone(),
            expected_files: self.expected_files.clone(),
            max_allowed_files: self.max_allowed_files,
            max_allowed_size_compressed: parse_size(
                "max_allowed_size_compressed",
                &self.max_allowed_size_compressed,
            )?,
            max_allowed_size_uncompressed: parse_size(
                "max_allowed_size_uncompressed",
                &self.max_allowed_size_uncompressed,
            )?,
            max_path_length: self.max_path_length,
            output_file_size_precision: self.output_file_size_precision,
            output_file_size_unit: parse_output_unit(&self.output_file_size_unit)?,
        })
    }
}

/// Typed settings consumed by the individual checks
#[derive(Debug, Clone, PartialEq)]
pub struct CheckSettings {
    pub expected_directories: Vec<String>,
    pub expected_files: Vec<String>,
    pub max_allowed_files: usize,
    pub max_allowed_size_compressed: FileSize,
    pub max_allowed_size_uncompressed: FileSize,
    pub max_path_length: usize,
    pub output_file_size_precision: usize,
    /// `None` picks a unit per value
    pub output_file_size_unit: Option<SizeUnit>,
}

impl CheckSettings {
    /// Render a byte count with the configured precision and unit
    pub fn format_size(&self, num_bytes: u64) -> String {
        FileSize::from_bytes(num_bytes).format(self.output_file_size_precision, self.output_file_size_unit)
    }
}

impl Default for CheckSettings {
    fn default() -> Self {
        let config = Config::default();
        Self {
            expected_directories: config.expected_directories,
            expected_files: config.expected_files,
            max_allowed_files: config.max_allowed_files,
            max_allowed_size_compressed: FileSize::new(50.0, SizeUnit::M),
            max_allowed_size_uncompressed: FileSize::new(75.0, SizeUnit::M),
            max_path_length: config.max_path_length,
            output_file_size_precision: config.output_file_size_precision,
            output_file_size_unit: None,
        }
    }
}

fn overrides_from_table(table: &toml::Table) -> Result<ConfigOverrides, ConfigError> {
    let mut normalized = toml::Table::new();
    for (key, value) in table {
        let option = key.replace('-', "_");
        if !ALLOWED_OPTIONS.contains(&option.as_str()) {
            return Err(ConfigError::UnknownOption(key.clone()));
        }
        normalized.insert(option, value.clone());
    }

    toml::Value::Table(normalized)
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::InvalidValue {
            option: "tool.distcheck".to_string(),
            details: e.message().to_string(),
        })
}

fn parse_size(option: &str, value: &str) -> Result<FileSize, ConfigError> {
    FileSize::parse(value).map_err(|e| ConfigError::InvalidValue {
        option: option.to_string(),
        details: e.to_string(),
    })
}

/// `auto` (any case) means pick per value
pub fn parse_output_unit(value: &str) -> Result<Option<SizeUnit>, ConfigError> {
    if value.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    value
        .parse::<SizeUnit>()
        .map(Some)
        .map_err(|e| ConfigError::InvalidValue {
            option: "output_file_size_unit".to_string(),
            details: e.to_string(),
        })
}
