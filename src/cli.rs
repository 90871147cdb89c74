// src/cli.rs
//! Command-line interface definitions
//!
//! Every option mirrors a configuration key. Options left unset fall back to
//! the config file, then to the built-in defaults.

use clap::Parser;
use distcheck::config::{ConfigOverrides, DEFAULT_CONFIG_FILE};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "distcheck")]
#[command(author, version)]
#[command(about = "Check package distributions for portability, size and debug-symbol problems", long_about = None)]
pub struct Cli {
    /// Distributions to check (.whl, .zip, .tar.gz, .tgz, .tar.bz2, .conda)
    #[arg(required = true)]
    pub filenames: Vec<PathBuf>,

    /// TOML file to read a [tool.distcheck] table from
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Comma-separated directory patterns; prefix with '!' for directories that must not appear
    #[arg(long, value_delimiter = ',')]
    pub expected_directories: Option<Vec<String>>,

    /// Comma-separated file patterns; prefix with '!' for files that must not appear
    #[arg(long, value_delimiter = ',')]
    pub expected_files: Option<Vec<String>>,

    /// Comma-separated checks to skip
    #[arg(long, value_delimiter = ',')]
    pub ignore: Option<Vec<String>>,

    /// Comma-separated checks to run; all others are skipped (takes precedence over --ignore)
    #[arg(long, value_delimiter = ',')]
    pub select: Option<Vec<String>>,

    /// Print a size and contents report for each distribution
    #[arg(long)]
    pub inspect: bool,

    /// Maximum number of files allowed in a distribution
    #[arg(long)]
    pub max_allowed_files: Option<usize>,

    /// Maximum compressed size, e.g. '1.5M'. Units: B, K/Ki, M/Mi, G/Gi (1024-based), KB, MB, GB (1000-based)
    #[arg(long)]
    pub max_allowed_size_compressed: Option<String>,

    /// Maximum uncompressed size, same format as --max-allowed-size-compressed
    #[arg(long)]
    pub max_allowed_size_uncompressed: Option<String>,

    /// Maximum path length, in characters
    #[arg(long)]
    pub max_path_length: Option<usize>,

    /// Decimal places used when printing sizes
    #[arg(long)]
    pub output_file_size_precision: Option<usize>,

    /// Unit used when printing sizes, or 'auto'
    #[arg(long)]
    pub output_file_size_unit: Option<String>,
}

impl Cli {
    /// Options given on the command line, as a config layer
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            expected_directories: self.expected_directories.clone(),
            expected_files: self.expected_files.clone(),
            ignore: self.ignore.clone(),
            inspect: self.inspect.then_some(true),
            max_allowed_files: self.max_allowed_files,
            max_allowed_size_compressed: self.max_allowed_size_compressed.clone(),
            max_allowed_size_uncompressed: self.max_allowed_size_uncompressed.clone(),
            max_path_length: self.max_path_length,
            output_file_size_precision: self.output_file_size_precision,
            output_file_size_unit: self.output_file_size_unit.clone(),
            select: self.select.clone(),
        }
    }
}
