// src/checks/size.rs

//! File-count and overall size limits

use super::Check;
use crate::config::CheckSettings;
use crate::size::FileSize;
use crate::summary::DistributionSummary;
use crate::Result;

/// Flags distributions with more files than allowed
#[derive(Debug, Clone)]
pub struct TooManyFiles {
    max_allowed_files: usize,
}

impl TooManyFiles {
    pub fn new(max_allowed_files: usize) -> Self {
        Self { max_allowed_files }
    }
}

impl Check for TooManyFiles {
    fn name(&self) -> &'static str {
        "too-many-files"
    }

    fn run(&self, summary: &DistributionSummary) -> Result<Vec<String>> {
        let num_files = summary.num_files();
        if num_files <= self.max_allowed_files {
            return Ok(Vec::new());
        }
        Ok(vec![format!(
            "[{}] Found {} files. Only {} allowed.",
            self.name(),
            num_files,
            self.max_allowed_files
        )])
    }
}

/// Shared size comparison for the compressed/uncompressed checks
#[derive(Debug, Clone)]
struct SizeLimit {
    max_allowed: FileSize,
    settings: CheckSettings,
}

impl SizeLimit {
    fn violation(&self, name: &str, label: &str, actual_bytes: u64) -> Vec<String> {
        let actual = FileSize::from_bytes(actual_bytes);
        if actual <= self.max_allowed {
            return Vec::new();
        }
        vec![format!(
            "[{}] {} size {} is larger than the allowed size ({}).",
            name,
            label,
            self.settings.format_size(actual_bytes),
            self.settings.format_size(self.max_allowed.to_bytes())
        )]
    }
}

/// Flags archives whose on-disk size exceeds the limit
#[derive(Debug, Clone)]
pub struct DistroTooLargeCompressed {
    limit: SizeLimit,
}

impl DistroTooLargeCompressed {
    pub fn new(settings: &CheckSettings) -> Self {
        Self {
            limit: SizeLimit {
                max_allowed: settings.max_allowed_size_compressed,
                settings: settings.clone(),
            },
        }
    }
}

impl Check for DistroTooLargeCompressed {
    fn name(&self) -> &'static str {
        "distro-too-large-compressed"
    }

    fn run(&self, summary: &DistributionSummary) -> Result<Vec<String>> {
        Ok(self
            .limit
            .violation(self.name(), "Compressed", summary.compressed_size_bytes()))
    }
}

/// Flags distributions whose unpacked contents exceed the limit
#[derive(Debug, Clone)]
pub struct DistroTooLargeUncompressed {
    limit: SizeLimit,
}

impl DistroTooLargeUncompressed {
    pub fn new(settings: &CheckSettings) -> Self {
        Self {
            limit: SizeLimit {
                max_allowed: settings.max_allowed_size_uncompressed,
                settings: settings.clone(),
            },
        }
    }
}

impl Check for DistroTooLargeUncompressed {
    fn name(&self) -> &'static str {
        "distro-too-large-uncompressed"
    }

    fn run(&self, summary: &DistributionSummary) -> Result<Vec<String>> {
        Ok(self
            .limit
            .violation(self.name(), "Uncompressed", summary.uncompressed_size_bytes()))
    }
}
