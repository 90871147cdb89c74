// src/checks/debug_symbols.rs

//! Compiled objects shipped with debug symbols

use super::Check;
use crate::archive::extract_subset;
use crate::archive::path::{safe_join, sanitize_path};
use crate::debug_symbols::DebugSymbolDetector;
use crate::summary::DistributionSummary;
use crate::Result;
use tempfile::TempDir;
use tracing::{debug, warn};

/// Extracts every compiled object and asks the detector about each one
#[derive(Debug)]
pub struct CompiledObjectsHaveDebugSymbols {
    detector: DebugSymbolDetector,
}

impl CompiledObjectsHaveDebugSymbols {
    pub fn new(detector: DebugSymbolDetector) -> Self {
        Self { detector }
    }
}

impl Check for CompiledObjectsHaveDebugSymbols {
    fn name(&self) -> &'static str {
        "compiled-objects-have-debug-symbols"
    }

    fn run(&self, summary: &DistributionSummary) -> Result<Vec<String>> {
        let mut compiled: Vec<String> = Vec::new();
        for object in summary.compiled_objects() {
            // members that would land outside the scratch directory are never extracted
            match sanitize_path(&object.path) {
                Ok(_) => compiled.push(object.path.clone()),
                Err(e) => warn!(
                    "Not checking {} in {} for debug symbols: {}",
                    object.path,
                    summary.source_path().display(),
                    e
                ),
            }
        }
        if compiled.is_empty() {
            return Ok(Vec::new());
        }

        // removed on drop, including on early return
        let scratch = TempDir::new()?;
        extract_subset(summary.source_path(), summary.archive_format(), &compiled, scratch.path())?;
        debug!("Probing {} compiled objects for debug symbols", compiled.len());

        let mut out = Vec::new();
        for path in &compiled {
            let Ok(on_disk) = safe_join(scratch.path(), path) else {
                continue;
            };
            if let Some(command) = self.detector.has_debug_symbols(&on_disk) {
                out.push(format!(
                    "[{}] Found compiled object containing debug symbols. For details, \
                     extract the distribution contents and run '{} \"{}\"'.",
                    self.name(),
                    command,
                    path
                ));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{ArchiveFormat, ContentFormat, FileEntry};
    use crate::debug_symbols::{CommandRunner, ProbeFailure};
    use std::io::Write;
    use std::path::Path;

    /// Reports debug sections for any file whose content mentions them
    struct ContentAwareRunner;

    impl CommandRunner for ContentAwareRunner {
        fn run(&self, program: &str, args: &[&str], file: &Path) -> std::result::Result<Vec<u8>, ProbeFailure> {
            if program != "readelf" || args != ["-S"] {
                return Err(ProbeFailure::ToolUnavailable(program.to_string()));
            }
            let content = std::fs::read(file).map_err(|e| ProbeFailure::ToolFailed {
                command: "readelf -S".to_string(),
                details: e.to_string(),
            })?;
            if content.windows(6).any(|w| w == b".debug") {
                Ok(b"  [27] .debug_info   PROGBITS\n".to_vec())
            } else {
                Ok(b"  [12] .text   PROGBITS\n".to_vec())
            }
        }
    }

    #[test]
    fn test_reports_only_objects_with_symbols() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("pkg.whl");
        {
            let file = std::fs::File::create(&archive).unwrap();
            let mut writer = zip::ZipWriter::new(file);
            let options = zip::write::SimpleFileOptions::default();
            writer.start_file("pkg/debug.so", options).unwrap();
            writer.write_all(b"\x7fELF...debug_info...").unwrap();
            writer.start_file("pkg/stripped.so", options).unwrap();
            writer.write_all(b"\x7fELF...text...").unwrap();
            writer.finish().unwrap();
        }

        let summary = DistributionSummary::from_file(&archive).unwrap();
        let check = CompiledObjectsHaveDebugSymbols::new(DebugSymbolDetector::with_runner(ContentAwareRunner));
        assert_eq!(
            check.run(&summary).unwrap(),
            vec!["[compiled-objects-have-debug-symbols] Found compiled object containing debug symbols. \
                  For details, extract the distribution contents and run 'readelf -S \"pkg/debug.so\"'."]
        );
    }

    #[test]
    fn test_traversal_member_is_skipped() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("pkg.zip");
        {
            let file = std::fs::File::create(&archive).unwrap();
            let mut writer = zip::ZipWriter::new(file);
            let options = zip::write::SimpleFileOptions::default();
            writer.start_file("../evil.so", options).unwrap();
            writer.write_all(b"\x7fELF...debug_info...").unwrap();
            writer.start_file("pkg/debug.so", options).unwrap();
            writer.write_all(b"\x7fELF...debug_info...").unwrap();
            writer.finish().unwrap();
        }

        let summary = DistributionSummary::from_file(&archive).unwrap();
        assert_eq!(summary.compiled_objects().len(), 2);
        let check = CompiledObjectsHaveDebugSymbols::new(DebugSymbolDetector::with_runner(ContentAwareRunner));
        let messages = check.run(&summary).unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].ends_with("'readelf -S \"pkg/debug.so\"'."));
        assert!(!temp.path().join("evil.so").exists());
    }

    #[test]
    fn test_no_compiled_objects_skips_extraction() {
        let files = vec![FileEntry::new("pkg/a.py", 1, ContentFormat::Other)];
        let summary =
            DistributionSummary::from_parts(ArchiveFormat::Zip, 1, files, vec![], "/does/not/exist.zip");
        let check = CompiledObjectsHaveDebugSymbols::new(DebugSymbolDetector::with_runner(ContentAwareRunner));
        assert!(check.run(&summary).unwrap().is_empty());
    }

    #[test]
    fn test_missing_archive_is_an_error() {
        let files = vec![FileEntry::new("pkg/a.so", 1, ContentFormat::Elf)];
        let summary =
            DistributionSummary::from_parts(ArchiveFormat::Zip, 1, files, vec![], "/does/not/exist.zip");
        let check = CompiledObjectsHaveDebugSymbols::new(DebugSymbolDetector::with_runner(ContentAwareRunner));
        let err = check.run(&summary).unwrap_err();
        assert!(err.is_archive_error());
    }
}
