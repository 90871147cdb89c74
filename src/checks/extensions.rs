// src/checks/extensions.rs

//! Mixed spellings of the same file type

use super::Check;
use crate::summary::DistributionSummary;
use crate::Result;

/// Spellings treated as the same kind of file
const EXTENSION_GROUPS: [&[&str]; 6] = [
    &[".cc", ".CC", ".cpp", ".CPP"],
    &[".htm", ".HTM", ".html", ".HTML"],
    &[".jpg", ".JPG", ".jpeg", ".JPEG"],
    &[".jsonl", ".JSONL", ".ndjson", ".NDJSON"],
    &[".txt", ".TXT", ".text", ".TEXT"],
    &[".yaml", ".YAML", ".yml", ".YML"],
];

/// Flags distributions mixing e.g. `.yml` and `.yaml`
#[derive(Debug, Clone, Copy, Default)]
pub struct MixedFileExtensions;

impl Check for MixedFileExtensions {
    fn name(&self) -> &'static str {
        "mixed-file-extensions"
    }

    fn run(&self, summary: &DistributionSummary) -> Result<Vec<String>> {
        let mut out = Vec::new();
        for group in EXTENSION_GROUPS {
            let mut found: Vec<(&str, usize)> = group
                .iter()
                .map(|ext| (*ext, summary.extension_count(ext)))
                .filter(|(_, count)| *count > 0)
                .collect();
            if found.len() < 2 {
                continue;
            }
            found.sort_unstable();

            let counts: Vec<String> = found
                .iter()
                .map(|(ext, count)| format!("{} ({})", ext, count))
                .collect();
            out.push(format!(
                "[{}] Found a mix of file extensions for the same file type: {}",
                self.name(),
                counts.join(", ")
            ));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{ArchiveFormat, ContentFormat, FileEntry};

    fn summary(files: &[&str]) -> DistributionSummary {
        DistributionSummary::from_parts(
            ArchiveFormat::Zip,
            1,
            files.iter().map(|p| FileEntry::new(*p, 1, ContentFormat::Other)).collect(),
            vec![],
            "pkg.zip",
        )
    }

    #[test]
    fn test_mixed_jpeg() {
        let s = summary(&["img/a.jpg", "img/b.jpeg", "img/c.jpg"]);
        assert_eq!(
            MixedFileExtensions.run(&s).unwrap(),
            vec!["[mixed-file-extensions] Found a mix of file extensions for the same file type: .jpeg (1), .jpg (2)"]
        );
    }

    #[test]
    fn test_case_variants_count_as_mixed() {
        let s = summary(&["a.yml", "b.YML", "c.py"]);
        assert_eq!(
            MixedFileExtensions.run(&s).unwrap(),
            vec!["[mixed-file-extensions] Found a mix of file extensions for the same file type: .YML (1), .yml (1)"]
        );
    }

    #[test]
    fn test_multiple_groups() {
        let s = summary(&["a.htm", "b.html", "c.txt", "d.text"]);
        let messages = MixedFileExtensions.run(&s).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].ends_with(".htm (1), .html (1)"));
        assert!(messages[1].ends_with(".text (1), .txt (1)"));
    }

    #[test]
    fn test_single_spelling_passes() {
        let s = summary(&["a.jpg", "b.jpg", "c.yaml"]);
        assert!(MixedFileExtensions.run(&s).unwrap().is_empty());
    }
}
