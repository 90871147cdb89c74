// src/inspect.rs

//! Human-readable size and contents report for one distribution

use crate::size::{FileSize, SizeUnit};
use crate::summary::DistributionSummary;

/// Number of entries listed under "largest files"
pub const LARGEST_FILES_SHOWN: usize = 5;

/// Render the inspect report for `summary`.
///
/// Sizes use `precision` decimals in `unit` (or a per-value unit when
/// `None`); percentages are rounded to one decimal place.
pub fn render_report(summary: &DistributionSummary, precision: usize, unit: Option<SizeUnit>) -> String {
    let size = |bytes: u64| FileSize::from_bytes(bytes).format(precision, unit);
    let uncompressed = summary.uncompressed_size_bytes();
    let saving = summary
        .space_saving()
        .map_or_else(|| "n/a".to_string(), |s| format!("{}%", percent(s)));

    let mut lines = vec![
        "file size".to_string(),
        format!("  * compressed size: {}", size(summary.compressed_size_bytes())),
        format!("  * uncompressed size: {}", size(uncompressed)),
        format!("  * compression space saving: {}", saving),
        "contents".to_string(),
        format!("  * directories: {}", summary.num_directories()),
        format!(
            "  * files: {} ({} compiled)",
            summary.num_files(),
            summary.compiled_objects().len()
        ),
        "size by extension".to_string(),
    ];

    for (extension, bytes) in summary.size_by_extension() {
        let share = if uncompressed == 0 {
            0.0
        } else {
            bytes as f64 / uncompressed as f64
        };
        lines.push(format!("  * {} - {} ({}%)", extension, size(bytes), percent(share)));
    }

    lines.push("largest files".to_string());
    for file in summary.largest_files(LARGEST_FILES_SHOWN) {
        lines.push(format!("  * ({}) {}", size(file.uncompressed_size_bytes), file.path));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// `0.4567` -> `"45.7"`
fn percent(fraction: f64) -> String {
    format!("{:.1}", (fraction * 1000.0).round() / 10.0)
}
