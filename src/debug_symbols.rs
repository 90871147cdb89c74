// src/debug_symbols.rs

//! Debug symbol detection for compiled objects
//!
//! There is no portable library call that answers "does this shared library
//! still carry debug information" for ELF, Mach-O and PE alike, so detection
//! shells out to whichever binary inspection tools are installed:
//!
//! 1. A fixed, ordered list of `dsymutil` / `objdump` / `llvm-objdump` /
//!    `readelf` invocations whose output is matched line by line against a
//!    pattern that only appears when debug sections are present.
//! 2. `nm` and `llvm-nm`, run once plainly and once with `-a`. Debug-only
//!    symbols show up only in the second listing, so any difference means
//!    debug symbols are present.
//!
//! The first probe that reports debug symbols wins. A missing tool or a tool
//! exiting non-zero makes that probe inconclusive and the chain moves on.

use regex::Regex;
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, trace};

/// Symbol added by Apple's `strip` to Mach-O files; present in `nm -a`
/// output even for fully stripped objects.
const MACHO_STRIP_SYMBOL: &str = "radr://5614542";

/// Why a probe produced no usable output
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    #[error("'{0}' not found on PATH")]
    ToolUnavailable(String),

    #[error("'{command}' failed: {details}")]
    ToolFailed { command: String, details: String },
}

/// Runs an external inspection tool against one file.
///
/// Returns the raw stdout bytes when the tool ran and exited successfully.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[&str], file: &Path) -> Result<Vec<u8>, ProbeFailure>;
}

/// [`CommandRunner`] that resolves tools on `PATH` and runs them as child
/// processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str], file: &Path) -> Result<Vec<u8>, ProbeFailure> {
        let tool = which::which(program).map_err(|_| ProbeFailure::ToolUnavailable(program.to_string()))?;
        let command = describe(program, args);

        let output = Command::new(tool)
            .args(args)
            .arg(file)
            .output()
            .map_err(|e| ProbeFailure::ToolFailed {
                command: command.clone(),
                details: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ProbeFailure::ToolFailed {
                command,
                details: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(output.stdout)
    }
}

struct RegexProbe {
    program: &'static str,
    args: &'static [&'static str],
    pattern: Regex,
}

impl RegexProbe {
    fn new(program: &'static str, args: &'static [&'static str], pattern: &str) -> Self {
        Self {
            program,
            args,
            pattern: Regex::new(pattern).expect("debug symbol probe patterns are valid"),
        }
    }
}

static REGEX_PROBES: LazyLock<Vec<RegexProbe>> = LazyLock::new(|| {
    let n_oso = r"\(N_OSO[\t ]+\)";
    let debug_line = r"[\t ]+\.debug_line[\t ]+";
    let debug_contents = r"^Contents of the \.debug";
    let debug_section = r"[\t ]+\.debug_[a-z]+[\t ]+";

    let mut probes = vec![RegexProbe::new("dsymutil", &["-s"], n_oso)];
    for program in ["objdump", "llvm-objdump"] {
        probes.extend([
            RegexProbe::new(program, &["--all-headers"], debug_line),
            RegexProbe::new(program, &["--macho", "--all-headers"], debug_line),
            RegexProbe::new(program, &["-W"], debug_contents),
            RegexProbe::new(program, &["--macho", "-W"], debug_contents),
            RegexProbe::new(program, &["-g"], debug_contents),
            RegexProbe::new(program, &["--macho", "-g"], debug_contents),
        ]);
    }
    probes.push(RegexProbe::new("readelf", &["-S"], debug_section));
    probes
});

const NM_TOOLS: [&str; 2] = ["nm", "llvm-nm"];

/// Decides whether a compiled object on disk retains debug symbols
pub struct DebugSymbolDetector {
    runner: Box<dyn CommandRunner>,
}

impl Default for DebugSymbolDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DebugSymbolDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebugSymbolDetector").finish_non_exhaustive()
    }
}

impl DebugSymbolDetector {
    /// Detector that runs the real tools found on `PATH`
    pub fn new() -> Self {
        Self::with_runner(SystemCommandRunner)
    }

    pub fn with_runner(runner: impl CommandRunner + 'static) -> Self {
        Self {
            runner: Box::new(runner),
        }
    }

    /// Check `file` for debug symbols.
    ///
    /// Returns the command line that found them (e.g. `"readelf -S"` or
    /// `"nm -a"`), or `None` when no probe reported any.
    pub fn has_debug_symbols(&self, file: &Path) -> Option<String> {
        for probe in REGEX_PROBES.iter() {
            let Some(output) = self.output_of(probe.program, probe.args, file) else {
                continue;
            };
            if output.split('\n').any(|line| probe.pattern.is_match(line)) {
                let command = describe(probe.program, probe.args);
                debug!("'{}' reports debug symbols in {}", command, file.display());
                return Some(command);
            }
        }

        for tool in NM_TOOLS {
            if self.nm_reports_debug_symbols(tool, file) == Some(true) {
                let command = describe(tool, &["-a"]);
                debug!("'{}' reports debug symbols in {}", command, file.display());
                return Some(command);
            }
        }

        None
    }

    /// `None` if either listing could not be produced
    fn nm_reports_debug_symbols(&self, tool: &str, file: &Path) -> Option<bool> {
        let exported = self.symbols(tool, &[], file)?;
        let all = self.symbols(tool, &["-a"], file)?;
        Some(exported != all)
    }

    fn symbols(&self, tool: &str, args: &[&str], file: &Path) -> Option<Vec<String>> {
        let output = self.output_of(tool, args, file)?;
        Some(
            output
                .split('\n')
                .filter(|line| !line.is_empty() && !line.contains(MACHO_STRIP_SYMBOL))
                .map(str::to_string)
                .collect(),
        )
    }

    fn output_of(&self, program: &str, args: &[&str], file: &Path) -> Option<String> {
        match self.runner.run(program, args, file) {
            Ok(stdout) => Some(decode_latin1(&stdout)),
            Err(e) => {
                trace!("Probe inconclusive for {}: {}", file.display(), e);
                None
            }
        }
    }
}

fn describe(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Byte-preserving decode: every byte maps to the code point of equal value
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
