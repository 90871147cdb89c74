// src/size.rs

//! Human-readable file sizes
//!
//! Size thresholds are configured as strings like `50M` or `1.5GB`. Two unit
//! families are supported:
//!
//! - binary: `K`/`Ki`, `M`/`Mi`, `G`/`Gi`, `T`/`Ti` (powers of 1024)
//! - decimal: `KB`, `MB`, `GB`, `TB` (powers of 1000)
//!
//! plus `B` for plain bytes. Unit letters are case-insensitive.
//!
//! Comparison and equality go through the resolved byte count, so
//! `"1024B"` and `"1K"` are equal.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while parsing a size string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SizeParseError {
    #[error("Malformed size string '{input}': {reason}")]
    MalformedSize { input: String, reason: &'static str },
}

impl SizeParseError {
    fn malformed(input: &str, reason: &'static str) -> Self {
        Self::MalformedSize {
            input: input.to_string(),
            reason,
        }
    }
}

/// Unit attached to a [`FileSize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeUnit {
    B,
    K,
    Ki,
    /// Kilobytes (1000)
    Kb,
    M,
    Mi,
    /// Megabytes (1000^2)
    Mb,
    G,
    Gi,
    /// Gigabytes (1000^3)
    Gb,
    T,
    Ti,
    /// Terabytes (1000^4)
    Tb,
}

impl SizeUnit {
    /// Number of bytes in one of this unit
    pub fn multiplier(&self) -> u64 {
        match self {
            Self::B => 1,
            Self::K | Self::Ki => 1024,
            Self::Kb => 1000,
            Self::M | Self::Mi => 1024 * 1024,
            Self::Mb => 1_000_000,
            Self::G | Self::Gi => 1024 * 1024 * 1024,
            Self::Gb => 1_000_000_000,
            Self::T | Self::Ti => 1024 * 1024 * 1024 * 1024,
            Self::Tb => 1_000_000_000_000,
        }
    }

    /// Canonical spelling used when rendering sizes
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::B => "B",
            Self::K => "K",
            Self::Ki => "Ki",
            Self::Kb => "KB",
            Self::M => "M",
            Self::Mi => "Mi",
            Self::Mb => "MB",
            Self::G => "G",
            Self::Gi => "Gi",
            Self::Gb => "GB",
            Self::T => "T",
            Self::Ti => "Ti",
            Self::Tb => "TB",
        }
    }

    /// Look up a unit by its (case-insensitive) spelling
    pub fn from_unit_str(unit: &str) -> Option<Self> {
        let unit = match unit.to_ascii_lowercase().as_str() {
            "b" => Self::B,
            "k" => Self::K,
            "ki" => Self::Ki,
            "kb" => Self::Kb,
            "m" => Self::M,
            "mi" => Self::Mi,
            "mb" => Self::Mb,
            "g" => Self::G,
            "gi" => Self::Gi,
            "gb" => Self::Gb,
            "t" => Self::T,
            "ti" => Self::Ti,
            "tb" => Self::Tb,
            _ => return None,
        };
        Some(unit)
    }

    /// Pick a unit that keeps `num_bytes` readable.
    ///
    /// Anything under ~0.1 KiB stays in bytes, under ~0.1 MiB goes to KiB,
    /// under ~0.1 GiB to MiB, everything else to GiB.
    pub fn recommend(num_bytes: u64) -> Self {
        let bytes = num_bytes as f64;
        if num_bytes < 102 {
            Self::B
        } else if bytes <= 0.1 * 1024f64.powi(2) {
            Self::K
        } else if bytes <= 0.1 * 1024f64.powi(3) {
            Self::M
        } else {
            Self::G
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeUnit {
    type Err = SizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_unit_str(s).ok_or_else(|| SizeParseError::malformed(s, "unrecognized unit"))
    }
}

/// An amount in some unit, representing a byte count
#[derive(Debug, Clone, Copy)]
pub struct FileSize {
    amount: f64,
    unit: SizeUnit,
}

impl FileSize {
    pub fn new(amount: f64, unit: SizeUnit) -> Self {
        Self { amount, unit }
    }

    /// Size of exactly `num_bytes` bytes
    pub fn from_bytes(num_bytes: u64) -> Self {
        Self::new(num_bytes as f64, SizeUnit::B)
    }

    /// Parse a string like `1.5M`, `708B` or `2GB`.
    ///
    /// The numeric part is digits with at most one `.`; the unit must follow
    /// immediately with nothing after it.
    pub fn parse(s: &str) -> Result<Self, SizeParseError> {
        let split_at = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(s.len());
        let (number, unit) = s.split_at(split_at);

        if !number.chars().any(|c| c.is_ascii_digit()) {
            return Err(SizeParseError::malformed(s, "missing numeric amount"));
        }
        if number.matches('.').count() > 1 {
            return Err(SizeParseError::malformed(s, "more than one decimal point"));
        }
        if unit.is_empty() {
            return Err(SizeParseError::malformed(s, "missing unit"));
        }
        if !unit.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(SizeParseError::malformed(s, "unexpected characters after unit"));
        }

        let amount: f64 = number
            .parse()
            .map_err(|_| SizeParseError::malformed(s, "amount is not a number"))?;
        let unit = SizeUnit::from_unit_str(unit)
            .ok_or_else(|| SizeParseError::malformed(s, "unrecognized unit"))?;

        Ok(Self::new(amount, unit))
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn unit(&self) -> SizeUnit {
        self.unit
    }

    /// Resolved byte count, truncated toward zero
    pub fn to_bytes(&self) -> u64 {
        if self.unit == SizeUnit::B {
            return self.amount as u64;
        }
        (self.amount * self.unit.multiplier() as f64) as u64
    }

    /// Render this size rounded to `precision` decimal digits.
    ///
    /// `unit = None` chooses a unit automatically (see [`SizeUnit::recommend`]).
    pub fn format(&self, precision: usize, unit: Option<SizeUnit>) -> String {
        let num_bytes = self.to_bytes();
        let unit = unit.unwrap_or_else(|| SizeUnit::recommend(num_bytes));
        let value = num_bytes as f64 / unit.multiplier() as f64;
        format!("{}{}", render_decimal(value, precision), unit)
    }
}

/// Round to `precision` decimals and drop trailing zeros, always keeping at
/// least one digit after the point (`708.0`, `11.123`).
fn render_decimal(value: f64, precision: usize) -> String {
    let mut rendered = format!("{:.*}", precision, value);
    if rendered.contains('.') {
        let trimmed = rendered.trim_end_matches('0').len();
        rendered.truncate(trimmed);
        if rendered.ends_with('.') {
            rendered.push('0');
        }
    } else {
        rendered.push_str(".0");
    }
    rendered
}

impl FromStr for FileSize {
    type Err = SizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(3, None))
    }
}

impl PartialEq for FileSize {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for FileSize {}

impl PartialOrd for FileSize {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FileSize {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_bytes().cmp(&other.to_bytes())
    }
}
