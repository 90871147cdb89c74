// src/archive/content.rs
//! Compiled-object detection from file headers
//!
//! Only the first four bytes of a member are inspected, so classification
//! costs the same for a 1 KB script and a 500 MB shared library, and never
//! depends on the member's extension.
//!
//! References:
//! - <https://en.wikipedia.org/wiki/List_of_file_signatures>
//! - Mach-O `loader.h` / `fat.h` magic numbers
//! - <https://en.wikipedia.org/wiki/Portable_Executable>

use std::fmt;
use std::io::{self, Read};

/// Number of header bytes needed for classification
pub const HEADER_LEN: usize = 4;

// ELF (.so, .o); recorded in both byte orders
const ELF_MAGIC: [[u8; 4]; 2] = [[0x7F, b'E', b'L', b'F'], [b'F', b'L', b'E', 0x7F]];

// Mach-O (.dylib, .so on macOS)
const MACH_O_MAGIC: [[u8; 4]; 6] = [
    [0xFE, 0xED, 0xFA, 0xCE], // 32-bit, big-endian
    [0xCE, 0xFA, 0xED, 0xFE], // 32-bit, little-endian
    [0xFE, 0xED, 0xFA, 0xCF], // 64-bit, big-endian
    [0xCF, 0xFA, 0xED, 0xFE], // 64-bit, little-endian
    [0xCA, 0xFE, 0xBA, 0xBE], // fat binary
    [0xCA, 0xFE, 0xBA, 0xBF], // fat binary, 64-bit
];

// DOS MZ stub heading every PE image (.dll, .exe, .pyd)
const DOS_MZ_MAGIC: [u8; 2] = [b'M', b'Z'];

/// Kind of content detected in an archive member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentFormat {
    Elf,
    MachO,
    WindowsPe,
    Other,
}

impl ContentFormat {
    /// Whether this is a compiled object (shared library, executable, ...)
    pub fn is_compiled(&self) -> bool {
        !matches!(self, Self::Other)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Elf => "ELF",
            Self::MachO => "Mach-O",
            Self::WindowsPe => "Windows PE",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a member from its leading bytes.
///
/// `header` is normally [`HEADER_LEN`] bytes; shorter slices come from tiny
/// files and are matched as far as they go.
pub fn classify(header: &[u8]) -> ContentFormat {
    if header.len() >= HEADER_LEN {
        let first4 = &header[..HEADER_LEN];
        if ELF_MAGIC.iter().any(|magic| magic == first4) {
            return ContentFormat::Elf;
        }
        if MACH_O_MAGIC.iter().any(|magic| magic == first4) {
            return ContentFormat::MachO;
        }
    }
    if header.starts_with(&DOS_MZ_MAGIC) {
        return ContentFormat::WindowsPe;
    }
    ContentFormat::Other
}

/// Read at most [`HEADER_LEN`] bytes from `reader` and classify them
pub fn classify_reader<R: Read>(reader: R) -> io::Result<ContentFormat> {
    let mut header = Vec::with_capacity(HEADER_LEN);
    reader.take(HEADER_LEN as u64).read_to_end(&mut header)?;
    Ok(classify(&header))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_elf() {
        assert_eq!(classify(b"\x7fELF\x02\x01\x01"), ContentFormat::Elf);
        assert_eq!(classify(b"FLE\x7f"), ContentFormat::Elf);
    }

    #[test]
    fn test_classify_mach_o() {
        assert_eq!(classify(&[0xFE, 0xED, 0xFA, 0xCE]), ContentFormat::MachO);
        assert_eq!(classify(&[0xCE, 0xFA, 0xED, 0xFE]), ContentFormat::MachO);
        assert_eq!(classify(&[0xCF, 0xFA, 0xED, 0xFE, 0x07]), ContentFormat::MachO);
        assert_eq!(classify(&[0xFE, 0xED, 0xFA, 0xCF]), ContentFormat::MachO);
        assert_eq!(classify(&[0xCA, 0xFE, 0xBA, 0xBE]), ContentFormat::MachO);
        assert_eq!(classify(&[0xCA, 0xFE, 0xBA, 0xBF]), ContentFormat::MachO);
    }

    #[test]
    fn test_fat_magic_is_big_endian_only() {
        assert_eq!(classify(&[0xBE, 0xBA, 0xFE, 0xCA]), ContentFormat::Other);
    }

    #[test]
    fn test_classify_windows_pe() {
        assert_eq!(classify(b"MZ\x90\x00"), ContentFormat::WindowsPe);
        assert_eq!(classify(b"MZ"), ContentFormat::WindowsPe);
        assert_eq!(classify(b"ZM\x90\x00"), ContentFormat::Other);
    }

    #[test]
    fn test_classify_other() {
        assert_eq!(classify(b"#!/usr/bin/env python"), ContentFormat::Other);
        assert_eq!(classify(b"imp"), ContentFormat::Other);
        assert_eq!(classify(b""), ContentFormat::Other);
        assert_eq!(classify(b"\x7fEL"), ContentFormat::Other);
    }

    #[test]
    fn test_classify_reader_reads_only_header() {
        let data = b"\x7fELFtrailing bytes that do not matter".to_vec();
        let mut cursor = io::Cursor::new(data);
        assert_eq!(classify_reader(&mut cursor).unwrap(), ContentFormat::Elf);
        assert_eq!(cursor.position(), HEADER_LEN as u64);
    }

    #[test]
    fn test_is_compiled() {
        assert!(ContentFormat::Elf.is_compiled());
        assert!(ContentFormat::MachO.is_compiled());
        assert!(ContentFormat::WindowsPe.is_compiled());
        assert!(!ContentFormat::Other.is_compiled());
        assert_eq!(ContentFormat::WindowsPe.to_string(), "Windows PE");
    }
}
