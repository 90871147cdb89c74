// tests/common/mod.rs

//! Shared fixture builders for integration tests.
//!
//! Archives are assembled at test time with the same crates the reader uses,
//! inside a `TempDir` the caller keeps alive.

#![allow(dead_code)]

use distcheck::{CommandRunner, ProbeFailure};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// 64-bit little-endian Mach-O header
pub const MACH_O_HEADER: &[u8] = &[0xCF, 0xFA, 0xED, 0xFE, 0x07, 0x00, 0x00, 0x01];

/// ELF header start
pub const ELF_HEADER: &[u8] = b"\x7fELF\x02\x01\x01\x00";

/// Marker fixture binaries embed to say "I still have debug info"
pub const DEBUG_MARKER: &[u8] = b"__DWARF_debug_info__";

/// One member of a fixture archive
#[derive(Debug, Clone, Copy)]
pub enum Member<'a> {
    File(&'a str, &'a [u8]),
    Dir(&'a str),
}

/// Write a zip (or wheel) archive
pub fn write_zip(dir: &Path, name: &str, members: &[Member<'_>]) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    for member in members {
        match member {
            Member::File(name, data) => {
                writer.start_file(*name, options).unwrap();
                writer.write_all(data).unwrap();
            }
            Member::Dir(name) => {
                writer.add_directory(*name, options).unwrap();
            }
        }
    }
    writer.finish().unwrap();
    path
}

/// Uncompressed tar stream holding `members`
pub fn tar_bytes(members: &[Member<'_>]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for member in members {
        let mut header = tar::Header::new_gnu();
        match member {
            Member::File(name, data) => {
                header.set_size(data.len() as u64);
                header.set_mode(0o644);
                header.set_cksum();
                builder.append_data(&mut header, name, *data).unwrap();
            }
            Member::Dir(name) => {
                header.set_entry_type(tar::EntryType::Directory);
                header.set_size(0);
                header.set_mode(0o755);
                header.set_cksum();
                builder.append_data(&mut header, name, std::io::empty()).unwrap();
            }
        }
    }
    builder.into_inner().unwrap()
}

/// Write a gzip-compressed tarball
pub fn write_tar_gz(dir: &Path, name: &str, members: &[Member<'_>]) -> PathBuf {
    let path = dir.join(name);
    let mut encoder = flate2::write::GzEncoder::new(File::create(&path).unwrap(), flate2::Compression::default());
    encoder.write_all(&tar_bytes(members)).unwrap();
    encoder.finish().unwrap();
    path
}

/// Write a bzip2-compressed tarball
pub fn write_tar_bz2(dir: &Path, name: &str, members: &[Member<'_>]) -> PathBuf {
    let path = dir.join(name);
    let mut encoder = bzip2::write::BzEncoder::new(File::create(&path).unwrap(), bzip2::Compression::default());
    encoder.write_all(&tar_bytes(members)).unwrap();
    encoder.finish().unwrap();
    path
}

/// Write a `.conda` package: an outer zip with `outer` members plus one
/// zstd-compressed tarball per `(name, members)` payload
pub fn write_conda(
    dir: &Path,
    name: &str,
    outer: &[Member<'_>],
    payloads: &[(&str, &[Member<'_>])],
) -> PathBuf {
    let compressed: Vec<(String, Vec<u8>)> = payloads
        .iter()
        .map(|(payload_name, members)| {
            let mut encoder = zstd::stream::write::Encoder::new(Vec::new(), 3).unwrap();
            encoder.write_all(&tar_bytes(members)).unwrap();
            (payload_name.to_string(), encoder.finish().unwrap())
        })
        .collect();

    let mut members: Vec<Member<'_>> = outer.to_vec();
    members.extend(
        compressed
            .iter()
            .map(|(payload_name, data)| Member::File(payload_name.as_str(), data.as_slice())),
    );
    write_zip(dir, name, &members)
}

/// Pretends to be `dsymutil`: reports an N_OSO stab for any file carrying
/// [`DEBUG_MARKER`]; every other tool is missing.
pub struct FakeDsymutil;

impl CommandRunner for FakeDsymutil {
    fn run(&self, program: &str, args: &[&str], file: &Path) -> Result<Vec<u8>, ProbeFailure> {
        if program != "dsymutil" || args != ["-s"] {
            return Err(ProbeFailure::ToolUnavailable(program.to_string()));
        }
        let content = std::fs::read(file).map_err(|e| ProbeFailure::ToolFailed {
            command: "dsymutil -s".to_string(),
            details: e.to_string(),
        })?;
        if content.windows(DEBUG_MARKER.len()).any(|w| w == DEBUG_MARKER) {
            Ok(b"[     0] 00000012 66 (N_OSO        ) 00     0001   0000000000000000 '/build/lib.o'\n".to_vec())
        } else {
            Ok(b"----------------------------------------------------------------------\n".to_vec())
        }
    }
}

/// Concatenate header and body into an owned fixture payload
pub fn binary(header: &[u8], body: &[u8]) -> Vec<u8> {
    let mut out = header.to_vec();
    out.extend_from_slice(body);
    out
}
