// src/archive/extract.rs

//! Selective extraction of archive members into a scratch directory

use super::path::safe_join;
use super::reader::{is_metadata_header, is_regular_file, open_tar_stream, tar_member_name};
use super::{is_conda_payload, ArchiveError, ArchiveFormat};
use crate::compression::{create_decoder, CompressionFormat};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Extract (at least) `members` from the archive at `archive_path` into `dest`.
///
/// Each member lands at `dest/<member path>`. Member paths are sanitized
/// before joining, so a hostile name cannot write outside `dest`. Any
/// requested member missing from the archive yields
/// [`ArchiveError::MemberNotFound`].
pub fn extract_subset(
    archive_path: &Path,
    format: ArchiveFormat,
    members: &[String],
    dest: &Path,
) -> Result<(), ArchiveError> {
    let archive_name = archive_path.display().to_string();
    if members.is_empty() {
        return Ok(());
    }
    debug!("Extracting {} members from {}", members.len(), archive_name);

    let wanted: HashSet<&str> = members.iter().map(String::as_str).collect();
    let mut found: HashSet<String> = HashSet::new();

    let file = File::open(archive_path).map_err(|e| ArchiveError::io(&archive_name, e))?;
    match format {
        ArchiveFormat::Zip | ArchiveFormat::Conda => {
            extract_zip(
                BufReader::new(file),
                &archive_name,
                format == ArchiveFormat::Conda,
                &wanted,
                &mut found,
                dest,
            )?;
        }
        ArchiveFormat::GzipTar | ArchiveFormat::Bzip2Tar => {
            let decoder = open_tar_stream(file, format, &archive_name)?;
            extract_tar(decoder, &archive_name, &wanted, &mut found, dest)?;
        }
    }

    let mut missing: Vec<&String> = members.iter().filter(|m| !found.contains(m.as_str())).collect();
    missing.sort();
    match missing.first() {
        Some(member) => Err(ArchiveError::MemberNotFound {
            path: archive_name,
            member: (*member).clone(),
        }),
        None => Ok(()),
    }
}

fn extract_zip<R: Read + io::Seek>(
    reader: R,
    archive_name: &str,
    conda: bool,
    wanted: &HashSet<&str>,
    found: &mut HashSet<String>,
    dest: &Path,
) -> Result<(), ArchiveError> {
    let mut archive = zip::ZipArchive::new(reader).map_err(|e| ArchiveError::corrupt(archive_name, e))?;

    for index in 0..archive.len() {
        let mut member = archive
            .by_index(index)
            .map_err(|e| ArchiveError::corrupt(archive_name, e))?;
        if member.is_dir() {
            continue;
        }
        let name = member.name().to_string();

        if conda && is_conda_payload(&name) {
            let decoder = create_decoder(&mut member, CompressionFormat::from_extension(&name))
                .map_err(|e| ArchiveError::corrupt(archive_name, e))?;
            extract_tar(decoder, archive_name, wanted, found, dest)?;
        } else if wanted.contains(name.as_str()) {
            write_member(&mut member, &name, archive_name, dest)?;
            found.insert(name);
        }
    }

    Ok(())
}

fn extract_tar<R: Read>(
    reader: R,
    archive_name: &str,
    wanted: &HashSet<&str>,
    found: &mut HashSet<String>,
    dest: &Path,
) -> Result<(), ArchiveError> {
    let mut archive = tar::Archive::new(reader);
    let entries = archive.entries().map_err(|e| ArchiveError::corrupt(archive_name, e))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| ArchiveError::corrupt(archive_name, e))?;
        let entry_type = entry.header().entry_type();
        if is_metadata_header(entry_type) || !is_regular_file(entry_type) {
            continue;
        }
        let name = tar_member_name(&entry);
        if wanted.contains(name.as_str()) {
            write_member(&mut entry, &name, archive_name, dest)?;
            found.insert(name);
        }
    }

    Ok(())
}

fn write_member<R: Read>(reader: &mut R, name: &str, archive_name: &str, dest: &Path) -> Result<(), ArchiveError> {
    let target = safe_join(dest, name).map_err(|e| ArchiveError::corrupt(archive_name, e))?;
    let target_display = target.display().to_string();

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| ArchiveError::io(&target_display, e))?;
    }
    let mut out = File::create(&target).map_err(|e| ArchiveError::io(&target_display, e))?;
    io::copy(reader, &mut out).map_err(|e| ArchiveError::corrupt(archive_name, e))?;
    Ok(())
}
