// src/archive/reader.rs

//! Enumerate archive members into [`FileEntry`] / [`DirectoryEntry`] lists
//!
//! Members are reported in the order the archive stores them. For `.conda`
//! packages the nested `*.tar.zst` payloads are streamed straight out of the
//! outer zip through a zstd decoder, so nothing is written to disk.

use super::content::classify_reader;
use super::entry::{DirectoryEntry, FileEntry};
use super::{is_conda_payload, ArchiveError, ArchiveFormat};
use crate::compression::{create_decoder, CompressionFormat};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tar::EntryType;
use tracing::{debug, trace, warn};

/// Everything found in one archive, in archive order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveContents {
    pub files: Vec<FileEntry>,
    pub directories: Vec<DirectoryEntry>,
}

/// Read every member of the archive at `path`
pub fn read_archive(path: &Path, format: ArchiveFormat) -> Result<ArchiveContents, ArchiveError> {
    let archive_name = path.display().to_string();
    debug!("Reading {} archive {}", format, archive_name);

    let file = File::open(path).map_err(|e| ArchiveError::io(&archive_name, e))?;
    let mut contents = ArchiveContents::default();

    match format {
        ArchiveFormat::Zip => read_zip(BufReader::new(file), &archive_name, false, &mut contents)?,
        ArchiveFormat::Conda => read_zip(BufReader::new(file), &archive_name, true, &mut contents)?,
        ArchiveFormat::GzipTar | ArchiveFormat::Bzip2Tar => {
            let decoder = open_tar_stream(file, format, &archive_name)?;
            read_tar(decoder, &archive_name, &mut contents)?;
        }
    }

    debug!(
        "Found {} files and {} directories in {}",
        contents.files.len(),
        contents.directories.len(),
        archive_name
    );
    Ok(contents)
}

fn read_zip<R: Read + std::io::Seek>(
    reader: R,
    archive_name: &str,
    conda: bool,
    contents: &mut ArchiveContents,
) -> Result<(), ArchiveError> {
    let mut archive = zip::ZipArchive::new(reader).map_err(|e| ArchiveError::corrupt(archive_name, e))?;

    for index in 0..archive.len() {
        let mut member = archive
            .by_index(index)
            .map_err(|e| ArchiveError::corrupt(archive_name, e))?;
        let name = member.name().to_string();

        if member.is_dir() {
            contents.directories.push(DirectoryEntry::new(name));
        } else if conda && is_conda_payload(&name) {
            trace!("Streaming nested payload {} from {}", name, archive_name);
            let decoder = create_decoder(&mut member, CompressionFormat::from_extension(&name))
                .map_err(|e| ArchiveError::corrupt(archive_name, e))?;
            read_tar(decoder, archive_name, contents)?;
        } else {
            let size = member.size();
            let content_format =
                classify_reader(&mut member).map_err(|e| ArchiveError::corrupt(archive_name, e))?;
            contents.files.push(FileEntry::new(name, size, content_format));
        }
    }

    Ok(())
}

fn read_tar<R: Read>(reader: R, archive_name: &str, contents: &mut ArchiveContents) -> Result<(), ArchiveError> {
    let mut archive = tar::Archive::new(reader);
    let entries = archive.entries().map_err(|e| ArchiveError::corrupt(archive_name, e))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| ArchiveError::corrupt(archive_name, e))?;
        let entry_type = entry.header().entry_type();
        if is_metadata_header(entry_type) {
            continue;
        }

        let name = tar_member_name(&entry);
        if is_regular_file(entry_type) {
            let size = entry.size();
            let content_format =
                classify_reader(&mut entry).map_err(|e| ArchiveError::corrupt(archive_name, e))?;
            contents.files.push(FileEntry::new(name, size, content_format));
        } else {
            // symlinks, hardlinks, devices and fifos are grouped with directories
            contents.directories.push(DirectoryEntry::new(name));
        }
    }

    Ok(())
}

/// Decompressing reader over the tar stream of a tar-based archive.
///
/// The stream's magic bytes win over the file suffix when they disagree.
pub(crate) fn open_tar_stream(
    file: File,
    format: ArchiveFormat,
    archive_name: &str,
) -> Result<Box<dyn Read>, ArchiveError> {
    let mut reader = BufReader::new(file);
    let expected = format.tar_compression().unwrap_or(CompressionFormat::None);
    let head = reader.fill_buf().map_err(|e| ArchiveError::io(archive_name, e))?;
    let sniffed = CompressionFormat::from_magic_bytes(head);

    let compression = if sniffed != CompressionFormat::None && sniffed != expected {
        warn!("{} is named like a {} archive but holds {} data", archive_name, format, sniffed);
        sniffed
    } else {
        expected
    };
    create_decoder(reader, compression).map_err(|e| ArchiveError::corrupt(archive_name, e))
}

/// Member name as stored, minus any trailing slash
pub(crate) fn tar_member_name<R: Read>(entry: &tar::Entry<'_, R>) -> String {
    String::from_utf8_lossy(&entry.path_bytes())
        .trim_end_matches('/')
        .to_string()
}

pub(crate) fn is_regular_file(entry_type: EntryType) -> bool {
    matches!(
        entry_type,
        EntryType::Regular | EntryType::Continuous | EntryType::GNUSparse
    )
}

/// Extension headers that describe the next member rather than being one
pub(crate) fn is_metadata_header(entry_type: EntryType) -> bool {
    matches!(
        entry_type,
        EntryType::XGlobalHeader | EntryType::XHeader | EntryType::GNULongName | EntryType::GNULongLink
    )
}
