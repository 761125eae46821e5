//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Text stored in `text.txt` of the example archive.
pub const EXAMPLE_TEXT: &str = "The monster HUMBABA guards the cedar forest.\n";

/// A few bytes that look like the start of a JPEG file.
pub const EXAMPLE_JPEG: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00,
];

/// Writes an archive with the given entries directly through the `zip` crate.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = File::create(path).expect("create zip");
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (name, data) in entries {
        zip.start_file(*name, options).expect("start file");
        zip.write_all(data).expect("write entry");
    }

    zip.finish().expect("finish zip");
}

/// Writes a one-entry archive whose central directory claims the entry
/// expands to `declared_size` bytes.
///
/// The entry is stored and empty; the size is carried in a zip64 extra
/// field, so any value up to `u64::MAX` can be declared.
pub fn write_zip_declaring_size(path: &Path, name: &str, declared_size: u64) {
    let mut out = Vec::new();

    // Local file header
    out.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
    out.extend_from_slice(&20u16.to_le_bytes()); // version needed
    out.extend_from_slice(&0u16.to_le_bytes()); // flags
    out.extend_from_slice(&0u16.to_le_bytes()); // stored
    out.extend_from_slice(&0u16.to_le_bytes()); // time
    out.extend_from_slice(&0x21u16.to_le_bytes()); // date: 1980-01-01
    out.extend_from_slice(&0u32.to_le_bytes()); // crc32 of no bytes
    out.extend_from_slice(&0u32.to_le_bytes()); // compressed size
    out.extend_from_slice(&0u32.to_le_bytes()); // uncompressed size
    out.extend_from_slice(&(name.len() as u16).to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes()); // extra length
    out.extend_from_slice(name.as_bytes());

    // Central directory header
    let cd_offset = out.len();
    out.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
    out.extend_from_slice(&45u16.to_le_bytes()); // version made by
    out.extend_from_slice(&45u16.to_le_bytes()); // version needed
    out.extend_from_slice(&0u16.to_le_bytes()); // flags
    out.extend_from_slice(&0u16.to_le_bytes()); // stored
    out.extend_from_slice(&0u16.to_le_bytes()); // time
    out.extend_from_slice(&0x21u16.to_le_bytes()); // date
    out.extend_from_slice(&0u32.to_le_bytes()); // crc32
    out.extend_from_slice(&0u32.to_le_bytes()); // compressed size
    out.extend_from_slice(&u32::MAX.to_le_bytes()); // size is in zip64 extra
    out.extend_from_slice(&(name.len() as u16).to_le_bytes());
    out.extend_from_slice(&12u16.to_le_bytes()); // extra length
    out.extend_from_slice(&0u16.to_le_bytes()); // comment length
    out.extend_from_slice(&0u16.to_le_bytes()); // disk number
    out.extend_from_slice(&0u16.to_le_bytes()); // internal attributes
    out.extend_from_slice(&0u32.to_le_bytes()); // external attributes
    out.extend_from_slice(&0u32.to_le_bytes()); // local header offset
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(&0x0001u16.to_le_bytes()); // zip64 extra
    out.extend_from_slice(&8u16.to_le_bytes());
    out.extend_from_slice(&declared_size.to_le_bytes());
    let cd_size = out.len() - cd_offset;

    // End of central directory
    out.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes()); // this disk
    out.extend_from_slice(&0u16.to_le_bytes()); // central directory disk
    out.extend_from_slice(&1u16.to_le_bytes()); // entries on this disk
    out.extend_from_slice(&1u16.to_le_bytes()); // total entries
    out.extend_from_slice(&(cd_size as u32).to_le_bytes());
    out.extend_from_slice(&(cd_offset as u32).to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes()); // comment length

    std::fs::write(path, out).expect("write zip");
}

/// Creates `example.zip` in `dir` holding `bounce.jpg` and `text.txt`.
pub fn example_zip(dir: &Path) -> PathBuf {
    let path = dir.join("example.zip");
    write_zip(
        &path,
        &[
            ("bounce.jpg", EXAMPLE_JPEG),
            ("text.txt", EXAMPLE_TEXT.as_bytes()),
        ],
    );
    path
}

/// Reads every entry of the archive at `path` through the `zip` crate.
///
/// Used to check what actually reached the disk, independently of the
/// handle that wrote it.
pub fn read_zip(path: &Path) -> Vec<(String, Vec<u8>)> {
    let file = File::open(path).expect("open zip");
    let mut archive = ZipArchive::new(file).expect("parse zip");
    let mut entries = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).expect("entry");
        let mut data = Vec::new();
        entry.read_to_end(&mut data).expect("read entry");
        entries.push((entry.name().to_string(), data));
    }
    entries
}

/// Returns the entry names of the archive at `path`.
pub fn zip_names(path: &Path) -> Vec<String> {
    read_zip(path).into_iter().map(|(name, _)| name).collect()
}

/// Returns whether the file at `path` starts with the ZIP signature.
pub fn starts_with_pk(path: &Path) -> bool {
    std::fs::read(path)
        .map(|bytes| bytes.starts_with(b"PK"))
        .unwrap_or(false)
}
