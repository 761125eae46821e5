//! The backing handle: an open ZIP file plus uncommitted entry state.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::options::ArchiveOptions;
use crate::{EntryName, Error, Result};

use super::operation::{CommitSummary, Operation};

type Backing = ZipArchive<BufReader<File>>;

/// Upper bound on the buffer reserved up front when reading an entry (1 MiB).
///
/// The declared size comes from the archive header and is not trusted;
/// larger entries grow the buffer while they are read.
const MAX_READ_RESERVATION: u64 = crate::READ_BUFFER_SIZE as u64 * 128;

/// Where the content of an entry currently lives.
#[derive(Debug)]
enum Source {
    /// Entry `index` of the open backing file, copied raw on commit.
    Stored(usize),
    /// Content written since the last commit.
    Buffered(Vec<u8>),
}

#[derive(Debug)]
struct Slot {
    name: String,
    source: Source,
}

/// An archive bound to one path.
///
/// Mutations are applied to an ordered list of entry slots and recorded in
/// a journal. [`commit`](Self::commit) writes a complete new archive next
/// to the backing file and atomically replaces it: unchanged and renamed
/// entries are raw-copied without recompression, new content is compressed
/// with the configured options.
///
/// A store opened on a path with no file starts empty; the file is created
/// by the first commit that has something to write.
pub(crate) struct ZipStore {
    path: PathBuf,
    archive: Option<Backing>,
    slots: Vec<Slot>,
    journal: Vec<Operation>,
    file_options: SimpleFileOptions,
}

impl ZipStore {
    /// Opens the archive at `path`, or starts an empty one if no file exists.
    pub fn open(path: &Path, options: &ArchiveOptions) -> Result<Self> {
        let mut store = Self {
            path: path.to_path_buf(),
            archive: None,
            slots: Vec::new(),
            journal: Vec::new(),
            file_options: options.file_options(),
        };

        if path.exists() {
            store.load()?;
            log::debug!(
                "Opened '{}' with {} entries",
                path.display(),
                store.slots.len()
            );
        } else {
            log::debug!("'{}' does not exist yet, starting empty", path.display());
        }

        Ok(store)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns the entry names in archive order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.slots.iter().map(|slot| slot.name.as_str())
    }

    /// Returns whether an entry with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns the journaled, uncommitted operations in the order applied.
    pub fn journal(&self) -> &[Operation] {
        &self.journal
    }

    /// Reads the uncompressed content of an entry.
    pub fn read(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let Some(pos) = self.position(name) else {
            return Ok(None);
        };

        let index = match &self.slots[pos].source {
            Source::Buffered(data) => return Ok(Some(data.clone())),
            Source::Stored(index) => *index,
        };

        let archive = self.archive.as_mut().ok_or_else(|| missing_backing(&self.path))?;
        let mut file = archive.by_index(index)?;
        let mut buf = Vec::with_capacity(file.size().min(MAX_READ_RESERVATION) as usize);
        file.read_to_end(&mut buf)?;
        Ok(Some(buf))
    }

    /// Adds an entry, or replaces the content of an existing one in place.
    pub fn put(&mut self, name: EntryName, data: Vec<u8>) {
        let size = data.len() as u64;
        match self.position(name.as_str()) {
            Some(pos) => self.slots[pos].source = Source::Buffered(data),
            None => self.slots.push(Slot {
                name: name.as_str().to_string(),
                source: Source::Buffered(data),
            }),
        }
        log::trace!("Put '{}' ({} bytes)", name, size);
        self.journal.push(Operation::Put {
            name: name.into_string(),
            size,
        });
    }

    /// Removes an entry. Returns `false` if it did not exist.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(pos) = self.position(name) else {
            log::trace!("Remove '{}': no such entry", name);
            return false;
        };

        self.slots.remove(pos);
        log::trace!("Removed '{}'", name);
        self.journal.push(Operation::Remove {
            name: name.to_string(),
        });
        true
    }

    /// Renames an entry, keeping its position and content.
    pub fn rename(&mut self, from: &str, to: EntryName) -> Result<()> {
        let pos = self.position(from).ok_or_else(|| Error::EntryNotFound {
            name: from.to_string(),
        })?;

        if from == to.as_str() {
            return Ok(());
        }

        if self.contains(to.as_str()) {
            return Err(Error::EntryExists {
                name: to.into_string(),
            });
        }

        self.slots[pos].name = to.as_str().to_string();
        log::trace!("Renamed '{}' to '{}'", from, to);
        self.journal.push(Operation::Rename {
            from: from.to_string(),
            to: to.into_string(),
        });
        Ok(())
    }

    /// Writes pending changes to the backing file.
    ///
    /// Does nothing if the journal is empty.
    pub fn commit(&mut self) -> Result<CommitSummary> {
        if self.journal.is_empty() {
            return Ok(CommitSummary {
                total_entries: self.slots.len(),
                ..Default::default()
            });
        }

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut temp = NamedTempFile::new_in(&dir)?;

        {
            let mut writer = ZipWriter::new(BufWriter::new(temp.as_file_mut()));
            for slot in &self.slots {
                match &slot.source {
                    Source::Stored(index) => {
                        let archive = self
                            .archive
                            .as_mut()
                            .ok_or_else(|| missing_backing(&self.path))?;
                        let file = archive.by_index_raw(*index)?;
                        writer.raw_copy_file_rename(file, slot.name.as_str())?;
                    }
                    Source::Buffered(data) => {
                        writer.start_file(slot.name.as_str(), self.file_options)?;
                        writer.write_all(data)?;
                    }
                }
            }
            let mut out = writer.finish()?;
            out.flush()?;
        }

        // The old file must not be held open while it is replaced.
        self.archive = None;
        if let Err(e) = temp.persist(&self.path) {
            if self.path.exists() {
                self.archive = Some(open_backing(&self.path)?);
            }
            return Err(Error::Io(e.error));
        }

        let summary = CommitSummary::from_journal(&self.journal, self.slots.len());
        let mut header_only = 0;
        for op in &self.journal {
            if op.is_header_only() {
                header_only += 1;
            }
            log::trace!("Committed {} of '{}'", op.operation_type(), op.target_name());
        }
        self.journal.clear();
        self.load()?;

        log::debug!(
            "Committed {} operations ({} header-only) to '{}' ({} entries)",
            summary.operations(),
            header_only,
            self.path.display(),
            summary.total_entries
        );
        Ok(summary)
    }

    /// Commits pending changes and releases the backing file.
    pub fn close(mut self) -> Result<CommitSummary> {
        let summary = self.commit()?;
        self.archive = None;
        log::debug!("Closed '{}'", self.path.display());
        Ok(summary)
    }

    /// Reads the backing file and rebuilds the slots from its entries.
    fn load(&mut self) -> Result<()> {
        let mut archive = open_backing(&self.path)?;
        let mut slots = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let name = archive.by_index_raw(index)?.name().to_string();
            slots.push(Slot {
                name,
                source: Source::Stored(index),
            });
        }
        self.slots = slots;
        self.archive = Some(archive);
        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.name == name)
    }
}

impl Drop for ZipStore {
    fn drop(&mut self) {
        if !self.journal.is_empty() {
            log::warn!(
                "Discarding {} uncommitted changes to '{}'",
                self.journal.len(),
                self.path.display()
            );
        }
    }
}

fn open_backing(path: &Path) -> Result<Backing> {
    let file = File::open(path)?;
    Ok(ZipArchive::new(BufReader::new(file))?)
}

fn missing_backing(path: &Path) -> Error {
    Error::Io(io::Error::new(
        io::ErrorKind::NotFound,
        format!("backing file '{}' is not open", path.display()),
    ))
}
