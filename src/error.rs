//! Error types for archive handle operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when working with a [`crate::Archive`], along with a
//! convenient [`Result<T>`] type alias.
//!
//! A missing entry is not an error: [`crate::Archive::get`] returns
//! `Ok(None)` for names that do not exist, and removing a missing entry is a
//! no-op. Errors are reserved for failures of the filesystem, the backing
//! `zip` library, or of the handle's own contract.
//!
//! # Example
//!
//! ```rust,no_run
//! use zipmap::{Error, convenience};
//!
//! match convenience::list("missing.zip") {
//!     Ok(names) => println!("{} entries", names.len()),
//!     Err(e) if e.is_invalid_argument() => eprintln!("bad input: {}", e),
//!     Err(e) => eprintln!("failed: {}", e),
//! }
//! ```

use std::io;
use std::path::PathBuf;

use zip::result::ZipError;

/// The main error type for archive handle operations.
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | I/O | [`Io`][Self::Io] | File system operations |
/// | Backing library | [`Zip`][Self::Zip] | Invalid or unsupported ZIP data |
/// | Invalid argument | [`ArchiveNotFound`][Self::ArchiveNotFound], [`InvalidEntryName`][Self::InvalidEntryName] | Caller input |
/// | Entries | [`EntryNotFound`][Self::EntryNotFound], [`EntryExists`][Self::EntryExists] | Rename conflicts |
/// | Lifecycle | [`Closed`][Self::Closed] | Use after close |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred during file operations.
    ///
    /// Returned when reading, copying, moving or replacing the backing file
    /// fails.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backing `zip` library rejected the archive or an entry.
    ///
    /// This usually means the file at the handle's path is not a valid ZIP
    /// archive, or an entry uses a compression method this build does not
    /// support.
    #[error("ZIP error: {0}")]
    Zip(#[from] ZipError),

    /// An archive that must already exist was not found.
    ///
    /// Returned by [`crate::convenience::open`] and the other path-level
    /// operations that read an existing archive.
    #[error("file \"{}\" does not exist", path.display())]
    ArchiveNotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// An entry name cannot be stored in a ZIP archive.
    #[error("Invalid entry name: {0}")]
    InvalidEntryName(String),

    /// An entry was not found in the archive.
    ///
    /// Reads never produce this error; it is returned when renaming an entry
    /// that does not exist.
    #[error("Entry not found: {name}")]
    EntryNotFound {
        /// The name that was not found.
        name: String,
    },

    /// An entry already exists in the archive.
    ///
    /// Returned when renaming an entry onto the name of another entry.
    #[error("Entry already exists: {name}")]
    EntryExists {
        /// The name that already exists.
        name: String,
    },

    /// The handle was closed and can no longer be used.
    #[error("archive \"{}\" is closed", path.display())]
    Closed {
        /// Path the handle was bound to when it was closed.
        path: PathBuf,
    },
}

impl Error {
    /// Returns `true` if this error was caused by invalid caller input.
    ///
    /// This is the class of errors that a caller can fix by passing a
    /// different argument, such as an existing archive path or a storable
    /// entry name.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::ArchiveNotFound { .. } | Error::InvalidEntryName(_)
        )
    }

    /// Returns `true` if something that was looked up does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::ArchiveNotFound { .. } | Error::EntryNotFound { .. } => true,
            Error::Io(e) => e.kind() == io::ErrorKind::NotFound,
            Error::Zip(ZipError::FileNotFound) => true,
            _ => false,
        }
    }

    /// Returns the entry name associated with this error, if any.
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            Error::EntryNotFound { name } | Error::EntryExists { name } => Some(name),
            _ => None,
        }
    }
}

/// A specialized Result type for archive handle operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("I/O error"));
        assert!(err.is_not_found());
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn test_zip_error_from() {
        let err: Error = ZipError::InvalidArchive("bad".into()).into();
        assert!(matches!(err, Error::Zip(_)));
        assert!(err.to_string().starts_with("ZIP error"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_archive_not_found() {
        let err = Error::ArchiveNotFound {
            path: PathBuf::from("nonexistingfile"),
        };
        assert_eq!(err.to_string(), "file \"nonexistingfile\" does not exist");
        assert!(err.is_invalid_argument());
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_entry_name() {
        let err = Error::InvalidEntryName("empty name".into());
        assert_eq!(err.to_string(), "Invalid entry name: empty name");
        assert!(err.is_invalid_argument());
        assert_eq!(err.entry_name(), None);
    }

    #[test]
    fn test_entry_not_found() {
        let err = Error::EntryNotFound {
            name: "missing.txt".into(),
        };
        assert_eq!(err.to_string(), "Entry not found: missing.txt");
        assert_eq!(err.entry_name(), Some("missing.txt"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_entry_exists() {
        let err = Error::EntryExists {
            name: "taken.txt".into(),
        };
        assert_eq!(err.to_string(), "Entry already exists: taken.txt");
        assert_eq!(err.entry_name(), Some("taken.txt"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_closed() {
        let err = Error::Closed {
            path: PathBuf::from("a.zip"),
        };
        assert_eq!(err.to_string(), "archive \"a.zip\" is closed");
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
