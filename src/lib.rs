//! # zipmap
//!
//! Treat a ZIP archive as a map: entry names are the keys, entry contents
//! are the values.
//!
//! This crate is an adapter over the [`zip`] crate, which does all of the
//! actual format work (compression, central directory, raw entry copies).
//! What this crate adds is a handle with map-style operations, lazy opening
//! of the backing file, and auto-commit after every change.
//!
//! ## Quick Start
//!
//! ### Building an Archive
//!
//! ```rust,no_run
//! use zipmap::{Archive, ArchiveOptions, Result};
//!
//! fn main() -> Result<()> {
//!     let mut zip = Archive::from_entries(
//!         ArchiveOptions::new().path("my.zip"),
//!         [("README", "Thank you for reading me.")],
//!     )?;
//!
//!     zip.set("bar/bara.mp3", std::fs::read("bara.mp3")?)?;
//!     zip.rename("README", "README.txt")?;
//!
//!     for name in zip.names()? {
//!         println!("{}", name);
//!     }
//!
//!     zip.close()?;
//!     Ok(())
//! }
//! ```
//!
//! ### Editing an Existing Archive
//!
//! ```rust,no_run
//! use zipmap::{Result, convenience};
//!
//! fn main() -> Result<()> {
//!     convenience::open_and("example.zip", |zip| {
//!         zip.set("donkey", "horse")?;
//!         zip.remove(["bounce.jpg"])?;
//!         Ok(())
//!     })?;
//!
//!     let text = convenience::read("example.zip", "text.txt")?;
//!     println!("{:?}", text.map(String::from_utf8));
//!     Ok(())
//! }
//! ```
//!
//! ### Batching Changes
//!
//! Every mutation is written to disk immediately by default. To write
//! several changes with one rewrite of the file, suspend auto-commit:
//!
//! ```rust,no_run
//! use zipmap::{Archive, Result};
//!
//! fn main() -> Result<()> {
//!     let mut zip = Archive::new();
//!     let mut batch = zip.suspend_autocommit();
//!     for i in 0..100 {
//!         batch.set(&format!("file-{}.txt", i), zipmap::Content::display(&i))?;
//!     }
//!     batch.finish()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `deflate` | Yes | Deflate compression (the default method for new entries) |
//! | `bzip2` | No | Read and write BZip2 entries |
//! | `zstd` | No | Read and write Zstandard entries |
//!
//! Without `deflate`, new entries are stored uncompressed.
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: opening, committing, copying
//! and moving backing files at `debug` level, per-entry changes at `trace`
//! level. A handle dropped with uncommitted changes logs a warning.
//!
//! ## Concurrency
//!
//! Everything is synchronous. Nothing coordinates several handles or
//! processes working on the same path; callers must serialize such access
//! themselves.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Initial buffer size for draining reader content (8 KiB).
pub(crate) const READ_BUFFER_SIZE: usize = 8192;

pub mod archive;
pub mod content;
pub mod convenience;
pub mod entry_name;
pub mod error;
pub mod options;
pub mod store;

mod temp;

pub use archive::{Archive, ArchiveState, AutocommitGuard};
pub use content::Content;
pub use entry_name::EntryName;
pub use error::{Error, Result};
pub use options::ArchiveOptions;
pub use store::{CommitSummary, Operation};

// Re-export the backing library's compression selector for options
pub use zip::CompressionMethod;
