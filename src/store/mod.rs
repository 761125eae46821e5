//! Backing storage for archive handles.
//!
//! The store keeps the state the `zip` crate does not: which entries exist,
//! under which names, and which of them have new content that has not been
//! written yet. The `zip` crate itself only ever reads a finished archive or
//! writes a new one from start to end.
//!
//! # Implementation Notes
//!
//! A commit:
//! 1. Writes a new archive to a temporary file in the same directory
//! 2. Raw-copies stored entries (renamed ones under their new name)
//! 3. Compresses buffered entries with the configured options
//! 4. Skips removed entries
//! 5. Persists the temporary file over the backing path and reopens it

mod operation;
mod zip_store;

pub use operation::{CommitSummary, Operation};
pub(crate) use zip_store::ZipStore;
