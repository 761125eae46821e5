//! The archive handle.
//!
//! An [`Archive`] binds a ZIP file path to a map-like view of its entries.
//! Construction does no I/O; the backing file is opened on the first
//! operation that needs it and released by [`Archive::close`].
//!
//! # Example
//!
//! ```rust,no_run
//! use zipmap::{Archive, ArchiveOptions};
//!
//! # fn main() -> zipmap::Result<()> {
//! let mut zip = Archive::with_options(ArchiveOptions::new().path("my.zip"));
//! zip.set("README", "Thank you for reading me.")?;
//! zip.set("bar/bara.mp3", b"\xff\xfb")?;
//!
//! assert_eq!(zip.get("README")?.as_deref(), Some(&b"Thank you for reading me."[..]));
//! assert_eq!(zip.get("humbaba")?, None);
//!
//! zip.rename("README", "README.txt")?;
//! zip.remove(["bar/bara.mp3"])?;
//! zip.close()?;
//! # Ok(())
//! # }
//! ```

use std::cell::OnceCell;
use std::fmt;
use std::fs;
use std::io;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use crate::content::Content;
use crate::options::ArchiveOptions;
use crate::store::{CommitSummary, Operation, ZipStore};
use crate::{EntryName, Error, Result, temp};

/// Lifecycle phase of an [`Archive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveState {
    /// No backing handle exists yet. The next access opens one.
    Unopened,
    /// The backing file is open.
    Open,
    /// The handle was closed.
    Closed,
}

enum State {
    Unopened,
    Open(ZipStore),
    Closed,
}

/// A ZIP archive presented as a map from entry names to contents.
///
/// With auto-commit enabled (the default) every mutation is flushed to the
/// backing file before it returns. With auto-commit disabled, mutations are
/// kept in memory until [`commit`](Self::commit), [`write_to`](Self::write_to),
/// [`data`](Self::data) or [`close`](Self::close).
///
/// Reading methods take `&mut self` because they may open the backing file.
/// Changes that were never committed are not guaranteed to reach the disk
/// if the handle is dropped without being closed.
pub struct Archive {
    path: OnceCell<PathBuf>,
    options: ArchiveOptions,
    autocommit: bool,
    state: State,
}

impl Default for Archive {
    fn default() -> Self {
        Self::new()
    }
}

impl Archive {
    /// Creates a handle with default options and a generated temporary path.
    pub fn new() -> Self {
        Self::with_options(ArchiveOptions::default())
    }

    /// Creates a handle from options. No I/O is performed.
    pub fn with_options(mut options: ArchiveOptions) -> Self {
        let path = match options.path.take() {
            Some(path) => OnceCell::from(path),
            None => OnceCell::new(),
        };
        Self {
            path,
            autocommit: options.is_autocommit(),
            options,
            state: State::Unopened,
        }
    }

    /// Creates a handle and populates it with `entries`, in order.
    ///
    /// The entries are written with auto-commit suspended and committed once
    /// at the end (if auto-commit is enabled in `options`).
    ///
    /// ```rust,no_run
    /// use zipmap::{Archive, ArchiveOptions};
    ///
    /// # fn main() -> zipmap::Result<()> {
    /// let mut zip = Archive::from_entries(
    ///     ArchiveOptions::new().path("my.zip"),
    ///     [("a", "1"), ("b", "2")],
    /// )?;
    /// assert_eq!(zip.len()?, 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_entries<'c, I, K, V>(options: ArchiveOptions, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Content<'c>>,
    {
        let mut archive = Self::with_options(options);
        archive.extend_entries(entries)?;
        Ok(archive)
    }

    /// Writes several entries with a single commit.
    pub fn extend_entries<'c, I, K, V>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Content<'c>>,
    {
        let mut batch = self.suspend_autocommit();
        for (name, content) in entries {
            batch.set(name.as_ref(), content)?;
        }
        batch.finish()
    }

    /// Returns the backing file path, generating a temporary one if unset.
    pub fn path(&self) -> &Path {
        self.path.get_or_init(temp::generate_path)
    }

    /// Returns the lifecycle phase of this handle.
    pub fn state(&self) -> ArchiveState {
        match self.state {
            State::Unopened => ArchiveState::Unopened,
            State::Open(_) => ArchiveState::Open,
            State::Closed => ArchiveState::Closed,
        }
    }

    /// Returns whether mutations are flushed immediately.
    pub fn autocommit(&self) -> bool {
        self.autocommit
    }

    /// Enables or disables auto-commit.
    ///
    /// Enabling it does not flush changes that are already pending.
    pub fn set_autocommit(&mut self, enabled: bool) {
        self.autocommit = enabled;
    }

    /// Suspends auto-commit until the returned guard is dropped.
    ///
    /// The guard dereferences to the archive. The previous setting is
    /// restored when the guard goes out of scope, including when a `?`
    /// returns early. Use [`AutocommitGuard::finish`] to restore and commit.
    pub fn suspend_autocommit(&mut self) -> AutocommitGuard<'_> {
        let previous = mem::replace(&mut self.autocommit, false);
        AutocommitGuard {
            archive: self,
            previous,
        }
    }

    /// Returns the mutations applied since the last commit.
    pub fn pending_operations(&self) -> &[Operation] {
        match &self.state {
            State::Open(store) => store.journal(),
            _ => &[],
        }
    }

    /// Reads an entry. Returns `None` if no entry with that name exists.
    pub fn get(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        self.store()?.read(name)
    }

    /// Returns whether an entry with this name exists.
    pub fn contains(&mut self, name: &str) -> Result<bool> {
        Ok(self.store()?.contains(name))
    }

    /// Adds an entry or replaces the content of an existing one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEntryName`] if `name` cannot be stored, or the
    /// error of a reader content that fails.
    pub fn set<'c>(&mut self, name: &str, content: impl Into<Content<'c>>) -> Result<()> {
        let name = EntryName::new(name)?;
        let store = self.store()?;
        let data = content.into().into_bytes()?;
        store.put(name, data);
        self.autocommit_if_enabled()
    }

    /// Removes entries by name. Missing names are ignored.
    ///
    /// Returns the names that were processed.
    pub fn remove<I, S>(&mut self, names: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let store = self.store()?;
        let mut processed = Vec::new();
        for name in names {
            let name = name.as_ref();
            store.remove(name);
            processed.push(name.to_string());
        }
        self.autocommit_if_enabled()?;
        Ok(processed)
    }

    /// Renames an entry and returns its old name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryNotFound`] if `from` does not exist and
    /// [`Error::EntryExists`] if another entry is already named `to`.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<String> {
        let to = EntryName::new(to)?;
        self.store()?.rename(from, to)?;
        self.autocommit_if_enabled()?;
        Ok(from.to_string())
    }

    /// Returns the entry names in archive order.
    ///
    /// Each call reflects the entries at the time of the call.
    pub fn names(&mut self) -> Result<impl Iterator<Item = &str> + '_> {
        Ok(self.store()?.names())
    }

    /// Calls `f` with every entry name, in archive order.
    pub fn for_each_name<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&str),
    {
        for name in self.names()? {
            f(name);
        }
        Ok(())
    }

    /// Returns all entry names.
    pub fn paths(&mut self) -> Result<Vec<String>> {
        Ok(self.names()?.map(str::to_string).collect())
    }

    /// Returns the number of entries.
    pub fn len(&mut self) -> Result<usize> {
        Ok(self.store()?.len())
    }

    /// Returns whether the archive has no entries.
    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Flushes pending changes to the backing file.
    ///
    /// Does nothing on a handle that was never opened.
    pub fn commit(&mut self) -> Result<CommitSummary> {
        match &mut self.state {
            State::Unopened => Ok(CommitSummary::default()),
            State::Open(store) => store.commit(),
            State::Closed => Err(Error::Closed {
                path: self.path.get().cloned().unwrap_or_default(),
            }),
        }
    }

    /// Writes the archive to `target`.
    ///
    /// Returns `false` without touching the filesystem if the archive is
    /// empty. Otherwise pending changes are flushed and, if `target` is not
    /// the backing file itself (under any spelling or through links), the
    /// backing file is copied there. The backing file stays where it is.
    pub fn write_to(&mut self, target: impl AsRef<Path>) -> Result<bool> {
        if self.is_empty()? {
            return Ok(false);
        }
        self.store()?.commit()?;

        let target = target.as_ref();
        let path = self.path();
        if !is_same_file(path, target)? {
            fs::copy(path, target)?;
            log::debug!("Copied '{}' to '{}'", path.display(), target.display());
        }
        Ok(true)
    }

    /// Returns the complete archive file, or `None` if the archive is empty.
    pub fn data(&mut self) -> Result<Option<Vec<u8>>> {
        if self.is_empty()? {
            return Ok(None);
        }
        self.store()?.commit()?;
        Ok(Some(fs::read(self.path())?))
    }

    /// Writes the archive to its own path and releases the backing file.
    ///
    /// Returns whether anything was written (see [`write_to`](Self::write_to)).
    /// Closing a closed handle does nothing and returns `false`.
    pub fn close(&mut self) -> Result<bool> {
        if matches!(self.state, State::Closed) {
            return Ok(false);
        }

        let path = self.path().to_path_buf();
        let wrote = self.write_to(&path)?;
        if let State::Open(store) = mem::replace(&mut self.state, State::Closed) {
            store.close()?;
        }
        Ok(wrote)
    }

    /// Moves the archive to a new path.
    ///
    /// If the handle is open, pending changes are committed, the backing
    /// file is released and moved to `new_path`, and the next access reopens
    /// it there. A closed handle's file is moved as well. On a handle that
    /// was never opened this only records the new path.
    pub fn set_path(&mut self, new_path: impl Into<PathBuf>) -> Result<()> {
        let new_path = new_path.into();

        match mem::replace(&mut self.state, State::Unopened) {
            State::Unopened => {}
            State::Open(mut store) => {
                if let Err(e) = store.commit() {
                    self.state = State::Open(store);
                    return Err(e);
                }
                store.close()?;
                self.move_backing_file(&new_path)?;
            }
            State::Closed => self.move_backing_file(&new_path)?,
        }

        self.path = OnceCell::from(new_path);
        Ok(())
    }

    fn move_backing_file(&self, to: &Path) -> Result<()> {
        let Some(from) = self.path.get() else {
            return Ok(());
        };
        if !from.exists() || from == to {
            return Ok(());
        }

        match fs::rename(from, to) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                fs::copy(from, to)?;
                fs::remove_file(from)?;
            }
            Err(e) => return Err(e.into()),
        }
        log::debug!("Moved '{}' to '{}'", from.display(), to.display());
        Ok(())
    }

    fn store(&mut self) -> Result<&mut ZipStore> {
        if matches!(self.state, State::Unopened) {
            let store = ZipStore::open(self.path(), &self.options)?;
            self.state = State::Open(store);
        }

        match &mut self.state {
            State::Open(store) => Ok(store),
            _ => Err(Error::Closed {
                path: self.path.get().cloned().unwrap_or_default(),
            }),
        }
    }

    fn autocommit_if_enabled(&mut self) -> Result<()> {
        if self.autocommit {
            self.store()?.commit()?;
        }
        Ok(())
    }
}

/// Returns whether `target` resolves to the existing file at `path`.
fn is_same_file(path: &Path, target: &Path) -> io::Result<bool> {
    if path == target {
        return Ok(true);
    }
    if !target.exists() {
        return Ok(false);
    }
    Ok(path.canonicalize()? == target.canonicalize()?)
}

impl fmt::Debug for Archive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Archive")
            .field("path", &self.path.get())
            .field("autocommit", &self.autocommit)
            .field("state", &self.state())
            .finish()
    }
}

/// Scoped suspension of auto-commit, returned by
/// [`Archive::suspend_autocommit`].
///
/// ```rust,no_run
/// use zipmap::Archive;
///
/// # fn main() -> zipmap::Result<()> {
/// let mut zip = Archive::new();
/// {
///     let mut batch = zip.suspend_autocommit();
///     batch.set("a", "1")?;
///     batch.set("b", "2")?;
///     batch.finish()?;
/// }
/// assert!(zip.autocommit());
/// # Ok(())
/// # }
/// ```
pub struct AutocommitGuard<'a> {
    archive: &'a mut Archive,
    previous: bool,
}

impl AutocommitGuard<'_> {
    /// Restores the previous setting and, if that setting is enabled,
    /// commits everything written through the guard.
    pub fn finish(self) -> Result<()> {
        self.archive.autocommit = self.previous;
        if self.previous {
            self.archive.commit()?;
        }
        Ok(())
    }
}

impl Deref for AutocommitGuard<'_> {
    type Target = Archive;

    fn deref(&self) -> &Archive {
        &*self.archive
    }
}

impl DerefMut for AutocommitGuard<'_> {
    fn deref_mut(&mut self) -> &mut Archive {
        &mut *self.archive
    }
}

impl Drop for AutocommitGuard<'_> {
    fn drop(&mut self) {
        self.archive.autocommit = self.previous;
    }
}
