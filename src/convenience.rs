//! One-shot operations on archive paths.
//!
//! Each function opens a handle, acts, and closes it again. They are
//! shortcuts for the common "read one thing" and "change one thing" cases:
//!
//! ```rust,no_run
//! use zipmap::convenience;
//!
//! # fn main() -> zipmap::Result<()> {
//! convenience::create("my.zip", [("foo", "bar")])?;
//! convenience::write_entry("my.zip", "baz", "qux")?;
//!
//! assert_eq!(convenience::list("my.zip")?, vec!["foo", "baz"]);
//! assert_eq!(convenience::read("my.zip", "foo")?.as_deref(), Some(&b"bar"[..]));
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::Path;

use crate::{Archive, ArchiveOptions, Content, Error, Result};

/// MIME type of ZIP archives, for serving [`render`] output.
pub const MIME_TYPE: &str = "application/zip";

/// Creates an archive at `path` with `entries` and closes it.
///
/// Any existing file at `path` is replaced. Returns the closed handle.
pub fn create<'c, P, I, K, V>(path: P, entries: I) -> Result<Archive>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<Content<'c>>,
{
    create_with(path, ArchiveOptions::new(), entries, |_| Ok(()))
}

/// Creates an archive at `path`, lets `configure` customize it, and closes it.
///
/// Any existing file at `path` is replaced. The `path` field of `options`
/// is ignored in favor of `path`.
///
/// ```rust,no_run
/// use zipmap::{ArchiveOptions, convenience};
///
/// # fn main() -> zipmap::Result<()> {
/// let zip = convenience::create_with(
///     "test.zip",
///     ArchiveOptions::new(),
///     [("a", "1")],
///     |zip| zip.set("b", "2"),
/// )?;
/// assert_eq!(zip.path(), std::path::Path::new("test.zip"));
/// # Ok(())
/// # }
/// ```
pub fn create_with<'c, P, I, K, V, F>(
    path: P,
    options: ArchiveOptions,
    entries: I,
    configure: F,
) -> Result<Archive>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<Content<'c>>,
    F: FnOnce(&mut Archive) -> Result<()>,
{
    let path = path.as_ref();
    if path.exists() {
        fs::remove_file(path)?;
        log::debug!("Removed existing '{}'", path.display());
    }

    let mut zip = Archive::from_entries(options.path(path), entries)?;
    configure(&mut zip)?;
    zip.close()?;
    Ok(zip)
}

/// Opens the existing archive at `path`.
///
/// # Errors
///
/// Returns [`Error::ArchiveNotFound`] if there is no file at `path`.
pub fn open(path: impl AsRef<Path>) -> Result<Archive> {
    open_with_options(path, ArchiveOptions::new())
}

/// Opens the existing archive at `path` with `options`.
///
/// The `path` field of `options` is ignored in favor of `path`.
pub fn open_with_options(path: impl AsRef<Path>, options: ArchiveOptions) -> Result<Archive> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::ArchiveNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(Archive::with_options(options.path(path)))
}

/// Opens the existing archive at `path`, runs `f`, and closes it.
///
/// The archive is closed only if `f` succeeds; the value `f` returns is
/// passed through.
pub fn open_and<T, F>(path: impl AsRef<Path>, f: F) -> Result<T>
where
    F: FnOnce(&mut Archive) -> Result<T>,
{
    let mut zip = open(path)?;
    let value = f(&mut zip)?;
    zip.close()?;
    Ok(value)
}

/// Calls `f` with the name and content of every entry in the archive at
/// `path`, in archive order.
pub fn for_each<F>(path: impl AsRef<Path>, mut f: F) -> Result<()>
where
    F: FnMut(&str, Vec<u8>),
{
    open_and(path, |zip| {
        for name in zip.paths()? {
            if let Some(content) = zip.get(&name)? {
                f(&name, content);
            }
        }
        Ok(())
    })
}

/// Returns the entry names of the archive at `path`.
pub fn list(path: impl AsRef<Path>) -> Result<Vec<String>> {
    open_and(path, |zip| zip.paths())
}

/// Reads one entry of the archive at `path`.
///
/// Returns `None` if the archive has no such entry.
pub fn read(path: impl AsRef<Path>, entry: &str) -> Result<Option<Vec<u8>>> {
    open_and(path, |zip| zip.get(entry))
}

/// Adds or replaces one entry of the existing archive at `path`.
pub fn write_entry<'c>(
    path: impl AsRef<Path>,
    entry: &str,
    content: impl Into<Content<'c>>,
) -> Result<()> {
    open_and(path, |zip| zip.set(entry, content))
}

/// Builds an archive in a temporary file and returns its bytes.
///
/// `configure` populates the archive. Returns `None` if it added no
/// entries. The temporary file is removed afterwards, also when
/// `configure` fails.
///
/// ```rust,no_run
/// use zipmap::convenience::{self, MIME_TYPE};
///
/// # fn main() -> zipmap::Result<()> {
/// let body = convenience::render(|zip| {
///     zip.set("report.csv", "id,total\n1,42\n")?;
///     zip.set("README", "generated")
/// })?;
/// if let Some(body) = body {
///     println!("{} bytes of {}", body.len(), MIME_TYPE);
/// }
/// # Ok(())
/// # }
/// ```
pub fn render<F>(configure: F) -> Result<Option<Vec<u8>>>
where
    F: FnOnce(&mut Archive) -> Result<()>,
{
    let mut zip = Archive::with_options(ArchiveOptions::new().autocommit(false));
    let path = zip.path().to_path_buf();

    let rendered = render_into(&mut zip, configure);
    drop(zip);

    let cleanup = if path.exists() {
        fs::remove_file(&path)
    } else {
        Ok(())
    };
    let data = rendered?;
    cleanup?;
    Ok(data)
}

fn render_into<F>(zip: &mut Archive, configure: F) -> Result<Option<Vec<u8>>>
where
    F: FnOnce(&mut Archive) -> Result<()>,
{
    configure(zip)?;
    let data = zip.data()?;
    zip.close()?;
    Ok(data)
}
