//! Options and configuration for archive handles.

use std::path::PathBuf;

use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// Compression method used for new entries when none is configured.
///
/// `Deflated` when the `deflate` feature is enabled, `Stored` otherwise.
#[cfg(feature = "deflate")]
pub const DEFAULT_COMPRESSION: CompressionMethod = CompressionMethod::Deflated;

/// Compression method used for new entries when none is configured.
///
/// `Deflated` when the `deflate` feature is enabled, `Stored` otherwise.
#[cfg(not(feature = "deflate"))]
pub const DEFAULT_COMPRESSION: CompressionMethod = CompressionMethod::Stored;

/// Configuration for an [`Archive`](crate::Archive).
///
/// Every field is optional; unset fields take their defaults. Initial entry
/// data is never part of the options, so an entry may be named like any
/// option without being mistaken for one.
///
/// # Example
///
/// ```rust
/// use zipmap::{ArchiveOptions, CompressionMethod};
///
/// let options = ArchiveOptions::new()
///     .path("my.zip")
///     .autocommit(false)
///     .compression(CompressionMethod::Stored);
///
/// assert!(!options.is_autocommit());
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    /// Backing file path. A temporary path is generated when `None`.
    pub path: Option<PathBuf>,
    /// Flush to disk after every mutation. Default: `true`.
    pub autocommit: Option<bool>,
    /// Compression method for entries written through the handle.
    pub compression: Option<CompressionMethod>,
    /// Compression level passed to the backing library.
    ///
    /// `None` uses the method's default level.
    pub compression_level: Option<i64>,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveOptions {
    /// Creates options with every field unset.
    pub fn new() -> Self {
        Self {
            path: None,
            autocommit: None,
            compression: None,
            compression_level: None,
        }
    }

    /// Sets the backing file path.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Enables or disables auto-commit.
    pub fn autocommit(mut self, enabled: bool) -> Self {
        self.autocommit = Some(enabled);
        self
    }

    /// Sets the compression method for new entries.
    pub fn compression(mut self, method: CompressionMethod) -> Self {
        self.compression = Some(method);
        self
    }

    /// Sets the compression level for new entries.
    pub fn compression_level(mut self, level: i64) -> Self {
        self.compression_level = Some(level);
        self
    }

    /// Returns the effective auto-commit setting.
    pub fn is_autocommit(&self) -> bool {
        self.autocommit.unwrap_or(true)
    }

    /// Returns the effective compression method.
    pub fn compression_method(&self) -> CompressionMethod {
        self.compression.unwrap_or(DEFAULT_COMPRESSION)
    }

    /// Builds the per-entry options handed to the `zip` writer.
    pub(crate) fn file_options(&self) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(self.compression_method())
            .compression_level(self.compression_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ArchiveOptions::default();
        assert!(options.path.is_none());
        assert!(options.is_autocommit());
        assert_eq!(options.compression_method(), DEFAULT_COMPRESSION);
        assert!(options.compression_level.is_none());
    }

    #[test]
    fn test_builder() {
        let options = ArchiveOptions::new()
            .path("out.zip")
            .autocommit(false)
            .compression(CompressionMethod::Stored)
            .compression_level(3);

        assert_eq!(options.path.as_deref(), Some(std::path::Path::new("out.zip")));
        assert!(!options.is_autocommit());
        assert_eq!(options.compression_method(), CompressionMethod::Stored);
        assert_eq!(options.compression_level, Some(3));
    }

    #[cfg(feature = "deflate")]
    #[test]
    fn test_default_compression_is_deflate() {
        assert_eq!(DEFAULT_COMPRESSION, CompressionMethod::Deflated);
    }
}
