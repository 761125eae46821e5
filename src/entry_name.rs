//! Entry name type with validation for names stored in a ZIP archive.

use crate::{Error, Result};
use std::fmt;

/// Maximum length for entry names (in bytes).
///
/// The ZIP local and central headers store the file name length in a 16-bit
/// field.
pub const MAX_NAME_LENGTH: usize = u16::MAX as usize;

/// A validated entry name.
///
/// Entry names are the keys of an archive. They are stored verbatim: no
/// normalization of separators or case is performed, so `"dir/file.txt"`
/// and `"dir\\file.txt"` are different entries.
///
/// A name is accepted when it:
/// - is not empty
/// - contains no NUL bytes
/// - is at most [`MAX_NAME_LENGTH`] bytes long
///
/// # Examples
///
/// ```
/// use zipmap::EntryName;
///
/// let name = EntryName::new("bar/bara.mp3").unwrap();
/// assert_eq!(name.as_str(), "bar/bara.mp3");
///
/// assert!(EntryName::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryName(String);

impl EntryName {
    /// Creates a new `EntryName` from a string, validating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEntryName`] if the name is empty, contains a
    /// NUL byte, or is too long to be stored.
    pub fn new(s: &str) -> Result<Self> {
        Self::validate(s)?;
        Ok(Self(s.to_string()))
    }

    fn validate(s: &str) -> Result<()> {
        if s.is_empty() {
            return Err(Error::InvalidEntryName("empty name".into()));
        }

        if s.contains('\0') {
            return Err(Error::InvalidEntryName("contains NUL byte".into()));
        }

        if s.len() > MAX_NAME_LENGTH {
            return Err(Error::InvalidEntryName(format!(
                "name exceeds maximum length of {} bytes",
                MAX_NAME_LENGTH
            )));
        }

        Ok(())
    }

    /// Returns the name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the name and returns the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for EntryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for EntryName {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for EntryName {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::validate(&s)?;
        Ok(Self(s))
    }
}

impl From<EntryName> for String {
    fn from(name: EntryName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_simple_name() {
        let name = EntryName::new("foo").unwrap();
        assert_eq!(name.as_str(), "foo");
        assert_eq!(name.to_string(), "foo");
    }

    #[test]
    fn test_valid_nested_name() {
        let name = EntryName::new("bar/bara.mp3").unwrap();
        assert_eq!(name.as_str(), "bar/bara.mp3");
    }

    #[test]
    fn test_valid_unicode() {
        let name = EntryName::new("日本語/файл.txt").unwrap();
        assert_eq!(name.as_str(), "日本語/файл.txt");
    }

    #[test]
    fn test_names_are_not_normalized() {
        let a = EntryName::new("dir/file").unwrap();
        let b = EntryName::new("dir\\file").unwrap();
        assert_ne!(a, b);
        assert!(EntryName::new("../up").is_ok());
        assert!(EntryName::new("/abs").is_ok());
    }

    #[test]
    fn test_directory_marker() {
        let name = EntryName::new("images/").unwrap();
        assert_eq!(name.as_str(), "images/");
    }

    #[test]
    fn test_invalid_empty() {
        let err = EntryName::new("").unwrap_err();
        assert!(matches!(err, Error::InvalidEntryName(_)));
    }

    #[test]
    fn test_invalid_nul_byte() {
        let err = EntryName::new("file\0.txt").unwrap_err();
        assert!(matches!(err, Error::InvalidEntryName(_)));
        assert!(err.to_string().contains("NUL"));
    }

    #[test]
    fn test_length_limit() {
        let max = "a".repeat(MAX_NAME_LENGTH);
        assert!(EntryName::new(&max).is_ok());

        let too_long = "a".repeat(MAX_NAME_LENGTH + 1);
        let err = EntryName::new(&too_long).unwrap_err();
        assert!(err.to_string().contains("maximum length"));
    }

    #[test]
    fn test_try_from_string() {
        let name = EntryName::try_from(String::from("readme")).unwrap();
        assert_eq!(String::from(name), "readme");
        assert!(EntryName::try_from(String::new()).is_err());
    }
}
