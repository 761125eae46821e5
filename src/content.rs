//! Entry content accepted by [`Archive::set`](crate::Archive::set).
//!
//! Content is resolved from the caller's input type through `From`
//! conversions, so most call sites never name [`Content`] directly:
//!
//! ```rust,no_run
//! use std::io::Cursor;
//! use zipmap::{Archive, Content};
//!
//! # fn main() -> zipmap::Result<()> {
//! let mut zip = Archive::new();
//! zip.set("readme.txt", "Thank you for reading me.")?;
//! zip.set("blob.bin", vec![0u8, 1, 2])?;
//! zip.set("stream.txt", Content::reader(Cursor::new("from a reader")))?;
//! zip.set("answer.txt", Content::display(&42))?;
//! # Ok(())
//! # }
//! ```

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Read};

/// The content of an entry to be written.
pub enum Content<'a> {
    /// UTF-8 text, stored as its bytes.
    Text(Cow<'a, str>),
    /// Raw bytes.
    Bytes(Cow<'a, [u8]>),
    /// A reader that is consumed until it reports end of input.
    Reader(Box<dyn Read + 'a>),
}

impl<'a> Content<'a> {
    /// Creates text content.
    pub fn text(text: impl Into<Cow<'a, str>>) -> Self {
        Content::Text(text.into())
    }

    /// Creates content that is read from `reader` until exhausted.
    pub fn reader(reader: impl Read + 'a) -> Self {
        Content::Reader(Box::new(reader))
    }

    /// Creates text content from the [`Display`](fmt::Display) form of a value.
    pub fn display(value: &impl fmt::Display) -> Content<'static> {
        Content::Text(Cow::Owned(value.to_string()))
    }

    /// Resolves the content into the bytes that will be stored.
    ///
    /// Readers are drained here; an error from the reader is returned as-is.
    pub fn into_bytes(self) -> io::Result<Vec<u8>> {
        match self {
            Content::Text(text) => Ok(text.into_owned().into_bytes()),
            Content::Bytes(bytes) => Ok(bytes.into_owned()),
            Content::Reader(mut reader) => {
                let mut buf = Vec::with_capacity(crate::READ_BUFFER_SIZE);
                reader.read_to_end(&mut buf)?;
                Ok(buf)
            }
        }
    }
}

impl fmt::Debug for Content<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Content::Bytes(bytes) => f
                .debug_struct("Bytes")
                .field("len", &bytes.len())
                .finish(),
            Content::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

impl<'a> From<&'a str> for Content<'a> {
    fn from(text: &'a str) -> Self {
        Content::Text(Cow::Borrowed(text))
    }
}

impl<'a> From<&'a String> for Content<'a> {
    fn from(text: &'a String) -> Self {
        Content::Text(Cow::Borrowed(text.as_str()))
    }
}

impl From<String> for Content<'static> {
    fn from(text: String) -> Self {
        Content::Text(Cow::Owned(text))
    }
}

impl<'a> From<&'a [u8]> for Content<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Content::Bytes(Cow::Borrowed(bytes))
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Content<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Content::Bytes(Cow::Borrowed(bytes.as_slice()))
    }
}

impl<'a> From<&'a Vec<u8>> for Content<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Content::Bytes(Cow::Borrowed(bytes.as_slice()))
    }
}

impl From<Vec<u8>> for Content<'static> {
    fn from(bytes: Vec<u8>) -> Self {
        Content::Bytes(Cow::Owned(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_text_content() {
        let content = Content::from("bar");
        assert_eq!(content.into_bytes().unwrap(), b"bar");
    }

    #[test]
    fn test_bytes_content() {
        let content = Content::from(b"\x00\xffdata");
        assert_eq!(content.into_bytes().unwrap(), b"\x00\xffdata");
    }

    #[test]
    fn test_reader_is_drained() {
        let data = "x".repeat(crate::READ_BUFFER_SIZE * 3 + 7);
        let content = Content::reader(Cursor::new(data.clone()));
        assert_eq!(content.into_bytes().unwrap(), data.as_bytes());
    }

    #[test]
    fn test_reader_error_propagates() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("broken pipe"))
            }
        }

        let err = Content::reader(Failing).into_bytes().unwrap_err();
        assert_eq!(err.to_string(), "broken pipe");
    }

    #[test]
    fn test_display_content() {
        assert_eq!(Content::display(&3.5).into_bytes().unwrap(), b"3.5");
    }

    #[test]
    fn test_debug_hides_payload() {
        let content = Content::from(vec![1u8; 64]);
        assert_eq!(format!("{:?}", content), "Bytes { len: 64 }");
    }
}
