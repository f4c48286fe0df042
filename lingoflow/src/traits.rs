//! The codec contract every localization file format implements.

use std::{borrow::Cow, fs, path::Path};

use encoding_rs::{Encoding, UTF_8};

use crate::{
    error::Error,
    formats::FormatType,
    options::ParseOptions,
    types::{CanonicalEntry, ExportEntry},
};

/// Parses one file format into canonical entries and exports entries back.
///
/// Implementations hold no mutable state, so a single instance can be shared
/// freely between threads (see [`crate::CodecRegistry`]).
///
/// # Example
///
/// ```rust
/// use lingoflow::{ExportEntry, formats::AndroidStringsFormat, traits::FormatCodec};
///
/// let xml = AndroidStringsFormat.export_to_string(&[ExportEntry::new("hello", "Hello")])?;
/// let entries = AndroidStringsFormat.parse_str(&xml)?;
/// assert_eq!(entries[0].key, "hello");
/// assert_eq!(entries[0].value, "Hello");
/// # Ok::<(), lingoflow::Error>(())
/// ```
pub trait FormatCodec: Send + Sync {
    /// The format this codec reads and writes.
    fn format_type(&self) -> FormatType;

    /// Parse raw file content, in document order.
    ///
    /// Fails on structurally invalid input; no partial result is returned.
    fn parse_with(
        &self,
        content: &[u8],
        options: &ParseOptions,
    ) -> Result<Vec<CanonicalEntry>, Error>;

    /// Serialize entries. Identical input always yields identical bytes.
    fn export(&self, entries: &[ExportEntry]) -> Result<Vec<u8>, Error>;

    /// Parse with default options.
    fn parse(&self, content: &[u8]) -> Result<Vec<CanonicalEntry>, Error> {
        self.parse_with(content, &ParseOptions::default())
    }

    /// Parse from a string.
    fn parse_str(&self, content: &str) -> Result<Vec<CanonicalEntry>, Error> {
        self.parse(content.as_bytes())
    }

    /// Export to a UTF-8 string.
    fn export_to_string(&self, entries: &[ExportEntry]) -> Result<String, Error> {
        String::from_utf8(self.export(entries)?).map_err(|e| Error::Encoding(e.to_string()))
    }

    /// Parse from file path.
    fn read_from(&self, path: &Path) -> Result<Vec<CanonicalEntry>, Error> {
        self.read_from_with(path, &ParseOptions::default())
    }

    /// Parse from file path with explicit options.
    fn read_from_with(
        &self,
        path: &Path,
        options: &ParseOptions,
    ) -> Result<Vec<CanonicalEntry>, Error> {
        let content = fs::read(path)?;
        self.parse_with(&content, options)
    }

    /// Write to file path.
    fn write_to(&self, path: &Path, entries: &[ExportEntry]) -> Result<(), Error> {
        let content = self.export(entries)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}

/// Decodes file bytes to text, honouring a UTF-8 or UTF-16 byte order mark.
///
/// Input without a BOM must be UTF-8.
pub(crate) fn decode_text(content: &[u8]) -> Result<Cow<'_, str>, Error> {
    let (encoding, bom_length) = Encoding::for_bom(content).unwrap_or((UTF_8, 0));
    encoding
        .decode_without_bom_handling_and_without_replacement(&content[bom_length..])
        .ok_or_else(|| Error::Encoding(format!("input is not valid {}", encoding.name())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_utf8() {
        assert_eq!(decode_text("héllo".as_bytes()).unwrap(), "héllo");
    }

    #[test]
    fn test_decode_strips_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"<root/>");
        assert_eq!(decode_text(&bytes).unwrap(), "<root/>");
    }

    #[test]
    fn test_decode_utf16le_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "<a/>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode_text(&bytes).unwrap(), "<a/>");
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let err = decode_text(&[0x3C, 0xFF, 0xFE, 0x3E, 0x80]).unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
        assert!(err.is_format_error());
    }
}
