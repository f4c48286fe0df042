/// This module provides the [`CodecRegistry`], which maps a [`FormatType`]
/// to the [`FormatCodec`] that reads and writes it, plus path based helpers
/// that pick the codec from a file extension.
///
/// Call sites look codecs up here instead of branching on the format, so a
/// new format only needs a codec implementation and a registry entry.
///
use std::{collections::BTreeMap, path::Path};

use tracing::debug;

use crate::{
    error::Error,
    formats::{FormatType, infer_format_from_path},
    options::ParseOptions,
    traits::FormatCodec,
    types::{CanonicalEntry, ExportEntry},
};

/// A set of codecs keyed by format.
pub struct CodecRegistry {
    codecs: BTreeMap<FormatType, Box<dyn FormatCodec>>,
}

impl CodecRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        CodecRegistry {
            codecs: BTreeMap::new(),
        }
    }

    /// Creates a registry holding the built-in codec of every [`FormatType`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for format in FormatType::ALL {
            registry.register(format.codec());
        }
        registry
    }

    /// Registers a codec under the format it reports, returning the codec it
    /// replaced, if any.
    pub fn register(&mut self, codec: Box<dyn FormatCodec>) -> Option<Box<dyn FormatCodec>> {
        self.codecs.insert(codec.format_type(), codec)
    }

    /// Looks up the codec for a format.
    pub fn get(&self, format: FormatType) -> Result<&dyn FormatCodec, Error> {
        self.codecs
            .get(&format)
            .map(|codec| codec.as_ref())
            .ok_or_else(|| Error::UnknownFormat(format.to_string()))
    }

    /// Looks up the codec for a format identifier such as `"android"` or `"resx"`.
    pub fn get_by_name(&self, name: &str) -> Result<&dyn FormatCodec, Error> {
        self.get(name.parse()?)
    }

    /// Looks up the codec for a file, based on its extension.
    pub fn for_path<P: AsRef<Path>>(&self, path: P) -> Result<&dyn FormatCodec, Error> {
        let format = infer_format_from_path(&path).ok_or_else(|| {
            Error::UnknownFormat(format!(
                "Cannot infer format from extension: {:?}",
                path.as_ref().extension()
            ))
        })?;
        self.get(format)
    }

    /// Registered formats, in a stable order.
    pub fn formats(&self) -> impl Iterator<Item = FormatType> + '_ {
        self.codecs.keys().copied()
    }

    /// Reads a file with the codec its extension selects.
    pub fn read_file<P: AsRef<Path>>(
        &self,
        path: P,
        options: &ParseOptions,
    ) -> Result<Vec<CanonicalEntry>, Error> {
        let path = path.as_ref();
        let codec = self.for_path(path)?;
        debug!(path = %path.display(), format = %codec.format_type(), "reading localization file");
        codec.read_from_with(path, options)
    }

    /// Writes a file with the codec its extension selects.
    pub fn write_file<P: AsRef<Path>>(&self, path: P, entries: &[ExportEntry]) -> Result<(), Error> {
        let path = path.as_ref();
        let codec = self.for_path(path)?;
        debug!(path = %path.display(), format = %codec.format_type(), "writing localization file");
        codec.write_to(path, entries)
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Convert a localization file from one format to another.
///
/// Parsed values become the exported source text; descriptions are carried
/// where the output format supports them.
///
/// # Errors
///
/// Returns an `Error` if reading, parsing, or writing fails.
///
/// # Example
///
/// ```rust,no_run
/// use lingoflow::{convert, formats::FormatType};
/// convert(
///     "values/strings.xml",
///     FormatType::AndroidStrings,
///     "Strings.resx",
///     FormatType::Resx,
/// )?;
/// # Ok::<(), lingoflow::Error>(())
/// ```
pub fn convert<P: AsRef<Path>>(
    input: P,
    input_format: FormatType,
    output: P,
    output_format: FormatType,
) -> Result<(), Error> {
    let registry = CodecRegistry::with_defaults();
    let entries = registry.get(input_format)?.read_from(input.as_ref())?;
    let entries: Vec<ExportEntry> = entries.into_iter().map(ExportEntry::from).collect();
    registry.get(output_format)?.write_to(output.as_ref(), &entries)
}

/// Convert a localization file from one format to another, inferring formats
/// from file extensions.
///
/// # Example
///
/// ```rust,no_run
/// use lingoflow::convert_auto;
/// convert_auto("values/strings.xml", "Strings.resx")?;
/// # Ok::<(), lingoflow::Error>(())
/// ```
pub fn convert_auto<P: AsRef<Path>>(input: P, output: P) -> Result<(), Error> {
    let registry = CodecRegistry::with_defaults();
    let entries = registry.read_file(&input, &ParseOptions::default())?;
    let entries: Vec<ExportEntry> = entries.into_iter().map(ExportEntry::from).collect();
    registry.write_file(&output, &entries)
}
