//! All supported localization file formats for lingoflow.
//!
//! This module re-exports the codec for each format and provides the
//! [`FormatType`] enum that identifies formats across the crate.

pub mod android_strings;
pub mod csv;
pub mod resx;
pub(crate) mod xml;

use std::{
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

// Reexporting the formats for easier access
pub use android_strings::Format as AndroidStringsFormat;
pub use csv::CSVRecord;
pub use csv::Format as CsvFormat;
pub use resx::Format as ResxFormat;

use crate::{Error, traits::FormatCodec};

/// Identifies a supported localization file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormatType {
    /// Android `strings.xml`.
    AndroidStrings,
    /// .NET `.resx`.
    Resx,
    /// Headerless `key,value[,description]` CSV.
    Csv,
}

/// Implements [`std::fmt::Display`] for [`FormatType`].
///
/// # Example
/// ```rust
/// use lingoflow::formats::FormatType;
/// assert_eq!(FormatType::AndroidStrings.to_string(), "android");
/// assert_eq!(FormatType::Resx.to_string(), "resx");
/// assert_eq!(FormatType::Csv.to_string(), "csv");
/// ```
impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::AndroidStrings => write!(f, "android"),
            FormatType::Resx => write!(f, "resx"),
            FormatType::Csv => write!(f, "csv"),
        }
    }
}

/// Implements [`std::str::FromStr`] for [`FormatType`].
///
/// Accepts the following case-insensitive strings:
/// - `"android"`, `"androidstrings"`, `"xml"`, `"strings.xml"` → `FormatType::AndroidStrings`
/// - `"resx"` → `FormatType::Resx`
/// - `"csv"` → `FormatType::Csv`
///
/// Returns [`crate::error::Error::UnknownFormat`] for unknown strings.
///
/// # Example
/// ```rust
/// use lingoflow::formats::FormatType;
/// use std::str::FromStr;
/// assert_eq!(FormatType::from_str("Android").unwrap(), FormatType::AndroidStrings);
/// assert_eq!(FormatType::from_str("resx").unwrap(), FormatType::Resx);
/// assert!(FormatType::from_str("po").is_err());
/// ```
impl FromStr for FormatType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "android" | "androidstrings" | "xml" | "strings.xml" => Ok(FormatType::AndroidStrings),
            "resx" => Ok(FormatType::Resx),
            "csv" => Ok(FormatType::Csv),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl FormatType {
    /// Every supported format, in a stable order.
    pub const ALL: [FormatType; 3] = [FormatType::AndroidStrings, FormatType::Resx, FormatType::Csv];

    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::AndroidStrings => "xml",
            FormatType::Resx => "resx",
            FormatType::Csv => "csv",
        }
    }

    /// The built-in codec for this format.
    pub fn codec(&self) -> Box<dyn FormatCodec> {
        match self {
            FormatType::AndroidStrings => Box::new(AndroidStringsFormat),
            FormatType::Resx => Box::new(ResxFormat),
            FormatType::Csv => Box::new(CsvFormat),
        }
    }
}

/// Infers a [`FormatType`] from a file path's extension (case-insensitive).
///
/// # Example
/// ```rust
/// use lingoflow::formats::{FormatType, infer_format_from_path};
/// assert_eq!(infer_format_from_path("values-fr/strings.xml"), Some(FormatType::AndroidStrings));
/// assert_eq!(infer_format_from_path("Resources.de.resx"), Some(FormatType::Resx));
/// assert_eq!(infer_format_from_path("notes.txt"), None);
/// ```
pub fn infer_format_from_path<P: AsRef<Path>>(path: P) -> Option<FormatType> {
    let extension = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
    FormatType::ALL
        .into_iter()
        .find(|format| format.extension() == extension)
}
