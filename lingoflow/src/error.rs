//! All error types for the lingoflow crate.
//!
//! These are returned from every fallible operation: parsing, exporting,
//! registry lookups and the reference translation store.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("entry #{index} has no key")]
    MissingKey { index: usize },

    #[error("snapshot error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid locale `{0}`")]
    InvalidLocale(String),

    #[error("not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Returns `true` for errors caused by the content of a localization file
    /// (malformed markup, missing root element or required attribute, an
    /// export entry without a key).
    ///
    /// Callers importing a file must surface these and discard the whole
    /// document rather than writing partial data.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::XmlParse(_)
                | Error::XmlAttribute(_)
                | Error::CsvParse(_)
                | Error::Encoding(_)
                | Error::InvalidResource(_)
                | Error::MissingKey { .. }
        )
    }

    pub(crate) fn invalid_resource(message: impl Into<String>) -> Self {
        Error::InvalidResource(message.into())
    }
}
