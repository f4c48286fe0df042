//! Support for headerless CSV files of `key,value[,description]` rows.
//!
//! CSV has no notion of non-translatable strings, so every parsed entry is
//! translatable.
use tracing::debug;

use crate::{
    error::Error,
    formats::FormatType,
    options::ParseOptions,
    traits::{FormatCodec, decode_text},
    types::{CanonicalEntry, ExportEntry},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CSVRecord {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
}

impl CSVRecord {
    fn from_row(row: &csv::StringRecord, line: u64) -> Result<Self, Error> {
        let key = row.get(0).unwrap_or_default();
        if key.is_empty() {
            return Err(Error::invalid_resource(format!(
                "CSV row on line {} has no key",
                line
            )));
        }
        Ok(CSVRecord {
            key: key.to_string(),
            value: row.get(1).unwrap_or_default().to_string(),
            description: row
                .get(2)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        })
    }
}

impl From<CSVRecord> for CanonicalEntry {
    fn from(record: CSVRecord) -> Self {
        CanonicalEntry {
            key: record.key,
            value: record.value,
            description: record.description,
            translatable: true,
        }
    }
}

/// Codec for CSV files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Format;

impl FormatCodec for Format {
    fn format_type(&self) -> FormatType {
        FormatType::Csv
    }

    fn parse_with(
        &self,
        content: &[u8],
        _options: &ParseOptions,
    ) -> Result<Vec<CanonicalEntry>, Error> {
        let text = decode_text(content)?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut entries = Vec::new();
        for result in rdr.records() {
            let row = result?;
            let line = row.position().map_or(0, |p| p.line());
            entries.push(CSVRecord::from_row(&row, line)?.into());
        }
        debug!(entries = entries.len(), "parsed CSV rows");
        Ok(entries)
    }

    fn export(&self, entries: &[ExportEntry]) -> Result<Vec<u8>, Error> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        for (index, entry) in entries.iter().enumerate() {
            let key = entry.require_key(index)?;
            wtr.write_record([
                key,
                entry.resolved_value(),
                entry.non_empty_description().unwrap_or_default(),
            ])?;
        }
        wtr.into_inner().map_err(|e| Error::Io(e.into_error()))
    }
}
