//! Support for Android `strings.xml` resources.
//!
//! `<string>` elements map one-to-one to entries. Each `<item>` of a
//! `<string-array name="N">` becomes an entry keyed `N[i]`. Export writes
//! every entry as a flat `<string>`, so arrays do not survive a round trip:
//! `N[0]` comes back as a plain string named `N[0]`. `<plurals>` are skipped.
//! Entries exported with `translatable = false` are written with
//! `translatable="false"`.

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use tracing::{debug, trace};

use crate::{
    error::Error,
    formats::{
        FormatType,
        xml::{self, RootState},
    },
    options::ParseOptions,
    traits::{FormatCodec, decode_text},
    types::{CanonicalEntry, ExportEntry, array_item_key, split_array_item_key},
};

const ROOT: &str = "resources";
const INDENT: usize = 4;

/// Codec for Android `strings.xml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Format;

impl FormatCodec for Format {
    fn format_type(&self) -> FormatType {
        FormatType::AndroidStrings
    }

    fn parse_with(
        &self,
        content: &[u8],
        options: &ParseOptions,
    ) -> Result<Vec<CanonicalEntry>, Error> {
        let text = decode_text(content)?;
        let resources = parse_resources(&text)?;

        let mut entries = Vec::with_capacity(resources.len());
        for resource in resources {
            if !resource.is_translatable() && !options.include_non_translatable {
                trace!(key = %resource.name, "skipping non-translatable string");
                continue;
            }
            entries.push(resource.into_entry());
        }
        debug!(entries = entries.len(), "parsed Android string resources");
        Ok(entries)
    }

    fn export(&self, entries: &[ExportEntry]) -> Result<Vec<u8>, Error> {
        let mut xml_writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Start(BytesStart::new(ROOT)))?;

        for (index, entry) in entries.iter().enumerate() {
            let name = entry.require_key(index)?;
            if let Some((array, position)) = split_array_item_key(name) {
                trace!(%array, position, "writing array item as a flat string");
            }

            let mut elem = BytesStart::new("string");
            elem.push_attribute(("name", name));
            if !entry.translatable {
                elem.push_attribute(("translatable", "false"));
            }
            xml_writer.write_event(Event::Start(elem))?;
            // Always write the text event, even when empty, so `</string>` stays inline.
            xml_writer.write_event(Event::Text(BytesText::new(entry.resolved_value())))?;
            xml_writer.write_event(Event::End(BytesEnd::new("string")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new(ROOT)))?;

        let mut out = xml_writer.into_inner();
        out.push(b'\n');
        debug!(entries = entries.len(), "exported Android string resources");
        Ok(out)
    }
}

/// One `<string>` or array `<item>` as read from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringResource {
    pub name: String,
    pub value: String,
    /// The `translatable` attribute, if present.
    pub translatable: Option<bool>,
}

impl StringResource {
    /// Only the literal `translatable="false"` opts a string out.
    pub fn is_translatable(&self) -> bool {
        self.translatable != Some(false)
    }

    fn into_entry(self) -> CanonicalEntry {
        let translatable = self.is_translatable();
        CanonicalEntry {
            key: self.name,
            value: self.value.trim().to_string(),
            description: None,
            translatable,
        }
    }
}

/// Reads every `<string>` and array item in document order, including
/// non-translatable ones.
fn parse_resources(text: &str) -> Result<Vec<StringResource>, Error> {
    let mut xml_reader = Reader::from_str(text);
    let mut resources = Vec::new();
    let mut root = RootState::Missing;

    loop {
        match xml_reader.read_event()? {
            Event::Start(ref e) => match root {
                RootState::Missing => {
                    RootState::open(e, ROOT)?;
                    root = RootState::Open;
                }
                RootState::Open => match e.name().as_ref() {
                    b"string" => {
                        let (name, translatable) = string_attributes(e)?;
                        let value = xml::read_text_content(&mut xml_reader, "string")?;
                        resources.push(StringResource {
                            name,
                            value,
                            translatable,
                        });
                    }
                    b"string-array" => {
                        let name = xml::required_attribute(e, b"name", "string-array")?;
                        parse_string_array(&mut xml_reader, &name, &mut resources)?;
                    }
                    _ => xml::skip_element(&mut xml_reader, e)?,
                },
                RootState::Closed => return Err(xml::content_after_root(ROOT)),
            },
            Event::Empty(ref e) => match root {
                RootState::Missing => {
                    RootState::open(e, ROOT)?;
                    root = RootState::Closed;
                }
                RootState::Open => {
                    if e.name().as_ref() == b"string" {
                        let (name, translatable) = string_attributes(e)?;
                        resources.push(StringResource {
                            name,
                            value: String::new(),
                            translatable,
                        });
                    } else if e.name().as_ref() == b"string-array" {
                        xml::required_attribute(e, b"name", "string-array")?;
                    }
                }
                RootState::Closed => return Err(xml::content_after_root(ROOT)),
            },
            // Children are consumed by their own readers, so the only end tag
            // seen here closes the root.
            Event::End(_) => root = RootState::Closed,
            Event::Eof => break,
            Event::Text(ref t) if root != RootState::Open => {
                xml::reject_text_outside_root(t, ROOT)?
            }
            Event::CData(_) if root != RootState::Open => {
                return Err(xml::text_outside_root(ROOT));
            }
            _ => {}
        }
    }

    root.finish(ROOT)?;
    Ok(resources)
}

fn string_attributes(e: &BytesStart) -> Result<(String, Option<bool>), Error> {
    let name = xml::required_attribute(e, b"name", "string")?;
    let translatable = xml::attribute(e, b"translatable")?.map(|v| v != "false");
    Ok((name, translatable))
}

fn parse_string_array(
    xml_reader: &mut Reader<&[u8]>,
    name: &str,
    resources: &mut Vec<StringResource>,
) -> Result<(), Error> {
    let mut index = 0;
    loop {
        match xml_reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == b"item" => {
                let value = xml::read_text_content(xml_reader, "item")?;
                resources.push(item_resource(name, index, value));
                index += 1;
            }
            Event::Empty(ref e) if e.name().as_ref() == b"item" => {
                resources.push(item_resource(name, index, String::new()));
                index += 1;
            }
            Event::Start(ref e) => xml::skip_element(xml_reader, e)?,
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(xml::unexpected_eof("string-array")),
            _ => {}
        }
    }
}

fn item_resource(name: &str, index: usize, value: String) -> StringResource {
    StringResource {
        name: array_item_key(name, index),
        value,
        translatable: None,
    }
}
