//! Support for .NET `.resx` resource files.
//!
//! Only `<data>` elements directly under `<root>` are read; the schema,
//! `resheader`, `assembly` and `metadata` elements are skipped. Values are
//! taken verbatim (`xml:space="preserve"`), without trimming.

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use tracing::debug;

use crate::{
    error::Error,
    formats::{
        FormatType,
        xml::{self, RootState},
    },
    options::ParseOptions,
    traits::{FormatCodec, decode_text},
    types::{CanonicalEntry, ExportEntry},
};

const ROOT: &str = "root";
const INDENT: usize = 2;

/// Namespace declarations written on `<root>`.
pub const ROOT_NAMESPACES: [(&str, &str); 2] = [
    ("xmlns:xsd", "http://www.w3.org/2001/XMLSchema"),
    ("xmlns:msdata", "urn:schemas-microsoft-com:xml-msdata"),
];

/// The `resheader` block every exported file starts with. Downstream .NET
/// tooling rejects files whose reader/writer identifiers differ.
pub const RESHEADERS: [(&str, &str); 4] = [
    ("resmimetype", "text/microsoft-resx"),
    ("version", "2.0"),
    (
        "reader",
        "System.Resources.ResXResourceReader, System.Windows.Forms, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089",
    ),
    (
        "writer",
        "System.Resources.ResXResourceWriter, System.Windows.Forms, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089",
    ),
];

/// Codec for `.resx` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Format;

impl FormatCodec for Format {
    fn format_type(&self) -> FormatType {
        FormatType::Resx
    }

    fn parse_with(
        &self,
        content: &[u8],
        _options: &ParseOptions,
    ) -> Result<Vec<CanonicalEntry>, Error> {
        let text = decode_text(content)?;
        let entries = parse_root(&text)?;
        debug!(entries = entries.len(), "parsed resx data entries");
        Ok(entries)
    }

    fn export(&self, entries: &[ExportEntry]) -> Result<Vec<u8>, Error> {
        let mut xml_writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        let mut root = BytesStart::new(ROOT);
        for namespace in ROOT_NAMESPACES {
            root.push_attribute(namespace);
        }
        xml_writer.write_event(Event::Start(root))?;

        for (name, value) in RESHEADERS {
            let mut header = BytesStart::new("resheader");
            header.push_attribute(("name", name));
            xml_writer.write_event(Event::Start(header))?;
            write_text_element(&mut xml_writer, "value", value)?;
            xml_writer.write_event(Event::End(BytesEnd::new("resheader")))?;
        }

        for (index, entry) in entries.iter().enumerate() {
            let name = entry.require_key(index)?;
            let mut data = BytesStart::new("data");
            data.push_attribute(("name", name));
            data.push_attribute(("xml:space", "preserve"));
            xml_writer.write_event(Event::Start(data))?;
            write_text_element(&mut xml_writer, "value", entry.resolved_value())?;
            if let Some(comment) = entry.non_empty_description() {
                write_text_element(&mut xml_writer, "comment", comment)?;
            }
            xml_writer.write_event(Event::End(BytesEnd::new("data")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new(ROOT)))?;

        let mut out = xml_writer.into_inner();
        out.push(b'\n');
        debug!(entries = entries.len(), "exported resx data entries");
        Ok(out)
    }
}

fn write_text_element(
    xml_writer: &mut Writer<Vec<u8>>,
    element: &str,
    text: &str,
) -> Result<(), Error> {
    xml_writer.write_event(Event::Start(BytesStart::new(element)))?;
    xml_writer.write_event(Event::Text(BytesText::new(text)))?;
    xml_writer.write_event(Event::End(BytesEnd::new(element)))?;
    Ok(())
}

fn parse_root(text: &str) -> Result<Vec<CanonicalEntry>, Error> {
    let mut xml_reader = Reader::from_str(text);
    let mut entries = Vec::new();
    let mut root = RootState::Missing;

    loop {
        match xml_reader.read_event()? {
            Event::Start(ref e) => match root {
                RootState::Missing => {
                    RootState::open(e, ROOT)?;
                    root = RootState::Open;
                }
                RootState::Open if e.name().as_ref() == b"data" => {
                    let name = xml::attribute(e, b"name")?;
                    let data = parse_data(&mut xml_reader)?;
                    // Nameless data elements carry nothing addressable.
                    if let Some(key) = name {
                        entries.push(data.into_entry(key));
                    }
                }
                RootState::Open => xml::skip_element(&mut xml_reader, e)?,
                RootState::Closed => return Err(xml::content_after_root(ROOT)),
            },
            Event::Empty(ref e) => match root {
                RootState::Missing => {
                    RootState::open(e, ROOT)?;
                    root = RootState::Closed;
                }
                RootState::Open if e.name().as_ref() == b"data" => {
                    if let Some(key) = xml::attribute(e, b"name")? {
                        entries.push(DataElement::default().into_entry(key));
                    }
                }
                RootState::Open => {}
                RootState::Closed => return Err(xml::content_after_root(ROOT)),
            },
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
    Ok(entries)
}

/// Children of one `<data>` element.
#[derive(Debug, Default)]
struct DataElement {
    value: Option<String>,
    comment: Option<String>,
}

impl DataElement {
    fn into_entry(self, key: String) -> CanonicalEntry {
        CanonicalEntry {
            key,
            value: self.value.unwrap_or_default(),
            description: self.comment,
            translatable: true,
        }
    }
}

fn parse_data(xml_reader: &mut Reader<&[u8]>) -> Result<DataElement, Error> {
    let mut data = DataElement::default();
    loop {
        match xml_reader.read_event()? {
            Event::Start(ref e) => match e.name().as_ref() {
                b"value" => data.value = Some(xml::read_text_content(xml_reader, "value")?),
                b"comment" => data.comment = Some(xml::read_text_content(xml_reader, "comment")?),
                _ => xml::skip_element(xml_reader, e)?,
            },
            Event::Empty(ref e) => match e.name().as_ref() {
                b"value" => data.value = Some(String::new()),
                b"comment" => data.comment = Some(String::new()),
                _ => {}
            },
            Event::End(_) => return Ok(data),
            Event::Eof => return Err(xml::unexpected_eof("data")),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const SAMPLE: &str = indoc! {r#"
        <?xml version="1.0" encoding="utf-8"?>
        <root>
          <xsd:schema id="root" xmlns="" xmlns:xsd="http://www.w3.org/2001/XMLSchema">
            <xsd:element name="root" msdata:IsDataSet="true">
              <xsd:complexType>
                <xsd:choice maxOccurs="unbounded">
                  <xsd:element name="data" />
                </xsd:choice>
              </xsd:complexType>
            </xsd:element>
          </xsd:schema>
          <resheader name="resmimetype">
            <value>text/microsoft-resx</value>
          </resheader>
          <data name="hello" xml:space="preserve">
            <value>Hi</value>
            <comment>greeting</comment>
          </data>
          <data name="bye" xml:space="preserve">
            <value>Bye</value>
          </data>
          <data name="no_value" />
          <data xml:space="preserve">
            <value>nameless</value>
          </data>
        </root>
    "#};

    #[test]
    fn test_parse_data_entries() {
        let entries = Format.parse_str(SAMPLE).unwrap();
        assert_eq!(
            entries,
            vec![
                CanonicalEntry::new("hello", "Hi").with_description("greeting"),
                CanonicalEntry::new("bye", "Bye"),
                CanonicalEntry::new("no_value", ""),
            ]
        );
    }

    #[test]
    fn test_parse_preserves_whitespace() {
        let xml = r#"<root><data name="pad" xml:space="preserve"><value>  padded  </value></data></root>"#;
        assert_eq!(Format.parse_str(xml).unwrap()[0].value, "  padded  ");
    }

    #[test]
    fn test_parse_empty_root() {
        assert!(Format.parse_str("<root/>").unwrap().is_empty());
    }

    #[test]
    fn test_missing_root() {
        let err = Format.parse_str("").unwrap_err();
        assert!(err.is_format_error());
        let err = Format
            .parse_str(r#"<resources><string name="a">A</string></resources>"#)
            .unwrap_err();
        assert!(err.to_string().contains("expected <root> root element"));
    }

    #[test]
    fn test_text_outside_root_is_rejected() {
        let err = Format.parse_str("<root></root>trailing text").unwrap_err();
        assert!(err.is_format_error());
        assert!(err.to_string().contains("text outside the <root> root element"));
        assert!(Format.parse_str("stray<root/>").unwrap_err().is_format_error());
        assert!(Format.parse_str("<root></root>\n").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_xml() {
        let xml = r#"<root><data name="a"><value>A</value></data><data name="b"><value>B</root>"#;
        let err = Format.parse_str(xml).unwrap_err();
        assert!(err.is_format_error());

        let truncated = r#"<root><data name="a"><value>A</value></data><data name="b"#;
        assert!(Format.parse_str(truncated).unwrap_err().is_format_error());
    }

    #[test]
    fn test_export_layout() {
        let entries = vec![
            ExportEntry::new("hello", "Hi").with_description("greeting"),
            ExportEntry::new("bye", "Bye").with_target("Au revoir").with_description(""),
        ];
        let xml = Format.export_to_string(&entries).unwrap();
        let expected = indoc! {r#"
            <?xml version="1.0" encoding="utf-8"?>
            <root xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:msdata="urn:schemas-microsoft-com:xml-msdata">
              <resheader name="resmimetype">
                <value>text/microsoft-resx</value>
              </resheader>
              <resheader name="version">
                <value>2.0</value>
              </resheader>
              <resheader name="reader">
                <value>System.Resources.ResXResourceReader, System.Windows.Forms, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089</value>
              </resheader>
              <resheader name="writer">
                <value>System.Resources.ResXResourceWriter, System.Windows.Forms, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089</value>
              </resheader>
              <data name="hello" xml:space="preserve">
                <value>Hi</value>
                <comment>greeting</comment>
              </data>
              <data name="bye" xml:space="preserve">
                <value>Au revoir</value>
              </data>
            </root>
        "#};
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_comment_round_trip() {
        let entries = vec![
            ExportEntry::new("hello", "Hi").with_description("greeting"),
            ExportEntry::new("plain", "Plain"),
        ];
        let xml = Format.export_to_string(&entries).unwrap();
        assert_eq!(xml.matches("<comment>").count(), 1);

        let parsed = Format.parse_str(&xml).unwrap();
        assert_eq!(parsed[0].description.as_deref(), Some("greeting"));
        assert_eq!(parsed[1].description, None);
    }

    #[test]
    fn test_export_empty_value_stays_inline() {
        let xml = Format
            .export_to_string(&[ExportEntry::new("blank", "")])
            .unwrap();
        assert!(xml.contains("<value></value>"));
        assert_eq!(Format.parse_str(&xml).unwrap()[0].value, "");
    }

    #[test]
    fn test_export_missing_key() {
        let err = Format.export(&[ExportEntry::new("", "x")]).unwrap_err();
        assert!(matches!(err, Error::MissingKey { index: 0 }));
    }

    #[test]
    fn test_utf16_input() {
        let xml = r#"<root><data name="k"><value>Grüße</value></data></root>"#;
        let mut bytes = vec![0xFE, 0xFF];
        for unit in xml.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        let entries = Format.parse(&bytes).unwrap();
        assert_eq!(entries[0].value, "Grüße");
    }
}
