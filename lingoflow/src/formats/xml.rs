//! Event-reader helpers shared by the XML based formats.

use quick_xml::{
    Reader,
    events::{BytesStart, BytesText, Event},
};

use crate::error::Error;

/// Where the reader is relative to the document's root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RootState {
    Missing,
    Open,
    Closed,
}

impl RootState {
    /// Checks that the first element of the document is `<expected>`.
    pub(crate) fn open(start: &BytesStart, expected: &str) -> Result<(), Error> {
        if start.name().as_ref() == expected.as_bytes() {
            Ok(())
        } else {
            Err(Error::invalid_resource(format!(
                "expected <{}> root element, found <{}>",
                expected,
                String::from_utf8_lossy(start.name().as_ref())
            )))
        }
    }

    /// Turns the final state into an error unless the root was opened and
    /// closed exactly once.
    pub(crate) fn finish(self, expected: &str) -> Result<(), Error> {
        match self {
            RootState::Closed => Ok(()),
            RootState::Missing => Err(Error::invalid_resource(format!(
                "missing <{}> root element",
                expected
            ))),
            RootState::Open => Err(unexpected_eof(expected)),
        }
    }
}

pub(crate) fn unexpected_eof(element: &str) -> Error {
    Error::invalid_resource(format!("unexpected end of document inside <{}>", element))
}

pub(crate) fn content_after_root(expected: &str) -> Error {
    Error::invalid_resource(format!("content after closing </{}>", expected))
}

/// Whitespace around the root element is allowed; any other text is not.
pub(crate) fn reject_text_outside_root(text: &BytesText, expected: &str) -> Result<(), Error> {
    if text.iter().all(u8::is_ascii_whitespace) {
        Ok(())
    } else {
        Err(text_outside_root(expected))
    }
}

pub(crate) fn text_outside_root(expected: &str) -> Error {
    Error::invalid_resource(format!("text outside the <{}> root element", expected))
}

/// Looks up an attribute by its qualified name and returns the unescaped value.
pub(crate) fn attribute(start: &BytesStart, name: &[u8]) -> Result<Option<String>, Error> {
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Like [`attribute`], but a missing attribute is an error.
pub(crate) fn required_attribute(
    start: &BytesStart,
    name: &[u8],
    element: &str,
) -> Result<String, Error> {
    attribute(start, name)?.ok_or_else(|| {
        Error::invalid_resource(format!(
            "{} tag missing '{}'",
            element,
            String::from_utf8_lossy(name)
        ))
    })
}

/// Reads the text content of the element whose start tag was just consumed,
/// up to and including its end tag.
///
/// Text split by comments, CDATA sections or nested markup is concatenated.
/// The result is not trimmed.
pub(crate) fn read_text_content(reader: &mut Reader<&[u8]>, element: &str) -> Result<String, Error> {
    let mut text = String::new();
    let mut depth = 0usize;
    loop {
        match reader.read_event()? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => break,
            Event::End(_) => depth -= 1,
            Event::Eof => return Err(unexpected_eof(element)),
            _ => {}
        }
    }
    Ok(text)
}

/// Consumes an element the caller is not interested in, including its
/// children.
pub(crate) fn skip_element(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<(), Error> {
    reader.read_to_end(start.name())?;
    Ok(())
}
