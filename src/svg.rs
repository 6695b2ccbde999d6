//! Inspection of the output tree MathJax serializes.
//!
//! The tree is read as XML and elements are matched by tag name, so a
//! container element around the `<svg>` (MathJax adds `<mjx-container>`)
//! and nested `<svg>` children are handled structurally.

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

use crate::Result;

/// Attribute MathJax sets on a node that failed to typeset.
pub const ERROR_ATTRIBUTE: &[u8] = b"data-mjx-error";

/// Message of the first non-empty `data-mjx-error` annotation in document order.
pub fn find_error(tree: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(tree);
    loop {
        match reader.read_event()? {
            Event::Start(element) | Event::Empty(element) => {
                if let Some(message) = error_annotation(&reader, &element)? {
                    return Ok(Some(message));
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn error_annotation(reader: &Reader<&[u8]>, element: &BytesStart) -> Result<Option<String>> {
    for attribute in element.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        if attribute.key.as_ref() != ERROR_ATTRIBUTE {
            continue;
        }
        let message = attribute
            .decode_and_unescape_value(reader.decoder())
            .map_err(quick_xml::Error::from)?;
        if !message.is_empty() {
            return Ok(Some(message.into_owned()));
        }
    }
    Ok(None)
}

fn is_svg(element: &BytesStart) -> bool {
    element.local_name().as_ref() == b"svg"
}

/// The first `<svg>` element of `tree`, verbatim, or `None` if there is none.
pub fn extract_svg(tree: &str) -> Result<Option<&str>> {
    let mut reader = Reader::from_str(tree);
    let mut start = None;
    let mut depth = 0usize;
    loop {
        let offset = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(element) => {
                if start.is_none() && is_svg(&element) {
                    start = Some(offset);
                }
                if start.is_some() {
                    depth += 1;
                }
            }
            Event::Empty(element) if start.is_none() && is_svg(&element) => {
                let end = reader.buffer_position() as usize;
                return Ok(Some(&tree[offset..end]));
            }
            Event::End(_) => {
                if let Some(start) = start {
                    depth -= 1;
                    if depth == 0 {
                        let end = reader.buffer_position() as usize;
                        return Ok(Some(&tree[start..end]));
                    }
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}
