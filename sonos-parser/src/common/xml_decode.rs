//! XML decoding utilities.
//!
//! Sonos payloads mix several namespaces (`dc:`, `upnp:`, `r:`) and frequently
//! arrive entity-escaped inside another XML document. Prefixes are removed
//! before handing the text to serde so struct definitions can use bare local
//! names.

use std::borrow::Cow;

use crate::error::{ParseError, ParseResult};
use serde::de::DeserializeOwned;

/// Parse XML string into a deserializable type with namespace stripping.
pub fn parse<T: DeserializeOwned>(xml: &str) -> ParseResult<T> {
    let stripped = strip_namespaces(xml);
    quick_xml::de::from_str(&stripped)
        .map_err(|e| ParseError::XmlDeserializationFailed(e.to_string()))
}

/// Undo one level of entity escaping when the payload is still escaped.
///
/// `&lt;DIDL-Lite ...&gt;` becomes `<DIDL-Lite ...>`; text that already
/// starts with a tag is returned untouched.
pub fn unescape_if_escaped(xml: &str) -> ParseResult<Cow<'_, str>> {
    let trimmed = xml.trim_start();
    if trimmed.starts_with("&lt;") {
        quick_xml::escape::unescape(trimmed).map_err(|e| ParseError::InvalidEscape(e.to_string()))
    } else {
        Ok(Cow::Borrowed(xml))
    }
}

/// Strip namespace prefixes from element and attribute names.
///
/// `xmlns` declarations are dropped entirely. Text content, comments,
/// processing instructions and quoted attribute values are copied verbatim.
///
/// # Example
///
/// Input: `<e:propertyset><dc:title>Song</dc:title></e:propertyset>`
/// Output: `<propertyset><title>Song</title></propertyset>`
pub fn strip_namespaces(xml: &str) -> String {
    let bytes = xml.as_bytes();
    let mut out = String::with_capacity(xml.len());
    let mut pos = 0;

    while let Some(offset) = xml[pos..].find('<') {
        let start = pos + offset;
        out.push_str(&xml[pos..start]);

        match bytes.get(start + 1) {
            Some(b'?') | Some(b'!') => {
                let end = find_from(xml, start, '>').map_or(xml.len(), |e| e + 1);
                out.push_str(&xml[start..end]);
                pos = end;
            }
            _ => pos = copy_tag(xml, start, &mut out),
        }
    }

    out.push_str(&xml[pos..]);
    out
}

fn find_from(xml: &str, from: usize, needle: char) -> Option<usize> {
    xml[from..].find(needle).map(|i| from + i)
}

fn is_name_end(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'>' | b'/' | b'=')
}

fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// Copy one start or end tag beginning at `start` (a `<`), returning the index after it.
fn copy_tag(xml: &str, start: usize, out: &mut String) -> usize {
    let bytes = xml.as_bytes();
    let mut i = start + 1;
    out.push('<');

    if bytes.get(i) == Some(&b'/') {
        out.push('/');
        i += 1;
    }

    let name_start = i;
    while i < bytes.len() && !is_name_end(bytes[i]) {
        i += 1;
    }
    out.push_str(local_name(&xml[name_start..i]));

    while i < bytes.len() {
        match bytes[i] {
            b'>' => {
                out.push('>');
                return i + 1;
            }
            b'/' => {
                out.push('/');
                i += 1;
            }
            b if b.is_ascii_whitespace() => {
                out.push(b as char);
                i += 1;
            }
            _ => {
                let attr_start = i;
                while i < bytes.len() && !is_name_end(bytes[i]) {
                    i += 1;
                }
                let attr_name = &xml[attr_start..i];

                let value_end = attribute_value_end(xml, i);
                let is_declaration = attr_name == "xmlns" || attr_name.starts_with("xmlns:");
                if !is_declaration {
                    out.push_str(local_name(attr_name));
                    out.push_str(&xml[i..value_end]);
                }
                i = value_end;
            }
        }
    }

    bytes.len()
}

/// End of `="value"` starting at `from`; returns `from` when no value follows.
fn attribute_value_end(xml: &str, from: usize) -> usize {
    let bytes = xml.as_bytes();
    let mut i = from;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if bytes.get(i) != Some(&b'=') {
        return from;
    }
    i += 1;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    match bytes.get(i) {
        Some(&quote) if quote == b'"' || quote == b'\'' => {
            find_from(xml, i + 1, quote as char).map_or(xml.len(), |end| end + 1)
        }
        _ => i,
    }
}
