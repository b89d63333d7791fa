//! Shared XML helpers for the spreadsheet reader and writer.
//!
//! Attribute lookups handle namespace-prefixed keys and UTF-8 conversion
//! safely; text helpers collect element content with entity unescaping.

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;
use std::io::BufRead;

/// Extract a string attribute value by key.
///
/// Returns `None` if the attribute is missing or not valid UTF-8.
pub fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return std::str::from_utf8(&attr.value).ok().map(|s| s.to_string());
        }
    }
    None
}

/// Extract a string attribute by local name (ignoring namespace prefix).
///
/// Used for `r:id` style attributes whose prefix varies between producers.
pub fn attr_string_local(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == key {
            return std::str::from_utf8(&attr.value).ok().map(|s| s.to_string());
        }
    }
    None
}

/// Decode a text node, unescaping entities only when needed.
pub fn decode_text(text: &BytesText) -> Option<String> {
    let raw: &[u8] = text;
    if raw.contains(&b'&') {
        text.unescape().ok().map(|s| s.into_owned())
    } else {
        std::str::from_utf8(raw).ok().map(ToString::to_string)
    }
}

/// Collect all text until the end tag named `end` (local name).
///
/// Nested elements are walked through; their text is concatenated.
pub fn read_text_until<R: BufRead>(xml: &mut Reader<R>, end: &[u8]) -> String {
    let mut out = String::new();
    let mut buf = Vec::new();
    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Text(ref t)) => {
                if let Some(s) = decode_text(t) {
                    out.push_str(&s);
                }
            }
            Ok(Event::CData(ref c)) => {
                out.push_str(&String::from_utf8_lossy(c));
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == end => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    out
}

/// Minimal XML escaping for attribute/text content.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
