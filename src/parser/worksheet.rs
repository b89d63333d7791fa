//! Worksheet parsing - reads `<sheetData>` of one sheet XML into a [`Sheet`].

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::cell_ref::parse_cell_ref_bytes;
use crate::error::Result;
use crate::types::{format_number, Cell, CellType, Sheet};
use crate::xml_helpers::read_text_until;

use super::relationships::SheetInfo;

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Default,
}

pub(super) fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        b"e" => CellTypeTag::Error,
        b"str" => CellTypeTag::Str,
        b"inlineStr" => CellTypeTag::Inline,
        _ => CellTypeTag::Default,
    }
}

pub(super) fn parse_u32_bytes(value: &[u8]) -> Option<u32> {
    let mut num: u32 = 0;
    let mut seen = false;
    for &b in value {
        if !b.is_ascii_digit() {
            return None;
        }
        seen = true;
        num = num.saturating_mul(10).saturating_add(u32::from(b - b'0'));
    }
    if seen {
        Some(num)
    } else {
        None
    }
}

/// Turn the raw `<v>`/`<t>` content into a display cell.
pub(super) fn resolve_cell_value(
    raw: Option<&str>,
    tag: CellTypeTag,
    shared_strings: &[String],
) -> Option<Cell> {
    let raw = raw?;
    let cell = match tag {
        CellTypeTag::Shared => {
            let idx = raw.trim().parse::<usize>().ok()?;
            Cell::string(shared_strings.get(idx)?.clone())
        }
        CellTypeTag::Inline | CellTypeTag::Str => Cell::string(raw),
        CellTypeTag::Bool => Cell {
            v: Some(if raw.trim() == "1" { "TRUE" } else { "FALSE" }.to_string()),
            t: CellType::Boolean,
        },
        CellTypeTag::Error => Cell {
            v: Some(raw.to_string()),
            t: CellType::Error,
        },
        CellTypeTag::Default => match raw.trim().parse::<f64>() {
            Ok(n) => Cell {
                v: Some(format_number(n)),
                t: CellType::Number,
            },
            Err(_) => Cell::string(raw),
        },
    };
    Some(cell)
}

/// Read the children of a `<c>` element up to its end tag, returning the value text.
fn read_cell_value<R: std::io::BufRead>(
    xml: &mut Reader<R>,
    cell_buf: &mut Vec<u8>,
) -> Option<String> {
    let mut value = None;
    loop {
        cell_buf.clear();
        match xml.read_event_into(cell_buf) {
            Ok(Event::Start(ref inner)) => match inner.local_name().as_ref() {
                b"v" => value = Some(read_text_until(xml, b"v")),
                // Inline string container <is><t>text</t></is>
                b"is" => value = Some(read_text_until(xml, b"is")),
                // Formula text is not a value
                b"f" => {
                    read_text_until(xml, b"f");
                }
                _ => {}
            },
            Ok(Event::End(ref inner)) if inner.local_name().as_ref() == b"c" => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
    value
}

/// Parse a single worksheet
pub(super) fn parse_sheet<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    info: &SheetInfo,
    shared_strings: &[String],
) -> Result<Sheet> {
    let file = archive.by_name(&info.path)?;

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(false);

    let mut sheet = Sheet::new(info.name.clone());
    let mut buf = Vec::new();
    let mut cell_buf = Vec::new();
    // 0-based; rows and cells without an `r` attribute follow their predecessor
    let mut next_row: u32 = 0;
    let mut next_col: u32 = 0;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(ref event @ (Event::Start(_) | Event::Empty(_))) => {
                let (Event::Start(ref e) | Event::Empty(ref e)) = event else {
                    continue;
                };
                let is_start_event = matches!(event, Event::Start(_));

                match e.local_name().as_ref() {
                    b"row" => {
                        let explicit = e
                            .attributes()
                            .flatten()
                            .find(|a| a.key.as_ref() == b"r")
                            .and_then(|a| parse_u32_bytes(&a.value));
                        if let Some(r) = explicit.filter(|&r| r > 0) {
                            next_row = r - 1;
                        }
                        next_col = 0;
                    }
                    b"c" => {
                        let mut row = next_row;
                        let mut col = next_col;
                        let mut tag = CellTypeTag::Default;

                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"r" => {
                                    if let Some((c, r)) = parse_cell_ref_bytes(&attr.value) {
                                        col = c;
                                        row = r;
                                    }
                                }
                                b"t" => tag = parse_cell_type_tag(&attr.value),
                                _ => {}
                            }
                        }
                        next_col = col.saturating_add(1);

                        // Self-closing cells like <c r="A1"/> have no value
                        let value = if is_start_event {
                            read_cell_value(&mut xml, &mut cell_buf)
                        } else {
                            None
                        };

                        if let Some(cell) = resolve_cell_value(value.as_deref(), tag, shared_strings)
                        {
                            sheet.push(row, col, cell);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"row" => {
                next_row = next_row.saturating_add(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    sheet.rebuild_cell_index();
    Ok(sheet)
}
