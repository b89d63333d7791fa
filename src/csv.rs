//! Minimal CSV/TSV parser that produces a [`Workbook`] with a single sheet.

use crate::types::{Cell, CellType, Sheet, Workbook, MAX_ROWS};

/// Delimiter for parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    fn separator(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Tab => '\t',
        }
    }

    fn sheet_name(self) -> &'static str {
        match self {
            Self::Comma => "CSV",
            Self::Tab => "TSV",
        }
    }
}

/// Parse CSV/TSV bytes into a [`Workbook`] with one sheet.
///
/// Values are kept as typed (`007` stays `007`); numeric-looking fields are
/// tagged as numbers. A UTF-8 byte order mark is ignored.
pub fn parse_delimited(data: &[u8], delim: Delimiter) -> Workbook {
    let decoded = String::from_utf8_lossy(data);
    let text = decoded.strip_prefix('\u{feff}').unwrap_or(&decoded);
    let sep = delim.separator();

    let mut sheet = Sheet::new(delim.sheet_name());

    for (row, line) in (0..MAX_ROWS).zip(text.lines()) {
        if line.trim().is_empty() {
            continue;
        }
        for (col, field) in (0u32..).zip(split_csv_line(line, sep)) {
            let value = field.trim();
            if value.is_empty() {
                continue;
            }
            let t = if value.parse::<f64>().is_ok() {
                CellType::Number
            } else {
                CellType::String
            };
            sheet.push(
                row,
                col,
                Cell {
                    v: Some(value.to_string()),
                    t,
                },
            );
        }
    }
    sheet.rebuild_cell_index();

    Workbook {
        sheets: vec![sheet],
    }
}

/// Split a CSV line respecting quoted fields.
fn split_csv_line(line: &str, sep: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    // Escaped quote
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == sep {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);
    fields
}
