//! Test fixtures for generating rosters and room matrices in memory.
//!
//! Builds real XLSX packages (shared strings, numeric cells, several sheets)
//! and CSV text so loaders can be driven with known inputs.
//!
//! # Example
//!
//! ```rust
//! use fixtures::{SheetBuilder, XlsxBuilder};
//!
//! let xlsx = XlsxBuilder::new()
//!     .sheet(SheetBuilder::new("Students").row(["Roll No", "Name"]).row(["7", "Ann"]))
//!     .build();
//!
//! let workbook = seatplan::parser::parse(&xlsx).unwrap();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::cast_possible_truncation
)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

// ============================================================================
// Cell Value
// ============================================================================

/// A cell value written to a fixture sheet.
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Stored in the shared string table.
    String(String),
    /// Stored inline (`t="inlineStr"`).
    InlineString(String),
    Number(f64),
    /// Skipped: no `<c>` element is written.
    Empty,
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::String(s.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::from(s.as_str())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

// ============================================================================
// Sheet Builder
// ============================================================================

/// Builder for one worksheet, filled row by row from A1.
#[derive(Debug, Clone, Default)]
pub struct SheetBuilder {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetBuilder {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    #[must_use]
    pub fn row<V: Into<CellValue>, I: IntoIterator<Item = V>>(mut self, values: I) -> Self {
        self.rows.push(values.into_iter().map(Into::into).collect());
        self
    }

    /// Append an empty row.
    #[must_use]
    pub fn blank_row(mut self) -> Self {
        self.rows.push(Vec::new());
        self
    }
}

// ============================================================================
// XLSX Builder
// ============================================================================

/// Builder for a complete XLSX package.
#[derive(Debug, Clone, Default)]
pub struct XlsxBuilder {
    sheets: Vec<SheetBuilder>,
}

impl XlsxBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sheet(mut self, sheet: SheetBuilder) -> Self {
        self.sheets.push(sheet);
        self
    }

    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let mut shared_strings: Vec<String> = Vec::new();
        for sheet in &self.sheets {
            for value in sheet.rows.iter().flatten() {
                if let CellValue::String(s) = value {
                    if !shared_strings.contains(s) {
                        shared_strings.push(s.clone());
                    }
                }
            }
        }

        let mut parts = vec![
            (
                "[Content_Types].xml".to_string(),
                generate_content_types(self.sheets.len()),
            ),
            ("_rels/.rels".to_string(), generate_rels()),
            (
                "xl/_rels/workbook.xml.rels".to_string(),
                generate_workbook_rels(self.sheets.len()),
            ),
            ("xl/workbook.xml".to_string(), generate_workbook(&self.sheets)),
            (
                "xl/sharedStrings.xml".to_string(),
                generate_shared_strings(&shared_strings),
            ),
        ];
        for (i, sheet) in self.sheets.iter().enumerate() {
            parts.push((
                format!("xl/worksheets/sheet{}.xml", i + 1),
                generate_sheet_xml(sheet, &shared_strings),
            ));
        }

        for (name, xml) in parts {
            zip.start_file(name, options).expect("start zip entry");
            zip.write_all(xml.as_bytes()).expect("write zip entry");
        }
        zip.finish().expect("Failed to finish ZIP").into_inner()
    }
}

/// A roster workbook with the standard header and the given rows.
#[must_use]
pub fn roster_xlsx(rows: &[(&str, &str, &str)]) -> Vec<u8> {
    let mut sheet = SheetBuilder::new("Students").row(["Roll No", "Name", "Class"]);
    for (roll, name, class) in rows {
        sheet = sheet.row([*roll, *name, *class]);
    }
    XlsxBuilder::new().sheet(sheet).build()
}

/// A roster as CSV text with the standard header.
#[must_use]
pub fn roster_csv(rows: &[(&str, &str, &str)]) -> String {
    let mut out = String::from("Roll No,Name,Class\n");
    for (roll, name, class) in rows {
        out.push_str(&format!("{roll},{name},{class}\n"));
    }
    out
}

// ============================================================================
// XML Generators
// ============================================================================

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn column_letters(mut col: u32) -> String {
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    out.reverse();
    String::from_utf8(out).unwrap()
}

fn generate_content_types(sheet_count: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#,
    );
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn generate_rels() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#
        .to_string()
}

fn generate_workbook_rels(sheet_count: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{i}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{i}.xml"/>"#
        ));
    }
    xml.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
        sheet_count + 1
    ));
    xml.push_str("</Relationships>");
    xml
}

fn generate_workbook(sheets: &[SheetBuilder]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    for (i, sheet) in sheets.iter().enumerate() {
        xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(&sheet.name),
            i + 1,
            i + 1
        ));
    }
    xml.push_str("</sheets></workbook>");
    xml
}

fn generate_shared_strings(strings: &[String]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
        strings.len()
    );
    for s in strings {
        xml.push_str(&format!(
            r#"<si><t xml:space="preserve">{}</t></si>"#,
            escape(s)
        ));
    }
    xml.push_str("</sst>");
    xml
}

fn generate_sheet_xml(sheet: &SheetBuilder, shared_strings: &[String]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in sheet.rows.iter().enumerate() {
        if row.iter().all(|v| matches!(v, CellValue::Empty)) {
            continue;
        }
        xml.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, value) in row.iter().enumerate() {
            let cell_ref = format!("{}{}", column_letters(c as u32), r + 1);
            match value {
                CellValue::String(s) => {
                    let idx = shared_strings.iter().position(|x| x == s).unwrap();
                    xml.push_str(&format!(r#"<c r="{cell_ref}" t="s"><v>{idx}</v></c>"#));
                }
                CellValue::InlineString(s) => xml.push_str(&format!(
                    r#"<c r="{cell_ref}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    escape(s)
                )),
                CellValue::Number(n) => {
                    xml.push_str(&format!(r#"<c r="{cell_ref}"><v>{n}</v></c>"#));
                }
                CellValue::Empty => {}
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}
