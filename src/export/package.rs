//! Assemble a minimal XLSX package around generated worksheet XML.

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

use crate::error::Result;
use crate::types::Sheet;
use crate::xml_helpers::xml_escape;

use super::sheet_writer::write_sheet_xml;

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

fn content_types_xml(sheet_count: usize) -> String {
    let mut out = String::from(XML_HEADER);
    out.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    out.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    out.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    out.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    for n in 1..=sheet_count {
        out.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
    }
    out.push_str("</Types>");
    out
}

fn root_rels_xml() -> String {
    let mut out = String::from(XML_HEADER);
    out.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    out.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#);
    out.push_str("</Relationships>");
    out
}

fn workbook_xml(sheets: &[Sheet]) -> String {
    let mut out = String::from(XML_HEADER);
    out.push_str(r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#);
    for (n, sheet) in (1..).zip(sheets) {
        out.push_str(&format!(
            r#"<sheet name="{}" sheetId="{n}" r:id="rId{n}"/>"#,
            xml_escape(&sheet.name)
        ));
    }
    out.push_str("</sheets></workbook>");
    out
}

fn workbook_rels_xml(sheet_count: usize) -> String {
    let mut out = String::from(XML_HEADER);
    out.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for n in 1..=sheet_count {
        out.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{n}.xml"/>"#
        ));
    }
    out.push_str("</Relationships>");
    out
}

/// Write `sheets` as a new XLSX file.
///
/// Returns the file as `Vec<u8>`.
pub(crate) fn write_xlsx(sheets: &[Sheet]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut parts: Vec<(String, String)> = vec![
        ("[Content_Types].xml".into(), content_types_xml(sheets.len())),
        ("_rels/.rels".into(), root_rels_xml()),
        ("xl/workbook.xml".into(), workbook_xml(sheets)),
        (
            "xl/_rels/workbook.xml.rels".into(),
            workbook_rels_xml(sheets.len()),
        ),
    ];
    for (n, sheet) in (1..).zip(sheets) {
        parts.push((format!("xl/worksheets/sheet{n}.xml"), write_sheet_xml(sheet)));
    }

    for (name, xml) in parts {
        writer.start_file(name, options)?;
        writer.write_all(xml.as_bytes())?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}
