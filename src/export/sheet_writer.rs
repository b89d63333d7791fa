//! Generates worksheet XML from a `Sheet` struct.
//!
//! Text cells use inline strings (`t="inlineStr"`) so no shared string
//! table is needed.

use crate::cell_ref::{cell_ref, col_to_letter};
use crate::types::{Cell, CellType, Sheet};
use crate::xml_helpers::xml_escape;

/// Write a complete worksheet XML string from a `Sheet`.
pub(crate) fn write_sheet_xml(sheet: &Sheet) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
    );
    out.push_str(
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );
    out.push('\n');

    // <dimension>
    if sheet.max_row > 0 && sheet.max_col > 0 {
        let end_col = col_to_letter(sheet.max_col - 1);
        out.push_str(&format!("<dimension ref=\"A1:{end_col}{}\"/>\n", sheet.max_row));
    }

    // <sheetData>
    out.push_str("<sheetData>\n");
    write_sheet_data(&mut out, sheet);
    out.push_str("</sheetData>\n");

    out.push_str("</worksheet>");
    out
}

/// Write all cell rows into `<sheetData>`, rows ascending and cells in column order.
fn write_sheet_data(out: &mut String, sheet: &Sheet) {
    for row in sheet.used_rows() {
        out.push_str(&format!("<row r=\"{}\">", u64::from(row) + 1));
        for cd in sheet.row_cells(row) {
            write_cell(out, cd.r, cd.c, &cd.cell);
        }
        out.push_str("</row>\n");
    }
}

/// Write a single `<c>` element.
fn write_cell(out: &mut String, row: u32, col: u32, cell: &Cell) {
    out.push_str(&format!("<c r=\"{}\"", cell_ref(col, row)));
    let value = cell.v.as_deref().unwrap_or_default();

    match cell.t {
        CellType::String => {
            out.push_str(" t=\"inlineStr\"><is><t xml:space=\"preserve\">");
            out.push_str(&xml_escape(value));
            out.push_str("</t></is>");
        }
        CellType::Number => {
            out.push('>');
            out.push_str(&format!("<v>{}</v>", xml_escape(value)));
        }
        CellType::Boolean => {
            let val = match value {
                "TRUE" | "true" | "1" => "1",
                _ => "0",
            };
            out.push_str(&format!(" t=\"b\"><v>{val}</v>"));
        }
        CellType::Error => {
            let val = if value.is_empty() { "#VALUE!" } else { value };
            out.push_str(&format!(" t=\"e\"><v>{}</v>", xml_escape(val)));
        }
    }

    out.push_str("</c>");
}
