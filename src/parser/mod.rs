//! Spreadsheet reader
//!
//! Opens an upload as XLSX (ZIP package) or delimited text and produces a
//! [`Workbook`] of plain text cells.

mod relationships;
mod worksheet;

use std::io::Cursor;
use zip::ZipArchive;

use crate::csv::{parse_delimited, Delimiter};
use crate::error::{Result, SeatplanError};
use crate::types::Workbook;

use relationships::{get_sheet_info, parse_shared_strings, parse_workbook_relationships};
use worksheet::parse_sheet;

/// Local file header magic of a ZIP archive.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Container format of an uploaded spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Xlsx,
    Csv,
    Tsv,
}

impl SpreadsheetFormat {
    /// Sniff the format from the content, falling back to the file extension.
    pub fn detect(file_name: Option<&str>, data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(SeatplanError::Upstream("uploaded file is empty".into()));
        }
        if data.starts_with(ZIP_MAGIC) {
            return Ok(Self::Xlsx);
        }
        let ext = file_name
            .and_then(|n| n.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("tsv") => Ok(Self::Tsv),
            _ => Err(SeatplanError::Upstream(format!(
                "unsupported file format{}: expected .xlsx, .csv or .tsv",
                file_name.map(|n| format!(" for '{n}'")).unwrap_or_default()
            ))),
        }
    }
}

/// Parse an XLSX file from bytes.
pub fn parse(data: &[u8]) -> Result<Workbook> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    // Parse workbook relationships first to get actual file paths
    let relationships = parse_workbook_relationships(&mut archive);
    let shared_strings =
        parse_shared_strings(&mut archive, relationships.shared_strings.as_deref());
    let sheet_info = get_sheet_info(&mut archive, &relationships.worksheets)?;

    let mut sheets = Vec::with_capacity(sheet_info.len());
    for info in &sheet_info {
        sheets.push(parse_sheet(&mut archive, info, &shared_strings)?);
    }

    Ok(Workbook { sheets })
}

/// Read an uploaded spreadsheet of any supported format.
///
/// Every failure here is an upstream error: the upload is unreadable.
pub fn load_workbook(file_name: Option<&str>, data: &[u8]) -> Result<Workbook> {
    let format = SpreadsheetFormat::detect(file_name, data)?;
    let workbook = match format {
        SpreadsheetFormat::Xlsx => parse(data).map_err(|e| {
            SeatplanError::Upstream(format!("could not read spreadsheet: {e}"))
        })?,
        SpreadsheetFormat::Csv => parse_delimited(data, Delimiter::Comma),
        SpreadsheetFormat::Tsv => parse_delimited(data, Delimiter::Tab),
    };
    tracing::debug!(
        ?format,
        sheets = workbook.sheets.len(),
        cells = workbook.sheets.iter().map(|s| s.cells.len()).sum::<usize>(),
        "workbook loaded"
    );
    Ok(workbook)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format() {
        assert_eq!(
            SpreadsheetFormat::detect(Some("x.bin"), b"PK\x03\x04rest").unwrap(),
            SpreadsheetFormat::Xlsx
        );
        assert_eq!(
            SpreadsheetFormat::detect(Some("Students.CSV"), b"a,b").unwrap(),
            SpreadsheetFormat::Csv
        );
        assert_eq!(
            SpreadsheetFormat::detect(Some("rooms.tsv"), b"a\tb").unwrap(),
            SpreadsheetFormat::Tsv
        );
    }

    #[test]
    fn test_detect_rejects_empty_and_unknown() {
        let err = SpreadsheetFormat::detect(Some("a.xlsx"), b"").unwrap_err();
        assert!(err.is_upstream());
        let err = SpreadsheetFormat::detect(Some("a.pdf"), b"%PDF").unwrap_err();
        assert!(err.is_upstream());
        assert!(err.to_string().contains("a.pdf"));
        assert!(SpreadsheetFormat::detect(None, b"a,b").is_err());
    }

    #[test]
    fn test_corrupt_zip_is_upstream() {
        let err = load_workbook(Some("a.xlsx"), b"PK\x03\x04garbage").unwrap_err();
        assert!(err.is_upstream());
    }
}
