//! Header-addressed view over a worksheet.
//!
//! The first non-empty row is the header. Column lookup ignores case and
//! whitespace differences, so `"Roll  No"` and `" roll no"` both find
//! `Roll No`. Only rows holding cells are visited, and data rows keep only
//! the cells under a header column.

use crate::error::{Result, SeatplanError};
use crate::types::Sheet;

/// Normalize a header name for comparison: lower-case, single spaces, trimmed.
pub fn normalize_header(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// One data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// 1-based spreadsheet row number.
    pub line: u32,
    /// Non-blank values as `(column, text)`, in column order.
    values: Vec<(u32, String)>,
}

impl TableRow {
    /// Trimmed, non-blank value at a column index.
    pub fn get(&self, column: usize) -> Option<&str> {
        let column = u32::try_from(column).ok()?;
        self.values
            .binary_search_by_key(&column, |(c, _)| *c)
            .ok()
            .and_then(|i| self.values.get(i))
            .map(|(_, v)| v.as_str())
    }

    /// Value at an optional column index.
    pub fn get_opt(&self, column: Option<usize>) -> Option<&str> {
        column.and_then(|c| self.get(c))
    }
}

/// A sheet split into header and data rows.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<TableRow>,
}

impl Table {
    /// Build a table from a sheet. Fails when the sheet has no content at all.
    pub fn from_sheet(sheet: &Sheet) -> Result<Self> {
        let mut used = sheet.used_rows();
        let header_values = used
            .by_ref()
            .map(|r| sheet.row_values(r, sheet.max_col))
            .find(|values| !values.is_empty())
            .ok_or_else(|| {
                SeatplanError::Schema(format!("sheet '{}' has no header row", sheet.name))
            })?;

        // Header width: one past the last non-empty header cell
        let width = header_values.last().map_or(0, |(c, _)| c.saturating_add(1));
        let mut headers = vec![String::new(); width as usize];
        for (c, text) in &header_values {
            if let Some(slot) = headers.get_mut(*c as usize) {
                *slot = normalize_header(text);
            }
        }

        let rows = used
            .filter_map(|r| {
                let values = sheet.row_values(r, width);
                (!values.is_empty()).then(|| TableRow {
                    line: r.saturating_add(1),
                    values,
                })
            })
            .collect();
        Ok(Self { headers, rows })
    }

    /// Index of a column by header name.
    pub fn column(&self, name: &str) -> Option<usize> {
        let wanted = normalize_header(name);
        self.headers.iter().position(|h| *h == wanted)
    }

    /// Indices of required columns, in the order asked.
    ///
    /// Missing columns are reported together in one schema error.
    pub fn require<const N: usize>(&self, names: [&str; N]) -> Result<[usize; N]> {
        let mut out = [0usize; N];
        let mut missing = Vec::new();
        for (slot, name) in out.iter_mut().zip(names) {
            match self.column(name) {
                Some(idx) => *slot = idx,
                None => missing.push(name),
            }
        }
        if missing.is_empty() {
            Ok(out)
        } else {
            Err(SeatplanError::Schema(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )))
        }
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }
}
