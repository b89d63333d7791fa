use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Cell, CellData};

/// Largest row count a worksheet may address.
pub const MAX_ROWS: u32 = 1_048_576;

/// Largest column count a worksheet may address.
pub const MAX_COLS: u32 = 16_384;

/// A parsed spreadsheet upload (XLSX or delimited text)
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// The first sheet in workbook order, if any.
    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }
}

/// Find a sheet by name, ignoring case and surrounding whitespace.
pub fn find_sheet<'a>(sheets: &'a [Sheet], name: &str) -> Option<&'a Sheet> {
    let wanted = name.trim();
    sheets
        .iter()
        .find(|s| s.name.trim().eq_ignore_ascii_case(wanted))
}

/// A single worksheet
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub name: String,
    /// Sparse representation: Vec of (row, col, cell)
    pub cells: Vec<CellData>,
    /// Row index for ordered row access (not serialized). Only rows with
    /// cells have an entry.
    #[serde(skip)]
    pub(crate) cells_by_row: BTreeMap<u32, Vec<usize>>,
    /// One past the last used row
    pub max_row: u32,
    /// One past the last used column
    pub max_col: u32,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a cell, growing the used range as needed.
    ///
    /// Cells outside the worksheet limits are dropped.
    pub fn push(&mut self, r: u32, c: u32, cell: Cell) {
        if r >= MAX_ROWS || c >= MAX_COLS {
            return;
        }
        self.max_row = self.max_row.max(r.saturating_add(1));
        self.max_col = self.max_col.max(c.saturating_add(1));
        self.cells.push(CellData { r, c, cell });
    }

    /// Rebuild the per-row cell index.
    ///
    /// Must be called after cells are appended; rows are kept in column order.
    pub fn rebuild_cell_index(&mut self) {
        let mut by_row: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (idx, cd) in self.cells.iter().enumerate() {
            by_row.entry(cd.r).or_default().push(idx);
        }
        for row in by_row.values_mut() {
            row.sort_by_key(|&idx| self.cells.get(idx).map_or(0, |cd| cd.c));
        }
        self.cells_by_row = by_row;
    }

    /// Indices of rows holding at least one cell, ascending.
    pub fn used_rows(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells_by_row.keys().copied()
    }

    /// Cells of one row in column order.
    pub fn row_cells(&self, row: u32) -> impl Iterator<Item = &CellData> {
        self.cells_by_row
            .get(&row)
            .into_iter()
            .flatten()
            .filter_map(|&idx| self.cells.get(idx))
    }

    /// Trimmed non-blank values of one row as `(column, text)`, in column order.
    ///
    /// Columns at or past `width` are left out.
    pub fn row_values(&self, row: u32, width: u32) -> Vec<(u32, String)> {
        self.row_cells(row)
            .filter(|cd| cd.c < width)
            .filter_map(|cd| cd.cell.text().map(|t| (cd.c, t.to_string())))
            .collect()
    }

    /// Look up a single cell value.
    pub fn cell_text(&self, row: u32, col: u32) -> Option<&str> {
        self.row_cells(row)
            .find(|cd| cd.c == col)
            .and_then(|cd| cd.cell.text())
    }
}
