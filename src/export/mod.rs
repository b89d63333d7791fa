//! XLSX export pipeline.
//!
//! Produces fresh XLSX files, used for the downloadable input templates.
//! Files written here are readable by [`crate::parser`].

pub(crate) mod package;
pub(crate) mod sheet_writer;

use crate::error::Result;
use crate::types::{Cell, Sheet};

/// Downloadable input templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Students,
    RoomMatrix,
}

impl TemplateKind {
    /// Resolve a template from its file name (`students.xlsx`, `roomMatrix.xlsx`).
    pub fn from_file_name(name: &str) -> Option<Self> {
        match name.strip_suffix(".xlsx")? {
            "students" => Some(Self::Students),
            "roomMatrix" => Some(Self::RoomMatrix),
            _ => None,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Students => "students.xlsx",
            Self::RoomMatrix => "roomMatrix.xlsx",
        }
    }

    fn sheet_name(&self) -> &'static str {
        match self {
            Self::Students => "Students",
            Self::RoomMatrix => "Room Matrix",
        }
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        match self {
            Self::Students => vec![
                vec![
                    Cell::string("Roll No"),
                    Cell::string("Name"),
                    Cell::string("Class"),
                ],
                vec![Cell::number(1.0), Cell::string("Jane Doe"), Cell::string("10A")],
            ],
            Self::RoomMatrix => vec![
                vec![
                    Cell::string("Room No"),
                    Cell::string("Rows"),
                    Cell::string("Columns"),
                    Cell::string("Total Capacity"),
                    Cell::string("Students per Seat"),
                    Cell::string("Blocked Seats"),
                ],
                vec![
                    Cell::string("101"),
                    Cell::number(5.0),
                    Cell::number(6.0),
                    Cell::number(30.0),
                    Cell::number(1.0),
                    Cell::string("A1"),
                ],
            ],
        }
    }

    /// The template sheet: header row plus one example row.
    pub fn sheet(&self) -> Sheet {
        let mut sheet = Sheet::new(self.sheet_name());
        for (r, row) in (0u32..).zip(self.rows()) {
            for (c, cell) in (0u32..).zip(row) {
                sheet.push(r, c, cell);
            }
        }
        sheet.rebuild_cell_index();
        sheet
    }
}

/// Generate the XLSX bytes of a template.
pub fn template_bytes(kind: TemplateKind) -> Result<Vec<u8>> {
    package::write_xlsx(&[kind.sheet()])
}
