//! Roster loader: student records from a `Roll No / Name / Class` table.

use std::collections::HashSet;

use crate::error::{Result, SeatplanError};
use crate::table::Table;
use crate::types::{LoadWarning, Roster, RowError, Student, Workbook};

/// Outcome of loading a roster: the students plus everything that was skipped.
#[derive(Debug, Clone, Default)]
pub struct RosterLoad {
    pub roster: Roster,
    pub row_errors: Vec<RowError>,
    pub warnings: Vec<LoadWarning>,
}

/// Load students from a table, in row order.
///
/// Rows with an empty `Roll No` or `Name` are skipped and reported. Repeated
/// roll numbers are kept and reported as warnings.
pub fn load(table: &Table) -> Result<RosterLoad> {
    let [roll_col, name_col, class_col] = table.require(["Roll No", "Name", "Class"])?;

    let mut students = Vec::with_capacity(table.rows().len());
    let mut row_errors = Vec::new();
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    for row in table.rows() {
        let roll_no = row.get(roll_col);
        let name = row.get(name_col);
        let (roll_no, name) = match (roll_no, name) {
            (Some(r), Some(n)) => (r, n),
            (None, Some(_)) => {
                row_errors.push(RowError::new(row.line, "empty Roll No"));
                continue;
            }
            (Some(_), None) => {
                row_errors.push(RowError::new(row.line, "empty Name"));
                continue;
            }
            (None, None) => {
                row_errors.push(RowError::new(row.line, "empty Roll No and Name"));
                continue;
            }
        };

        if !seen.insert(roll_no.to_string()) {
            warnings.push(LoadWarning::DuplicateRollNo {
                roll_no: roll_no.to_string(),
                row: row.line,
            });
        }
        students.push(Student::new(
            roll_no,
            name,
            row.get(class_col).unwrap_or_default(),
        ));
    }

    if !row_errors.is_empty() {
        tracing::warn!(skipped = row_errors.len(), "roster rows skipped");
    }
    tracing::debug!(students = students.len(), "roster loaded");

    Ok(RosterLoad {
        roster: Roster::new(students),
        row_errors,
        warnings,
    })
}

/// Load a roster from the first sheet of a workbook.
pub fn load_workbook(workbook: &Workbook) -> Result<RosterLoad> {
    let sheet = workbook
        .first_sheet()
        .ok_or_else(|| SeatplanError::Schema("students file contains no sheets".into()))?;
    load(&Table::from_sheet(sheet)?)
}
