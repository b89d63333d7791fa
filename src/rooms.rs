//! Room layout loader: room matrix tables and manual configuration.

use crate::cell_ref::{cell_ref, parse_ref_list};
use crate::error::{Result, SeatplanError};
use crate::table::{Table, TableRow};
use crate::types::{
    find_sheet, LoadWarning, Room, RoomSpec, RowError, SeatPos, Sheet, Workbook,
};

/// Name given to the single room of a manual configuration.
pub const MANUAL_ROOM_NAME: &str = "Manual";

/// Marker for an unusable seat in a seat map sheet.
const BLOCKED_MARKER: &str = "X";

/// Outcome of loading rooms: usable rooms plus everything that was skipped or recomputed.
#[derive(Debug, Clone, Default)]
pub struct RoomLoad {
    pub rooms: Vec<Room>,
    pub row_errors: Vec<RowError>,
    pub warnings: Vec<LoadWarning>,
}

/// Column positions of a room matrix.
struct MatrixColumns {
    room_no: Option<usize>,
    rows: usize,
    columns: usize,
    total_capacity: Option<usize>,
    students_per_seat: Option<usize>,
    blocked_seats: Option<usize>,
}

impl MatrixColumns {
    fn resolve(table: &Table) -> Result<Self> {
        let [rows, columns] = table.require(["Rows", "Columns"])?;
        Ok(Self {
            room_no: table.column("Room No"),
            rows,
            columns,
            total_capacity: table.column("Total Capacity"),
            students_per_seat: table.column("Students per Seat"),
            blocked_seats: table.column("Blocked Seats"),
        })
    }
}

/// Parse a positive whole number as typed in a cell ("3" or "3.0").
fn parse_count(value: Option<&str>, field: &str) -> std::result::Result<u32, String> {
    let Some(raw) = value else {
        return Err(format!("empty {field}"));
    };
    let n: f64 = raw
        .parse()
        .map_err(|_| format!("{field} '{raw}' is not a number"))?;
    if n.fract() != 0.0 || n < 1.0 || n > f64::from(u32::MAX) {
        return Err(format!("{field} '{raw}' must be a whole number of at least 1"));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(n as u32)
}

/// Parse a declared total capacity; `None` when it is not a whole number.
fn parse_capacity(raw: &str) -> Option<u64> {
    let n: f64 = raw.parse().ok()?;
    if n.fract() != 0.0 || n < 0.0 || n > 9.0e15 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(n as u64)
}

fn room_from_row(
    row: &TableRow,
    cols: &MatrixColumns,
    ordinal: usize,
    warnings: &mut Vec<LoadWarning>,
) -> std::result::Result<Room, String> {
    let room_no = row
        .get_opt(cols.room_no)
        .map_or_else(|| format!("Room {ordinal}"), ToString::to_string);
    let rows = parse_count(row.get(cols.rows), "Rows")?;
    let columns = parse_count(row.get(cols.columns), "Columns")?;
    let per_seat = match row.get_opt(cols.students_per_seat) {
        Some(v) => parse_count(Some(v), "Students per Seat")?,
        None => 1,
    };
    let spec = RoomSpec::new(rows, columns, per_seat).map_err(|e| e.to_string())?;

    if let Some(declared) = row.get_opt(cols.total_capacity) {
        let computed = spec.capacity();
        if parse_capacity(declared) != Some(computed) {
            tracing::warn!(%room_no, declared, computed, "total capacity recomputed");
            warnings.push(LoadWarning::CapacityMismatch {
                room_no: room_no.clone(),
                declared: declared.to_string(),
                computed,
            });
        }
    }

    let mut room = Room::new(room_no, spec);
    if let Some(list) = row.get_opt(cols.blocked_seats) {
        block_ref_list(&mut room, list, warnings);
    }
    Ok(room)
}

/// Block every seat named in an A1-style reference list.
fn block_ref_list(room: &mut Room, list: &str, warnings: &mut Vec<LoadWarning>) {
    let (ranges, invalid) = parse_ref_list(list);
    for token in invalid {
        warnings.push(LoadWarning::BlockedSeatOutOfRange {
            room_no: room.room_no.clone(),
            seat: token,
        });
    }

    let spec = room.spec;
    for (sr, sc, er, ec) in ranges {
        // Clip to the grid so a huge range costs no more than the room itself
        let row_end = er.min(spec.rows.saturating_sub(1));
        let col_end = ec.min(spec.columns.saturating_sub(1));
        for r in sr..=row_end {
            for c in sc..=col_end {
                room.block(SeatPos::new(r, c));
            }
        }
        if er >= spec.rows || ec >= spec.columns {
            let seat = if (sr, sc) == (er, ec) {
                cell_ref(sc, sr)
            } else {
                format!("{}:{}", cell_ref(sc, sr), cell_ref(ec, er))
            };
            warnings.push(LoadWarning::BlockedSeatOutOfRange {
                room_no: room.room_no.clone(),
                seat,
            });
        }
    }
}

/// Block seats marked `X` on a seat map sheet; cell (r, c) is seat (r, c).
fn block_from_seat_map(room: &mut Room, sheet: &Sheet, warnings: &mut Vec<LoadWarning>) {
    for cd in &sheet.cells {
        let marked = cd
            .cell
            .text()
            .is_some_and(|t| t.eq_ignore_ascii_case(BLOCKED_MARKER));
        if marked && !room.block(SeatPos::new(cd.r, cd.c)) {
            warnings.push(LoadWarning::BlockedSeatOutOfRange {
                room_no: room.room_no.clone(),
                seat: cell_ref(cd.c, cd.r),
            });
        }
    }
}

/// Load rooms from a room matrix workbook.
///
/// The first sheet is the matrix. Any other sheet named after a room is read
/// as that room's seat map. Fails when no usable room remains.
pub fn load_matrix(workbook: &Workbook) -> Result<RoomLoad> {
    let (matrix, seat_maps) = workbook
        .sheets
        .split_first()
        .ok_or_else(|| SeatplanError::Schema("room matrix file contains no sheets".into()))?;
    let table = Table::from_sheet(matrix)?;
    let cols = MatrixColumns::resolve(&table)?;

    let mut out = RoomLoad::default();
    for row in table.rows() {
        match room_from_row(row, &cols, out.rooms.len() + 1, &mut out.warnings) {
            Ok(mut room) => {
                let wanted = room.room_no.trim();
                if let Some(map) = find_sheet(seat_maps, wanted) {
                    block_from_seat_map(&mut room, map, &mut out.warnings);
                }
                tracing::debug!(
                    room_no = %room.room_no,
                    rows = room.spec.rows,
                    columns = room.spec.columns,
                    usable = room.usable_capacity(),
                    "room loaded"
                );
                out.rooms.push(room);
            }
            Err(reason) => out.row_errors.push(RowError::new(row.line, reason)),
        }
    }

    if !out.row_errors.is_empty() {
        tracing::warn!(skipped = out.row_errors.len(), "room matrix rows skipped");
    }
    if out.rooms.is_empty() {
        return Err(SeatplanError::Schema(
            "room matrix contains no usable rooms".into(),
        ));
    }
    Ok(out)
}

/// A single room from a manual grid specification.
pub fn load_manual(spec: RoomSpec) -> RoomLoad {
    RoomLoad {
        rooms: vec![Room::new(MANUAL_ROOM_NAME, spec)],
        ..RoomLoad::default()
    }
}
