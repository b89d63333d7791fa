//! Preview grid: one text label per seat, row-major.

use serde::Serialize;

use crate::types::{Allocation, Room, SeatCoordinate, SeatPos};

/// Label of a seat excluded from allocation.
pub const BLOCKED_LABEL: &str = "X";

/// Separator between occupants sharing a seat.
pub const OCCUPANT_SEPARATOR: &str = " / ";

/// Lightweight, row-major label grid of one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewGrid {
    pub rows: u32,
    pub columns: u32,
    /// `rows * columns` labels: roll numbers, `"X"` for blocked, `""` for empty.
    pub grid: Vec<String>,
}

impl PreviewGrid {
    /// Label at a seat, if inside the grid.
    pub fn label(&self, row: u32, column: u32) -> Option<&str> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        let idx = u64::from(row) * u64::from(self.columns) + u64::from(column);
        usize::try_from(idx)
            .ok()
            .and_then(|i| self.grid.get(i))
            .map(String::as_str)
    }
}

fn seat_label(room: &Room, room_idx: usize, allocation: &Allocation, pos: SeatPos) -> String {
    if room.is_blocked(pos) {
        return BLOCKED_LABEL.to_string();
    }
    let occupants: Vec<&str> = (0..room.spec.students_per_seat)
        .filter_map(|slot| {
            allocation.occupant(room_idx, SeatCoordinate::new(pos.row, pos.column, slot))
        })
        .map(|s| s.roll_no.as_str())
        .collect();
    occupants.join(OCCUPANT_SEPARATOR)
}

/// Build the preview grid of room `room_idx` from an allocation.
///
/// Pass [`Allocation::empty`] to preview the bare layout.
pub fn render_preview(room: &Room, room_idx: usize, allocation: &Allocation) -> PreviewGrid {
    let spec = room.spec;
    let grid = (0..spec.rows)
        .flat_map(|row| (0..spec.columns).map(move |column| SeatPos::new(row, column)))
        .map(|pos| seat_label(room, room_idx, allocation, pos))
        .collect();
    PreviewGrid {
        rows: spec.rows,
        columns: spec.columns,
        grid,
    }
}
