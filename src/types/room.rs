use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{Result, SeatplanError};

/// Largest seat grid (rows x columns) accepted for a single room.
pub const MAX_SEATS_PER_ROOM: u64 = 100_000;

/// Largest number of occupants sharing one seat.
pub const MAX_STUDENTS_PER_SEAT: u32 = 16;

/// Dimensions and per-seat capacity of one examination room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSpec {
    pub rows: u32,
    pub columns: u32,
    pub students_per_seat: u32,
}

impl RoomSpec {
    /// Validate and build a spec. Every dimension must be at least 1.
    pub fn new(rows: u32, columns: u32, students_per_seat: u32) -> Result<Self> {
        if rows == 0 || columns == 0 || students_per_seat == 0 {
            return Err(SeatplanError::Validation(format!(
                "rows, columns and students per seat must be at least 1 (got {rows} x {columns} x {students_per_seat})"
            )));
        }
        if students_per_seat > MAX_STUDENTS_PER_SEAT {
            return Err(SeatplanError::Validation(format!(
                "students per seat must be at most {MAX_STUDENTS_PER_SEAT} (got {students_per_seat})"
            )));
        }
        let seats = u64::from(rows) * u64::from(columns);
        if seats > MAX_SEATS_PER_ROOM {
            return Err(SeatplanError::Validation(format!(
                "room grid of {rows} x {columns} exceeds the limit of {MAX_SEATS_PER_ROOM} seats"
            )));
        }
        Ok(Self {
            rows,
            columns,
            students_per_seat,
        })
    }

    /// Number of physical seats (rows x columns).
    #[inline]
    pub fn seats(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.columns)
    }

    /// Raw capacity: rows x columns x students per seat.
    #[inline]
    pub fn capacity(&self) -> u64 {
        self.seats() * u64::from(self.students_per_seat)
    }

    #[inline]
    pub fn contains(&self, pos: SeatPos) -> bool {
        pos.row < self.rows && pos.column < self.columns
    }
}

/// A physical seat position (all slots of the seat).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeatPos {
    pub row: u32,
    pub column: u32,
}

impl SeatPos {
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

/// One occupant place: a seat plus the slot on that seat.
///
/// Ordering is row-major, then slot, which is the placement order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeatCoordinate {
    pub row: u32,
    pub column: u32,
    pub slot: u32,
}

impl SeatCoordinate {
    pub const fn new(row: u32, column: u32, slot: u32) -> Self {
        Self { row, column, slot }
    }

    #[inline]
    pub const fn seat(&self) -> SeatPos {
        SeatPos::new(self.row, self.column)
    }
}

impl std::fmt::Display for SeatCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.row, self.column, self.slot)
    }
}

/// A named room with its grid and the seats excluded from allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub room_no: String,
    pub spec: RoomSpec,
    blocked: BTreeSet<SeatPos>,
}

impl Room {
    pub fn new(room_no: impl Into<String>, spec: RoomSpec) -> Self {
        Self {
            room_no: room_no.into(),
            spec,
            blocked: BTreeSet::new(),
        }
    }

    /// Mark a seat as unusable. Returns `false` if the seat lies outside the grid.
    pub fn block(&mut self, pos: SeatPos) -> bool {
        if !self.spec.contains(pos) {
            return false;
        }
        self.blocked.insert(pos);
        true
    }

    #[inline]
    pub fn is_blocked(&self, pos: SeatPos) -> bool {
        self.blocked.contains(&pos)
    }

    pub fn blocked(&self) -> impl Iterator<Item = SeatPos> + '_ {
        self.blocked.iter().copied()
    }

    /// Seats available for allocation.
    pub fn usable_seats(&self) -> u64 {
        self.spec.seats() - self.blocked.len() as u64
    }

    /// Occupant places available for allocation.
    pub fn usable_capacity(&self) -> u64 {
        self.usable_seats() * u64::from(self.spec.students_per_seat)
    }

    /// Every usable coordinate in placement order: row-major, slots within a seat.
    pub fn coordinates(&self) -> impl Iterator<Item = SeatCoordinate> + '_ {
        let spec = self.spec;
        (0..spec.rows)
            .flat_map(move |row| (0..spec.columns).map(move |column| SeatPos::new(row, column)))
            .filter(move |pos| !self.is_blocked(*pos))
            .flat_map(move |pos| {
                (0..spec.students_per_seat)
                    .map(move |slot| SeatCoordinate::new(pos.row, pos.column, slot))
            })
    }
}
