use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use super::{SeatCoordinate, Student};
use crate::error::SeatplanError;

/// Order in which students are taken for placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationOrder {
    /// Ascending roll number (natural order: "2" before "10").
    #[default]
    Roll,
    /// Ascending name, case-insensitive.
    Alphabetical,
}

impl AllocationOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Roll => "roll",
            Self::Alphabetical => "alphabetical",
        }
    }
}

impl std::fmt::Display for AllocationOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllocationOrder {
    type Err = SeatplanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("roll") {
            Ok(Self::Roll)
        } else if value.eq_ignore_ascii_case("alphabetical") {
            Ok(Self::Alphabetical)
        } else {
            Err(SeatplanError::Validation(format!(
                "allocationType must be 'roll' or 'alphabetical' (got '{value}')"
            )))
        }
    }
}

/// One student placed at one coordinate of one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Index into the room list the allocation was computed for.
    pub room: usize,
    pub seat: SeatCoordinate,
    pub student: Student,
}

/// Result of seat allocation: placements in placement order plus the overflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    order: AllocationOrder,
    placements: Vec<Placement>,
    unassigned: Vec<Student>,
    /// (room, coordinate) -> index into `placements`
    index: BTreeMap<(usize, SeatCoordinate), usize>,
}

impl Allocation {
    pub(crate) fn new(
        order: AllocationOrder,
        placements: Vec<Placement>,
        unassigned: Vec<Student>,
    ) -> Self {
        let index = placements
            .iter()
            .enumerate()
            .map(|(i, p)| ((p.room, p.seat), i))
            .collect();
        Self {
            order,
            placements,
            unassigned,
            index,
        }
    }

    /// An allocation with no students, used when only the room layout is previewed.
    pub fn empty(order: AllocationOrder) -> Self {
        Self::new(order, Vec::new(), Vec::new())
    }

    #[inline]
    pub fn order(&self) -> AllocationOrder {
        self.order
    }

    /// All placements in placement order.
    #[inline]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Students that did not fit, in the order they would have been placed.
    #[inline]
    pub fn unassigned(&self) -> &[Student] {
        &self.unassigned
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }

    /// The student at a coordinate of a room, if any.
    pub fn occupant(&self, room: usize, seat: SeatCoordinate) -> Option<&Student> {
        self.index
            .get(&(room, seat))
            .and_then(|&i| self.placements.get(i))
            .map(|p| &p.student)
    }

    /// Placements of one room, in placement order.
    pub fn room_placements(&self, room: usize) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(move |p| p.room == room)
    }

    /// Number of students seated in one room.
    pub fn seated_in(&self, room: usize) -> usize {
        self.room_placements(room).count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("roll", AllocationOrder::Roll ; "lowercase roll")]
    #[test_case(" Roll ", AllocationOrder::Roll ; "padded roll")]
    #[test_case("ALPHABETICAL", AllocationOrder::Alphabetical ; "uppercase alphabetical")]
    fn test_parse_order(input: &str, expected: AllocationOrder) {
        assert_eq!(input.parse::<AllocationOrder>().unwrap(), expected);
    }

    #[test]
    fn test_parse_order_rejects_unknown() {
        let err = "random".parse::<AllocationOrder>().unwrap_err();
        assert!(err.to_string().contains("allocationType"));
    }

    #[test]
    fn test_occupant_lookup() {
        let a = Student::new("1", "A", "X");
        let allocation = Allocation::new(
            AllocationOrder::Roll,
            vec![Placement {
                room: 0,
                seat: SeatCoordinate::new(0, 1, 0),
                student: a.clone(),
            }],
            Vec::new(),
        );
        assert_eq!(allocation.occupant(0, SeatCoordinate::new(0, 1, 0)), Some(&a));
        assert_eq!(allocation.occupant(1, SeatCoordinate::new(0, 1, 0)), None);
        assert_eq!(allocation.seated_in(0), 1);
        assert!(allocation.is_complete());
    }
}
