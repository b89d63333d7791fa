//! Seat allocator.
//!
//! Greedy and position-determined: students are ordered by the chosen
//! policy, then poured into rooms in the given order, seats row-major, slots
//! within a seat. Whatever does not fit is returned as unassigned, in the
//! order it would have been placed.

use std::cmp::Ordering;

use crate::types::{Allocation, AllocationOrder, Placement, Room, Roster, SeatCoordinate, Student};

/// A run of a roll number: either all digits or no digits.
#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn chunks(s: &str) -> impl Iterator<Item = Chunk<'_>> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = rest
            .char_indices()
            .find(|&(_, c)| c.is_ascii_digit() != digits)
            .map_or(rest.len(), |(i, _)| i);
        let (head, tail) = rest.split_at(end);
        rest = tail;
        Some(if digits {
            Chunk::Digits(head)
        } else {
            Chunk::Text(head)
        })
    })
}

fn compare_digits(a: &str, b: &str) -> Ordering {
    let a_trim = a.trim_start_matches('0');
    let b_trim = b.trim_start_matches('0');
    a_trim
        .len()
        .cmp(&b_trim.len())
        .then_with(|| a_trim.cmp(b_trim))
        .then_with(|| a.len().cmp(&b.len()))
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Natural ordering of roll numbers: `"2" < "10"`, `"CS9" < "CS10"`.
///
/// Digit runs compare by value (then by leading zeros), other runs compare
/// case-insensitively, digits sort before text.
pub fn compare_roll_numbers(a: &str, b: &str) -> Ordering {
    let mut left = chunks(a.trim());
    let mut right = chunks(b.trim());
    loop {
        let ord = match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Chunk::Digits(x)), Some(Chunk::Digits(y))) => compare_digits(x, y),
            (Some(Chunk::Text(x)), Some(Chunk::Text(y))) => compare_text(x, y),
            (Some(Chunk::Digits(_)), Some(Chunk::Text(_))) => Ordering::Less,
            (Some(Chunk::Text(_)), Some(Chunk::Digits(_))) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
}

/// Case-insensitive name ordering.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    compare_text(a.trim(), b.trim())
}

/// Students in placement order. The sort is stable: ties keep roster order.
pub fn placement_order(roster: &Roster, order: AllocationOrder) -> Vec<&Student> {
    let mut students: Vec<&Student> = roster.iter().collect();
    match order {
        AllocationOrder::Roll => {
            students.sort_by(|a, b| compare_roll_numbers(&a.roll_no, &b.roll_no));
        }
        AllocationOrder::Alphabetical => {
            students.sort_by(|a, b| compare_names(&a.name, &b.name));
        }
    }
    students
}

/// Every usable coordinate across rooms, tagged with the room index, in placement order.
fn seat_sequence(rooms: &[Room]) -> impl Iterator<Item = (usize, SeatCoordinate)> + '_ {
    rooms
        .iter()
        .enumerate()
        .flat_map(|(idx, room)| room.coordinates().map(move |seat| (idx, seat)))
}

/// Assign students to seats.
///
/// Deterministic and total: identical inputs give identical placements and
/// the same unassigned tail.
pub fn allocate(roster: &Roster, rooms: &[Room], order: AllocationOrder) -> Allocation {
    let mut students = placement_order(roster, order).into_iter();
    let placements: Vec<Placement> = seat_sequence(rooms)
        .zip(students.by_ref())
        .map(|((room, seat), student)| Placement {
            room,
            seat,
            student: student.clone(),
        })
        .collect();
    let unassigned: Vec<Student> = students.cloned().collect();

    tracing::debug!(
        placed = placements.len(),
        unassigned = unassigned.len(),
        rooms = rooms.len(),
        %order,
        "allocation complete"
    );

    Allocation::new(order, placements, unassigned)
}
