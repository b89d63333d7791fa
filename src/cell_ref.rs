//! Utilities for Excel-style cell references and ranges.
//!
//! Cell references double as seat references in room matrices: the column
//! letter names the seat column and the row number the seat row, so `B1`
//! is seat row 0, column 1.

/// Parse a cell reference like "A1" into (col, row) where col and row are 0-indexed.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    parse_cell_ref_bytes(cell_ref.trim().as_bytes())
}

/// Parse a cell reference from raw bytes (ASCII) into (col, row) where col and row are 0-indexed.
///
/// This is the bytes form of [`parse_cell_ref`] for raw XML attribute
/// values (e.g., `attr.value` from quick-xml). Letters must precede digits.
pub fn parse_cell_ref_bytes(ref_bytes: &[u8]) -> Option<(u32, u32)> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for &b in ref_bytes {
        if b == b'$' {
            continue;
        }
        if b.is_ascii_alphabetic() {
            if saw_row {
                return None;
            }
            let upper = b.to_ascii_uppercase();
            col = col
                .checked_mul(26)?
                .checked_add(u32::from(upper - b'A') + 1)?;
            saw_col = true;
        } else if b.is_ascii_digit() {
            row = row.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row || row == 0 {
        return None;
    }

    Some((col - 1, row - 1))
}

/// Parse a cell range like "A1:B10" or "A1" into (start_row, start_col, end_row, end_col).
///
/// Reversed ranges ("B2:A1") are normalized so start <= end.
pub fn parse_cell_range(range: &str) -> Option<(u32, u32, u32, u32)> {
    if let Some((start, end)) = range.split_once(':') {
        let (start_col, start_row) = parse_cell_ref(start)?;
        let (end_col, end_row) = parse_cell_ref(end)?;
        Some((
            start_row.min(end_row),
            start_col.min(end_col),
            start_row.max(end_row),
            start_col.max(end_col),
        ))
    } else {
        let (start_col, start_row) = parse_cell_ref(range)?;
        Some((start_row, start_col, start_row, start_col))
    }
}

/// Parse a list of references separated by commas, semicolons or whitespace.
///
/// Returns the parsed ranges and the tokens that could not be parsed.
pub fn parse_ref_list(list: &str) -> (Vec<(u32, u32, u32, u32)>, Vec<String>) {
    let mut ranges = Vec::new();
    let mut invalid = Vec::new();

    for part in list
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|p| !p.is_empty())
    {
        match parse_cell_range(part) {
            Some(range) => ranges.push(range),
            None => invalid.push(part.to_string()),
        }
    }

    (ranges, invalid)
}

/// Convert a 0-indexed column number to its letter form (0 -> "A", 27 -> "AB").
pub fn col_to_letter(col: u32) -> String {
    let mut n = u64::from(col) + 1;
    let mut letters = Vec::new();
    while n > 0 {
        #[allow(clippy::cast_possible_truncation)]
        let rem = ((n - 1) % 26) as u8;
        letters.push(char::from(b'A' + rem));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Format a 0-indexed (col, row) pair as an "A1" reference.
pub fn cell_ref(col: u32, row: u32) -> String {
    format!("{}{}", col_to_letter(col), u64::from(row) + 1)
}
