//! Pre-computed seat geometry for one room page.
//!
//! Positions are computed once per room so rendering is a plain walk over
//! the grid. All values are millimetres, measured from the top-left corner
//! of the page with y growing downwards.

/// Gap between neighbouring seat boxes when the area has room for it.
pub const SEAT_GAP: f32 = 2.0;

/// Largest share of a seat pitch given to the gap in crowded grids.
const MAX_GAP_SHARE: f32 = 0.25;

/// Upper bound for a seat box width, so small rooms are not stretched.
pub const MAX_SEAT_WIDTH: f32 = 60.0;

/// Upper bound for a seat box height.
pub const MAX_SEAT_HEIGHT: f32 = 28.0;

/// Largest label font size in points.
pub const MAX_FONT_SIZE: f32 = 9.0;

/// Smallest label font size in points.
pub const MIN_FONT_SIZE: f32 = 3.0;

/// Millimetres per typographic point.
pub const MM_PER_PT: f32 = 0.352_778;

/// Average Helvetica glyph advance as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.55;

/// A rectangle in page millimetres (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Seat grid geometry for one room
#[derive(Debug, Clone)]
pub struct SeatLayout {
    /// Cumulative column positions (`col_positions[i]` = x of seat column i's left edge)
    pub col_positions: Vec<f32>,
    /// Cumulative row positions (`row_positions[i]` = y of seat row i's top edge)
    pub row_positions: Vec<f32>,
    pub seat_width: f32,
    pub seat_height: f32,
    /// Horizontal gap between seat columns
    pub col_gap: f32,
    /// Vertical gap between seat rows
    pub row_gap: f32,
    /// Occupant lines per seat
    pub slots: u32,
}

#[allow(clippy::cast_precision_loss)]
fn count_f32(n: u32) -> f32 {
    n as f32
}

impl SeatLayout {
    /// Fit a `rows` x `columns` grid into `area`, centred horizontally.
    ///
    /// Gaps shrink with the seat pitch in crowded grids, so the whole grid
    /// always stays inside `area`.
    pub fn new(rows: u32, columns: u32, slots: u32, area: Rect) -> Self {
        let rows = rows.max(1);
        let columns = columns.max(1);
        let slots = slots.max(1);

        let cols_f = count_f32(columns);
        let rows_f = count_f32(rows);
        let col_gap = SEAT_GAP.min(area.width / cols_f * MAX_GAP_SHARE);
        let row_gap = SEAT_GAP.min(area.height / rows_f * MAX_GAP_SHARE);
        let seat_width = ((area.width - col_gap * (cols_f - 1.0)) / cols_f)
            .clamp(0.0, MAX_SEAT_WIDTH);
        let seat_height = ((area.height - row_gap * (rows_f - 1.0)) / rows_f)
            .clamp(0.0, MAX_SEAT_HEIGHT);

        let grid_width = seat_width * cols_f + col_gap * (cols_f - 1.0);
        let left = area.x + ((area.width - grid_width) / 2.0).max(0.0);

        // Positions are multiplied out, not summed, so large grids do not drift
        let col_pitch = seat_width + col_gap;
        let mut col_positions: Vec<f32> = (0..columns)
            .map(|i| left + count_f32(i) * col_pitch)
            .collect();
        col_positions.push(left + cols_f * col_pitch - col_gap); // Final edge

        let row_pitch = seat_height + row_gap;
        let mut row_positions: Vec<f32> = (0..rows)
            .map(|i| area.y + count_f32(i) * row_pitch)
            .collect();
        row_positions.push(area.y + rows_f * row_pitch - row_gap); // Final edge

        Self {
            col_positions,
            row_positions,
            seat_width,
            seat_height,
            col_gap,
            row_gap,
            slots,
        }
    }

    /// Bounds of one seat box.
    pub fn seat_rect(&self, row: u32, column: u32) -> Rect {
        let x = self.col_positions.get(column as usize).copied().unwrap_or(0.0);
        let y = self.row_positions.get(row as usize).copied().unwrap_or(0.0);
        Rect::new(x, y, self.seat_width, self.seat_height)
    }

    /// Bounds of one occupant line inside a seat box; slots stack top to bottom.
    pub fn slot_rect(&self, row: u32, column: u32, slot: u32) -> Rect {
        let seat = self.seat_rect(row, column);
        let line = seat.height / count_f32(self.slots);
        Rect::new(seat.x, seat.y + line * count_f32(slot), seat.width, line)
    }

    /// Label font size in points for one occupant line.
    pub fn font_size(&self) -> f32 {
        let line_mm = self.seat_height / count_f32(self.slots);
        (line_mm * 0.7 / MM_PER_PT).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
    }

    /// Total bounds of the grid.
    pub fn bounds(&self) -> Rect {
        let x = self.col_positions.first().copied().unwrap_or(0.0);
        let y = self.row_positions.first().copied().unwrap_or(0.0);
        let right = self.col_positions.last().copied().unwrap_or(x);
        let bottom = self.row_positions.last().copied().unwrap_or(y);
        Rect::new(x, y, right - x, bottom - y)
    }
}

/// Approximate rendered width of `text` in millimetres.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let chars = text.chars().count() as f32;
    chars * font_size * AVG_GLYPH_WIDTH * MM_PER_PT
}

/// Shorten `text` so it fits in `max_width` millimetres, marking cuts with "..".
pub fn fit_label(text: &str, max_width: f32, font_size: f32) -> String {
    if text_width(text, font_size) <= max_width {
        return text.to_string();
    }
    let per_char = font_size * AVG_GLYPH_WIDTH * MM_PER_PT;
    if per_char <= 0.0 {
        return String::new();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let budget = (max_width / per_char).floor().max(0.0) as usize;
    if budget <= 2 {
        return text.chars().take(budget).collect();
    }
    let mut out: String = text.chars().take(budget - 2).collect();
    out.push_str("..");
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const AREA: Rect = Rect::new(10.0, 20.0, 200.0, 100.0);

    #[test]
    fn test_small_room_uses_capped_boxes_and_is_centred() {
        let layout = SeatLayout::new(2, 2, 1, AREA);
        assert_eq!(layout.seat_width, MAX_SEAT_WIDTH);
        assert_eq!(layout.seat_height, MAX_SEAT_HEIGHT);
        let bounds = layout.bounds();
        assert!((bounds.x - AREA.x - (AREA.width - bounds.width) / 2.0).abs() < 1e-3);
        assert_eq!(bounds.y, AREA.y);
    }

    #[test]
    fn test_large_room_fits_area() {
        let layout = SeatLayout::new(20, 30, 2, AREA);
        let bounds = layout.bounds();
        assert!(bounds.right() <= AREA.right() + 1e-3);
        assert!(bounds.bottom() <= AREA.bottom() + 1e-3);
        assert_eq!(layout.col_positions.len(), 31);
    }

    #[test]
    fn test_wide_and_tall_rooms_stay_on_page() {
        let page_area = Rect::new(12.0, 30.0, 273.0, 160.0);
        for (rows, columns) in [(10, 150), (150, 10), (1, 100_000), (100_000, 1), (300, 300)] {
            let layout = SeatLayout::new(rows, columns, 1, page_area);
            let bounds = layout.bounds();
            assert!(
                bounds.right() <= page_area.right() + 1e-2,
                "{rows}x{columns}: right edge {} past {}",
                bounds.right(),
                page_area.right()
            );
            assert!(
                bounds.bottom() <= page_area.bottom() + 1e-2,
                "{rows}x{columns}: bottom edge {} past {}",
                bounds.bottom(),
                page_area.bottom()
            );
            assert!(bounds.x >= page_area.x);
            assert!(layout.seat_width > 0.0 && layout.seat_height > 0.0);
        }
    }

    #[test]
    fn test_gap_shrinks_only_when_crowded() {
        assert_eq!(SeatLayout::new(2, 2, 1, AREA).col_gap, SEAT_GAP);
        let crowded = SeatLayout::new(10, 150, 1, AREA);
        assert!(crowded.col_gap < SEAT_GAP);
        assert_eq!(crowded.row_gap, SEAT_GAP);
        assert!(crowded.seat_width > crowded.col_gap);
    }

    #[test]
    fn test_seat_and_slot_rects() {
        let layout = SeatLayout::new(3, 3, 2, AREA);
        let a = layout.seat_rect(0, 0);
        let b = layout.seat_rect(1, 2);
        assert!(b.x > a.right());
        assert!(b.y > a.bottom());
        let s1 = layout.slot_rect(1, 2, 1);
        assert_eq!(s1.height, b.height / 2.0);
        assert_eq!(s1.y, b.y + b.height / 2.0);
    }

    #[test]
    fn test_font_size_is_clamped() {
        assert_eq!(SeatLayout::new(1, 1, 1, AREA).font_size(), MAX_FONT_SIZE);
        assert_eq!(SeatLayout::new(200, 200, 4, AREA).font_size(), MIN_FONT_SIZE);
    }

    #[test]
    fn test_fit_label() {
        assert_eq!(fit_label("12 - Ann", 100.0, 8.0), "12 - Ann");
        let cut = fit_label("12 - Bartholomew Fitzgerald", 20.0, 8.0);
        assert!(cut.ends_with(".."));
        assert!(text_width(&cut, 8.0) <= 20.0);
        assert_eq!(fit_label("abc", 0.0, 8.0), "");
    }
}
