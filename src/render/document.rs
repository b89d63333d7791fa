//! Printable seating chart (PDF).
//!
//! One A4 landscape page per room, seats drawn as bordered boxes in the same
//! row-major order the allocator fills them, followed by pages listing any
//! unassigned students and any load notes (skipped rows, warnings).

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
};

use crate::error::{Result, SeatplanError};
use crate::layout::{fit_label, Rect, SeatLayout};
use crate::types::{Allocation, AllocationOrder, Room, SeatCoordinate, SeatPos, Student};

const PAGE_WIDTH_MM: f32 = 297.0;
const PAGE_HEIGHT_MM: f32 = 210.0;
const MARGIN_MM: f32 = 12.0;
const HEADER_HEIGHT_MM: f32 = 18.0;
const FOOTER_HEIGHT_MM: f32 = 8.0;

const TITLE_FONT_SIZE: f32 = 16.0;
const SUBTITLE_FONT_SIZE: f32 = 10.0;
const LIST_FONT_SIZE: f32 = 10.0;
const FOOTER_FONT_SIZE: f32 = 8.0;
const LIST_LINE_HEIGHT_MM: f32 = 6.0;

/// Padding between a seat border and its text.
const LABEL_PADDING_MM: f32 = 1.0;

pub const UNASSIGNED_TITLE: &str = "Unassigned Students";

pub const NOTES_TITLE: &str = "Load Notes";

/// What goes on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageKind<'a> {
    Room(usize),
    Unassigned(&'a [Student]),
    Notes(&'a [String]),
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Area available below the page header and above the footer.
fn content_area() -> Rect {
    Rect::new(
        MARGIN_MM,
        MARGIN_MM + HEADER_HEIGHT_MM,
        PAGE_WIDTH_MM - 2.0 * MARGIN_MM,
        PAGE_HEIGHT_MM - 2.0 * MARGIN_MM - HEADER_HEIGHT_MM - FOOTER_HEIGHT_MM,
    )
}

fn lines_per_page() -> usize {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (content_area().height / LIST_LINE_HEIGHT_MM).floor() as usize;
    n.max(1)
}

fn plan_pages<'a>(
    rooms: &[Room],
    unassigned: &'a [Student],
    notes: &'a [String],
) -> Vec<PageKind<'a>> {
    let mut pages: Vec<PageKind<'a>> = (0..rooms.len()).map(PageKind::Room).collect();
    pages.extend(unassigned.chunks(lines_per_page()).map(PageKind::Unassigned));
    pages.extend(notes.chunks(lines_per_page()).map(PageKind::Notes));
    pages
}

/// Builtin fonts are drawn with printable ASCII only; anything else becomes `?`.
fn pdf_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

/// Convert a top-down page coordinate to the PDF bottom-up axis.
fn pdf_y(top: f32) -> Mm {
    Mm(PAGE_HEIGHT_MM - top)
}

fn order_label(order: AllocationOrder) -> &'static str {
    match order {
        AllocationOrder::Roll => "roll number",
        AllocationOrder::Alphabetical => "name",
    }
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn grey() -> Color {
    Color::Rgb(Rgb::new(0.55, 0.55, 0.55, None))
}

fn draw_line(layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32) {
    let points = vec![
        (Point::new(Mm(x1), pdf_y(y1)), false),
        (Point::new(Mm(x2), pdf_y(y2)), false),
    ];
    layer.add_line(Line {
        points,
        is_closed: false,
    });
}

fn draw_rect(layer: &PdfLayerReference, rect: Rect) {
    let points = vec![
        (Point::new(Mm(rect.x), pdf_y(rect.y)), false),
        (Point::new(Mm(rect.right()), pdf_y(rect.y)), false),
        (Point::new(Mm(rect.right()), pdf_y(rect.bottom())), false),
        (Point::new(Mm(rect.x), pdf_y(rect.bottom())), false),
    ];
    layer.add_line(Line {
        points,
        is_closed: true,
    });
}

fn draw_header(layer: &PdfLayerReference, fonts: &Fonts, title: &str, subtitle: &str) {
    layer.use_text(
        pdf_text(title),
        TITLE_FONT_SIZE,
        Mm(MARGIN_MM),
        pdf_y(MARGIN_MM + 7.0),
        &fonts.bold,
    );
    layer.use_text(
        pdf_text(subtitle),
        SUBTITLE_FONT_SIZE,
        Mm(MARGIN_MM),
        pdf_y(MARGIN_MM + 13.0),
        &fonts.regular,
    );
}

fn draw_footer(layer: &PdfLayerReference, fonts: &Fonts, page: usize, total: usize) {
    layer.use_text(
        format!("Page {page} of {total}"),
        FOOTER_FONT_SIZE,
        Mm(PAGE_WIDTH_MM / 2.0 - 10.0),
        pdf_y(PAGE_HEIGHT_MM - MARGIN_MM),
        &fonts.regular,
    );
}

fn draw_room(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    room: &Room,
    room_idx: usize,
    allocation: &Allocation,
) {
    let spec = room.spec;
    let seated = allocation.seated_in(room_idx);
    draw_header(
        layer,
        fonts,
        &format!("Room {}", room.room_no),
        &format!(
            "{} x {} seats, {} per seat | Seated {} of {} | Order: {}",
            spec.rows,
            spec.columns,
            spec.students_per_seat,
            seated,
            room.usable_capacity(),
            order_label(allocation.order()),
        ),
    );

    let layout = SeatLayout::new(spec.rows, spec.columns, spec.students_per_seat, content_area());
    let font_size = layout.font_size();
    let text_height = font_size * crate::layout::MM_PER_PT;

    layer.set_outline_thickness(0.3);
    for row in 0..spec.rows {
        for column in 0..spec.columns {
            let seat = layout.seat_rect(row, column);
            if room.is_blocked(SeatPos::new(row, column)) {
                layer.set_outline_color(grey());
                draw_rect(layer, seat);
                draw_line(layer, seat.x, seat.y, seat.right(), seat.bottom());
                draw_line(layer, seat.x, seat.bottom(), seat.right(), seat.y);
                continue;
            }
            layer.set_outline_color(black());
            draw_rect(layer, seat);

            for slot in 0..spec.students_per_seat {
                let coord = SeatCoordinate::new(row, column, slot);
                let Some(student) = allocation.occupant(room_idx, coord) else {
                    continue;
                };
                let line = layout.slot_rect(row, column, slot);
                let label = fit_label(
                    &pdf_text(&format!("{} - {}", student.roll_no, student.name)),
                    line.width - 2.0 * LABEL_PADDING_MM,
                    font_size,
                );
                // Baseline sits just under the vertical centre of the line
                let baseline = line.y + (line.height + text_height) / 2.0 - text_height * 0.15;
                layer.use_text(
                    label,
                    font_size,
                    Mm(line.x + LABEL_PADDING_MM),
                    pdf_y(baseline),
                    &fonts.regular,
                );
            }
        }
    }
}

/// Numbered list lines, one per entry, starting at `first_index + 1`.
fn draw_list<I>(layer: &PdfLayerReference, fonts: &Fonts, entries: I, first_index: usize)
where
    I: IntoIterator<Item = String>,
{
    let area = content_area();
    let mut y = area.y + LIST_LINE_HEIGHT_MM;
    for (n, entry) in (first_index + 1..).zip(entries) {
        layer.use_text(
            fit_label(&pdf_text(&format!("{n}. {entry}")), area.width, LIST_FONT_SIZE),
            LIST_FONT_SIZE,
            Mm(area.x),
            pdf_y(y),
            &fonts.regular,
        );
        y += LIST_LINE_HEIGHT_MM;
    }
}

fn draw_unassigned(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    students: &[Student],
    first_index: usize,
    total: usize,
) {
    draw_header(
        layer,
        fonts,
        UNASSIGNED_TITLE,
        &format!("{total} student(s) could not be seated"),
    );
    let entries = students.iter().map(|student| {
        if student.class_name.is_empty() {
            format!("{} - {}", student.roll_no, student.name)
        } else {
            format!("{} - {} ({})", student.roll_no, student.name, student.class_name)
        }
    });
    draw_list(layer, fonts, entries, first_index);
}

fn draw_notes(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    notes: &[String],
    first_index: usize,
    total: usize,
) {
    draw_header(
        layer,
        fonts,
        NOTES_TITLE,
        &format!("{total} issue(s) found while reading the uploaded files"),
    );
    draw_list(layer, fonts, notes.iter().cloned(), first_index);
}

/// Render the seating chart for `rooms` as PDF bytes.
///
/// Reads the allocation only; placements and the unassigned list are
/// drawn in the order they were made. `notes` are listed on trailing pages.
#[tracing::instrument(skip_all, fields(rooms = rooms.len(), notes = notes.len()))]
pub fn render_document(
    rooms: &[Room],
    allocation: &Allocation,
    notes: &[String],
) -> Result<Vec<u8>> {
    let pages = plan_pages(rooms, allocation.unassigned(), notes);
    if pages.is_empty() {
        return Err(SeatplanError::Validation(
            "nothing to render: no rooms given".into(),
        ));
    }

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Seating Chart",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| SeatplanError::Pdf(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| SeatplanError::Pdf(e.to_string()))?,
    };

    let total_pages = pages.len();
    let total_unassigned = allocation.unassigned().len();
    let mut unassigned_offset = 0;
    let mut notes_offset = 0;
    for (idx, page) in pages.iter().enumerate() {
        let layer = if idx == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (p, l) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            doc.get_page(p).get_layer(l)
        };
        match *page {
            PageKind::Room(room_idx) => {
                if let Some(room) = rooms.get(room_idx) {
                    draw_room(&layer, &fonts, room, room_idx, allocation);
                }
            }
            PageKind::Unassigned(students) => {
                draw_unassigned(&layer, &fonts, students, unassigned_offset, total_unassigned);
                unassigned_offset += students.len();
            }
            PageKind::Notes(chunk) => {
                draw_notes(&layer, &fonts, chunk, notes_offset, notes.len());
                notes_offset += chunk.len();
            }
        }
        draw_footer(&layer, &fonts, idx + 1, total_pages);
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| SeatplanError::Pdf(e.to_string()))?;
    tracing::debug!(pages = total_pages, bytes = bytes.len(), "document rendered");
    Ok(bytes)
}
