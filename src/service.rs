//! Service façade: the `preview` and `generate` pipelines.
//!
//! Transport-independent. Each call loads its inputs, allocates and renders
//! with nothing shared between calls; failures leave as a [`ServiceError`]
//! with a stable [`ErrorKind`] and a message safe to show to clients.

use serde::Serialize;

use crate::allocator::allocate;
use crate::error::SeatplanError;
use crate::parser::load_workbook;
use crate::render::{render_document, render_preview, PreviewGrid};
use crate::rooms::{self, RoomLoad};
use crate::roster::{self, RosterLoad};
use crate::types::{Allocation, AllocationOrder, LoadWarning, RoomSpec, RowError, Student};

/// An uploaded file.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: Option<String>, bytes: Vec<u8>) -> Self {
        Self { file_name, bytes }
    }
}

/// Where the rooms come from.
#[derive(Debug, Clone)]
pub enum RoomSource {
    /// A room matrix spreadsheet.
    File(Upload),
    /// A single room described directly.
    Manual(RoomSpec),
}

/// Input of both pipelines.
#[derive(Debug, Clone)]
pub struct SeatingRequest {
    /// Required for `generate`, optional for `preview`.
    pub students: Option<Upload>,
    pub rooms: RoomSource,
    pub order: AllocationOrder,
}

/// Stable error classification at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Missing or malformed request input.
    Validation,
    /// Required columns missing or no usable content.
    Schema,
    /// Upload unreadable or corrupt.
    Upstream,
    /// Anything else; details are logged, not returned.
    Internal,
}

/// A pipeline failure with a client-safe message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ServiceError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn internal() -> Self {
        Self::new(
            ErrorKind::Internal,
            "internal error while building the seating chart",
        )
    }
}

impl From<SeatplanError> for ServiceError {
    fn from(err: SeatplanError) -> Self {
        match err {
            SeatplanError::Validation(msg) => Self::new(ErrorKind::Validation, msg),
            SeatplanError::Schema(msg) => Self::new(ErrorKind::Schema, msg),
            ref e if e.is_upstream() => Self::new(ErrorKind::Upstream, e.to_string()),
            other => {
                tracing::error!(error = %other, "pipeline failure");
                Self::internal()
            }
        }
    }
}

/// Grid size of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub rows: u32,
    pub columns: u32,
}

/// Preview of one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPreview {
    pub room_no: String,
    pub preview: Vec<String>,
    pub dimensions: Dimensions,
    /// Usable occupant places (blocked seats excluded).
    pub capacity: u64,
}

impl RoomPreview {
    fn new(room_no: &str, grid: PreviewGrid, capacity: u64) -> Self {
        Self {
            room_no: room_no.to_string(),
            dimensions: Dimensions {
                rows: grid.rows,
                columns: grid.columns,
            },
            preview: grid.grid,
            capacity,
        }
    }
}

/// Result of the preview pipeline.
///
/// `preview` and `dimensions` describe the first room; `rooms` has them all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub preview: Vec<String>,
    pub dimensions: Dimensions,
    pub rooms: Vec<RoomPreview>,
    pub unassigned_students: Vec<Student>,
    pub warnings: Vec<LoadWarning>,
    pub row_errors: Vec<RowError>,
}

/// Result of the generate pipeline.
///
/// Load diagnostics are also printed on the trailing pages of `bytes`.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub bytes: Vec<u8>,
    pub placed: usize,
    pub unassigned: usize,
    pub warnings: Vec<LoadWarning>,
    pub row_errors: Vec<RowError>,
}

/// Suggested download name of the generated document.
pub const DOCUMENT_FILE_NAME: &str = "seating_chart.pdf";

fn load_rooms(source: &RoomSource) -> Result<RoomLoad, SeatplanError> {
    match source {
        RoomSource::Manual(spec) => Ok(rooms::load_manual(*spec)),
        RoomSource::File(upload) => {
            let workbook = load_workbook(upload.file_name.as_deref(), &upload.bytes)?;
            rooms::load_matrix(&workbook)
        }
    }
}

fn load_students(upload: &Upload) -> Result<RosterLoad, SeatplanError> {
    let workbook = load_workbook(upload.file_name.as_deref(), &upload.bytes)?;
    roster::load_workbook(&workbook)
}

/// Loaded inputs plus the merged diagnostics of both loaders.
struct Loaded {
    rooms: RoomLoad,
    roster: Option<RosterLoad>,
}

impl Loaded {
    fn load(request: &SeatingRequest) -> Result<Self, SeatplanError> {
        let rooms = load_rooms(&request.rooms)?;
        let roster = request.students.as_ref().map(load_students).transpose()?;
        Ok(Self { rooms, roster })
    }

    fn allocate(&self, order: AllocationOrder) -> Allocation {
        match &self.roster {
            Some(r) => allocate(&r.roster, &self.rooms.rooms, order),
            None => Allocation::empty(order),
        }
    }

    /// Diagnostics as printable lines: skipped rows first, then warnings.
    fn notes(&self) -> Vec<String> {
        let roster = self.roster.as_ref();
        let row_errors = self
            .rooms
            .row_errors
            .iter()
            .chain(roster.into_iter().flat_map(|r| &r.row_errors));
        let warnings = self
            .rooms
            .warnings
            .iter()
            .chain(roster.into_iter().flat_map(|r| &r.warnings));
        row_errors
            .map(ToString::to_string)
            .chain(warnings.map(ToString::to_string))
            .collect()
    }

    fn into_diagnostics(self) -> (Vec<LoadWarning>, Vec<RowError>) {
        let mut warnings = self.rooms.warnings;
        let mut row_errors = self.rooms.row_errors;
        if let Some(r) = self.roster {
            warnings.extend(r.warnings);
            row_errors.extend(r.row_errors);
        }
        (warnings, row_errors)
    }
}

/// Build the room previews, seating students when a roster is given.
#[tracing::instrument(skip_all, fields(order = %request.order))]
pub fn preview(request: &SeatingRequest) -> Result<PreviewResponse, ServiceError> {
    let loaded = Loaded::load(request)?;
    let allocation = loaded.allocate(request.order);

    let rooms: Vec<RoomPreview> = loaded
        .rooms
        .rooms
        .iter()
        .enumerate()
        .map(|(idx, room)| {
            RoomPreview::new(
                &room.room_no,
                render_preview(room, idx, &allocation),
                room.usable_capacity(),
            )
        })
        .collect();
    let first = rooms.first().ok_or_else(ServiceError::internal)?;
    let (preview, dimensions) = (first.preview.clone(), first.dimensions);

    let (warnings, row_errors) = loaded.into_diagnostics();
    tracing::info!(
        rooms = rooms.len(),
        placed = allocation.placements().len(),
        unassigned = allocation.unassigned().len(),
        warnings = warnings.len(),
        row_errors = row_errors.len(),
        "preview built"
    );

    Ok(PreviewResponse {
        preview,
        dimensions,
        rooms,
        unassigned_students: allocation.unassigned().to_vec(),
        warnings,
        row_errors,
    })
}

/// Allocate every student and render the printable seating chart.
#[tracing::instrument(skip_all, fields(order = %request.order))]
pub fn generate(request: &SeatingRequest) -> Result<GeneratedDocument, ServiceError> {
    if request.students.is_none() {
        return Err(ServiceError::validation("studentsFile is required"));
    }
    let loaded = Loaded::load(request)?;
    let has_students = loaded.roster.as_ref().is_some_and(|r| !r.roster.is_empty());
    if !has_students {
        return Err(ServiceError::new(
            ErrorKind::Schema,
            "students file contains no valid students",
        ));
    }

    let allocation = loaded.allocate(request.order);
    let bytes = render_document(&loaded.rooms.rooms, &allocation, &loaded.notes())?;

    let (warnings, row_errors) = loaded.into_diagnostics();
    if !allocation.is_complete() {
        tracing::warn!(
            unassigned = allocation.unassigned().len(),
            "not every student could be seated"
        );
    }
    tracing::info!(
        placed = allocation.placements().len(),
        bytes = bytes.len(),
        warnings = warnings.len(),
        row_errors = row_errors.len(),
        "document generated"
    );

    Ok(GeneratedDocument {
        bytes,
        placed: allocation.placements().len(),
        unassigned: allocation.unassigned().len(),
        warnings,
        row_errors,
    })
}
