//! Layout renderer.
//!
//! This module provides:
//! - A JSON-friendly preview grid per room
//! - The paginated PDF seating chart

pub mod document;
pub mod preview;

pub use document::{render_document, NOTES_TITLE, UNASSIGNED_TITLE};
pub use preview::{render_preview, PreviewGrid, BLOCKED_LABEL};
