//! seatplan - seat allocation and layout engine
//!
//! Turns a student roster and a set of rooms into a deterministic seat
//! assignment, a per-room preview grid and a printable PDF seating chart:
//! - Rosters and room matrices from XLSX, CSV or TSV uploads
//! - Roll-number or alphabetical placement with natural ordering
//! - Blocked seats, shared benches, multi-room overflow
//! - HTTP façade (`axum`) and a command line front-end
//!
//! # Usage
//!
//! ```no_run
//! use seatplan::{service, AllocationOrder, RoomSource, RoomSpec, SeatingRequest, Upload};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let students = std::fs::read("students.xlsx")?;
//! let request = SeatingRequest {
//!     students: Some(Upload::new(Some("students.xlsx".into()), students)),
//!     rooms: RoomSource::Manual(RoomSpec::new(5, 6, 1)?),
//!     order: AllocationOrder::Roll,
//! };
//! let chart = service::generate(&request)?;
//! std::fs::write("seating_chart.pdf", chart.bytes)?;
//! # Ok(())
//! # }
//! ```

// Input codecs
pub mod cell_ref;
pub mod csv;
pub mod error;
pub mod parser;
pub mod table;
pub mod types;
pub mod xml_helpers;

// Loading and allocation
pub mod allocator;
pub mod rooms;
pub mod roster;

// Output
pub mod export;
pub mod layout;
pub mod render;

// Boundary
pub mod server;
pub mod service;

pub use allocator::allocate;
pub use error::{Result, SeatplanError};
pub use service::{
    ErrorKind, GeneratedDocument, PreviewResponse, RoomSource, SeatingRequest, ServiceError,
    Upload,
};
pub use types::*;

/// Get the library version
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
