//! Data types for spreadsheets, rosters, rooms and allocations.

mod allocation;
mod cell;
mod diagnostics;
mod room;
mod student;
mod workbook;

pub use allocation::*;
pub use cell::*;
pub use diagnostics::*;
pub use room::*;
pub use student::*;
pub use workbook::*;
