//! Layout engine for seat chart pages.
//!
//! This module handles:
//! - Pre-computing seat box positions for a room grid
//! - Fitting occupant labels into their boxes

mod seat_layout;

pub use seat_layout::{fit_label, text_width, Rect, SeatLayout, MM_PER_PT};
