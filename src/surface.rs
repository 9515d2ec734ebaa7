//! Drawing contract between the simulation and whatever presents it.
//!
//! Entities draw themselves in logical playfield units
//! ([`FIELD_WIDTH`](crate::constants::FIELD_WIDTH) ×
//! [`FIELD_HEIGHT`](crate::constants::FIELD_HEIGHT)); scaling to real pixels or
//! terminal cells is the surface's job.

pub use crossterm::style::Color;

use crate::collision::Rect;

pub trait Surface {
    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw text whose centre is at `(x, y)`.
    fn text(&mut self, x: f32, y: f32, text: &str, color: Color);
}
