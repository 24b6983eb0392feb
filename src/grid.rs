//! Grid bounds and the pixel ↔ cell mapping used by hosts.
//!
//! The host renders the grid stretched over an element of arbitrary CSS size.
//! `Viewport` converts between offsets inside that element and integer cell
//! coordinates, given the logical `GridSize`.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_GRID_SIZE, MIN_GRID_SIZE};
use crate::doc::Coord;

/// Logical grid dimensions in cells.
///
/// Valid coordinates run from `0` to the dimension inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: i64,
    pub height: i64,
}

impl GridSize {
    /// Dimensions below the minimum are clamped up to it.
    #[must_use]
    pub fn new(width: i64, height: i64) -> Self {
        Self { width: width.max(MIN_GRID_SIZE), height: height.max(MIN_GRID_SIZE) }
    }

    /// Whether `at` lies on the grid.
    #[must_use]
    pub fn contains(&self, at: Coord) -> bool {
        (0..=self.width).contains(&at.x) && (0..=self.height).contains(&at.y)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self { width: DEFAULT_GRID_SIZE, height: DEFAULT_GRID_SIZE }
    }
}

/// Rendered size of the grid element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 600.0, height: 600.0 }
    }
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Map an offset inside the element to the nearest cell.
    ///
    /// Returns `None` for a degenerate viewport or a click that lands off the
    /// grid. Halves round up, so an offset of `-0.5` cells still hits column 0.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn cell_at(&self, grid: GridSize, offset_x: f64, offset_y: f64) -> Option<Coord> {
        if !(self.width > 0.0 && self.height > 0.0) || !offset_x.is_finite() || !offset_y.is_finite() {
            return None;
        }
        let x = (offset_x * grid.width as f64 / self.width + 0.5).floor();
        let y = (offset_y * grid.height as f64 / self.height + 0.5).floor();
        let at = Coord::new(x as i64, y as i64);
        grid.contains(at).then_some(at)
    }

    /// Pixel offset of a cell inside the element, for drawing.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cell_to_offset(&self, grid: GridSize, at: Coord) -> (f64, f64) {
        (
            at.x as f64 / grid.width as f64 * self.width,
            at.y as f64 / grid.height as f64 * self.height,
        )
    }
}
