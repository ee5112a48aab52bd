//! Spatial quantization onto a fixed-size square grid.
//!
//! Rounding uses round-half-to-even so boundary points resolve the same way
//! on every run. Two points less than one grid size apart may still land in
//! different cells near a boundary; that is an accepted approximation of the
//! scheme, not a defect.

/// A grid cell, identified by its integer (row, column) indices in the
/// planar system.
///
/// The identity is integral so cell equality is exact and the natural
/// `(cell_y, cell_x)` ordering is the derived lexicographic `Ord`. The
/// quantized planar coordinate of the cell center is `index * grid_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    pub y_index: i64,
    pub x_index: i64,
}

impl GridCell {
    /// Snap a projected (y, x) point to its grid cell.
    pub fn from_projected(y: f64, x: f64, grid_size: f64) -> Self {
        Self {
            y_index: (y / grid_size).round_ties_even() as i64,
            x_index: (x / grid_size).round_ties_even() as i64,
        }
    }

    /// Planar (y, x) coordinates of the cell center.
    pub fn center(&self, grid_size: f64) -> (f64, f64) {
        (
            self.y_index as f64 * grid_size,
            self.x_index as f64 * grid_size,
        )
    }
}

/// Snap a single planar coordinate to the center of its grid interval:
/// `round(value / grid_size) * grid_size`, with ties rounding to even.
pub fn quantize(value: f64, grid_size: f64) -> f64 {
    (value / grid_size).round_ties_even() * grid_size
}
