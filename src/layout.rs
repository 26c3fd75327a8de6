//! Presentation geometry shared by the controller and the renderer
//!
//! Positions are in layout units: pixels for the canvas layout, half-cell
//! steps for the terminal layout. The grid sits at the origin with the tray
//! below it.

use crate::board::GRID_SIZE;
use crate::shape::Shape;

/// A 2D point or offset in layout units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Geometry of the grid and tray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Total width of the play area
    pub width: f64,
    pub cell_size: f64,
    pub cell_gap: f64,
    /// Top edge of the tray area
    pub tray_y: f64,
    /// Offset from the tray top to the block anchors
    pub tray_offset: f64,
    /// How far above the pointer a dragged block floats
    pub drag_lift: f64,
    /// Pointer distance within which a tray block can be grabbed
    pub grab_radius: f64,
}

/// Canvas gap between cells, in pixels
pub const CANVAS_GAP: f64 = 4.0;
/// Widest canvas the reference layout grows to
pub const CANVAS_MAX_WIDTH: f64 = 420.0;

impl Layout {
    /// Pixel layout for a canvas of the given width
    pub fn canvas(width: f64) -> Self {
        let width = width.min(CANVAS_MAX_WIDTH);
        Self {
            width,
            cell_size: (width - CANVAS_GAP * (GRID_SIZE as f64 + 1.0)) / GRID_SIZE as f64,
            cell_gap: CANVAS_GAP,
            tray_y: width + 10.0,
            tray_offset: 55.0,
            drag_lift: 100.0,
            grab_radius: 60.0,
        }
    }

    /// Terminal layout: each cell is 2x2 units, one unit being two columns
    /// wide and one row tall, so a cell renders as 4 columns by 2 rows.
    pub fn terminal() -> Self {
        Self {
            width: GRID_SIZE as f64 * 2.0,
            cell_size: 2.0,
            cell_gap: 0.0,
            tray_y: GRID_SIZE as f64 * 2.0 + 1.0,
            tray_offset: 3.0,
            drag_lift: 0.0,
            grab_radius: 4.0,
        }
    }

    /// Size of this layout's cell relative to the full canvas cell, for
    /// effects tuned in canvas pixels
    pub fn effect_scale(&self) -> f64 {
        self.cell_size / Layout::default().cell_size
    }

    /// Resting position of a tray slot
    pub fn slot_anchor(&self, slot: usize) -> Vec2 {
        Vec2::new(
            (self.width / 3.0) * slot as f64 + self.width / 6.0,
            self.tray_y + self.tray_offset,
        )
    }

    /// Grid origin a shape centred at `pos` would land on
    pub fn snap(&self, shape: Shape, pos: Vec2) -> (i32, i32) {
        let pitch = self.cell_size + self.cell_gap;
        let gx = (pos.x - shape.cols() as f64 * self.cell_size / 2.0 - self.cell_gap) / pitch;
        let gy = (pos.y - shape.rows() as f64 * self.cell_size / 2.0 - self.cell_gap) / pitch;
        (round_half_up(gx), round_half_up(gy))
    }

    /// Top-left corner of a grid cell
    pub fn cell_origin(&self, row: usize, col: usize) -> Vec2 {
        let pitch = self.cell_size + self.cell_gap;
        Vec2::new(
            self.cell_gap + col as f64 * pitch,
            self.cell_gap + row as f64 * pitch,
        )
    }

    /// Centre of a grid cell
    pub fn cell_center(&self, row: usize, col: usize) -> Vec2 {
        let origin = self.cell_origin(row, col);
        Vec2::new(
            origin.x + self.cell_size / 2.0,
            origin.y + self.cell_size / 2.0,
        )
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::canvas(CANVAS_MAX_WIDTH)
    }
}

// Halves round toward +inf, so -0.5 snaps to 0 rather than -1.
fn round_half_up(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::CATALOG;

    #[test]
    fn test_canvas_sizing() {
        let layout = Layout::canvas(420.0);
        assert!((layout.cell_size - 37.6).abs() < 1e-9);
        assert_eq!(layout.tray_y, 430.0);
    }

    #[test]
    fn test_effect_scale() {
        assert_eq!(Layout::canvas(420.0).effect_scale(), 1.0);
        assert!((Layout::terminal().effect_scale() - 2.0 / 37.6).abs() < 1e-9);
    }

    #[test]
    fn test_canvas_width_is_capped() {
        assert_eq!(Layout::canvas(1000.0), Layout::canvas(420.0));
    }

    #[test]
    fn test_slot_anchors_spread_across_width() {
        let layout = Layout::canvas(420.0);
        assert_eq!(layout.slot_anchor(0), Vec2::new(70.0, 485.0));
        assert_eq!(layout.slot_anchor(1), Vec2::new(210.0, 485.0));
        assert_eq!(layout.slot_anchor(2), Vec2::new(350.0, 485.0));
    }

    #[test]
    fn test_snap_round_trips_cell_centres() {
        let layout = Layout::canvas(420.0);
        let single = CATALOG[0];
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let centre = layout.cell_center(row, col);
                assert_eq!(layout.snap(single, centre), (col as i32, row as i32));
            }
        }
    }

    #[test]
    fn test_terminal_snap() {
        let layout = Layout::terminal();
        // A 1x2 bar centred on x = 6 covers columns 2..3 (units 4..8)
        assert_eq!(layout.snap(CATALOG[1], Vec2::new(6.0, 1.0)), (2, 0));
    }
}
