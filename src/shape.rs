//! Block shapes and colors
//!
//! Every tray block is a small polyomino (1 to 4 cells) drawn from a fixed
//! catalog, painted with one of 7 palette colors.

use ratatui::style::Color;

/// Largest shape extent in either axis
pub const MAX_EXTENT: usize = 4;

/// An immutable occupancy matrix, at most 4x4, stored as a bitmask.
///
/// Bit `row * MAX_EXTENT + col` is set when the cell is occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: u8,
    cols: u8,
    bits: u16,
}

impl Shape {
    /// Build a shape from a row-major 0/1 matrix
    ///
    /// Returns None for empty, ragged or oversized matrices.
    pub fn from_rows(rows: &[&[u8]]) -> Option<Self> {
        if rows.is_empty() || rows.len() > MAX_EXTENT {
            return None;
        }
        let cols = rows[0].len();
        if cols == 0 || cols > MAX_EXTENT || rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        let bits = Self::pack(rows);
        (bits != 0).then_some(Self {
            rows: rows.len() as u8,
            cols: cols as u8,
            bits,
        })
    }

    /// Compile-time constructor for catalog entries
    const fn parse(rows: &[&[u8]]) -> Self {
        let bits = Self::pack(rows);
        assert!(bits != 0, "shape must occupy at least one cell");
        Self {
            rows: rows.len() as u8,
            cols: rows[0].len() as u8,
            bits,
        }
    }

    const fn pack(rows: &[&[u8]]) -> u16 {
        let mut bits = 0u16;
        let mut r = 0;
        while r < rows.len() {
            let mut c = 0;
            while c < rows[r].len() {
                if rows[r][c] != 0 {
                    bits |= 1 << (r * MAX_EXTENT + c);
                }
                c += 1;
            }
            r += 1;
        }
        bits
    }

    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    pub fn cols(&self) -> usize {
        self.cols as usize
    }

    /// Whether the cell at (row, col) is occupied
    pub fn is_set(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.cols() && self.bits & (1 << (row * MAX_EXTENT + col)) != 0
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Iterate occupied cells as (row, col) offsets from the anchor
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (0..self.rows()).flat_map(move |r| {
            (0..self.cols())
                .filter(move |&c| self.is_set(r, c))
                .map(move |c| (r, c))
        })
    }
}

/// The shape catalog tray blocks are drawn from
pub const CATALOG: [Shape; 16] = [
    Shape::parse(&[&[1]]),
    Shape::parse(&[&[1, 1]]),
    Shape::parse(&[&[1], &[1]]),
    Shape::parse(&[&[1, 1, 1]]),
    Shape::parse(&[&[1], &[1], &[1]]),
    Shape::parse(&[&[1, 1], &[1, 1]]),
    Shape::parse(&[&[1, 0], &[1, 1]]),
    Shape::parse(&[&[1, 1], &[1, 0]]),
    Shape::parse(&[&[0, 1], &[1, 1]]),
    Shape::parse(&[&[1, 1], &[0, 1]]),
    Shape::parse(&[&[1, 1, 1, 1]]),
    Shape::parse(&[&[1], &[1], &[1], &[1]]),
    Shape::parse(&[&[0, 1, 0], &[1, 1, 1]]),
    Shape::parse(&[&[1, 1, 1], &[0, 1, 0]]),
    Shape::parse(&[&[1, 1, 1], &[1, 0, 0]]),
    Shape::parse(&[&[1, 1, 1], &[0, 0, 1]]),
];

/// The 7 block colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockColor {
    Blue,
    Pink,
    Green,
    Amber,
    Violet,
    Red,
    Teal,
}

impl BlockColor {
    /// Get all palette colors for random selection
    pub fn all() -> [BlockColor; 7] {
        [
            BlockColor::Blue,
            BlockColor::Pink,
            BlockColor::Green,
            BlockColor::Amber,
            BlockColor::Violet,
            BlockColor::Red,
            BlockColor::Teal,
        ]
    }

    /// Terminal color for rendering
    pub fn color(&self) -> Color {
        match self {
            BlockColor::Blue => Color::Rgb(0x60, 0xa5, 0xfa),
            BlockColor::Pink => Color::Rgb(0xf4, 0x72, 0xb6),
            BlockColor::Green => Color::Rgb(0x34, 0xd3, 0x99),
            BlockColor::Amber => Color::Rgb(0xfb, 0xbf, 0x24),
            BlockColor::Violet => Color::Rgb(0xa7, 0x8b, 0xfa),
            BlockColor::Red => Color::Rgb(0xf8, 0x71, 0x71),
            BlockColor::Teal => Color::Rgb(0x2d, 0xd4, 0xbf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sizes() {
        for shape in CATALOG {
            assert!((1..=4).contains(&shape.cell_count()));
            assert_eq!(shape.cells().count(), shape.cell_count());
        }
    }

    #[test]
    fn test_t_shape_cells() {
        let t = CATALOG[12];
        assert_eq!((t.rows(), t.cols()), (2, 3));
        let cells: Vec<_> = t.cells().collect();
        assert_eq!(cells, vec![(0, 1), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_from_rows_rejects_degenerate() {
        assert!(Shape::from_rows(&[]).is_none());
        assert!(Shape::from_rows(&[&[0, 0]]).is_none());
        assert!(Shape::from_rows(&[&[0], &[0], &[0]]).is_none());
        assert!(Shape::from_rows(&[&[1, 1], &[1]]).is_none());
        assert!(Shape::from_rows(&[&[1, 1, 1, 1, 1]]).is_none());
        assert_eq!(Shape::from_rows(&[&[1, 1]]), Some(CATALOG[1]));
    }

    #[test]
    fn test_palette_colors_distinct() {
        let colors = BlockColor::all().map(|c| c.color());
        for (i, a) in colors.iter().enumerate() {
            assert!(colors[i + 1..].iter().all(|b| b != a));
        }
    }
}
