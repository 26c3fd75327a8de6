//! Grid model, placement validation and line clearing

use crate::shape::{BlockColor, Shape};

/// The grid is GRID_SIZE x GRID_SIZE cells
pub const GRID_SIZE: usize = 10;
/// Entry scale a freshly placed cell starts from
pub const ENTRY_SCALE_START: f32 = 0.0;
/// Bonus for each cleared row or column
pub const LINE_BONUS: u64 = 100;

/// A cell on the grid - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// `scale` grows from 0 to 1 as the cell pops in
    Filled { color: BlockColor, scale: f32 },
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled { .. })
    }

    pub fn color(&self) -> Option<BlockColor> {
        match self {
            Cell::Filled { color, .. } => Some(*color),
            Cell::Empty => None,
        }
    }
}

/// A cleared cell, reported so presentation can spawn a burst in its color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Burst {
    pub row: usize,
    pub col: usize,
    pub color: BlockColor,
}

/// Result of a line-clear pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineClear {
    /// Full rows, ascending
    pub rows: Vec<usize>,
    /// Full columns, ascending
    pub cols: Vec<usize>,
    /// One entry per emptied cell; cells in both a full row and column appear once
    pub bursts: Vec<Burst>,
}

impl LineClear {
    pub fn lines(&self) -> usize {
        self.rows.len() + self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines() == 0
    }

    pub fn score_delta(&self) -> u64 {
        self.lines() as u64 * LINE_BONUS
    }
}

/// The game grid
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top
    cells: [[Cell; GRID_SIZE]; GRID_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Get the cell at a position (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return None;
        }
        Some(self.cells[row][col])
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return false;
        }
        self.cells[row][col] = cell;
        true
    }

    pub fn rows(&self) -> &[[Cell; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut().flatten()
    }

    /// Check whether `shape` fits with its anchor at column `gx`, row `gy`:
    /// every occupied cell must land inside the grid on an empty cell.
    pub fn is_valid(&self, shape: Shape, gx: i32, gy: i32) -> bool {
        shape.cells().all(|(r, c)| {
            self.get(gy + r as i32, gx + c as i32)
                .is_some_and(|cell| cell.is_empty())
        })
    }

    /// Write `shape` onto the grid. The caller must have checked `is_valid`.
    pub fn place(&mut self, shape: Shape, gx: i32, gy: i32, color: BlockColor) {
        debug_assert!(self.is_valid(shape, gx, gy), "placement was not validated");
        for (r, c) in shape.cells() {
            let (row, col) = ((gy + r as i32) as usize, (gx + c as i32) as usize);
            self.cells[row][col] = Cell::Filled {
                color,
                scale: ENTRY_SCALE_START,
            };
        }
    }

    /// Whether `shape` fits at any origin on the grid
    pub fn fits_anywhere(&self, shape: Shape) -> bool {
        let max_y = GRID_SIZE.saturating_sub(shape.rows()) as i32;
        let max_x = GRID_SIZE.saturating_sub(shape.cols()) as i32;
        (0..=max_y).any(|gy| (0..=max_x).any(|gx| self.is_valid(shape, gx, gy)))
    }

    /// Clear every full row and column.
    ///
    /// Fullness is decided on the grid as it stands before anything is
    /// emptied, so a cell at a full row/column intersection counts toward both
    /// lines but is emptied (and reported) once.
    pub fn clear_lines(&mut self) -> LineClear {
        let rows: Vec<usize> = (0..GRID_SIZE).filter(|&r| self.is_row_full(r)).collect();
        let cols: Vec<usize> = (0..GRID_SIZE).filter(|&c| self.is_col_full(c)).collect();

        let mut bursts = Vec::new();
        for &row in &rows {
            for col in 0..GRID_SIZE {
                self.take_cell(row, col, &mut bursts);
            }
        }
        for &col in &cols {
            for row in 0..GRID_SIZE {
                self.take_cell(row, col, &mut bursts);
            }
        }

        LineClear { rows, cols, bursts }
    }

    fn take_cell(&mut self, row: usize, col: usize, bursts: &mut Vec<Burst>) {
        if let Cell::Filled { color, .. } = std::mem::take(&mut self.cells[row][col]) {
            bursts.push(Burst { row, col, color });
        }
    }

    fn is_row_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_filled())
    }

    fn is_col_full(&self, col: usize) -> bool {
        self.cells.iter().all(|row| row[col].is_filled())
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_filled()).count()
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::CATALOG;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const FILL: Cell = Cell::Filled {
        color: BlockColor::Blue,
        scale: 1.0,
    };

    fn full_board() -> Board {
        let mut board = Board::new();
        for row in 0..GRID_SIZE as i32 {
            for col in 0..GRID_SIZE as i32 {
                board.set(row, col, FILL);
            }
        }
        board
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert!(board.is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let mut board = Board::new();
        assert!(board.set(5, 5, FILL));
        assert_eq!(board.get(5, 5), Some(FILL));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut board = Board::new();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(GRID_SIZE as i32, 0), None);
        assert_eq!(board.get(0, GRID_SIZE as i32), None);
        assert!(!board.set(GRID_SIZE as i32, 0, FILL));
    }

    #[test]
    fn test_validity_matches_cellwise_definition() {
        let mut rng = ChaCha8Rng::seed_from_u64(0xb1a57);
        for round in 0..400 {
            let mut board = match round % 10 {
                0 => Board::new(),
                1 => full_board(),
                _ => Board::new(),
            };
            if round % 10 > 1 {
                let density = rng.gen_range(0.0..1.0);
                for row in 0..GRID_SIZE as i32 {
                    for col in 0..GRID_SIZE as i32 {
                        if rng.gen_bool(density) {
                            board.set(row, col, FILL);
                        }
                    }
                }
            }
            let shape = CATALOG[rng.gen_range(0..CATALOG.len())];
            let gx = rng.gen_range(-4..GRID_SIZE as i32 + 2);
            let gy = rng.gen_range(-4..GRID_SIZE as i32 + 2);

            let expected = shape.cells().all(|(r, c)| {
                let (x, y) = (gx + c as i32, gy + r as i32);
                (0..GRID_SIZE as i32).contains(&x)
                    && (0..GRID_SIZE as i32).contains(&y)
                    && board.rows()[y as usize][x as usize].is_empty()
            });
            assert_eq!(board.is_valid(shape, gx, gy), expected, "round {round}");
        }
    }

    #[test]
    fn test_validity_on_extremes() {
        let empty = Board::new();
        let full = full_board();
        for shape in CATALOG {
            assert!(empty.is_valid(shape, 0, 0));
            assert!(!full.is_valid(shape, 0, 0));
            assert!(!empty.is_valid(shape, -1, 0));
            assert!(!empty.is_valid(shape, GRID_SIZE as i32 - shape.cols() as i32 + 1, 0));
        }
    }

    #[test]
    fn test_empty_shape_cells_do_not_block() {
        let mut board = Board::new();
        // The S shape leaves its top-left corner free
        board.set(0, 0, FILL);
        let s = Shape::from_rows(&[&[0, 1], &[1, 1]]).unwrap();
        assert!(board.is_valid(s, 0, 0));
    }

    #[test]
    fn test_place_writes_cells_with_zero_scale() {
        let mut board = Board::new();
        let square = CATALOG[5];
        board.place(square, 3, 4, BlockColor::Teal);
        assert_eq!(board.filled_count(), 4);
        for (row, col) in [(4, 3), (4, 4), (5, 3), (5, 4)] {
            assert_eq!(
                board.get(row, col),
                Some(Cell::Filled {
                    color: BlockColor::Teal,
                    scale: 0.0
                })
            );
        }
    }

    #[test]
    fn test_clear_rows_and_column() {
        let palette = BlockColor::all();
        let color_at = |row: usize, col: usize| palette[(row * 3 + col) % palette.len()];
        let mut board = Board::new();
        for i in 0..GRID_SIZE {
            for (row, col) in [(2, i), (5, i), (i, 7)] {
                let cell = Cell::Filled {
                    color: color_at(row, col),
                    scale: 1.0,
                };
                board.set(row as i32, col as i32, cell);
            }
        }

        let clear = board.clear_lines();
        assert_eq!(clear.rows, vec![2, 5]);
        assert_eq!(clear.cols, vec![7]);
        assert_eq!(clear.score_delta(), 300);
        // 10 + 10 + 10 cells minus the two intersections
        assert_eq!(clear.bursts.len(), 28);
        assert_eq!(
            clear.bursts.iter().filter(|b| (b.row, b.col) == (2, 7)).count(),
            1
        );
        // Each burst keeps the colour the cell had before clearing
        for burst in &clear.bursts {
            assert_eq!(burst.color, color_at(burst.row, burst.col), "{burst:?}");
        }
        assert!(board.is_empty());
    }

    #[test]
    fn test_no_false_clears() {
        let mut board = full_board();
        // Knock one cell out of every row and every column
        for i in 0..GRID_SIZE as i32 {
            board.set(i, i, Cell::Empty);
        }
        let before = board.clone();

        let clear = board.clear_lines();
        assert!(clear.is_empty());
        assert_eq!(clear.score_delta(), 0);
        assert!(clear.bursts.is_empty());
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_keeps_other_cells() {
        let mut board = Board::new();
        for col in 0..GRID_SIZE as i32 {
            board.set(9, col, FILL);
        }
        board.set(8, 0, FILL);

        let clear = board.clear_lines();
        assert_eq!(clear.rows, vec![9]);
        assert_eq!(board.get(8, 0), Some(FILL));
        assert_eq!(board.filled_count(), 1);
    }

    #[test]
    fn test_fits_anywhere() {
        let mut board = full_board();
        board.set(4, 4, Cell::Empty);
        assert!(board.fits_anywhere(CATALOG[0]));
        assert!(!board.fits_anywhere(CATALOG[1]));
        assert!(!board.fits_anywhere(CATALOG[2]));
    }
}
