//! Scoring: 10 points per placed cell, 100 per cleared line

/// Points for each cell of a placed block
pub const POINTS_PER_CELL: u64 = 10;

/// Score tracking for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Total rows and columns cleared
    pub lines: u32,
    /// Blocks placed this session
    pub placed: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add score for placing a block of `cells` cells, returning the points gained
    pub fn add_placement(&mut self, cells: usize) -> u64 {
        let gained = cells as u64 * POINTS_PER_CELL;
        self.points += gained;
        self.placed += 1;
        gained
    }

    /// Add a line-clear bonus already computed by the board
    pub fn add_clear(&mut self, lines: usize, bonus: u64) {
        self.lines += lines as u32;
        self.points += bonus;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_points() {
        let mut score = Score::new();
        assert_eq!(score.add_placement(4), 40);
        assert_eq!(score.add_placement(1), 10);
        assert_eq!(score.points, 50);
        assert_eq!(score.placed, 2);
    }

    #[test]
    fn test_clear_bonus() {
        let mut score = Score::new();
        score.add_placement(3);
        score.add_clear(2, 200);
        assert_eq!(score.points, 230);
        assert_eq!(score.lines, 2);
    }
}
