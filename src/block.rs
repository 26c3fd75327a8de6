//! Tray blocks waiting to be dragged onto the grid

use crate::animation::{LERP_FACTOR, ease};
use crate::layout::{Layout, Vec2};
use crate::shape::{BlockColor, Shape};

/// Number of tray slots
pub const TRAY_SLOTS: usize = 3;
/// Presentation scale a new block enters at
pub const SPAWN_SCALE: f64 = 0.5;

/// A block in the tray
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub shape: Shape,
    pub color: BlockColor,
    /// Tray slot this block belongs to
    pub slot: usize,
    /// Rendered position (centre of the block)
    pub pos: Vec2,
    /// Position the block eases toward
    pub target: Vec2,
    /// Presentation scale, grows toward 1
    pub scale: f64,
}

impl Block {
    /// Create a block resting at its slot anchor
    pub fn new(shape: Shape, color: BlockColor, slot: usize, layout: &Layout) -> Self {
        let anchor = layout.slot_anchor(slot);
        Self {
            shape,
            color,
            slot,
            pos: anchor,
            target: anchor,
            scale: SPAWN_SCALE,
        }
    }

    /// Send the block back to its slot
    pub fn return_home(&mut self, layout: &Layout) {
        self.target = layout.slot_anchor(self.slot);
    }

    /// Advance one frame of easing
    pub fn step(&mut self) {
        self.pos.x = ease(self.pos.x, self.target.x, LERP_FACTOR);
        self.pos.y = ease(self.pos.y, self.target.y, LERP_FACTOR);
        if self.scale < 1.0 {
            self.scale = ease(self.scale, 1.0, LERP_FACTOR);
        }
    }

    pub fn is_settled(&self, epsilon: f64) -> bool {
        self.pos.distance(self.target) < epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::CATALOG;

    #[test]
    fn test_new_block_rests_at_anchor() {
        let layout = Layout::default();
        let block = Block::new(CATALOG[3], BlockColor::Red, 2, &layout);
        assert_eq!(block.pos, layout.slot_anchor(2));
        assert!(block.scale < 1.0);
        assert!(block.is_settled(1e-9));
    }

    #[test]
    fn test_step_moves_toward_target() {
        let layout = Layout::default();
        let mut block = Block::new(CATALOG[0], BlockColor::Blue, 0, &layout);
        block.target = Vec2::new(block.pos.x + 100.0, block.pos.y);
        block.step();
        assert!((block.target.x - block.pos.x - 65.0).abs() < 1e-9);
        assert!(block.scale > SPAWN_SCALE);
    }

    #[test]
    fn test_return_home() {
        let layout = Layout::default();
        let mut block = Block::new(CATALOG[0], BlockColor::Blue, 1, &layout);
        block.pos = Vec2::new(0.0, 0.0);
        block.return_home(&layout);
        for _ in 0..80 {
            block.step();
        }
        assert!(block.is_settled(1e-3));
    }
}
