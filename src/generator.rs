//! Tray block generation
//!
//! Each block picks a shape uniformly from the catalog and a color uniformly
//! from the palette. There is no bag or lookahead: every draw is independent.

use crate::block::{Block, TRAY_SLOTS};
use crate::layout::Layout;
use crate::rng::RandomSource;
use crate::shape::{BlockColor, CATALOG};

/// Generate a block for the given tray slot
pub fn generate(rng: &mut dyn RandomSource, slot: usize, layout: &Layout) -> Block {
    let shape = CATALOG[rng.pick(CATALOG.len())];
    let palette = BlockColor::all();
    let color = palette[rng.pick(palette.len())];
    Block::new(shape, color, slot, layout)
}

/// Generate a full tray, one block per slot
pub fn fill_tray(rng: &mut dyn RandomSource, layout: &Layout) -> Vec<Block> {
    (0..TRAY_SLOTS).map(|slot| generate(rng, slot, layout)).collect()
}
