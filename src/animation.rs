//! Per-frame interpolation: cell pop-in, block easing and particles
//!
//! Nothing here touches game rules; it only relaxes presentation values
//! toward their targets once per rendered frame.

use crate::board::{Board, Cell};
use crate::layout::Vec2;
use crate::rng::RandomSource;
use crate::shape::BlockColor;

/// Fraction of the remaining distance covered each frame
pub const LERP_FACTOR: f64 = 0.35;
/// Entry scale added to a freshly placed cell each frame
pub const ENTRY_STEP: f32 = 0.15;

/// Particles spawned where a block lands
pub const PLACE_PARTICLES: usize = 15;
/// Particles spawned per cleared cell
pub const BURST_PARTICLES: usize = 8;

const GRAVITY: f64 = 0.2;
const FADE: f64 = 0.03;

/// Move `current` a fixed fraction of the way to `target`
pub fn ease(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}

/// Grow every filled cell's entry scale by one step, stopping at 1
pub fn grow_cells(board: &mut Board) {
    for cell in board.cells_mut() {
        if let Cell::Filled { scale, .. } = cell {
            if *scale < 1.0 {
                *scale = (*scale + ENTRY_STEP).min(1.0);
            }
        }
    }
}

/// A short-lived spark
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: BlockColor,
    pub size: f64,
    pub alpha: f64,
    gravity: f64,
}

impl Particle {
    /// Spark with pixel-tuned speed and size shrunk by `scale`
    pub fn new(
        pos: Vec2,
        color: BlockColor,
        speed: f64,
        scale: f64,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let size = (rng.next_f64() * 8.0 + 4.0) * scale;
        let vx = (rng.next_f64() - 0.5) * 15.0 * speed * scale;
        let vy = (rng.next_f64() - 0.5) * 15.0 * speed * scale;
        Self {
            pos,
            vel: Vec2::new(vx, vy),
            color,
            size,
            alpha: 1.0,
            gravity: GRAVITY * scale,
        }
    }

    pub fn update(&mut self) {
        self.pos.x += self.vel.x;
        self.pos.y += self.vel.y;
        self.vel.y += self.gravity;
        self.alpha -= FADE;
    }

    pub fn is_alive(&self) -> bool {
        self.alpha > 0.0
    }
}

/// The live particle set
#[derive(Debug, Clone)]
pub struct Particles {
    items: Vec<Particle>,
    /// Layout units per canvas pixel
    scale: f64,
}

impl Particles {
    pub fn new(scale: f64) -> Self {
        Self {
            items: Vec::new(),
            scale,
        }
    }

    /// Spawn `count` particles at `pos`
    pub fn burst(
        &mut self,
        pos: Vec2,
        color: BlockColor,
        count: usize,
        speed: f64,
        rng: &mut dyn RandomSource,
    ) {
        let scale = self.scale;
        self.items
            .extend((0..count).map(|_| Particle::new(pos, color, speed, scale, rng)));
    }

    /// Advance every particle and drop the faded ones
    pub fn update(&mut self) {
        for p in &mut self.items {
            p.update();
        }
        self.items.retain(Particle::is_alive);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
