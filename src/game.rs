//! Core game state and logic

use crate::animation::{self, BURST_PARTICLES, PLACE_PARTICLES, Particles};
use crate::block::Block;
use crate::board::{Board, LineClear};
use crate::cue::{Cue, CueSink, NullSink};
use crate::generator::fill_tray;
use crate::layout::{Layout, Vec2};
use crate::rng::{RandomSource, SeededRng};
use crate::score::Score;
use crate::shape::BlockColor;
use crate::undo::{UndoManager, UndoSnapshot};
use tracing::{debug, info};

/// Particle speed for the landing puff
const PLACE_SPEED: f64 = 0.8;
/// Particle speed for cleared cells
const BURST_SPEED: f64 = 1.5;
/// Mixed into a replay seed to seed the effects stream
const FX_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    GameOver,
}

/// Text shown when lines clear, cycled in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Callout {
    pub text: &'static str,
    pub color: BlockColor,
}

pub const CALLOUTS: [Callout; 5] = [
    Callout { text: "GASSKEUNN!", color: BlockColor::Blue },
    Callout { text: "GOKILS!", color: BlockColor::Pink },
    Callout { text: "JAGO BET!", color: BlockColor::Green },
    Callout { text: "BERAPI-API!", color: BlockColor::Amber },
    Callout { text: "GGWP!", color: BlockColor::Red },
];

/// What a successful placement did
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementReport {
    pub slot: usize,
    /// Grid origin as (column, row)
    pub origin: (i32, i32),
    /// Points from the placed cells alone
    pub points: u64,
    pub clear: LineClear,
    pub callout: Option<Callout>,
    /// Whether the tray was emptied and dealt again
    pub refilled: bool,
    pub game_over: bool,
}

/// Result of dropping a block
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    Placed(PlacementReport),
    Rejected,
}

/// Everything that lives from one reset to the next
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    tray: Vec<Block>,
    score: Score,
    effect_index: usize,
    state: GameState,
    undo: UndoManager,
}

impl GameSession {
    /// Fresh session: empty grid, full tray, nothing to undo
    pub fn new(rng: &mut dyn RandomSource, layout: &Layout) -> Self {
        Self {
            board: Board::new(),
            tray: fill_tray(rng, layout),
            score: Score::new(),
            effect_index: 0,
            state: GameState::Playing,
            undo: UndoManager::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tray(&self) -> &[Block] {
        &self.tray
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn effect_index(&self) -> usize {
        self.effect_index
    }

    pub fn can_undo(&self) -> bool {
        self.state == GameState::Playing && self.undo.is_available()
    }

    /// Remember the current state as the undo point
    fn snapshot(&mut self) {
        self.undo.capture(UndoSnapshot {
            board: self.board.clone(),
            score: self.score,
            tray: self.tray.clone(),
            effect_index: self.effect_index,
        });
    }

    /// Roll back to the undo point, consuming it
    fn restore(&mut self, layout: &Layout) -> bool {
        let Some(snapshot) = self.undo.take() else {
            return false;
        };
        self.board = snapshot.board;
        self.score = snapshot.score;
        self.tray = snapshot.tray;
        self.effect_index = snapshot.effect_index;
        for block in &mut self.tray {
            block.return_home(layout);
        }
        true
    }

    fn block_index(&self, slot: usize) -> Option<usize> {
        self.tray.iter().position(|b| b.slot == slot)
    }
}

/// Whether any tray block fits anywhere on the board
pub fn has_any_move(tray: &[Block], board: &Board) -> bool {
    tray.iter().any(|block| board.fits_anywhere(block.shape))
}

/// The game controller: owns the session and turns input into rule steps
pub struct Game<S: CueSink = NullSink> {
    session: GameSession,
    layout: Layout,
    /// Draws tray blocks
    rng: Box<dyn RandomSource>,
    /// Re-seed the block source on reset so every game deals the same blocks
    replay_seed: Option<u64>,
    /// Effects only, kept apart so sparks never shift the block sequence
    fx_rng: Box<dyn RandomSource>,
    sink: S,
    /// Slot of the block being dragged
    dragging: Option<usize>,
    particles: Particles,
}

impl Game<NullSink> {
    /// Create a new game with a random seed and no cue listener
    pub fn new(layout: Layout) -> Self {
        Self::with_rng(Box::new(SeededRng::from_entropy()), layout, NullSink)
    }
}

impl<S: CueSink> Game<S> {
    /// Create a game whose every reset replays the blocks and sparks fixed by `seed`
    pub fn with_seed(seed: u64, layout: Layout, sink: S) -> Self {
        let mut game = Self::with_rng(Box::new(SeededRng::new(seed)), layout, sink)
            .with_effects_rng(Box::new(SeededRng::new(seed ^ FX_SEED_SALT)));
        game.replay_seed = Some(seed);
        game
    }

    /// Create a game drawing blocks from `rng`
    pub fn with_rng(mut rng: Box<dyn RandomSource>, layout: Layout, sink: S) -> Self {
        let session = GameSession::new(rng.as_mut(), &layout);
        Self {
            session,
            layout,
            rng,
            replay_seed: None,
            fx_rng: Box::new(SeededRng::from_entropy()),
            sink,
            dragging: None,
            particles: Particles::new(layout.effect_scale()),
        }
    }

    /// Draw particle effects from `fx_rng` instead of OS entropy
    pub fn with_effects_rng(mut self, fx_rng: Box<dyn RandomSource>) -> Self {
        self.fx_rng = fx_rng;
        self
    }

    /// Throw away the current session and start over
    pub fn reset(&mut self) -> &GameSession {
        if let Some(seed) = self.replay_seed {
            self.rng = Box::new(SeededRng::new(seed));
            self.fx_rng = Box::new(SeededRng::new(seed ^ FX_SEED_SALT));
        }
        self.session = GameSession::new(self.rng.as_mut(), &self.layout);
        self.dragging = None;
        info!(seed = ?self.replay_seed, "New game");
        &self.session
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn board(&self) -> &Board {
        &self.session.board
    }

    pub fn tray(&self) -> &[Block] {
        &self.session.tray
    }

    pub fn score(&self) -> u64 {
        self.session.score.points
    }

    pub fn is_over(&self) -> bool {
        self.session.is_over()
    }

    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn particles(&self) -> &Particles {
        &self.particles
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// The block currently being dragged
    pub fn dragging(&self) -> Option<&Block> {
        let slot = self.dragging?;
        self.session.tray.iter().find(|b| b.slot == slot)
    }

    /// Grab the tray block nearest to `pointer`, if one is within reach
    pub fn drag_start(&mut self, pointer: Vec2) -> Option<usize> {
        if self.is_over() {
            return None;
        }
        let radius = self.layout.grab_radius;
        let slot = self
            .session
            .tray
            .iter()
            .map(|b| (b.slot, b.pos.distance(pointer)))
            .filter(|&(_, d)| d < radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(slot, _)| slot)?;
        self.dragging = Some(slot);
        self.drag_move(pointer);
        Some(slot)
    }

    /// Steer the dragged block toward `pointer`
    pub fn drag_move(&mut self, pointer: Vec2) {
        let lifted = Vec2::new(pointer.x, pointer.y - self.layout.drag_lift);
        if let Some(block) = self.dragged_mut() {
            block.target = lifted;
        }
    }

    /// Drop the dragged block where it is drawn
    ///
    /// Returns None when nothing was being dragged.
    pub fn drag_end(&mut self) -> Option<DragOutcome> {
        let slot = self.dragging.take()?;
        let block = self.session.tray.iter().find(|b| b.slot == slot)?;
        let (gx, gy) = self.layout.snap(block.shape, block.pos);

        let outcome = self.place(slot, gx, gy);
        if outcome == DragOutcome::Rejected {
            if let Some(idx) = self.session.block_index(slot) {
                self.session.tray[idx].return_home(&self.layout);
            }
        }
        Some(outcome)
    }

    /// Grid origin the dragged block would land on, when the drop is legal
    pub fn preview(&self) -> Option<(i32, i32)> {
        let block = self.dragging()?;
        let (gx, gy) = self.layout.snap(block.shape, block.pos);
        self.session
            .board
            .is_valid(block.shape, gx, gy)
            .then_some((gx, gy))
    }

    /// Place the block in `slot` with its anchor at column `gx`, row `gy`
    pub fn place(&mut self, slot: usize, gx: i32, gy: i32) -> DragOutcome {
        if self.is_over() {
            return DragOutcome::Rejected;
        }
        let Some(idx) = self.session.block_index(slot) else {
            return DragOutcome::Rejected;
        };
        let block = &self.session.tray[idx];
        if !self.session.board.is_valid(block.shape, gx, gy) {
            return DragOutcome::Rejected;
        }

        self.session.snapshot();
        let block = self.session.tray.remove(idx);
        if self.dragging == Some(slot) {
            self.dragging = None;
        }

        self.particles.burst(
            block.pos,
            block.color,
            PLACE_PARTICLES,
            PLACE_SPEED,
            self.fx_rng.as_mut(),
        );
        self.session.board.place(block.shape, gx, gy, block.color);
        let points = self.session.score.add_placement(block.shape.cell_count());
        self.sink.cue(Cue::Place);
        debug!(slot, gx, gy, points, "Placed block");

        let clear = self.session.board.clear_lines();
        let callout = self.apply_clear(&clear);

        let refilled = self.session.tray.is_empty();
        if refilled {
            self.session.tray = fill_tray(self.rng.as_mut(), &self.layout);
        }

        let game_over = !has_any_move(&self.session.tray, &self.session.board);
        if game_over {
            self.session.state = GameState::GameOver;
            self.dragging = None;
            self.sink.cue(Cue::GameOver);
            info!(score = self.session.score.points, "Game over");
        }

        DragOutcome::Placed(PlacementReport {
            slot,
            origin: (gx, gy),
            points,
            clear,
            callout,
            refilled,
            game_over,
        })
    }

    /// Score a line clear and raise its effects
    fn apply_clear(&mut self, clear: &LineClear) -> Option<Callout> {
        if clear.is_empty() {
            return None;
        }
        self.session
            .score
            .add_clear(clear.lines(), clear.score_delta());
        self.sink.cue(Cue::LineClear);

        let callout = CALLOUTS[self.session.effect_index];
        self.session.effect_index = (self.session.effect_index + 1) % CALLOUTS.len();

        for burst in &clear.bursts {
            let centre = self.layout.cell_center(burst.row, burst.col);
            self.particles.burst(
                centre,
                burst.color,
                BURST_PARTICLES,
                BURST_SPEED,
                self.fx_rng.as_mut(),
            );
        }
        info!(
            rows = ?clear.rows,
            cols = ?clear.cols,
            bonus = clear.score_delta(),
            "Cleared lines"
        );
        Some(callout)
    }

    /// Roll back the last placement. Only allowed while playing.
    pub fn undo(&mut self) -> bool {
        if self.is_over() {
            return false;
        }
        let restored = self.session.restore(&self.layout);
        if restored {
            self.dragging = None;
            debug!(score = self.session.score.points, "Undo");
        }
        restored
    }

    /// Advance presentation by one frame
    pub fn tick(&mut self) {
        animation::grow_cells(&mut self.session.board);
        for block in &mut self.session.tray {
            block.step();
        }
        self.particles.update();
    }

    fn dragged_mut(&mut self) -> Option<&mut Block> {
        let slot = self.dragging?;
        self.session.tray.iter_mut().find(|b| b.slot == slot)
    }
}
