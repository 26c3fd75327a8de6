//! BLASTRS - block-blast puzzle core
//!
//! Drop polyomino blocks from a three-slot tray onto a 10x10 grid; full rows
//! and columns clear for bonus points and the game ends once no tray block
//! fits anywhere.

pub mod animation;
pub mod audio;
pub mod block;
pub mod board;
pub mod cue;
pub mod game;
pub mod generator;
pub mod layout;
pub mod rng;
pub mod score;
pub mod settings;
pub mod shape;
pub mod undo;

pub use cue::{Cue, CueSink};
pub use game::{DragOutcome, Game, GameSession, GameState, PlacementReport};
pub use layout::{Layout, Vec2};
