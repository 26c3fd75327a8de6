//! Single-level undo
//!
//! A snapshot is a plain structural clone of the session state taken right
//! before a placement. Only the latest one is kept and it is consumed on use.

use crate::block::Block;
use crate::board::Board;
use crate::score::Score;

/// Everything a placement can change
#[derive(Debug, Clone, PartialEq)]
pub struct UndoSnapshot {
    pub board: Board,
    pub score: Score,
    pub tray: Vec<Block>,
    pub effect_index: usize,
}

/// Holds at most one snapshot
#[derive(Debug, Clone, Default)]
pub struct UndoManager {
    slot: Option<UndoSnapshot>,
}

impl UndoManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a snapshot, replacing any previous one
    pub fn capture(&mut self, snapshot: UndoSnapshot) {
        self.slot = Some(snapshot);
    }

    /// Take the snapshot out, leaving nothing behind
    pub fn take(&mut self) -> Option<UndoSnapshot> {
        self.slot.take()
    }

    pub fn is_available(&self) -> bool {
        self.slot.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(points: u64) -> UndoSnapshot {
        UndoSnapshot {
            board: Board::new(),
            score: Score {
                points,
                ..Score::default()
            },
            tray: Vec::new(),
            effect_index: 0,
        }
    }

    #[test]
    fn test_capture_overwrites() {
        let mut undo = UndoManager::new();
        undo.capture(snapshot(10));
        undo.capture(snapshot(20));
        assert_eq!(undo.take().map(|s| s.score.points), Some(20));
    }

    #[test]
    fn test_take_is_single_use() {
        let mut undo = UndoManager::new();
        assert!(!undo.is_available());
        undo.capture(snapshot(10));
        assert!(undo.is_available());
        assert!(undo.take().is_some());
        assert!(undo.take().is_none());
        assert!(!undo.is_available());
    }
}
