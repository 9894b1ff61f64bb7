//! Move history: a stack of played moves with the state needed to undo them.

use crate::engine::board::UndoInfo;
use crate::engine::types::Move;

/// One played move and the position metadata from before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub mv: Move,
    pub undo: UndoInfo,
}

/// Ordered record of moves played, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameHistory {
    entries: Vec<HistoryEntry>,
}

impl GameHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mv: Move, undo: UndoInfo) {
        self.entries.push(HistoryEntry { mv, undo });
    }

    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Moves in the order they were played.
    pub fn moves(&self) -> impl Iterator<Item = &Move> {
        self.entries.iter().map(|e| &e.mv)
    }
}
