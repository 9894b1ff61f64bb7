//! Stateful game controller wrapping Position.
//!
//! `GameState` owns the board, the move history and the checkmate /
//! stalemate flags. It is the only type the transport layer mutates, and
//! every mutation goes through `apply_move`, `undo` or `reset`.

use tracing::debug;

use crate::engine::board::Position;
use crate::engine::history::GameHistory;
use crate::engine::legality;
use crate::engine::types::{ChessError, Color, GameStatus, Move, Piece, Square};

// =========================================================================
// GameState
// =========================================================================

/// One game session: position, history and end-of-game flags.
#[derive(Clone, Debug)]
pub struct GameState {
    position: Position,
    history: GameHistory,
    /// Set by the most recent `legal_moves()` call.
    checkmate: bool,
    stalemate: bool,
}

impl GameState {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Create a new game from the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::starting())
    }

    /// Start a game from an already validated position (see
    /// [`Position::from_pieces`]). History starts empty.
    pub fn from_position(position: Position) -> Self {
        Self {
            position,
            history: GameHistory::new(),
            checkmate: false,
            stalemate: false,
        }
    }

    /// Back to the starting position with an empty history.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// Current board position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Side to move.
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    pub fn history(&self) -> &GameHistory {
        &self.history
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.history.last().map(|e| &e.mv)
    }

    /// Checkmate flag as of the last `legal_moves()` call.
    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    /// Stalemate flag as of the last `legal_moves()` call.
    pub fn is_stalemate(&self) -> bool {
        self.stalemate
    }

    /// Piece on (row, col), row 0 being rank 8.
    pub fn piece_at(&self, row: usize, col: usize) -> Result<Option<Piece>, ChessError> {
        let sq = Square::new(row, col)?;
        Ok(self.position.piece_at(sq))
    }

    /// Status of the current position, computed fresh.
    pub fn status(&self) -> GameStatus {
        let mut scratch = self.position.clone();
        legality::legal_move_set(&mut scratch).status()
    }

    // -----------------------------------------------------------------
    // Move generation
    // -----------------------------------------------------------------

    /// Legal moves for the side to move. Also refreshes the checkmate and
    /// stalemate flags for the current position.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let set = legality::legal_move_set(&mut self.position);
        self.checkmate = set.moves.is_empty() && set.in_check;
        self.stalemate = set.moves.is_empty() && !set.in_check;
        set.moves
    }

    /// Legal moves starting on `from`.
    pub fn legal_moves_from(&mut self, from: Square) -> Vec<Move> {
        self.legal_moves()
            .into_iter()
            .filter(|m| m.from == from)
            .collect()
    }

    // -----------------------------------------------------------------
    // Make / undo
    // -----------------------------------------------------------------

    /// Play a move. The move must be in the current legal set; nothing is
    /// mutated when it is not.
    pub fn apply_move(&mut self, mv: &Move) -> Result<(), ChessError> {
        if !self.legal_moves().contains(mv) {
            return Err(ChessError::IllegalMove {
                mv: mv.to_string(),
                reason: "not in the legal move set".into(),
            });
        }

        let undo = self.position.make_move(mv);
        self.history.push(*mv, undo);
        self.checkmate = false;
        self.stalemate = false;
        debug!(mv = %mv, ply = self.history.len(), "move applied");

        #[cfg(debug_assertions)]
        self.position.assert_consistent();

        Ok(())
    }

    /// Parse coordinate text such as "e2e4" and play it.
    pub fn play(&mut self, text: &str) -> Result<Move, ChessError> {
        let mv = self.parse_move(text)?;
        self.apply_move(&mv)?;
        Ok(mv)
    }

    /// Take back the last move. Returns `None` (and changes nothing) when
    /// there is no history.
    pub fn undo(&mut self) -> Option<Move> {
        let entry = self.history.pop()?;
        self.position.undo_move(&entry.mv, &entry.undo);
        self.checkmate = false;
        self.stalemate = false;
        debug!(mv = %entry.mv, ply = self.history.len(), "move undone");

        #[cfg(debug_assertions)]
        self.position.assert_consistent();

        Some(entry.mv)
    }

    // -----------------------------------------------------------------
    // Coordinate notation
    // -----------------------------------------------------------------

    /// Start square followed by end square, e.g. "e2e4". Promotions carry
    /// no suffix since they always become a queen.
    pub fn to_coordinate_string(mv: &Move) -> String {
        mv.to_string()
    }

    /// Resolve coordinate text against the current legal move set.
    pub fn parse_move(&mut self, text: &str) -> Result<Move, ChessError> {
        let text = text.trim();
        let (from, to) = match (text.get(0..2), text.get(2..)) {
            (Some(a), Some(b)) => (
                Square::from_algebraic(a).ok_or_else(|| ChessError::InvalidSquare(a.into()))?,
                Square::from_algebraic(b).ok_or_else(|| ChessError::InvalidSquare(b.into()))?,
            ),
            _ => return Err(ChessError::InvalidSquare(text.into())),
        };

        match self.position.piece_at(from) {
            Some(p) if p.color == self.side_to_move() => {}
            _ => {
                return Err(ChessError::IllegalMove {
                    mv: text.into(),
                    reason: format!("no {} piece on {from}", self.side_to_move()),
                });
            }
        }

        self.legal_moves()
            .into_iter()
            .find(|m| m.from == from && m.to == to)
            .ok_or_else(|| ChessError::IllegalMove {
                mv: text.into(),
                reason: "not in the legal move set".into(),
            })
    }

    /// Played moves in coordinate notation, oldest first.
    pub fn move_log(&self) -> Vec<String> {
        self.history.moves().map(Self::to_coordinate_string).collect()
    }

    // -----------------------------------------------------------------
    // Board array (for API responses)
    // -----------------------------------------------------------------

    /// 8×8 board array, row 0 = rank 8. Pieces are like "wP", "bK";
    /// empty squares are "--".
    pub fn board_codes(&self) -> [[String; 8]; 8] {
        std::array::from_fn(|row| {
            std::array::from_fn(|col| {
                match self.position.piece_at(Square::at(row as u8, col as u8)) {
                    Some(p) => p.code(),
                    None => "--".to_string(),
                }
            })
        })
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
