//! Board state: the 8×8 grid plus positional metadata.
//!
//! The grid is the sole source of truth for occupancy. The king-location
//! cache is redundant and is only ever written by `apply_raw` / `invert_raw`
//! (and derived once at construction), so it cannot drift from the grid.

use std::ops::Deref;

use crate::engine::types::{
    CastlingRights, ChessError, Color, Move, Piece, PieceType, Square,
};

/// Back-rank layout from the a-file to the h-file.
const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// State that cannot be recovered from a move alone, saved before each move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UndoInfo {
    pub castling_rights: CastlingRights,
    pub en_passant: Option<Square>,
}

/// Complete board state for one game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    squares: [[Option<Piece>; 8]; 8],
    king_squares: [Square; 2],
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    /// Square skipped by a two-square pawn advance on the previous ply.
    pub en_passant: Option<Square>,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl Position {
    /// Standard starting position, White to move, all castling rights.
    pub fn starting() -> Self {
        let mut squares = [[None; 8]; 8];
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            squares[0][col] = Some(Piece::new(Color::Black, kind));
            squares[1][col] = Some(Piece::new(Color::Black, PieceType::Pawn));
            squares[6][col] = Some(Piece::new(Color::White, PieceType::Pawn));
            squares[7][col] = Some(Piece::new(Color::White, kind));
        }
        Position {
            squares,
            king_squares: [Square::at(7, 4), Square::at(0, 4)],
            side_to_move: Color::White,
            castling_rights: CastlingRights::ALL,
            en_passant: None,
        }
    }

    /// Build a position from an explicit placement.
    ///
    /// This is the validation gate for boards that did not come from
    /// `starting()`: exactly one king per colour is required and the king
    /// cache is derived from the placement.
    pub fn from_pieces(
        pieces: &[(Square, Piece)],
        side_to_move: Color,
        castling_rights: CastlingRights,
    ) -> Result<Self, ChessError> {
        let mut squares = [[None; 8]; 8];
        let mut kings: [Vec<Square>; 2] = [Vec::new(), Vec::new()];

        for &(sq, piece) in pieces {
            let cell = &mut squares[sq.row as usize][sq.col as usize];
            if cell.is_some() {
                return Err(ChessError::InvalidPosition(format!(
                    "{sq} is occupied twice"
                )));
            }
            *cell = Some(piece);
            if piece.kind == PieceType::King {
                kings[piece.color.index()].push(sq);
            }
        }

        let mut king_squares = [Square::at(0, 0); 2];
        for color in [Color::White, Color::Black] {
            match kings[color.index()].as_slice() {
                [sq] => king_squares[color.index()] = *sq,
                found => {
                    return Err(ChessError::InvalidPosition(format!(
                        "{color} has {} kings (expected 1)",
                        found.len()
                    )));
                }
            }
        }

        Ok(Position {
            squares,
            king_squares,
            side_to_move,
            castling_rights,
            en_passant: None,
        })
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// What piece (if any) is on a given square?
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row as usize][sq.col as usize]
    }

    /// Cached king square for the given colour.
    #[inline]
    pub fn king_sq(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    /// Every occupied square with its piece, in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        (0..8u8).flat_map(move |row| {
            (0..8u8).filter_map(move |col| {
                let sq = Square::at(row, col);
                self.piece_at(sq).map(|p| (sq, p))
            })
        })
    }

    // -----------------------------------------------------------------------
    // Raw mutation (no legality logic)
    // -----------------------------------------------------------------------

    #[inline]
    fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.row as usize][sq.col as usize] = piece;
    }

    /// Unconditionally carry out `mv` on the grid.
    fn apply_raw(&mut self, mv: &Move) {
        self.set(mv.from, None);
        if mv.flags.is_en_passant() {
            self.set(mv.capture_square(), None);
        }
        self.set(mv.to, Some(mv.landing_piece()));

        if mv.flags.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(mv);
            let rook = self.piece_at(rook_from);
            self.set(rook_from, None);
            self.set(rook_to, rook);
        }

        if mv.piece.kind == PieceType::King {
            self.king_squares[mv.piece.color.index()] = mv.to;
        }
    }

    /// Exact inverse of `apply_raw`.
    fn invert_raw(&mut self, mv: &Move) {
        if mv.flags.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(mv);
            let rook = self.piece_at(rook_to);
            self.set(rook_to, None);
            self.set(rook_from, rook);
        }

        self.set(mv.to, None);
        self.set(mv.capture_square(), mv.captured);
        self.set(mv.from, Some(mv.piece));

        if mv.piece.kind == PieceType::King {
            self.king_squares[mv.piece.color.index()] = mv.from;
        }
    }

    // -----------------------------------------------------------------------
    // Make / Undo move
    // -----------------------------------------------------------------------

    /// Apply a move. Returns the `UndoInfo` needed to reverse it.
    ///
    /// The caller is responsible for passing a move generated for this
    /// position; no legality is checked here.
    pub fn make_move(&mut self, mv: &Move) -> UndoInfo {
        let undo = UndoInfo {
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
        };

        self.apply_raw(mv);
        self.castling_rights.revoke_for_move(mv);

        // En passant is only ever available on the very next ply.
        self.en_passant = if mv.piece.kind == PieceType::Pawn
            && mv.from.row.abs_diff(mv.to.row) == 2
        {
            Some(Square::at((mv.from.row + mv.to.row) / 2, mv.from.col))
        } else {
            None
        };

        self.side_to_move = !self.side_to_move;
        undo
    }

    /// Reverse a move previously applied with `make_move`.
    pub fn undo_move(&mut self, mv: &Move, undo: &UndoInfo) {
        self.side_to_move = !self.side_to_move;
        self.invert_raw(mv);
        self.castling_rights = undo.castling_rights;
        self.en_passant = undo.en_passant;
    }

    /// Make `mv` for the lifetime of the returned guard.
    ///
    /// The move is undone when the guard is dropped, on every exit path,
    /// so a hypothetical position can never leak into later calls.
    pub fn simulate(&mut self, mv: &Move) -> Simulation<'_> {
        let undo = self.make_move(mv);
        Simulation {
            pos: self,
            mv: *mv,
            undo,
        }
    }

    // -----------------------------------------------------------------------
    // Consistency check (debug builds)
    // -----------------------------------------------------------------------

    /// Verify the king cache against the grid and the one-king-per-side rule.
    #[cfg(any(debug_assertions, test))]
    pub fn assert_consistent(&self) {
        for color in [Color::White, Color::Black] {
            let kings: Vec<Square> = self
                .pieces()
                .filter(|(_, p)| *p == Piece::new(color, PieceType::King))
                .map(|(sq, _)| sq)
                .collect();
            assert_eq!(kings.len(), 1, "{color} must have exactly one king");
            assert_eq!(
                kings[0],
                self.king_sq(color),
                "king cache mismatch for {color}:\n{}",
                self.board_string()
            );
        }
    }

    // -----------------------------------------------------------------------
    // Board display (8×8 text grid)
    // -----------------------------------------------------------------------

    /// Render the board as an 8-line string (rank 8 at top), useful for debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for row in 0..8u8 {
            s.push((b'8' - row) as char);
            s.push(' ');
            for col in 0..8u8 {
                let ch = match self.piece_at(Square::at(row, col)) {
                    Some(p) => p.kind.to_char(p.color),
                    None => '.',
                };
                s.push(ch);
                if col < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// ---------------------------------------------------------------------------
// Simulation guard
// ---------------------------------------------------------------------------

/// A position with one move temporarily applied. Read-only while alive;
/// restores the original position on drop.
pub struct Simulation<'a> {
    pos: &'a mut Position,
    mv: Move,
    undo: UndoInfo,
}

impl Deref for Simulation<'_> {
    type Target = Position;

    fn deref(&self) -> &Position {
        self.pos
    }
}

impl Drop for Simulation<'_> {
    fn drop(&mut self) {
        self.pos.undo_move(&self.mv, &self.undo);
    }
}

// ---------------------------------------------------------------------------
// Castling helpers (free functions)
// ---------------------------------------------------------------------------

/// For a castling move, return (rook_from, rook_to).
fn castling_rook_squares(mv: &Move) -> (Square, Square) {
    let row = mv.from.row;
    if mv.to.col > mv.from.col {
        // Kingside: rook h→f.
        (Square::at(row, 7), Square::at(row, 5))
    } else {
        // Queenside: rook a→d.
        (Square::at(row, 0), Square::at(row, 3))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
