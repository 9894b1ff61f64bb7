//! Pseudo-legal move generation.
//!
//! Moves are produced square by square in row-major order (a8 first, h1
//! last), with castling appended at the end, so the output order for a
//! given position is deterministic.
//!
//! Pins found by [`attacks::analyze`] are already respected here: a pinned
//! piece only moves along its pin axis and a pinned knight has no moves.
//! Check evasion and king safety are left to the legality filter.

use crate::engine::attacks::{self, AttackInfo};
use crate::engine::board::Position;
use crate::engine::types::{
    CastlingRights, Color, Direction, Move, MoveFlags, Piece, PieceType, Square,
};

// =========================================================================
// Public API
// =========================================================================

/// All pseudo-legal moves for the side to move, honouring pins.
pub fn pseudo_legal_moves(pos: &Position, info: &AttackInfo) -> Vec<Move> {
    let us = pos.side_to_move;
    let mut moves = Vec::with_capacity(64);

    for (from, piece) in pos.pieces().filter(|(_, p)| p.color == us) {
        let pin = info.pin_on(from);
        match piece.kind {
            PieceType::Pawn => generate_pawn_moves(pos, from, piece, pin, &mut moves),
            PieceType::Knight => generate_knight_moves(pos, from, piece, pin, &mut moves),
            PieceType::Bishop => {
                generate_slider_moves(pos, from, piece, pin, &Direction::DIAGONAL, &mut moves)
            }
            PieceType::Rook => {
                generate_slider_moves(pos, from, piece, pin, &Direction::ORTHOGONAL, &mut moves)
            }
            PieceType::Queen => {
                generate_slider_moves(pos, from, piece, pin, &Direction::ALL, &mut moves)
            }
            PieceType::King => generate_king_moves(pos, from, piece, &mut moves),
        }
    }

    if !info.in_check() {
        generate_castling_moves(pos, us, &mut moves);
    }
    moves
}

// =========================================================================
// Helpers
// =========================================================================

/// May a piece with pin axis `pin` move in direction `dir`?
#[inline]
fn pin_allows(pin: Option<Direction>, dir: Direction) -> bool {
    pin.is_none_or(|axis| axis.is_parallel(dir))
}

/// Target is empty or holds an enemy piece.
#[inline]
fn can_land(pos: &Position, to: Square, us: Color) -> bool {
    pos.piece_at(to).is_none_or(|p| p.color != us)
}

// =========================================================================
// Pawn moves
// =========================================================================

fn generate_pawn_moves(
    pos: &Position,
    from: Square,
    pawn: Piece,
    pin: Option<Direction>,
    moves: &mut Vec<Move>,
) {
    let us = pawn.color;
    let forward = us.pawn_forward();
    let promo = |to: Square| {
        if to.row == us.promotion_row() {
            MoveFlags::PROMOTION
        } else {
            MoveFlags::NONE
        }
    };

    // --- Pushes ---
    let push = Direction::new(forward, 0);
    if pin_allows(pin, push)
        && let Some(one) = from.step(push, 1)
        && pos.piece_at(one).is_none()
    {
        moves.push(Move::new(from, one, pawn, None, promo(one)));

        if from.row == us.pawn_start_row()
            && let Some(two) = from.step(push, 2)
            && pos.piece_at(two).is_none()
        {
            moves.push(Move::new(from, two, pawn, None, MoveFlags::NONE));
        }
    }

    // --- Captures (including en passant) ---
    for dc in [-1, 1] {
        let dir = Direction::new(forward, dc);
        if !pin_allows(pin, dir) {
            continue;
        }
        let Some(to) = from.step(dir, 1) else {
            continue;
        };
        match pos.piece_at(to) {
            Some(target) if target.color != us => {
                moves.push(Move::new(from, to, pawn, Some(target), promo(to)));
            }
            None if pos.en_passant == Some(to) => {
                let victim = Piece::new(!us, PieceType::Pawn);
                moves.push(Move::new(from, to, pawn, Some(victim), MoveFlags::EN_PASSANT));
            }
            _ => {}
        }
    }
}

// =========================================================================
// Knight moves
// =========================================================================

fn generate_knight_moves(
    pos: &Position,
    from: Square,
    knight: Piece,
    pin: Option<Direction>,
    moves: &mut Vec<Move>,
) {
    // No knight move stays on a line through its square.
    if pin.is_some() {
        return;
    }
    for offset in Direction::KNIGHT {
        if let Some(to) = from.step(offset, 1)
            && can_land(pos, to, knight.color)
        {
            moves.push(Move::new(from, to, knight, pos.piece_at(to), MoveFlags::NONE));
        }
    }
}

// =========================================================================
// Sliding pieces (bishop, rook, queen)
// =========================================================================

fn generate_slider_moves(
    pos: &Position,
    from: Square,
    piece: Piece,
    pin: Option<Direction>,
    directions: &[Direction],
    moves: &mut Vec<Move>,
) {
    for &dir in directions.iter().filter(|&&d| pin_allows(pin, d)) {
        for distance in 1..8 {
            let Some(to) = from.step(dir, distance) else {
                break;
            };
            match pos.piece_at(to) {
                None => moves.push(Move::new(from, to, piece, None, MoveFlags::NONE)),
                Some(target) => {
                    if target.color != piece.color {
                        moves.push(Move::new(from, to, piece, Some(target), MoveFlags::NONE));
                    }
                    break;
                }
            }
        }
    }
}

// =========================================================================
// King moves
// =========================================================================

fn generate_king_moves(pos: &Position, from: Square, king: Piece, moves: &mut Vec<Move>) {
    for dir in Direction::ALL {
        if let Some(to) = from.step(dir, 1)
            && can_land(pos, to, king.color)
        {
            moves.push(Move::new(from, to, king, pos.piece_at(to), MoveFlags::NONE));
        }
    }
}

// =========================================================================
// Castling
// =========================================================================

/// Castling moves for `us`. The caller guarantees the king is not in check.
///
/// Requires the castling right, an own rook still on its corner, empty
/// squares between king and rook, and no enemy attack on the squares the
/// king passes through or lands on.
fn generate_castling_moves(pos: &Position, us: Color, moves: &mut Vec<Move>) {
    let row = us.home_row();
    let king_from = Square::at(row, 4);
    let king = Piece::new(us, PieceType::King);
    if pos.king_sq(us) != king_from {
        return;
    }
    let rook = Some(Piece::new(us, PieceType::Rook));
    let them = !us;
    let empty = |cols: &[u8]| cols.iter().all(|&c| pos.piece_at(Square::at(row, c)).is_none());
    let safe = |cols: &[u8]| {
        cols.iter()
            .all(|&c| !attacks::is_square_attacked(pos, Square::at(row, c), them))
    };

    let rights = pos.castling_rights;

    // Kingside: f and g empty and safe, rook on h.
    if rights.has(CastlingRights::kingside_flag(us))
        && pos.piece_at(Square::at(row, 7)) == rook
        && empty(&[5, 6])
        && safe(&[5, 6])
    {
        moves.push(Move::new(
            king_from,
            Square::at(row, 6),
            king,
            None,
            MoveFlags::CASTLING,
        ));
    }

    // Queenside: b, c and d empty, only c and d need to be safe.
    if rights.has(CastlingRights::queenside_flag(us))
        && pos.piece_at(Square::at(row, 0)) == rook
        && empty(&[1, 2, 3])
        && safe(&[2, 3])
    {
        moves.push(Move::new(
            king_from,
            Square::at(row, 2),
            king,
            None,
            MoveFlags::CASTLING,
        ));
    }
}

// =========================================================================
// Tests
// =========================================================================
