//! Legal move filtering.
//!
//! Pipeline:
//!   1. Analyse pins and checks against the side to move.
//!   2. Generate pin-restricted pseudo-legal moves.
//!   3. Filter by the number of checks:
//!      - none: every non-king move is already legal;
//!      - one: non-king moves must capture the checker or block its ray;
//!      - two: only the king may move.
//!
//! King moves and en passant captures are always verified by simulating the
//! move and asking whether the king is attacked afterwards. En passant needs
//! this because removing two pawns from one rank can expose the king to a
//! rook or queen along that rank, which the pin scan cannot see.

use crate::engine::attacks::{self, AttackInfo};
use crate::engine::board::Position;
use crate::engine::movegen;
use crate::engine::types::{GameStatus, Move, PieceType, Square};

/// Legal moves for a position, plus whether the side to move is in check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegalMoveSet {
    pub moves: Vec<Move>,
    pub in_check: bool,
}

impl LegalMoveSet {
    /// Status implied by this move set.
    pub fn status(&self) -> GameStatus {
        match (self.moves.is_empty(), self.in_check) {
            (true, true) => GameStatus::Checkmate,
            (true, false) => GameStatus::Stalemate,
            (false, true) => GameStatus::Check,
            (false, false) => GameStatus::Active,
        }
    }
}

// =========================================================================
// Public API
// =========================================================================

/// Generate all legal moves for the side to move.
///
/// Takes `&mut` only to simulate candidate moves; the position is
/// identical on return.
pub fn legal_moves(pos: &mut Position) -> Vec<Move> {
    legal_move_set(pos).moves
}

/// Legal moves together with the check flag they were computed under.
pub fn legal_move_set(pos: &mut Position) -> LegalMoveSet {
    let info = attacks::analyze(pos);
    let pseudo = movegen::pseudo_legal_moves(pos, &info);
    let targets = evasion_targets(pos, &info);

    let mut moves = Vec::with_capacity(pseudo.len());
    for mv in pseudo {
        let legal = if mv.piece.kind == PieceType::King || mv.flags.is_en_passant() {
            leaves_king_safe(pos, &mv)
        } else {
            targets.as_ref().is_none_or(|t| t.contains(&mv.to))
        };
        if legal {
            moves.push(mv);
        }
    }

    LegalMoveSet {
        moves,
        in_check: info.in_check(),
    }
}

// =========================================================================
// Internals
// =========================================================================

/// Squares a non-king move must land on, or `None` when not in check.
fn evasion_targets(pos: &Position, info: &AttackInfo) -> Option<Vec<Square>> {
    match info.checks.as_slice() {
        [] => None,
        [check] => {
            let king = pos.king_sq(pos.side_to_move);
            let mut squares = attacks::squares_between(king, check);
            squares.push(check.attacker);
            Some(squares)
        }
        _ => Some(Vec::new()),
    }
}

/// Make `mv`, test the mover's king, and unmake it.
fn leaves_king_safe(pos: &mut Position, mv: &Move) -> bool {
    let sim = pos.simulate(mv);
    let us = mv.piece.color;
    !attacks::is_square_attacked(&sim, sim.king_sq(us), !us)
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{CastlingRights, Color, MoveFlags, Piece};

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn setup(pieces: &[(&str, char)], side: Color, rights: CastlingRights) -> Position {
        let placed: Vec<(Square, Piece)> = pieces
            .iter()
            .map(|&(name, ch)| {
                let (color, kind) = PieceType::from_char(ch).unwrap();
                (sq(name), Piece::new(color, kind))
            })
            .collect();
        Position::from_pieces(&placed, side, rights).unwrap()
    }

    fn names(moves: &[Move]) -> Vec<String> {
        let mut v: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
        v.sort();
        v
    }

    /// Brute-force reference: make every pseudo-legal move and test the king.
    fn brute_force(pos: &mut Position) -> Vec<Move> {
        let pseudo = movegen::pseudo_legal_moves(pos, &AttackInfo::default());
        pseudo
            .into_iter()
            .filter(|mv| {
                if mv.flags.is_castling() && attacks::analyze(pos).in_check() {
                    return false;
                }
                leaves_king_safe(pos, mv)
            })
            .collect()
    }

    #[test]
    fn starting_position_twenty_legal() {
        let mut pos = Position::starting();
        let set = legal_move_set(&mut pos);
        assert_eq!(set.moves.len(), 20);
        assert!(!set.in_check);
        assert_eq!(set.status(), GameStatus::Active);
        assert_eq!(pos, Position::starting());
    }

    #[test]
    fn single_check_block_or_capture() {
        // Rook e8 checks e1: the knight can block, the bishop can capture.
        let mut pos = setup(
            &[("e1", 'K'), ("e8", 'r'), ("c3", 'N'), ("a4", 'B'), ("a8", 'k')],
            Color::White,
            CastlingRights::NONE,
        );
        let moves = legal_moves(&mut pos);
        let non_king: Vec<String> = names(
            &moves
                .iter()
                .copied()
                .filter(|m| m.piece.kind != PieceType::King)
                .collect::<Vec<_>>(),
        );
        assert_eq!(non_king, vec!["a4e8", "c3e2", "c3e4"]);
    }

    #[test]
    fn king_cannot_step_along_check_ray() {
        let mut pos = setup(
            &[("e1", 'K'), ("e8", 'r'), ("a8", 'k')],
            Color::White,
            CastlingRights::NONE,
        );
        let moves = names(&legal_moves(&mut pos));
        assert!(!moves.contains(&"e1e2".to_string()));
        assert_eq!(moves, vec!["e1d1", "e1d2", "e1f1", "e1f2"]);
    }

    #[test]
    fn double_check_only_king_moves() {
        let mut pos = setup(
            &[("e1", 'K'), ("e8", 'r'), ("d3", 'n'), ("h5", 'Q'), ("a8", 'k')],
            Color::White,
            CastlingRights::NONE,
        );
        let set = legal_move_set(&mut pos);
        assert!(set.in_check);
        assert!(!set.moves.is_empty());
        assert!(set.moves.iter().all(|m| m.piece.kind == PieceType::King));
    }

    #[test]
    fn knight_check_cannot_be_blocked() {
        let mut pos = setup(
            &[("e1", 'K'), ("f3", 'n'), ("d4", 'R'), ("a8", 'k')],
            Color::White,
            CastlingRights::NONE,
        );
        let moves = legal_moves(&mut pos);
        let rook_moves: Vec<&Move> = moves.iter().filter(|m| m.from == sq("d4")).collect();
        assert!(rook_moves.is_empty());
    }

    #[test]
    fn pinned_piece_cannot_expose_king() {
        let mut pos = setup(
            &[("e1", 'K'), ("e2", 'B'), ("e8", 'r'), ("a8", 'k')],
            Color::White,
            CastlingRights::NONE,
        );
        let moves = legal_moves(&mut pos);
        assert!(moves.iter().all(|m| m.from != sq("e2")));
    }

    #[test]
    fn en_passant_horizontal_pin_rejected() {
        // White king a5, pawns b5 (white) and c5 (black), black rook h5.
        let mut pos = setup(
            &[("a5", 'K'), ("b5", 'P'), ("c7", 'p'), ("h5", 'r'), ("e8", 'k')],
            Color::Black,
            CastlingRights::NONE,
        );
        let push = Move::new(
            sq("c7"),
            sq("c5"),
            Piece::new(Color::Black, PieceType::Pawn),
            None,
            MoveFlags::NONE,
        );
        pos.make_move(&push);
        assert_eq!(pos.en_passant, Some(sq("c6")));

        let moves = legal_moves(&mut pos);
        assert!(!moves.iter().any(|m| m.flags.is_en_passant()));
        assert!(moves.iter().any(|m| m.to_string() == "b5b6"));
    }

    #[test]
    fn en_passant_captures_checking_pawn() {
        // Black pawn d7-d5 gives check to the king on e4; exd6 e.p. removes it.
        let mut pos = setup(
            &[("e4", 'K'), ("e5", 'P'), ("d7", 'p'), ("a8", 'k')],
            Color::Black,
            CastlingRights::NONE,
        );
        let push = Move::new(
            sq("d7"),
            sq("d5"),
            Piece::new(Color::Black, PieceType::Pawn),
            None,
            MoveFlags::NONE,
        );
        pos.make_move(&push);
        let set = legal_move_set(&mut pos);
        assert!(set.in_check);
        assert!(set.moves.iter().any(|m| m.flags.is_en_passant() && m.to == sq("d6")));
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let mut pos = Position::starting();
        for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
            let mv = legal_moves(&mut pos)
                .into_iter()
                .find(|m| m.from == sq(from) && m.to == sq(to))
                .unwrap();
            pos.make_move(&mv);
        }
        let set = legal_move_set(&mut pos);
        assert!(set.moves.is_empty());
        assert_eq!(set.status(), GameStatus::Checkmate);
    }

    #[test]
    fn cornered_king_stalemate() {
        let mut pos = setup(
            &[("h8", 'k'), ("f7", 'Q'), ("g6", 'K')],
            Color::Black,
            CastlingRights::NONE,
        );
        let set = legal_move_set(&mut pos);
        assert!(set.moves.is_empty());
        assert!(!set.in_check);
        assert_eq!(set.status(), GameStatus::Stalemate);
    }

    #[test]
    fn castling_through_check_rejected_but_legal_otherwise() {
        let mut pos = setup(
            &[("e1", 'K'), ("h1", 'R'), ("a1", 'R'), ("d8", 'r'), ("h8", 'k')],
            Color::White,
            CastlingRights::ALL,
        );
        let moves = names(&legal_moves(&mut pos));
        assert!(moves.contains(&"e1g1".to_string()));
        assert!(!moves.contains(&"e1c1".to_string()));
    }

    #[test]
    fn matches_brute_force_in_tactical_position() {
        let mut pos = setup(
            &[
                ("e1", 'K'),
                ("d2", 'P'),
                ("e2", 'N'),
                ("f2", 'P'),
                ("c3", 'B'),
                ("h1", 'R'),
                ("b4", 'b'),
                ("e7", 'q'),
                ("h4", 'q'),
                ("g3", 'n'),
                ("e8", 'k'),
            ],
            Color::White,
            CastlingRights::ALL,
        );
        let fast = names(&legal_moves(&mut pos));
        let slow = names(&brute_force(&mut pos));
        assert_eq!(fast, slow);
    }
}
