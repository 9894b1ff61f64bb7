//! Pin and check detection by ray casting from the king.
//!
//! From the king of the side being analysed we walk each of the eight
//! compass rays. The first friendly piece on a ray is a pin candidate; an
//! enemy piece further along that can slide back down the ray turns the
//! candidate into a pin. An enemy attacker with nothing in between is a
//! check. Knight checks are found separately from the leaper offsets.

use crate::engine::board::Position;
use crate::engine::types::{Color, Direction, PieceType, Square};

// =========================================================================
// Types
// =========================================================================

/// A friendly piece that may only move along `direction` (either way).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pin {
    pub square: Square,
    /// Direction from the king towards the pinned piece.
    pub direction: Direction,
}

/// An enemy piece giving check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Check {
    pub attacker: Square,
    /// Direction from the king towards the attacker; `None` for knights.
    pub direction: Option<Direction>,
}

/// Result of analysing one king.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttackInfo {
    pub pins: Vec<Pin>,
    pub checks: Vec<Check>,
}

impl AttackInfo {
    #[inline]
    pub fn in_check(&self) -> bool {
        !self.checks.is_empty()
    }

    /// Pin axis of the piece on `sq`, if it is pinned.
    pub fn pin_on(&self, sq: Square) -> Option<Direction> {
        self.pins
            .iter()
            .find(|pin| pin.square == sq)
            .map(|pin| pin.direction)
    }
}

// =========================================================================
// Public API
// =========================================================================

/// Pins and checks against the side to move.
pub fn analyze(pos: &Position) -> AttackInfo {
    analyze_for(pos, pos.side_to_move)
}

/// Pins and checks against `color`'s king.
pub fn analyze_for(pos: &Position, color: Color) -> AttackInfo {
    let king = pos.king_sq(color);
    let mut info = AttackInfo::default();

    for dir in Direction::ALL {
        let mut candidate: Option<Square> = None;
        for distance in 1..8 {
            let Some(sq) = king.step(dir, distance) else {
                break;
            };
            let Some(piece) = pos.piece_at(sq) else {
                continue;
            };
            if piece.color == color {
                if candidate.is_some() {
                    // Two friendly pieces: nothing beyond can pin or check.
                    break;
                }
                candidate = Some(sq);
                continue;
            }
            if threatens(piece.kind, piece.color, dir, distance) {
                match candidate {
                    None => info.checks.push(Check {
                        attacker: sq,
                        direction: Some(dir),
                    }),
                    Some(pinned) => info.pins.push(Pin {
                        square: pinned,
                        direction: dir,
                    }),
                }
            }
            break;
        }
    }

    for offset in Direction::KNIGHT {
        if let Some(sq) = king.step(offset, 1)
            && let Some(piece) = pos.piece_at(sq)
            && piece.color != color
            && piece.kind == PieceType::Knight
        {
            info.checks.push(Check {
                attacker: sq,
                direction: None,
            });
        }
    }

    info
}

/// Is `sq` attacked by any piece of colour `by`?
///
/// Occupancy is read from the position as it stands, so callers testing a
/// king's destination should simulate the king move first.
pub fn is_square_attacked(pos: &Position, sq: Square, by: Color) -> bool {
    for dir in Direction::ALL {
        for distance in 1..8 {
            let Some(target) = sq.step(dir, distance) else {
                break;
            };
            if let Some(piece) = pos.piece_at(target) {
                if piece.color == by && threatens(piece.kind, by, dir, distance) {
                    return true;
                }
                break;
            }
        }
    }

    Direction::KNIGHT.iter().any(|&offset| {
        sq.step(offset, 1)
            .and_then(|s| pos.piece_at(s))
            .is_some_and(|p| p.color == by && p.kind == PieceType::Knight)
    })
}

/// Squares strictly between the king and a sliding checker.
pub fn squares_between(king: Square, check: &Check) -> Vec<Square> {
    let Some(dir) = check.direction else {
        return Vec::new();
    };
    (1..8)
        .map_while(|d| king.step(dir, d))
        .take_while(|&s| s != check.attacker)
        .collect()
}

// =========================================================================
// Internals
// =========================================================================

/// Can a piece `distance` squares from the origin along `dir` attack back
/// down the ray to the origin?
fn threatens(kind: PieceType, attacker: Color, dir: Direction, distance: i8) -> bool {
    match kind {
        PieceType::Rook => dir.is_orthogonal(),
        PieceType::Bishop => dir.is_diagonal(),
        PieceType::Queen => true,
        PieceType::King => distance == 1,
        // A pawn captures towards the origin, i.e. opposite to `dir`.
        PieceType::Pawn => {
            distance == 1 && dir.is_diagonal() && dir.dr == -attacker.pawn_forward()
        }
        PieceType::Knight => false,
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{CastlingRights, Piece};

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn setup(pieces: &[(&str, char)], side: Color) -> Position {
        let placed: Vec<(Square, Piece)> = pieces
            .iter()
            .map(|&(name, ch)| {
                let (color, kind) = PieceType::from_char(ch).unwrap();
                (sq(name), Piece::new(color, kind))
            })
            .collect();
        Position::from_pieces(&placed, side, CastlingRights::NONE).unwrap()
    }

    // -------------------------------------------------------------------
    // Checks
    // -------------------------------------------------------------------

    #[test]
    fn starting_position_quiet() {
        let info = analyze(&Position::starting());
        assert!(!info.in_check());
        assert!(info.pins.is_empty());
    }

    #[test]
    fn rook_check_along_file() {
        let pos = setup(&[("e1", 'K'), ("e8", 'r'), ("a8", 'k')], Color::White);
        let info = analyze(&pos);
        assert_eq!(
            info.checks,
            vec![Check {
                attacker: sq("e8"),
                direction: Some(Direction::new(-1, 0)),
            }]
        );
    }

    #[test]
    fn bishop_does_not_check_orthogonally() {
        let pos = setup(&[("e1", 'K'), ("e8", 'b'), ("a8", 'k')], Color::White);
        assert!(!analyze(&pos).in_check());
    }

    #[test]
    fn knight_check_has_no_direction() {
        let pos = setup(&[("e1", 'K'), ("f3", 'n'), ("a8", 'k')], Color::White);
        let info = analyze(&pos);
        assert_eq!(info.checks.len(), 1);
        assert_eq!(info.checks[0].attacker, sq("f3"));
        assert_eq!(info.checks[0].direction, None);
    }

    #[test]
    fn pawn_checks_only_forward_diagonally() {
        // Black pawn on d2 attacks e1.
        let pos = setup(&[("e1", 'K'), ("d2", 'p'), ("a8", 'k')], Color::White);
        assert!(analyze(&pos).in_check());

        // Black pawn on d1 beside the king: no check.
        let pos = setup(&[("e2", 'K'), ("d1", 'p'), ("a8", 'k')], Color::White);
        assert!(!analyze(&pos).in_check());

        // White pawn on d2 attacks e3 and c3, so a black king on e3 is checked.
        let pos = setup(&[("e3", 'k'), ("d2", 'P'), ("a1", 'K')], Color::Black);
        assert!(analyze(&pos).in_check());

        // Pawn straight ahead never checks.
        let pos = setup(&[("e3", 'k'), ("e2", 'P'), ("a1", 'K')], Color::Black);
        assert!(!analyze(&pos).in_check());
    }

    #[test]
    fn distant_king_does_not_check() {
        let pos = setup(&[("e1", 'K'), ("e3", 'k')], Color::White);
        assert!(!analyze(&pos).in_check());
    }

    #[test]
    fn double_check_detected() {
        // Rook on e8 and knight on d3 both attack e1.
        let pos = setup(
            &[("e1", 'K'), ("e8", 'r'), ("d3", 'n'), ("a8", 'k')],
            Color::White,
        );
        assert_eq!(analyze(&pos).checks.len(), 2);
    }

    #[test]
    fn check_is_blocked_by_enemy_piece() {
        let pos = setup(
            &[("e1", 'K'), ("e8", 'r'), ("e5", 'n'), ("a8", 'k')],
            Color::White,
        );
        assert!(!analyze(&pos).in_check());
    }

    // -------------------------------------------------------------------
    // Pins
    // -------------------------------------------------------------------

    #[test]
    fn bishop_pins_knight() {
        let pos = setup(
            &[("e1", 'K'), ("d2", 'N'), ("a5", 'b'), ("h8", 'k')],
            Color::White,
        );
        let info = analyze(&pos);
        assert!(!info.in_check());
        assert_eq!(info.pin_on(sq("d2")), Some(Direction::new(-1, -1)));
    }

    #[test]
    fn two_friendly_blockers_no_pin() {
        let pos = setup(
            &[("e1", 'K'), ("e2", 'R'), ("e3", 'N'), ("e8", 'r'), ("a8", 'k')],
            Color::White,
        );
        let info = analyze(&pos);
        assert!(info.pins.is_empty());
        assert!(!info.in_check());
    }

    #[test]
    fn wrong_slider_type_does_not_pin() {
        // A rook on a diagonal cannot pin.
        let pos = setup(
            &[("e1", 'K'), ("d2", 'N'), ("a5", 'r'), ("h8", 'k')],
            Color::White,
        );
        assert!(analyze(&pos).pins.is_empty());
    }

    #[test]
    fn analyze_for_other_color() {
        let pos = setup(
            &[("e8", 'k'), ("e7", 'n'), ("e1", 'Q'), ("a1", 'K')],
            Color::White,
        );
        let info = analyze_for(&pos, Color::Black);
        assert_eq!(info.pin_on(sq("e7")), Some(Direction::new(1, 0)));
        assert!(analyze(&pos).pins.is_empty());
    }

    // -------------------------------------------------------------------
    // Attacked squares
    // -------------------------------------------------------------------

    #[test]
    fn square_attack_queries() {
        let pos = setup(
            &[("e1", 'K'), ("a8", 'k'), ("h4", 'b'), ("c3", 'n'), ("b6", 'p')],
            Color::White,
        );
        assert!(is_square_attacked(&pos, sq("f2"), Color::Black));
        assert!(is_square_attacked(&pos, sq("e2"), Color::Black));
        assert!(is_square_attacked(&pos, sq("a5"), Color::Black));
        assert!(is_square_attacked(&pos, sq("c5"), Color::Black));
        assert!(!is_square_attacked(&pos, sq("b4"), Color::Black));
        assert!(!is_square_attacked(&pos, sq("h1"), Color::Black));
        assert!(is_square_attacked(&pos, sq("d1"), Color::White));
    }

    #[test]
    fn between_squares_for_slider_and_knight() {
        let king = sq("e1");
        let rook = Check {
            attacker: sq("e5"),
            direction: Some(Direction::new(-1, 0)),
        };
        assert_eq!(squares_between(king, &rook), vec![sq("e2"), sq("e3"), sq("e4")]);

        let knight = Check {
            attacker: sq("f3"),
            direction: None,
        };
        assert!(squares_between(king, &knight).is_empty());
    }
}
