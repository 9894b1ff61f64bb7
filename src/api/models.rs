use serde::{Deserialize, Serialize};

use crate::engine::game::GameState;
use crate::engine::types::{GameStatus, Move};

use super::state::Session;

// ---------------------------------------------------------------------------
// Request models
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    /// Coordinate notation, e.g. "e2e4".
    #[serde(rename = "move")]
    pub mv: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalMovesQuery {
    pub from: Option<String>,
}

// ---------------------------------------------------------------------------
// Response models
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub engine: String,
    pub uptime: u64,
    pub sessions: usize,
    pub connections: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// Full snapshot of one session, as returned by every session endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    /// Row 0 = rank 8; cells are "wP", "bK", ... or "--".
    pub board: [[String; 8]; 8],
    pub status: String,
    pub current_player: String,
    pub move_count: usize,
    pub check: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_move: Option<String>,
    pub moves: Vec<String>,
    pub castling_rights: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub en_passant: Option<String>,
    pub seats: Seats,
    pub created_at: String,
}

/// Which seats currently have a connected peer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Seats {
    pub white: bool,
    pub black: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSessionsResponse {
    pub sessions: Vec<SessionResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalMoveEntry {
    pub from: String,
    pub to: String,
    pub notation: String,
    pub piece: String,
    pub capture: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub promotion: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub castling: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub en_passant: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalMovesResponse {
    pub moves: Vec<LegalMoveEntry>,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a session to its API representation.
pub fn session_to_response(session: &Session) -> SessionResponse {
    let game = &session.game;
    let status = game.status();
    let pos = game.position();
    SessionResponse {
        id: session.id.clone(),
        board: game.board_codes(),
        status: status.as_str().to_string(),
        current_player: game.side_to_move().to_string(),
        move_count: game.history().len(),
        check: matches!(status, GameStatus::Check | GameStatus::Checkmate),
        last_move: game.last_move().map(GameState::to_coordinate_string),
        moves: game.move_log(),
        castling_rights: pos.castling_rights.to_string(),
        en_passant: pos.en_passant.map(|sq| sq.to_algebraic()),
        seats: Seats {
            white: session.white.is_some(),
            black: session.black.is_some(),
        },
        created_at: session.created_at.to_rfc3339(),
    }
}

/// Describe one legal move for the API.
pub fn legal_move_entry(mv: &Move) -> LegalMoveEntry {
    LegalMoveEntry {
        from: mv.from.to_algebraic(),
        to: mv.to.to_algebraic(),
        notation: GameState::to_coordinate_string(mv),
        piece: mv.piece.kind.to_string(),
        capture: mv.is_capture(),
        promotion: mv.flags.is_promotion(),
        castling: mv.flags.is_castling(),
        en_passant: mv.flags.is_en_passant(),
    }
}
