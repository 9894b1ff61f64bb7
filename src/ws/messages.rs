//! WebSocket message types for the move relay.

use serde::{Deserialize, Serialize};

use crate::api::models::SessionResponse;

// ---------------------------------------------------------------------------
// Server → Client events
// ---------------------------------------------------------------------------

/// Envelope sent from server to WebSocket clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WsEvent {
    /// Discriminator so clients can switch on event type.
    #[serde(rename = "type")]
    pub event_type: WsEventType,
    /// Event-specific payload.
    #[serde(flatten)]
    pub payload: WsPayload,
}

/// Event type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WsEventType {
    Seated,
    Board,
    MoveMade,
    GameOver,
    PeerLeft,
    Error,
    Pong,
}

/// Event payload variants.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WsPayload {
    Seated(SeatedPayload),
    Board(BoardPayload),
    MoveMade(MoveMadePayload),
    GameOver(GameOverPayload),
    PeerLeft(PeerLeftPayload),
    Error(ErrorPayload),
    Pong(PongPayload),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatedPayload {
    pub session_id: String,
    pub seat: String,
    pub client_id: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPayload {
    pub session_id: String,
    #[serde(flatten)]
    pub state: SessionResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveMadePayload {
    pub session_id: String,
    #[serde(rename = "move")]
    pub mv: String,
    pub player: String,
    #[serde(flatten)]
    pub state: SessionResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOverPayload {
    pub session_id: String,
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerLeftPayload {
    pub session_id: String,
    pub seat: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PongPayload {
    pub timestamp: u64,
}

// ---------------------------------------------------------------------------
// Client → Server commands
// ---------------------------------------------------------------------------

/// Commands sent from client to server over WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsCommand {
    Move {
        #[serde(rename = "move")]
        mv: String,
    },
    Ping,
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

impl WsEvent {
    pub fn seated(session_id: &str, seat: &str, client_id: u64) -> Self {
        WsEvent {
            event_type: WsEventType::Seated,
            payload: WsPayload::Seated(SeatedPayload {
                session_id: session_id.to_string(),
                seat: seat.to_string(),
                client_id,
            }),
        }
    }

    pub fn board(state: SessionResponse) -> Self {
        WsEvent {
            event_type: WsEventType::Board,
            payload: WsPayload::Board(BoardPayload {
                session_id: state.id.clone(),
                state,
            }),
        }
    }

    pub fn move_made(mv: &str, player: &str, state: SessionResponse) -> Self {
        WsEvent {
            event_type: WsEventType::MoveMade,
            payload: WsPayload::MoveMade(MoveMadePayload {
                session_id: state.id.clone(),
                mv: mv.to_string(),
                player: player.to_string(),
                state,
            }),
        }
    }

    pub fn game_over(session_id: &str, result: &str, winner: Option<&str>) -> Self {
        WsEvent {
            event_type: WsEventType::GameOver,
            payload: WsPayload::GameOver(GameOverPayload {
                session_id: session_id.to_string(),
                result: result.to_string(),
                winner: winner.map(str::to_string),
            }),
        }
    }

    pub fn peer_left(session_id: &str, seat: &str) -> Self {
        WsEvent {
            event_type: WsEventType::PeerLeft,
            payload: WsPayload::PeerLeft(PeerLeftPayload {
                session_id: session_id.to_string(),
                seat: seat.to_string(),
            }),
        }
    }

    pub fn error(code: &str, message: &str) -> Self {
        WsEvent {
            event_type: WsEventType::Error,
            payload: WsPayload::Error(ErrorPayload {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }

    pub fn pong() -> Self {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        WsEvent {
            event_type: WsEventType::Pong,
            payload: WsPayload::Pong(PongPayload { timestamp: ts }),
        }
    }

    /// Serialize to JSON text for sending over WebSocket.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"type":"error","code":"INTERNAL","message":"serialization failed"}"#.to_string()
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
