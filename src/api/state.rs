use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::engine::{Color, GameState};
use crate::ws::WsManager;
use crate::ws::manager::ClientId;

// ---------------------------------------------------------------------------
// Seats
// ---------------------------------------------------------------------------

/// Role of a connected WebSocket peer within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Seat {
    White,
    Black,
    Spectator,
}

impl Seat {
    pub fn as_str(self) -> &'static str {
        match self {
            Seat::White => "white",
            Seat::Black => "black",
            Seat::Spectator => "spectator",
        }
    }

    /// Colour this seat plays, if any.
    pub fn color(self) -> Option<Color> {
        match self {
            Seat::White => Some(Color::White),
            Seat::Black => Some(Color::Black),
            Seat::Spectator => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One authoritative game plus the peers seated at it.
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub game: GameState,
    pub white: Option<ClientId>,
    pub black: Option<ClientId>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Session {
            id: Uuid::new_v4().to_string(),
            game: GameState::new(),
            white: None,
            black: None,
            created_at: Utc::now(),
        }
    }

    /// Seat a newly connected peer: White first, then Black, then spectators.
    pub fn claim_seat(&mut self, client: ClientId) -> Seat {
        if self.white.is_none() {
            self.white = Some(client);
            Seat::White
        } else if self.black.is_none() {
            self.black = Some(client);
            Seat::Black
        } else {
            Seat::Spectator
        }
    }

    /// Free whatever seat `client` held. Returns the seat it vacated.
    pub fn release_seat(&mut self, client: ClientId) -> Seat {
        if self.white == Some(client) {
            self.white = None;
            Seat::White
        } else if self.black == Some(client) {
            self.black = None;
            Seat::Black
        } else {
            Seat::Spectator
        }
    }

    pub fn seat_of(&self, client: ClientId) -> Seat {
        if self.white == Some(client) {
            Seat::White
        } else if self.black == Some(client) {
            Seat::Black
        } else {
            Seat::Spectator
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Sessions stored by UUID. Every mutation of a game happens under the
/// write lock, so each session has a single writer at a time.
pub type SessionStore = RwLock<HashMap<String, Session>>;

/// Shared application state passed to all handlers via Axum's State extractor.
pub struct AppState {
    pub sessions: SessionStore,
    pub config: AppConfig,
    pub start_time: std::time::Instant,
    pub ws: Arc<WsManager>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(AppState {
            sessions: RwLock::new(HashMap::new()),
            config,
            start_time: std::time::Instant::now(),
            ws: WsManager::new(),
        })
    }
}
