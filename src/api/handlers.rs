use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use tracing::{debug, info};

use crate::engine::types::Square;
use crate::ws::{WsEvent, announce_move};

use super::errors::ApiError;
use super::models::*;
use super::state::{Session, SharedState};

// =========================================================================
// Health
// =========================================================================

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime = state.start_time.elapsed().as_secs();
    let sessions = state.sessions.read().await.len();
    let connections = state.ws.total_connections().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine: "duel-chess".to_string(),
        uptime,
        sessions,
        connections,
    })
}

// =========================================================================
// Create Session
// =========================================================================

/// POST /api/sessions
pub async fn create_session(
    State(state): State<SharedState>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let mut sessions = state.sessions.write().await;
    if sessions.len() >= state.config.max_sessions {
        return Err(ApiError::SessionLimit(state.config.max_sessions));
    }

    let session = Session::new();
    let response = session_to_response(&session);
    info!(session_id = %session.id, "session created");
    sessions.insert(session.id.clone(), session);

    Ok((StatusCode::CREATED, Json(response)))
}

// =========================================================================
// List Sessions
// =========================================================================

/// GET /api/sessions
pub async fn list_sessions(State(state): State<SharedState>) -> Json<ListSessionsResponse> {
    let sessions = state.sessions.read().await;

    let mut all: Vec<&Session> = sessions.values().collect();
    // Newest first for consistent ordering.
    all.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Json(ListSessionsResponse {
        total: all.len(),
        sessions: all.into_iter().map(session_to_response).collect(),
    })
}

// =========================================================================
// Get Session
// =========================================================================

/// GET /api/sessions/{id}
pub async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&id)
        .ok_or_else(|| ApiError::SessionNotFound(id.clone()))?;
    Ok(Json(session_to_response(session)))
}

// =========================================================================
// Delete Session
// =========================================================================

/// DELETE /api/sessions/{id}
pub async fn delete_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state
        .sessions
        .write()
        .await
        .remove(&id)
        .ok_or_else(|| ApiError::SessionNotFound(id.clone()))?;

    // Closing the channels ends every connected peer's socket.
    state.ws.drop_session(&id).await;
    info!(session_id = %id, "session deleted");

    Ok(Json(DeleteResponse {
        success: true,
        message: "Session deleted".to_string(),
    }))
}

// =========================================================================
// Legal Moves
// =========================================================================

/// GET /api/sessions/{id}/legal-moves[?from=e2]
pub async fn legal_moves(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<LegalMovesQuery>,
) -> Result<Json<LegalMovesResponse>, ApiError> {
    let from = query
        .from
        .as_deref()
        .map(|s| {
            Square::from_algebraic(s)
                .ok_or_else(|| ApiError::InvalidRequest(format!("invalid square: {s}")))
        })
        .transpose()?;

    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| ApiError::SessionNotFound(id.clone()))?;

    let moves = match from {
        Some(sq) => session.game.legal_moves_from(sq),
        None => session.game.legal_moves(),
    };

    Ok(Json(LegalMovesResponse {
        moves: moves.iter().map(legal_move_entry).collect(),
    }))
}

// =========================================================================
// Make Move
// =========================================================================

/// POST /api/sessions/{id}/moves
pub async fn make_move(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(input): Json<MoveRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| ApiError::SessionNotFound(id.clone()))?;

    let mover = session.game.side_to_move();
    let mv = session.game.play(&input.mv)?;
    let status = session.game.status();
    let response = session_to_response(session);
    debug!(session_id = %id, mv = %mv, "move played over REST");

    // Broadcast before releasing the session lock so subscribers see
    // snapshots in the order the moves were applied.
    announce_move(&state.ws, &mv, mover, status, response.clone()).await;
    drop(sessions);

    Ok(Json(response))
}

// =========================================================================
// Undo / Reset
// =========================================================================

/// POST /api/sessions/{id}/undo
///
/// With no history this is a no-op and returns the unchanged session.
pub async fn undo_move(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| ApiError::SessionNotFound(id.clone()))?;

    let undone = session.game.undo();
    let response = session_to_response(session);
    if undone.is_some() {
        state.ws.broadcast(&id, WsEvent::board(response.clone())).await;
    }
    drop(sessions);

    Ok(Json(response))
}

/// POST /api/sessions/{id}/reset
pub async fn reset_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| ApiError::SessionNotFound(id.clone()))?;

    session.game.reset();
    let response = session_to_response(session);
    info!(session_id = %id, "session reset");
    state.ws.broadcast(&id, WsEvent::board(response.clone())).await;
    drop(sessions);

    Ok(Json(response))
}

// =========================================================================
// Tests
// =========================================================================
