//! WebSocket upgrade handler: seats a peer at a session and relays its
//! moves through the authoritative `GameState`.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info};

use crate::api::errors::ApiError;
use crate::api::models::{SessionResponse, session_to_response};
use crate::api::state::{Seat, SharedState};
use crate::engine::{Color, GameState, GameStatus, Move};

use super::manager::{ClientId, WsManager};
use super::messages::{WsCommand, WsEvent};

/// GET /ws/sessions/{id}: upgrade to WebSocket.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(id): Path<String>,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, id, state))
}

/// Core WebSocket session logic.
async fn handle_socket(socket: WebSocket, session_id: String, state: SharedState) {
    let (client_id, mut rx) = state.ws.subscribe(&session_id).await;
    let (mut sink, mut stream) = socket.split();

    // Seat the peer and take the opening snapshot under one lock.
    let opening = {
        let mut sessions = state.sessions.write().await;
        sessions.get_mut(&session_id).map(|session| {
            let seat = session.claim_seat(client_id);
            (seat, session_to_response(session))
        })
    };

    let Some((seat, snapshot)) = opening else {
        state.ws.unsubscribe(&session_id, client_id).await;
        let (_, code, message) = ApiError::SessionNotFound(session_id.clone()).parts();
        let err = WsEvent::error(code, &message);
        let _ = sink.send(Message::Text(err.to_json().into())).await;
        let _ = sink.close().await;
        return;
    };
    info!(session_id = %session_id, client_id, seat = seat.as_str(), "peer connected");

    let greeting = [
        WsEvent::seated(&session_id, seat.as_str(), client_id),
        WsEvent::board(snapshot),
    ];
    for event in greeting {
        if sink
            .send(Message::Text(event.to_json().into()))
            .await
            .is_err()
        {
            cleanup(&state, &session_id, client_id).await;
            return;
        }
    }

    // Writer task: forward events from the manager → WS sink.
    let mut writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if sink
                .send(Message::Text(event.to_json().into()))
                .await
                .is_err()
            {
                break;
            }
        }
        let _ = sink.close().await;
    });

    // Reader task: handle client → server commands.
    let reader_state = state.clone();
    let reader_sid = session_id.clone();
    let mut reader = tokio::spawn(async move {
        while let Some(Ok(msg)) = stream.next().await {
            match msg {
                Message::Text(text) => {
                    handle_client_message(&reader_state, &reader_sid, client_id, &text).await;
                }
                Message::Close(_) => break,
                _ => {} // Binary / Ping / Pong handled by Axum
            }
        }
    });

    // Wait for either task to finish, then abort the other.
    tokio::select! {
        _ = &mut writer => { reader.abort(); }
        _ = &mut reader => { writer.abort(); }
    }

    cleanup(&state, &session_id, client_id).await;
}

/// Process a client-sent text message.
async fn handle_client_message(
    state: &SharedState,
    session_id: &str,
    client_id: ClientId,
    text: &str,
) {
    let cmd = match serde_json::from_str::<WsCommand>(text) {
        Ok(c) => c,
        Err(e) => {
            debug!(session_id, client_id, "invalid WS command: {e}");
            let reply = WsEvent::error("INVALID_REQUEST", &format!("invalid command: {e}"));
            state.ws.send_to(session_id, client_id, reply).await;
            return;
        }
    };

    match cmd {
        WsCommand::Ping => {
            state.ws.send_to(session_id, client_id, WsEvent::pong()).await;
        }
        WsCommand::Move { mv } => match try_move(state, session_id, client_id, &mv).await {
            Ok(played) => debug!(session_id, client_id, mv = %played, "move relayed"),
            Err(err) => {
                let (_, code, message) = err.parts();
                debug!(session_id, client_id, code, "move rejected: {message}");
                state
                    .ws
                    .send_to(session_id, client_id, WsEvent::error(code, &message))
                    .await;
            }
        },
    }
}

/// Validate and play a move sent by a seated peer, then announce it while
/// the session is still locked.
async fn try_move(
    state: &SharedState,
    session_id: &str,
    client_id: ClientId,
    text: &str,
) -> Result<Move, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(session_id)
        .ok_or_else(|| ApiError::SessionNotFound(session_id.to_string()))?;

    let seat = session.seat_of(client_id);
    let to_move = session.game.side_to_move();
    if seat.color() != Some(to_move) {
        return Err(ApiError::NotYourTurn(format!(
            "{to_move} to move, you are {}",
            seat.as_str()
        )));
    }

    let played = session.game.play(text)?;
    let status = session.game.status();
    let snapshot = session_to_response(session);
    announce_move(&state.ws, &played, to_move, status, snapshot).await;
    Ok(played)
}

/// Broadcast an accepted move, followed by `game_over` when the game ended.
///
/// Callers hold the session write lock so events leave in move order.
pub async fn announce_move(
    ws: &WsManager,
    mv: &Move,
    mover: Color,
    status: GameStatus,
    snapshot: SessionResponse,
) {
    let session_id = snapshot.id.clone();
    let notation = GameState::to_coordinate_string(mv);
    let mover_name = mover.to_string();
    ws.broadcast(
        &session_id,
        WsEvent::move_made(&notation, &mover_name, snapshot),
    )
    .await;

    if status.is_game_over() {
        let winner = (status == GameStatus::Checkmate).then_some(mover_name.as_str());
        info!(session_id = %session_id, result = status.as_str(), "game over");
        ws.broadcast(&session_id, WsEvent::game_over(&session_id, status.as_str(), winner))
            .await;
    }
}

/// Remove the client from the manager and free its seat.
async fn cleanup(state: &SharedState, session_id: &str, client_id: ClientId) {
    state.ws.unsubscribe(session_id, client_id).await;

    let vacated = {
        let mut sessions = state.sessions.write().await;
        sessions
            .get_mut(session_id)
            .map(|session| session.release_seat(client_id))
    };

    if let Some(seat @ (Seat::White | Seat::Black)) = vacated {
        info!(session_id, client_id, seat = seat.as_str(), "seat released");
        state
            .ws
            .broadcast(session_id, WsEvent::peer_left(session_id, seat.as_str()))
            .await;
    }
    debug!(session_id, client_id, "WS session cleaned up");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::{AppState, Session};
    use crate::config::AppConfig;

    /// Verify the handler function signature compiles as an Axum handler.
    #[tokio::test]
    async fn handler_type_check() {
        fn assert_handler<F, Fut, R>(_: F)
        where
            F: FnOnce(WebSocketUpgrade, Path<String>, State<SharedState>) -> Fut,
            Fut: std::future::Future<Output = R>,
            R: IntoResponse,
        {
        }
        assert_handler(ws_handler);
    }

    async fn seated_session(state: &SharedState) -> String {
        let mut session = Session::new();
        session.claim_seat(1);
        session.claim_seat(2);
        let id = session.id.clone();
        state.sessions.write().await.insert(id.clone(), session);
        id
    }

    fn event_json(event: WsEvent) -> serde_json::Value {
        serde_json::from_str(&event.to_json()).unwrap()
    }

    #[tokio::test]
    async fn seated_player_moves_on_turn() {
        let state = AppState::new(AppConfig::default());
        let id = seated_session(&state).await;
        let (_cid, mut rx) = state.ws.subscribe(&id).await;

        let mv = try_move(&state, &id, 1, "e2e4").await.unwrap();
        assert_eq!(mv.to_string(), "e2e4");

        let relayed = event_json(rx.recv().await.unwrap());
        assert_eq!(relayed["type"], "move_made");
        assert_eq!(relayed["player"], "white");
        assert_eq!(relayed["moveCount"], 1);
        assert_eq!(relayed["status"], "active");
    }

    #[tokio::test]
    async fn wrong_seat_is_rejected() {
        let state = AppState::new(AppConfig::default());
        let id = seated_session(&state).await;
        let err = try_move(&state, &id, 2, "e7e5").await.unwrap_err();
        assert_eq!(err.parts().1, "NOT_YOUR_TURN");
        let err = try_move(&state, &id, 42, "e2e4").await.unwrap_err();
        assert_eq!(err.parts().1, "NOT_YOUR_TURN");
    }

    #[tokio::test]
    async fn illegal_move_is_rejected() {
        let state = AppState::new(AppConfig::default());
        let id = seated_session(&state).await;
        let err = try_move(&state, &id, 1, "e2e5").await.unwrap_err();
        assert_eq!(err.parts().1, "ILLEGAL_MOVE");
        let sessions = state.sessions.read().await;
        assert!(sessions[&id].game.history().is_empty());
    }

    #[tokio::test]
    async fn checkmate_is_followed_by_game_over() {
        let state = AppState::new(AppConfig::default());
        let id = seated_session(&state).await;
        let (_cid, mut rx) = state.ws.subscribe(&id).await;

        for (client, text) in [(1, "f2f3"), (2, "e7e5"), (1, "g2g4"), (2, "d8h4")] {
            try_move(&state, &id, client, text).await.unwrap();
        }
        assert_eq!(
            state.sessions.read().await[&id].game.status(),
            GameStatus::Checkmate
        );

        let counts: Vec<u64> = (0..4)
            .map(|_| {
                let event = event_json(rx.try_recv().unwrap());
                event["moveCount"].as_u64().unwrap()
            })
            .collect();
        assert_eq!(counts, vec![1, 2, 3, 4]);

        let over = event_json(rx.try_recv().unwrap());
        assert_eq!(over["type"], "game_over");
        assert_eq!(over["winner"], "black");
        assert!(rx.try_recv().is_err());
    }
}
