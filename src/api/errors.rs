use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::engine::ChessError;

/// Structured API error that serializes to JSON.
#[derive(Debug)]
pub enum ApiError {
    SessionNotFound(String),
    IllegalMove(ChessError),
    InvalidRequest(String),
    SessionLimit(usize),
    NotYourTurn(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDetail {
    code: String,
    message: String,
}

impl ApiError {
    /// HTTP status, machine-readable code and human message.
    ///
    /// Shared with the WebSocket relay, which reports the same codes in its
    /// private `error` events.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                format!("Session not found: {id}"),
            ),
            ApiError::IllegalMove(err) => {
                (StatusCode::BAD_REQUEST, "ILLEGAL_MOVE", err.to_string())
            }
            ApiError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
            }
            ApiError::SessionLimit(max) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SESSION_LIMIT",
                format!("Session limit reached ({max})"),
            ),
            ApiError::NotYourTurn(msg) => (StatusCode::CONFLICT, "NOT_YOUR_TURN", msg.clone()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ChessError> for ApiError {
    fn from(err: ChessError) -> Self {
        match &err {
            ChessError::IllegalMove { .. } => ApiError::IllegalMove(err),
            ChessError::OutOfBounds { .. }
            | ChessError::InvalidSquare(_)
            | ChessError::InvalidPosition(_) => ApiError::InvalidRequest(err.to_string()),
        }
    }
}
