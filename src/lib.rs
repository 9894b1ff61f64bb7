//! Two-player chess: a fully legal rules engine plus an HTTP / WebSocket
//! relay that lets two remote peers share one authoritative game.

pub mod api;
pub mod config;
pub mod engine;
pub mod healthcheck;
pub mod ws;
