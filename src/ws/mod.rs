//! WebSocket module: the two-seat move relay.
//!
//! - [`messages`]: Typed event/command envelopes.
//! - [`manager`]: Per-session connection tracking, broadcast and direct send.
//! - [`handler`]: Axum WebSocket upgrade handler and seat management.

pub mod handler;
pub mod manager;
pub mod messages;

pub use handler::{announce_move, ws_handler};
pub use manager::WsManager;
pub use messages::WsEvent;
