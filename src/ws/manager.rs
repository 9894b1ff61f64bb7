//! WebSocket connection manager: tracks connected peers per session and
//! delivers events either to one peer or to every peer of a session.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, warn};

use super::messages::WsEvent;

/// Handle for a single WebSocket client.  The handler owns the
/// receiving half; the manager keeps the sending half.
pub type ClientSender = mpsc::UnboundedSender<WsEvent>;

/// A unique ID assigned to each connected WebSocket client.
pub type ClientId = u64;

/// Manages per-session sets of connected clients.
#[derive(Debug)]
pub struct WsManager {
    /// session_id → { client_id → sender }
    subs: RwLock<HashMap<String, HashMap<ClientId, ClientSender>>>,
    next_id: AtomicU64,
}

impl WsManager {
    /// Create a new, empty manager.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a new client for a session, returning (client_id, receiver).
    pub async fn subscribe(
        &self,
        session_id: &str,
    ) -> (ClientId, mpsc::UnboundedReceiver<WsEvent>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();

        let mut subs = self.subs.write().await;
        subs.entry(session_id.to_string())
            .or_default()
            .insert(id, tx);

        debug!(session_id, client_id = id, "WS client subscribed");
        (id, rx)
    }

    /// Remove a client from a session.
    pub async fn unsubscribe(&self, session_id: &str, client_id: ClientId) {
        let mut subs = self.subs.write().await;
        if let Some(clients) = subs.get_mut(session_id) {
            clients.remove(&client_id);
            if clients.is_empty() {
                subs.remove(session_id);
            }
        }
        debug!(session_id, client_id, "WS client unsubscribed");
    }

    /// Drop every client of a session (used when the session is deleted).
    /// Their receivers close, which ends the connection.
    pub async fn drop_session(&self, session_id: &str) {
        if let Some(clients) = self.subs.write().await.remove(session_id) {
            debug!(session_id, clients = clients.len(), "WS session dropped");
        }
    }

    /// Send an event to a single client. Returns false if it is gone.
    pub async fn send_to(&self, session_id: &str, client_id: ClientId, event: WsEvent) -> bool {
        let subs = self.subs.read().await;
        subs.get(session_id)
            .and_then(|clients| clients.get(&client_id))
            .is_some_and(|tx| tx.send(event).is_ok())
    }

    /// Broadcast an event to all subscribers of a session.
    pub async fn broadcast(&self, session_id: &str, event: WsEvent) {
        let subs = self.subs.read().await;
        if let Some(clients) = subs.get(session_id) {
            let mut stale: Vec<ClientId> = Vec::new();
            for (&cid, tx) in clients {
                if tx.send(event.clone()).is_err() {
                    stale.push(cid);
                }
            }
            drop(subs); // release read lock before write

            if !stale.is_empty() {
                let mut subs = self.subs.write().await;
                if let Some(clients) = subs.get_mut(session_id) {
                    for cid in &stale {
                        clients.remove(cid);
                        warn!(session_id, client_id = cid, "removed stale WS client");
                    }
                    if clients.is_empty() {
                        subs.remove(session_id);
                    }
                }
            }
        }
    }

    /// Total number of active connections across all sessions.
    pub async fn total_connections(&self) -> usize {
        let subs = self.subs.read().await;
        subs.values().map(|c| c.len()).sum()
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self {
            subs: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
