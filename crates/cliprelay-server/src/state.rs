//! Shared application state.

use crate::config::Config;
use cliprelay_core::{BroadcastRouter, ClipboardHistoryStore, DeviceDirectory, RosterApi};
use cliprelay_types::WsServerMessage;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Capacity of the fan-out channel; slow clients that lag this far behind
/// start missing broadcasts rather than backpressuring everyone else.
const BROADCAST_CAPACITY: usize = 64;

/// Shared application state.
pub struct AppState {
    pub router: BroadcastRouter,
    pub config: Config,
    /// Session token for the roster service. None until the startup login
    /// succeeds; while empty, every resolution fails and actions are dropped.
    token: RwLock<Option<String>>,
    broadcast_tx: broadcast::Sender<WsServerMessage>,
}

impl AppState {
    pub fn new(config: Config, roster: Arc<dyn RosterApi>) -> Self {
        let directory = DeviceDirectory::new(roster, config.resolution_strategy());
        let router = BroadcastRouter::new(directory, ClipboardHistoryStore::new());
        let (broadcast_tx, _) = broadcast::channel(BROADCAST_CAPACITY);

        Self {
            router,
            config,
            token: RwLock::new(None),
            broadcast_tx,
        }
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn set_token(&self, token: String) {
        *self.token.write().await = Some(token);
    }

    /// Subscribe to the clipboard fan-out. Every live connection holds one
    /// receiver; delivery is global, clients filter by channel membership.
    pub fn subscribe(&self) -> broadcast::Receiver<WsServerMessage> {
        self.broadcast_tx.subscribe()
    }

    /// Publish a message to all live connections. A zero receiver count is
    /// not an error, it just means nobody is connected.
    pub fn publish(&self, message: WsServerMessage) {
        let _ = self.broadcast_tx.send(message);
    }
}
