//! WebSocket route handler for the clipboard namespace.

use crate::state::AppState;
use crate::websocket::handle_clipboard_socket;
use axum::{
    extract::{
        ws::{WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;

/// Connection query parameters. `channel` is required; axum decodes the
/// URL-encoding before it reaches us.
#[derive(Deserialize)]
pub struct ClipboardQuery {
    pub channel: String,
}

pub async fn upgrade(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ClipboardQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_connection(socket, state, query.channel))
}

async fn handle_connection(socket: WebSocket, state: Arc<AppState>, channel: String) {
    if let Err(e) = handle_clipboard_socket(socket, state, channel.clone()).await {
        tracing::error!(target: "cliprelay::ws", "WebSocket error for channel {}: {}", channel, e);
    }
}
