//! WebSocket connection handling for the clipboard namespace.

use crate::state::AppState;
use anyhow::Result;
use axum::extract::ws::{Message, WebSocket};
use cliprelay_types::{ClipboardKind, WsClientMessage, WsServerMessage};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One live connection's binding to its channel. The location is never
/// cached here; every action re-resolves against the roster.
struct ChannelSession {
    socket_id: Uuid,
    channel: String,
}

pub async fn handle_clipboard_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    channel: String,
) -> Result<()> {
    let session = ChannelSession {
        socket_id: Uuid::new_v4(),
        channel,
    };

    info!(
        target: "cliprelay::ws",
        "Websocket connection {} for channel {}",
        session.socket_id,
        session.channel
    );

    let (mut ws_tx, mut ws_rx) = socket.split();

    // Subscribe before sending the snapshot so no broadcast can slip
    // between the snapshot and the first forwarded message.
    let mut broadcast_rx = state.subscribe();

    // Channel for recv_task to push direct replies (payload errors) to this
    // socket only.
    let (outgoing_tx, mut outgoing_rx) = tokio::sync::mpsc::channel::<WsServerMessage>(8);

    let snapshot = connect_snapshot(&state, &session.channel).await;
    let json = serde_json::to_string(&snapshot)?;
    ws_tx.send(Message::Text(json.into())).await?;

    let socket_id = session.socket_id;

    // Forward broadcasts and direct replies to the socket.
    let mut send_task = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                Some(msg) = outgoing_rx.recv() => msg,
                result = broadcast_rx.recv() => match result {
                    Ok(msg) => msg,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        warn!(target: "cliprelay::ws", "Connection {} lagged, skipped {} broadcasts", socket_id, n);
                        continue;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                },
            };

            let json = match serde_json::to_string(&msg) {
                Ok(j) => j,
                Err(_) => continue,
            };
            if let Err(e) = ws_tx.send(Message::Text(json.into())).await {
                debug!(target: "cliprelay::ws", "Send failed for connection {}: {}", socket_id, e);
                break;
            }
        }
    });

    // Handle inbound copy events.
    let state_clone = state.clone();
    let channel = session.channel.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_rx.next().await {
            match msg {
                Message::Text(text) => {
                    handle_client_text(&state_clone, &channel, &text, &outgoing_tx).await;
                }
                Message::Close(_) => {
                    debug!(target: "cliprelay::ws", "Connection {} sent close", socket_id);
                    break;
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    info!(
        target: "cliprelay::ws",
        "Websocket connection {} for channel {} closed",
        session.socket_id,
        session.channel
    );
    Ok(())
}

/// The connect-time message for a channel's session. A channel that does
/// not resolve still gets an Active session, just with no members and no
/// history.
async fn connect_snapshot(state: &Arc<AppState>, channel: &str) -> WsServerMessage {
    let token = state.token().await;
    match state
        .router
        .snapshot_for_channel(channel, token.as_deref())
        .await
    {
        Ok(history) => WsServerMessage::snapshot(vec![channel.to_string()], history),
        Err(e) => {
            warn!(
                target: "cliprelay::ws",
                "Snapshot resolution failed for channel {}: {}",
                channel,
                e
            );
            WsServerMessage::snapshot(vec![], vec![])
        }
    }
}

/// Parse one client frame and dispatch it. Malformed payloads get an error
/// reply on this socket; resolution failures drop the action with a log
/// line. Neither terminates the connection.
async fn handle_client_text(
    state: &Arc<AppState>,
    channel: &str,
    text: &str,
    outgoing_tx: &tokio::sync::mpsc::Sender<WsServerMessage>,
) {
    let msg: WsClientMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!(target: "cliprelay::ws", "Malformed payload from channel {}: {}", channel, e);
            let _ = outgoing_tx
                .send(WsServerMessage::Error {
                    code: "malformed_payload".to_string(),
                    message: e.to_string(),
                })
                .await;
            return;
        }
    };

    let (kind, clipboard) = match msg {
        WsClientMessage::CopyText { clipboard } => (ClipboardKind::Text, clipboard),
        WsClientMessage::CopyImage { clipboard } => (ClipboardKind::Image, clipboard),
    };

    match kind {
        ClipboardKind::Text => {
            info!(target: "cliprelay::ws", "Copy text from channel {}", channel)
        }
        ClipboardKind::Image => {
            info!(target: "cliprelay::ws", "Copy image from channel {}", channel)
        }
    }

    let token = state.token().await;
    match state
        .router
        .handle_copy(channel, kind, clipboard, token.as_deref())
        .await
    {
        Ok(broadcast) => {
            state.publish(WsServerMessage::Clipboard {
                originator: Some(broadcast.originator),
                channels: broadcast.channels,
                clipboard_history: broadcast.clipboard_history,
            });
        }
        Err(e) if e.is_resolution_failure() => {
            warn!(
                target: "cliprelay::ws",
                "Dropped copy from channel {}: {}",
                channel,
                e
            );
        }
        Err(e) => {
            warn!(target: "cliprelay::ws", "Copy from channel {} failed: {}", channel, e);
            let _ = outgoing_tx
                .send(WsServerMessage::Error {
                    code: "copy_failed".to_string(),
                    message: e.to_string(),
                })
                .await;
        }
    }
}
