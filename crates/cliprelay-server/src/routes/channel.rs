//! Channel lookup endpoint: which transmitting channel a computer maps to.

use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

#[derive(Deserialize)]
pub struct ChannelQuery {
    pub comp: String,
}

#[derive(Serialize)]
pub struct ChannelResponse {
    pub channel: Option<String>,
}

/// `GET /api/channel?comp=<name>` resolves a computer description to its
/// transmitting channel name. Lookup failures answer `null` rather than an
/// error status; the original clients only distinguish found from not.
pub async fn lookup(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChannelQuery>,
) -> Json<ChannelResponse> {
    let token = state.token().await;
    let channel = match state
        .router
        .directory()
        .channel_for_computer(&query.comp, token.as_deref())
        .await
    {
        Ok(Some(channel)) => Some(channel),
        Ok(None) => {
            error!(target: "cliprelay::api", "No channel for computer {}", query.comp);
            None
        }
        Err(e) => {
            error!(
                target: "cliprelay::api",
                "Channel lookup failed for computer {}: {}",
                query.comp,
                e
            );
            None
        }
    };

    Json(ChannelResponse { channel })
}
