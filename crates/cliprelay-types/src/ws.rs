//! WebSocket message protocol between client and server.
//!
//! Wire names (`copy-text`, `clipboardHistory`, ...) match the event names
//! browser clients already speak; do not rename them without a protocol
//! version bump.

use serde::{Deserialize, Serialize};

use crate::ClipboardEntry;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WsClientMessage {
    /// Text was copied on the client; `clipboard` is the UTF-8 content.
    #[serde(rename = "copy-text")]
    CopyText { clipboard: String },
    /// An image was copied on the client; `clipboard` is base64 data.
    #[serde(rename = "copy-image")]
    CopyImage { clipboard: String },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WsServerMessage {
    /// The clipboard history for the client's console location.
    ///
    /// Sent once as a snapshot on connect (no `originator`) and again to
    /// every connection whenever any channel records a copy. Receivers
    /// filter on `channels` membership client-side.
    #[serde(rename = "clipboard")]
    Clipboard {
        #[serde(skip_serializing_if = "Option::is_none")]
        originator: Option<String>,
        channels: Vec<String>,
        #[serde(rename = "clipboardHistory")]
        clipboard_history: Vec<ClipboardEntry>,
    },
    /// A client payload could not be processed.
    #[serde(rename = "error")]
    Error { code: String, message: String },
}

impl WsServerMessage {
    /// The connect-time snapshot: the session's own channel (empty when the
    /// channel did not resolve) and the current history for its location.
    pub fn snapshot(channels: Vec<String>, clipboard_history: Vec<ClipboardEntry>) -> Self {
        Self::Clipboard {
            originator: None,
            channels,
            clipboard_history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_text_wire_format() {
        let json = r#"{"type": "copy-text", "clipboard": "hello"}"#;
        let msg: WsClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            WsClientMessage::CopyText { clipboard } => assert_eq!(clipboard, "hello"),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_omits_originator() {
        let msg = WsServerMessage::snapshot(vec!["TX1".into()], vec![]);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "clipboard",
                "channels": ["TX1"],
                "clipboardHistory": [],
            })
        );
    }

    #[test]
    fn test_broadcast_wire_format() {
        let msg = WsServerMessage::Clipboard {
            originator: Some("TX1".into()),
            channels: vec!["RX1".into(), "RX2".into()],
            clipboard_history: vec![ClipboardEntry::text("hello")],
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["originator"], "TX1");
        assert_eq!(json["clipboardHistory"][0]["type"], "text");
        assert_eq!(
            json["clipboardHistory"][0]["content"],
            serde_json::json!("hello")
        );
    }
}
