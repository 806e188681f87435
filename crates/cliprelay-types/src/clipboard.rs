//! Clipboard entry types shared by the history store and the wire protocol.

use serde::{Deserialize, Serialize};

/// What kind of payload a clipboard entry carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardKind {
    /// UTF-8 text.
    Text,
    /// Base64-encoded image bytes.
    Image,
}

/// A single clipboard item. Immutable once created; two entries are equal
/// when both kind and content match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardEntry {
    #[serde(rename = "type")]
    pub kind: ClipboardKind,
    pub content: String,
}

impl ClipboardEntry {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: ClipboardKind::Text,
            content: content.into(),
        }
    }

    pub fn image(content: impl Into<String>) -> Self {
        Self {
            kind: ClipboardKind::Image,
            content: content.into(),
        }
    }
}
