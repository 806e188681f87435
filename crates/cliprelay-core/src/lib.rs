//! Core clipboard synchronization engine for Cliprelay.
//!
//! Transport-free: channel-to-location resolution, the bounded per-location
//! history, and broadcast framing live here; the HTTP/WebSocket surface is
//! in cliprelay-server.

mod directory;
mod error;
mod history;
mod roster;
mod router;

pub use directory::{DeviceDirectory, ResolutionStrategy};
pub use error::RelayError;
pub use history::{ClipboardHistoryStore, HISTORY_CAP};
pub use roster::{AimClient, ChannelFilter, Credentials, RosterApi};
pub use router::{BroadcastMessage, BroadcastRouter};

/// Result type for Cliprelay operations.
pub type Result<T> = std::result::Result<T, RelayError>;
