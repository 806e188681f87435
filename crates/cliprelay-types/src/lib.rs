//! Shared types for the Cliprelay clipboard synchronization server.

mod clipboard;
mod device;
mod ws;

pub use clipboard::*;
pub use device::*;
pub use ws::*;
