//! Cliprelay server library - HTTP/WebSocket clipboard relay.
//!
//! The routes, WebSocket handling, and application state live here rather
//! than in main.rs so integration tests can assemble the app in-process.

pub mod config;
pub mod logging;
pub mod routes;
pub mod state;
pub mod websocket;
