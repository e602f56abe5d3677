//! ChatSphere: real-time multi-room chat server with an AI assistant.
//!
//! Clients connect over WebSocket, join named rooms and exchange text
//! messages over a line-oriented protocol. The assistant can be asked
//! publicly (`/ai`) or privately (`/privateai`), and its answers may carry
//! a `[PerformCommand]` directive that re-enters a restricted command set.

// layers
pub mod domain;
pub mod infrastructure;
pub mod server;

// shared library
pub mod common;
