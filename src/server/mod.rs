//! WebSocket chat server implementation.

pub mod dispatch;
pub mod handler;
pub mod registry;
pub mod runner;
pub mod session;
mod signal;
pub mod state;

pub use runner::run_server;
