//! Per-connection session loop.
//!
//! Each session runs an independent sequential worker: one task pushes
//! outbound lines from the session's channel into the socket, one task
//! reads inbound lines and dispatches them one at a time. Different
//! sessions execute concurrently; within a session, commands are processed
//! strictly in arrival order.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use super::dispatch::dispatch;
use super::state::AppState;

/// The room every session lands in after the username handshake.
pub const DEFAULT_ROOM: &str = "general";

/// Drive one WebSocket connection from handshake to cleanup.
pub async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    if sender
        .send(Message::Text("Enter your username: ".into()))
        .await
        .is_err()
    {
        return;
    }

    // The first line is always the username, never a command. A session
    // whose stream ends first, or that sends an empty name, is discarded
    // without ever joining a room.
    let Some(username) = read_username(&mut receiver).await else {
        tracing::info!("Connection closed before a username was provided");
        return;
    };

    let (tx, rx) = mpsc::unbounded_channel();
    let session = state.registry.register(&username, tx).await;
    state.registry.join(session, DEFAULT_ROOM).await;
    state
        .registry
        .broadcast_to_room(
            &format!("[Server] {username} has joined the chat."),
            DEFAULT_ROOM,
        )
        .await;
    state.registry.broadcast_status().await;

    // Pusher task: outbound channel -> socket, preserving enqueue order.
    let mut send_task = tokio::spawn(async move {
        let mut rx = rx;
        while let Some(line) = rx.recv().await {
            if sender.send(Message::Text(line.into())).await.is_err() {
                break;
            }
        }
    });

    // Read loop: each line is dispatched exactly once, synchronously,
    // before the next read.
    let state_for_loop = state.clone();
    let username_for_loop = username.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };
            match msg {
                Message::Text(text) => {
                    let line = text.trim();
                    if line.is_empty() {
                        continue;
                    }
                    dispatch(&state_for_loop, session, line).await;
                }
                Message::Close(_) => {
                    tracing::info!("User '{}' requested close", username_for_loop);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other.
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Cleanup runs on every exit path: drop the session from the global
    // set and its room (with a departure notice), then refresh everyone's
    // status line.
    state.registry.unregister(session).await;
    state.registry.broadcast_status().await;
    tracing::info!("User '{}' disconnected", username);
}

/// Wait for the first text frame and return the trimmed username, or `None`
/// when the stream ends first or the name is empty.
async fn read_username(
    receiver: &mut futures_util::stream::SplitStream<WebSocket>,
) -> Option<String> {
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let username = text.trim().to_string();
                if username.is_empty() {
                    return None;
                }
                return Some(username);
            }
            Ok(Message::Close(_)) | Err(_) => return None,
            Ok(_) => continue,
        }
    }
    None
}
