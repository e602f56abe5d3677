//! Side-effecting command execution for one session.
//!
//! [`Command::parse`] decides, this module acts: room mutations, broadcasts,
//! persistence writes and assistant calls. Assistant answers re-enter
//! through [`run_directive`], which dispatches the restricted
//! [`Directive`] subset through the same underlying operations, never
//! through a second pass over the full parser.

use crate::domain::{
    Command, Directive, build_context_prompt, command::COMMAND_LIST,
};

use super::registry::SessionId;
use super::state::AppState;

/// Execute one protocol line in the context of one session.
///
/// Called synchronously from the session's read loop, so a single session
/// never has two commands in flight at once.
pub async fn dispatch(state: &AppState, session: SessionId, line: &str) {
    match Command::parse(line) {
        Command::Join { room } => {
            state.registry.join(session, &room).await;
            state.registry.broadcast_status().await;
        }
        Command::Rooms => send_room_list(state, session).await,
        Command::History => send_history(state, session).await,
        Command::Help { query } => send_help(state, session, &query).await,
        Command::Ai { question } => handle_ai(state, session, &question).await,
        Command::PrivateAi { question } => handle_private_ai(state, session, &question).await,
        Command::ListUsers => send_user_list(state, session).await,
        Command::Chat { text } => handle_chat(state, session, &text).await,
    }
}

/// The requesting session's username and current room, or `None` if the
/// session is gone or has not joined a room yet.
async fn session_context(state: &AppState, session: SessionId) -> Option<(String, String)> {
    let (username, room) = state.registry.session_view(session).await?;
    Some((username, room?))
}

async fn handle_chat(state: &AppState, session: SessionId, text: &str) {
    let Some((username, room)) = session_context(state, session).await else {
        return;
    };
    state
        .registry
        .broadcast_to_room(&format!("{username}: {text}"), &room)
        .await;
    // A failed write is reported, never fatal; the broadcast already went out.
    if let Err(e) = state.store.append(&room, &username, text).await {
        tracing::error!("Error saving message: {}", e);
    }
}

async fn send_room_list(state: &AppState, session: SessionId) {
    let rooms = state.registry.list_rooms().await;
    state.registry.send_to(session, "Available rooms:").await;
    for room in rooms {
        state
            .registry
            .send_to(
                session,
                &format!("  {} ({} user(s))", room.name, room.members),
            )
            .await;
    }
}

async fn send_user_list(state: &AppState, session: SessionId) {
    let Some((_, room)) = session_context(state, session).await else {
        return;
    };
    let members = state.registry.members_of(&room).await;
    if members.is_empty() {
        state
            .registry
            .send_to(session, "No users in the current room.")
            .await;
        return;
    }
    state
        .registry
        .send_to(session, &format!("Users in room '{room}':"))
        .await;
    for member in members {
        state.registry.send_to(session, &format!("  {member}")).await;
    }
}

async fn send_history(state: &AppState, session: SessionId) {
    let Some((_, room)) = session_context(state, session).await else {
        return;
    };
    match state.store.query(&room).await {
        Ok(records) => {
            state
                .registry
                .send_to(session, &format!("--- Message History for Room: {room} ---"))
                .await;
            for record in records {
                state
                    .registry
                    .send_to(
                        session,
                        &format!("[{}] {}: {}", record.timestamp, record.username, record.text),
                    )
                    .await;
            }
        }
        Err(e) => {
            tracing::error!("Error retrieving message history: {}", e);
            state
                .registry
                .send_to(session, "Error retrieving message history.")
                .await;
        }
    }
}

async fn send_help(state: &AppState, session: SessionId, query: &str) {
    let reply = if query.is_empty() {
        "AI Helper: Type '/help commands' to see a list of commands, \
         or '/help <your question>' to ask me anything!"
            .to_string()
    } else if query.contains("commands") {
        format!("AI: {COMMAND_LIST}")
    } else {
        format!("AI Helper: You asked about '{query}'. For more commands, type '/help commands'.")
    };
    state.registry.send_to(session, &reply).await;
}

async fn handle_ai(state: &AppState, session: SessionId, question: &str) {
    let Some((username, room)) = session_context(state, session).await else {
        return;
    };
    if question.is_empty() {
        state
            .registry
            .broadcast_to_room(
                "AI: Please provide a question after /ai, e.g., '/ai How do I fix my code?'",
                &room,
            )
            .await;
        return;
    }
    let Some(assistant) = state.assistant.clone() else {
        state
            .registry
            .broadcast_to_room("AI: AI not available (no API key).", &room)
            .await;
        return;
    };

    state
        .registry
        .broadcast_to_room(&format!("{username} asked AI: {question}"), &room)
        .await;
    if let Err(e) = state
        .store
        .append(&room, &username, &format!("[AI-Q]{question}"))
        .await
    {
        tracing::error!("Error saving AI question: {}", e);
    }

    let prompt =
        build_context_prompt(&username, &room, &state.registry.rooms_overview().await);
    match assistant.ask(question, &prompt).await {
        Ok(answer) => {
            state
                .registry
                .broadcast_to_room(&format!("AI: {answer}"), &room)
                .await;
            if let Err(e) = state.store.append(&room, "AI", &answer).await {
                tracing::error!("Error saving AI answer: {}", e);
            }
            run_directive(state, session, &answer).await;
        }
        Err(e) => {
            state
                .registry
                .broadcast_to_room(&format!("AI: Error: {e}"), &room)
                .await;
        }
    }
}

async fn handle_private_ai(state: &AppState, session: SessionId, question: &str) {
    let Some((username, room)) = session_context(state, session).await else {
        return;
    };
    if question.is_empty() {
        state
            .registry
            .send_to(
                session,
                "PRIVATEAI: Please provide a question, e.g., '/privateai How do I fix my code?'",
            )
            .await;
        return;
    }
    let Some(assistant) = state.assistant.clone() else {
        state
            .registry
            .send_to(session, "PRIVATEAI: AI not available (no API key).")
            .await;
        return;
    };

    // Private exchanges are never broadcast and never persisted.
    let prompt =
        build_context_prompt(&username, &room, &state.registry.rooms_overview().await);
    match assistant.ask(question, &prompt).await {
        Ok(answer) => {
            state
                .registry
                .send_to(session, &format!("PRIVATEAI: {answer}"))
                .await;
            run_directive(state, session, &answer).await;
        }
        Err(e) => {
            state
                .registry
                .send_to(session, &format!("PRIVATEAI: Error: {e}"))
                .await;
        }
    }
}

/// Execute an embedded assistant directive on behalf of the session that
/// triggered the original `/ai` or `/privateai` call.
async fn run_directive(state: &AppState, session: SessionId, answer: &str) {
    match Directive::extract(answer) {
        Some(Directive::Join { room }) => {
            state.registry.join(session, &room).await;
            state.registry.broadcast_status().await;
        }
        Some(Directive::History) => send_history(state, session).await,
        Some(Directive::Rooms) => send_room_list(state, session).await,
        Some(Directive::ListUsers) => send_user_list(state, session).await,
        None => {}
    }
}
