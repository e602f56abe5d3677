//! Command classification over a single protocol line.
//!
//! This module contains pure parsing logic without side effects, making it
//! easy to test. The same classification is used for direct user input; AI
//! output re-enters through the restricted [`crate::domain::directive`]
//! path instead.

/// A classified protocol line.
///
/// Prefixes are checked most-specific first; the first match dispatches and
/// anything unrecognized is ordinary chat in the current room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/join <name>` - switch to the named room (created on first join).
    /// An empty name is permitted; it is an unusual but valid room name.
    Join { room: String },
    /// `/rooms` - list every room with its member count (requester only).
    Rooms,
    /// `/history` - replay persisted records for the current room.
    History,
    /// `/help` or `/help <text>` - usage hints, no model call.
    Help { query: String },
    /// `/ai <question>` - ask the assistant, visible to the whole room.
    Ai { question: String },
    /// `/privateai <question>` - ask the assistant, visible to the requester only.
    PrivateAi { question: String },
    /// `/listusers` - usernames in the current room (requester only).
    ListUsers,
    /// Anything else: plain chat text for the current room.
    Chat { text: String },
}

impl Command {
    /// Classify a trimmed, non-empty input line.
    ///
    /// Bare `/ai` and `/privateai` (no trailing text) still classify as
    /// assistant commands with an empty question so the caller can emit a
    /// "please provide a question" notice instead of falling through to chat.
    pub fn parse(line: &str) -> Command {
        if let Some(rest) = line.strip_prefix("/join ") {
            Command::Join {
                room: rest.trim().to_string(),
            }
        } else if line.starts_with("/rooms") {
            Command::Rooms
        } else if line.starts_with("/history") {
            Command::History
        } else if line.starts_with("/help") {
            Command::Help {
                query: line["/help".len()..].trim().to_lowercase(),
            }
        } else if line == "/ai" {
            Command::Ai {
                question: String::new(),
            }
        } else if let Some(rest) = line.strip_prefix("/ai ") {
            Command::Ai {
                question: rest.trim().to_string(),
            }
        } else if line == "/privateai" {
            Command::PrivateAi {
                question: String::new(),
            }
        } else if let Some(rest) = line.strip_prefix("/privateai ") {
            Command::PrivateAi {
                question: rest.trim().to_string(),
            }
        } else if line.starts_with("/listusers") {
            Command::ListUsers
        } else {
            Command::Chat {
                text: line.to_string(),
            }
        }
    }
}

/// The full command list shown by `/help commands`.
pub const COMMAND_LIST: &str = "Available commands:\n\
    1. /help - Display the list of available commands.\n\
    2. /join <room> - Join a specific room.\n\
    3. /rooms - List all available rooms.\n\
    4. /history - Display the chat history of the current room.\n\
    5. /ai <question> - Ask a general question to the AI.\n\
    6. /privateai <question> - Ask a question to the AI privately.\n\
    7. /listusers - List all users in the current room.";
