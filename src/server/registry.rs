//! Session and room registry.
//!
//! Owns the mapping from room name to membership set and from session id to
//! session handle. All membership mutations and every read that must be
//! consistent with them run under a single `Mutex` domain, so a broadcast
//! never observes a half-updated membership set and two concurrent joins
//! cannot corrupt it. Holding the lock across delivery is fine here because
//! delivery is an enqueue onto an unbounded channel and never blocks.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

use crate::domain::{RoomSummary, StatusSnapshot};

/// Outbound channel for one session. Any task may enqueue a line; the
/// session's pusher task delivers lines to the socket in enqueue order.
pub type OutboundSender = mpsc::UnboundedSender<String>;

/// Opaque identifier for one connected session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn generate() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Server-side state for one connected client.
struct SessionHandle {
    username: String,
    /// Current room, `None` only in the window before the first join.
    room: Option<String>,
    sender: OutboundSender,
}

struct RoomState {
    members: HashSet<SessionId>,
    /// Creation order, used as the deterministic tiebreak in listings.
    created_seq: u64,
}

struct RegistryInner {
    sessions: HashMap<SessionId, SessionHandle>,
    rooms: HashMap<String, RoomState>,
    next_room_seq: u64,
}

impl RegistryInner {
    fn deliver(&self, id: SessionId, text: &str) {
        if let Some(handle) = self.sessions.get(&id)
            && handle.sender.send(text.to_string()).is_err()
        {
            tracing::warn!("Failed to deliver message to session '{}'", id);
        }
    }

    fn send_to_room(&self, room: &str, text: &str) {
        if let Some(state) = self.rooms.get(room) {
            for member in &state.members {
                self.deliver(*member, text);
            }
        }
    }

    fn room_triples(&self) -> Vec<(String, usize, u64)> {
        self.rooms
            .iter()
            .map(|(name, state)| (name.clone(), state.members.len(), state.created_seq))
            .collect()
    }

    fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot::new(self.sessions.len(), self.room_triples())
    }
}

/// Thread-safe registry of connected sessions and rooms.
///
/// Rooms are created on first join and never deleted; their lifetime is the
/// set of rooms ever joined.
pub struct RoomRegistry {
    inner: Mutex<RegistryInner>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                sessions: HashMap::new(),
                rooms: HashMap::new(),
                next_room_seq: 0,
            }),
        }
    }

    /// Register a new session with no room yet. The caller follows up with
    /// a [`join`](Self::join) before processing any commands.
    pub async fn register(&self, username: &str, sender: OutboundSender) -> SessionId {
        let id = SessionId::generate();
        let mut inner = self.inner.lock().await;
        inner.sessions.insert(
            id,
            SessionHandle {
                username: username.to_string(),
                room: None,
                sender,
            },
        );
        tracing::info!("Session '{}' registered for user '{}'", id, username);
        id
    }

    /// Move a session into a room.
    ///
    /// Atomically removes the session from its previous room (broadcasting a
    /// departure notice there first), creates the target room if absent,
    /// adds the session, and broadcasts an arrival notice. Joining the room
    /// the session is already in re-emits both notices; final membership is
    /// unchanged. The joining session also gets a confirmation line.
    pub async fn join(&self, id: SessionId, room_name: &str) {
        let mut inner = self.inner.lock().await;

        let Some(handle) = inner.sessions.get(&id) else {
            tracing::warn!("Join for unknown session '{}'", id);
            return;
        };
        let username = handle.username.clone();
        let previous = handle.room.clone();

        if let Some(old_room) = previous {
            if let Some(state) = inner.rooms.get_mut(&old_room) {
                state.members.remove(&id);
            }
            inner.send_to_room(
                &old_room,
                &format!("[Server] {username} has left the room."),
            );
        }

        if let Some(handle) = inner.sessions.get_mut(&id) {
            handle.room = Some(room_name.to_string());
        }
        if !inner.rooms.contains_key(room_name) {
            let seq = inner.next_room_seq;
            inner.next_room_seq += 1;
            inner.rooms.insert(
                room_name.to_string(),
                RoomState {
                    members: HashSet::new(),
                    created_seq: seq,
                },
            );
        }
        if let Some(state) = inner.rooms.get_mut(room_name) {
            state.members.insert(id);
        }

        inner.send_to_room(
            room_name,
            &format!("[Server] {username} has joined the room."),
        );
        inner.deliver(id, &format!("You are now in room: {room_name}"));
        tracing::info!("User '{}' joined room '{}'", username, room_name);
    }

    /// Remove a session entirely: drop it from the session set and from its
    /// room's membership, then broadcast a departure notice to that room.
    pub async fn unregister(&self, id: SessionId) {
        let mut inner = self.inner.lock().await;
        let Some(handle) = inner.sessions.remove(&id) else {
            return;
        };
        if let Some(room) = handle.room {
            if let Some(state) = inner.rooms.get_mut(&room) {
                state.members.remove(&id);
            }
            inner.send_to_room(
                &room,
                &format!("[Server] {} has left the chat.", handle.username),
            );
        }
        tracing::info!("Session '{}' unregistered", id);
    }

    /// The requesting session's username and current room.
    pub async fn session_view(&self, id: SessionId) -> Option<(String, Option<String>)> {
        let inner = self.inner.lock().await;
        inner
            .sessions
            .get(&id)
            .map(|h| (h.username.clone(), h.room.clone()))
    }

    /// Snapshot of every room with its member count, in creation order.
    pub async fn list_rooms(&self) -> Vec<RoomSummary> {
        let inner = self.inner.lock().await;
        let mut triples = inner.room_triples();
        triples.sort_by_key(|(_, _, seq)| *seq);
        triples
            .into_iter()
            .map(|(name, members, _)| RoomSummary { name, members })
            .collect()
    }

    /// Usernames currently in a room; empty when the room has no members or
    /// does not exist.
    pub async fn members_of(&self, room: &str) -> Vec<String> {
        let inner = self.inner.lock().await;
        let Some(state) = inner.rooms.get(room) else {
            return Vec::new();
        };
        let mut names: Vec<String> = state
            .members
            .iter()
            .filter_map(|id| inner.sessions.get(id).map(|h| h.username.clone()))
            .collect();
        // Sort for consistent ordering
        names.sort();
        names
    }

    /// `(room name, member count)` pairs in creation order, for the
    /// assistant context prompt.
    pub async fn rooms_overview(&self) -> Vec<(String, usize)> {
        self.list_rooms()
            .await
            .into_iter()
            .map(|r| (r.name, r.members))
            .collect()
    }

    /// Compute the status snapshot under one lock acquisition, so the total
    /// and the per-room counts are mutually consistent.
    pub async fn status_snapshot(&self) -> StatusSnapshot {
        let inner = self.inner.lock().await;
        inner.snapshot()
    }

    /// Deliver a line to every current member of a room.
    pub async fn broadcast_to_room(&self, text: &str, room: &str) {
        let inner = self.inner.lock().await;
        inner.send_to_room(room, text);
    }

    /// Compute a fresh status snapshot and deliver its wire line to every
    /// connected session, regardless of room.
    pub async fn broadcast_status(&self) {
        let inner = self.inner.lock().await;
        let line = inner.snapshot().render();
        for id in inner.sessions.keys() {
            inner.deliver(*id, &line);
        }
    }

    /// Deliver a line to a single session.
    pub async fn send_to(&self, id: SessionId, text: &str) {
        let inner = self.inner.lock().await;
        inner.deliver(id, text);
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
