//! Status snapshot computation and rendering.
//!
//! A snapshot is derived, never stored: it summarizes the total session
//! count and per-room membership at one consistent instant. The registry
//! computes the inputs under a single lock acquisition so the total and the
//! per-room counts agree with each other.

/// One room's name and current member count.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RoomSummary {
    pub name: String,
    pub members: usize,
}

/// Point-in-time summary of total users and per-room counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Number of currently connected sessions.
    pub total_users: usize,
    /// Every room with its member count, highest membership first. Ties are
    /// broken by room creation order, which makes rendering deterministic.
    pub rooms: Vec<RoomSummary>,
}

impl StatusSnapshot {
    /// Build a snapshot from `(name, member_count, creation_seq)` triples.
    pub fn new(total_users: usize, mut rooms: Vec<(String, usize, u64)>) -> Self {
        rooms.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        StatusSnapshot {
            total_users,
            rooms: rooms
                .into_iter()
                .map(|(name, members, _)| RoomSummary { name, members })
                .collect(),
        }
    }

    /// Render the `STATUS:` wire line, listing at most the five busiest rooms.
    pub fn render(&self) -> String {
        let mut line = format!("STATUS: {} users total. | Rooms: ", self.total_users);
        let shown = self
            .rooms
            .iter()
            .take(5)
            .map(|r| format!("{}({})", r.name, r.members))
            .collect::<Vec<_>>()
            .join(", ");
        line.push_str(&shown);
        line
    }
}
