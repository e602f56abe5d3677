//! インメモリ MessageStore 実装
//!
//! HashMap をインメモリ DB として使用します。タイムスタンプの採番には
//! `Clock` を注入できるため、テストで決定的な履歴を作れます。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::common::time::{Clock, SystemClock, timestamp_to_rfc3339};
use crate::domain::{MessageRecord, MessageStore, StoreError};

/// In-memory message store, keyed by room name.
pub struct InMemoryMessageStore {
    rooms: Mutex<HashMap<String, Vec<MessageRecord>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryMessageStore {
    /// Create an empty store using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store with an injected clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(&self, room: &str, username: &str, text: &str) -> Result<(), StoreError> {
        let mut rooms = self.rooms.lock().await;
        rooms
            .entry(room.to_string())
            .or_default()
            .push(MessageRecord {
                username: username.to_string(),
                text: text.to_string(),
                timestamp: timestamp_to_rfc3339(self.clock.now_utc_millis()),
            });
        Ok(())
    }

    async fn query(&self, room: &str) -> Result<Vec<MessageRecord>, StoreError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms.get(room).cloned().unwrap_or_default())
    }
}
