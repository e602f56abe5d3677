//! MessageStore trait 定義
//!
//! チャット履歴の永続化に対するポート。ドメイン層が必要とする操作は
//! `append`（1件追記）と `query`（ルームの全履歴を古い順に取得）だけで、
//! この契約を満たすストアは相互に交換可能です。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use thiserror::Error;

/// A persisted chat record. Timestamps are assigned by the store and are
/// monotonic per insertion order within a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub username: String,
    pub text: String,
    /// RFC 3339 timestamp rendered by the store.
    pub timestamp: String,
}

/// Errors surfaced by a message store. Persistence faults are reported and
/// never fatal: the in-memory broadcast still succeeds even when a write
/// fails.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open store: {0}")]
    Open(String),
    #[error("failed to append message: {0}")]
    Append(String),
    #[error("failed to query history: {0}")]
    Query(String),
}

/// Message store port
///
/// UseCase 側はこの trait に依存し、Infrastructure 層の具体的な実装
/// （SQLite、インメモリ）には依存しない。
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append one record to a room's history.
    async fn append(&self, room: &str, username: &str, text: &str) -> Result<(), StoreError>;

    /// All records for a room, ascending by timestamp (insertion order).
    async fn query(&self, room: &str) -> Result<Vec<MessageRecord>, StoreError>;
}
