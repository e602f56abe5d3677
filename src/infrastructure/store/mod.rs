//! メッセージ永続化の実装
//!
//! ## 実装
//!
//! - `sqlite`: rusqlite を使った実装（本番用）
//! - `memory`: インメモリ実装（テスト用）

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryMessageStore;
pub use sqlite::SqliteMessageStore;
