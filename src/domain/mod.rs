//! ドメイン層
//!
//! 副作用を持たない判断ロジック（コマンド解析、ディレクティブ抽出、
//! ステータススナップショット、コンテキストプロンプト）と、
//! 外部コラボレータへのポート（`MessageStore`, `Assistant`）を定義します。
//!
//! ## 依存性の逆転（DIP）
//!
//! - ドメイン層が必要とするインターフェースをドメイン層自身が定義
//! - Infrastructure 層がドメイン層のインターフェースに依存
//! - ドメイン層は Infrastructure 層に依存しない

pub mod assistant;
pub mod command;
pub mod directive;
pub mod prompt;
pub mod status;
pub mod store;

pub use assistant::{Assistant, AssistantError};
pub use command::Command;
pub use directive::{DIRECTIVE_MARKER, Directive};
pub use prompt::build_context_prompt;
pub use status::{RoomSummary, StatusSnapshot};
pub use store::{MessageRecord, MessageStore, StoreError};
