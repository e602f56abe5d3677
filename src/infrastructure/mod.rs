//! Infrastructure 層
//!
//! ドメイン層が定義するポート（`MessageStore`, `Assistant`）の具体的な実装。

pub mod assistant;
pub mod store;
