//! Assistant trait 定義
//!
//! 大規模言語モデルへのポート。ドメイン層は (question, context_prompt)
//! を渡して回答テキストを受け取ることだけを要求し、トランスポートや
//! 認証の詳細には依存しません。コアはリトライを行わず、一度の失敗を
//! そのまま呼び出し元へ返します。

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by an assistant backend.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("no response from assistant")]
    Empty,
}

/// Assistant port
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Ask a single-turn question with a freshly built context prompt.
    async fn ask(&self, question: &str, context_prompt: &str) -> Result<String, AssistantError>;
}
