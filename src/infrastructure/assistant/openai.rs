//! OpenAI-backed assistant adapter.
//!
//! Single-turn chat completion: the freshly built context prompt goes in as
//! the system message and the user's question as the user message. The core
//! performs no retries; a failure is surfaced to the caller immediately. A
//! request timeout is imposed here at the port boundary, since the core does
//! not specify one.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Assistant, AssistantError};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Assistant implementation over the OpenAI Chat Completions API.
pub struct OpenAiAssistant {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiAssistant {
    /// Create a new adapter with an explicit API key and optional model name.
    pub fn new(api_key: String, model: Option<String>) -> Self {
        Self {
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Create an adapter from `OPENAI_API_KEY` / `CHATSPHERE_AI_MODEL`.
    ///
    /// Returns `None` when no key is configured; the server then runs with
    /// AI commands answering "AI not available".
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").ok()?;
        if api_key.is_empty() {
            return None;
        }
        let model = std::env::var("CHATSPHERE_AI_MODEL").ok();
        Some(Self::new(api_key, model))
    }

    /// The model this adapter sends requests for.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Assistant for OpenAiAssistant {
    async fn ask(&self, question: &str, context_prompt: &str) -> Result<String, AssistantError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatRequestMessage {
                    role: "system".to_string(),
                    content: context_prompt.to_string(),
                },
                ChatRequestMessage {
                    role: "user".to_string(),
                    content: question.to_string(),
                },
            ],
            max_completion_tokens: Some(300),
            temperature: Some(0.7),
        };

        let response = self
            .client
            .post(OPENAI_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Parse(e.to_string()))?;

        result
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .ok_or(AssistantError::Empty)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatRequestMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatRequestMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_without_key_is_none() {
        // テスト項目: OPENAI_API_KEY が無ければ None が返る
        // given (前提条件):
        // SAFETY: テストプロセス内の環境変数操作のみ
        unsafe { std::env::remove_var("OPENAI_API_KEY") };

        // when (操作):
        let assistant = OpenAiAssistant::from_env();

        // then (期待する結果):
        assert!(assistant.is_none());
    }

    #[test]
    fn test_default_model_is_applied() {
        // テスト項目: モデル未指定時はデフォルトモデルが使われる
        let assistant = OpenAiAssistant::new("test-key".to_string(), None);
        assert_eq!(assistant.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_request_serialization_shape() {
        // テスト項目: リクエスト JSON が API の期待する形になる
        // given (前提条件):
        let request = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatRequestMessage {
                role: "system".to_string(),
                content: "ctx".to_string(),
            }],
            max_completion_tokens: Some(300),
            temperature: Some(0.7),
        };

        // when (操作):
        let json = serde_json::to_value(&request).unwrap();

        // then (期待する結果):
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["max_completion_tokens"], 300);
    }
}
