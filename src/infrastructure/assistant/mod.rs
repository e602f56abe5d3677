//! Assistant ポートの実装
//!
//! ## 実装
//!
//! - `openai`: OpenAI Chat Completions API を使った実装

pub mod openai;

pub use openai::OpenAiAssistant;
