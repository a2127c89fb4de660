//! The single seam through which every endpoint talks to a language model.
//!
//! Article generation and word counting both build a [`CompletionRequest`]
//! and hand it to a [`CompletionClient`]; only the prompt and sampling
//! parameters differ.

pub mod openai;
pub mod scripted;

use async_trait::async_trait;
use serde::Serialize;
use tally_core::GenerationParams;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// One chat-style completion call producing a single candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        }
    }

    pub fn system(self, content: impl Into<String>) -> Self {
        self.message(Role::System, content)
    }

    pub fn user(self, content: impl Into<String>) -> Self {
        self.message(Role::User, content)
    }

    fn message(mut self, role: Role, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role,
            content: content.into(),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("model request timed out")]
    Timeout,
    #[error("model provider still rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },
    #[error("model provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model provider unreachable: {0}")]
    Network(String),
    #[error("unexpected model provider response: {0}")]
    InvalidResponse(String),
    #[error("model returned an empty completion")]
    EmptyCompletion,
}

impl GenerationError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, GenerationError::Timeout)
    }
}

/// Prompt in, generated text out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError>;
}
