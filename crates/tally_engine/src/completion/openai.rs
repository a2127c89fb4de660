use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tally_core::{is_reasoning_model, truncate_chars};
use tally_logging::{tally_debug, tally_warn};

use super::{ChatMessage, CompletionClient, CompletionRequest, GenerationError, Role};
use crate::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Upper bound on how much of an error body is kept in [`GenerationError::Status`].
const ERROR_BODY_CHARS: usize = 500;

#[derive(Clone)]
pub struct OpenAiSettings {
    pub base_url: String,
    pub api_key: String,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

impl OpenAiSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            request_timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
        }
    }
}

impl fmt::Debug for OpenAiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

/// Chat completions against an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    settings: OpenAiSettings,
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    n: u32,
}

impl<'a> ChatRequest<'a> {
    fn from_request(request: &'a CompletionRequest) -> Self {
        if is_reasoning_model(&request.model) {
            Self {
                model: &request.model,
                messages: fold_system_messages(&request.messages),
                max_tokens: None,
                max_completion_tokens: Some(request.max_tokens),
                temperature: None,
                n: 1,
            }
        } else {
            Self {
                model: &request.model,
                messages: request.messages.clone(),
                max_tokens: Some(request.max_tokens),
                max_completion_tokens: None,
                temperature: Some(request.temperature),
                n: 1,
            }
        }
    }
}

/// Moves system instructions to the front of the first user message.
fn fold_system_messages(messages: &[ChatMessage]) -> Vec<ChatMessage> {
    let system = messages
        .iter()
        .filter(|message| message.role == Role::System)
        .map(|message| message.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    let mut folded: Vec<ChatMessage> = messages
        .iter()
        .filter(|message| message.role != Role::System)
        .cloned()
        .collect();
    if system.is_empty() {
        return folded;
    }
    match folded.iter_mut().find(|message| message.role == Role::User) {
        Some(first_user) => {
            first_user.content = format!("{system}\n\n{}", first_user.content);
        }
        None => folded.insert(
            0,
            ChatMessage {
                role: Role::User,
                content: system,
            },
        ),
    }
    folded
}

/// Error body kept for a failed call, truncated, or a note when it could not be read.
fn describe_error_body<E: fmt::Display>(body: Result<String, E>) -> String {
    match body {
        Ok(text) => truncate_chars(&text, ERROR_BODY_CHARS).to_string(),
        Err(err) => format!("<unreadable body: {err}>"),
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl OpenAiClient {
    pub fn new(settings: OpenAiSettings) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| GenerationError::Network(err.to_string()))?;
        let endpoint = format!(
            "{}/chat/completions",
            settings.base_url.trim_end_matches('/')
        );
        Ok(Self {
            settings,
            endpoint,
            client,
        })
    }

    fn is_retryable(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    fn extract_text(response: ChatResponse) -> Result<String, GenerationError> {
        if let Some(error) = response.error {
            return Err(GenerationError::InvalidResponse(error.message));
        }
        response
            .choices
            .and_then(|choices| choices.into_iter().next())
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::InvalidResponse("no choices in response".into()))
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
        let body = ChatRequest::from_request(request);
        let retry = self.settings.retry;

        let mut attempt = 0;
        loop {
            tally_debug!(
                "chat completion model={} attempt={}",
                request.model,
                attempt + 1
            );
            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.settings.api_key)
                .json(&body)
                .send()
                .await
                .map_err(map_reqwest_error)?;

            let status = response.status();
            if Self::is_retryable(status) && attempt < retry.max_retries {
                let retry_after = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|value| value.to_str().ok());
                let wait = retry.delay(attempt, retry_after);
                tally_warn!(
                    "model provider returned {} (attempt {}), retrying in {:?}",
                    status,
                    attempt + 1,
                    wait
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
                continue;
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(GenerationError::RateLimited {
                    attempts: attempt + 1,
                });
            }

            if !status.is_success() {
                return Err(GenerationError::Status {
                    status: status.as_u16(),
                    body: describe_error_body(response.text().await),
                });
            }

            let parsed: ChatResponse = response.json().await.map_err(|err| {
                if err.is_timeout() {
                    GenerationError::Timeout
                } else {
                    GenerationError::InvalidResponse(err.to_string())
                }
            })?;
            return Self::extract_text(parsed);
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        return GenerationError::Timeout;
    }
    GenerationError::Network(err.to_string())
}
