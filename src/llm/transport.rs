//! Chat-completion transport.
//!
//! One job: send a list of role-tagged messages to the configured
//! chat-completion endpoint and hand back the assistant's text or a
//! classified error. No retries, no business logic; retry policy belongs to
//! callers (and per the pipeline design, there is none).

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::BlobStore;

/// Blob-store key for the persisted transport settings.
pub const SETTINGS_KEY: &str = "app_settings";

// ============================================================================
// Configuration
// ============================================================================

/// Endpoint configuration, persisted alongside the events and refreshable on
/// a live transport between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportConfig {
    #[serde(default = "default_base_url", alias = "baseURL")]
    pub base_url: String,
    #[serde(default, alias = "key")]
    pub api_key: String,
    #[serde(default = "default_model", alias = "appointModel")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Bounded per-request timeout. Long-lived (reasoning models are slow)
    /// but finite so a stuck request surfaces as an error.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.deepseek.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_timeout_secs() -> u64 {
    600
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TransportConfig {
    /// Load from the blob store, falling back to defaults for anything
    /// missing (including the whole blob).
    pub fn load(storage: &dyn BlobStore) -> Self {
        match storage.get(SETTINGS_KEY) {
            Some(blob) => serde_json::from_value(blob).unwrap_or_else(|e| {
                log::warn!("stored settings unreadable, using defaults: {e}");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn save(&self, storage: &dyn BlobStore) -> Result<(), crate::storage::StorageError> {
        storage.set(SETTINGS_KEY, &serde_json::to_value(self)?)
    }
}

// ============================================================================
// Messages & errors
// ============================================================================

/// A role-tagged chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Transport failures, mapped from HTTP status codes and network errors.
/// Human-readable; nothing panics or throws past this boundary.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("no API key configured; set one in the transport settings")]
    MissingApiKey,
    #[error("{code}: malformed request body - {message}")]
    BadRequest { code: String, message: String },
    #[error("{code}: authentication failed, check the API key - {message}")]
    AuthFailed { code: String, message: String },
    #[error("{code}: insufficient account balance - {message}")]
    InsufficientBalance { code: String, message: String },
    #[error("{code}: invalid request parameters - {message}")]
    InvalidParams { code: String, message: String },
    #[error("{code}: rate limit reached, try again later - {message}")]
    RateLimited { code: String, message: String },
    #[error("{code}: chat service internal error - {message}")]
    ServerError { code: String, message: String },
    #[error("{code}: chat service overloaded - {message}")]
    Overloaded { code: String, message: String },
    #[error("request timed out after {0} seconds")]
    Timeout(u64),
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },
    #[error("unexpected response shape: {0}")]
    MalformedResponse(String),
}

/// Map a non-2xx status plus the endpoint's error body to the taxonomy.
fn error_for_status(status: u16, code: String, message: String) -> ChatError {
    match status {
        400 => ChatError::BadRequest { code, message },
        401 => ChatError::AuthFailed { code, message },
        402 => ChatError::InsufficientBalance { code, message },
        422 => ChatError::InvalidParams { code, message },
        429 => ChatError::RateLimited { code, message },
        500 => ChatError::ServerError { code, message },
        503 => ChatError::Overloaded { code, message },
        _ => ChatError::UnexpectedStatus { status, message },
    }
}

// ============================================================================
// Backend trait + HTTP implementation
// ============================================================================

/// Dyn-compatible chat boundary, so the classifier, extractor and pipeline
/// can run against a stub in tests.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(&self, messages: &[ChatMessage]) -> Result<String, ChatError>;
}

#[derive(Serialize)]
struct ChatPayload<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    top_p: f64,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

#[derive(Deserialize, Default)]
struct ApiErrorBody {
    #[serde(default)]
    error: ApiErrorDetail,
}

#[derive(Deserialize, Default)]
struct ApiErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// reqwest-backed chat-completion client.
pub struct HttpChatTransport {
    client: reqwest::Client,
    config: Mutex<TransportConfig>,
}

impl HttpChatTransport {
    pub fn new(config: TransportConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: Mutex::new(config),
        }
    }

    /// Swap in new settings without reconstructing the transport.
    pub fn refresh_config(&self, config: TransportConfig) {
        if let Ok(mut current) = self.config.lock() {
            *current = config;
        }
    }

    pub fn config(&self) -> TransportConfig {
        self.config
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatBackend for HttpChatTransport {
    async fn send(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let config = self.config();
        if config.api_key.is_empty() {
            return Err(ChatError::MissingApiKey);
        }

        let payload = ChatPayload {
            model: &config.model,
            messages,
            temperature: config.temperature,
            top_p: 1.0,
        };

        let response = self
            .client
            .post(&config.base_url)
            .bearer_auth(&config.api_key)
            .timeout(Duration::from_secs(config.timeout_secs))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatError::Timeout(config.timeout_secs)
                } else {
                    ChatError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body: ApiErrorBody = response.json().await.unwrap_or_default();
            return Err(error_for_status(
                status.as_u16(),
                body.error.code.unwrap_or_else(|| "unknown".to_string()),
                body.error.message.unwrap_or_else(|| "no detail".to_string()),
            ));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::MalformedResponse(e.to_string()))?;

        if let Some(usage) = &completion.usage {
            log::debug!(
                "chat completion {}: {} prompt + {} completion = {} tokens",
                completion.id.as_deref().unwrap_or("-"),
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ChatError::MalformedResponse("response carried no choices".to_string()))
    }
}
