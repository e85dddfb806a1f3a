//! Completion provider seam and the OpenAI-compatible HTTP client (Groq by default).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CompletionError;

pub const DEFAULT_COMPLETION_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Value shipped in `.env.example`; treated the same as no key.
const PLACEHOLDER_API_KEY: &str = "your_groq_api_key_here";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One generated alternative. `text` is `None` when the provider returned no content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub text: Option<String>,
}

/// Anything that turns an ordered message list into candidate completions.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Vec<Candidate>, CompletionError>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Option<Vec<CompletionChoice>>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// `POST {url}` with an OpenAI-style `chat/completions` body and bearer auth.
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiCompatClient {
    pub fn new(
        http: reqwest::Client,
        url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && k != PLACEHOLDER_API_KEY);
        Self {
            http,
            url: url.into(),
            model: model.into(),
            api_key,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Vec<Candidate>, CompletionError> {
        let api_key = self.api_key.as_deref().ok_or(CompletionError::MissingApiKey)?;

        let body = CompletionRequest {
            model: &self.model,
            messages,
        };
        let res = self
            .http
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(CompletionError::Status(status.as_u16(), text));
        }

        let parsed: CompletionResponse =
            serde_json::from_str(&text).map_err(|e| CompletionError::Decode(e.to_string()))?;
        let candidates = parsed
            .choices
            .unwrap_or_default()
            .into_iter()
            .map(|c| Candidate {
                text: c.message.and_then(|m| m.content),
            })
            .collect::<Vec<_>>();
        tracing::debug!(model = %self.model, candidates = candidates.len(), "completion received");
        Ok(candidates)
    }
}
