//! Error types for the Folio core.

use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the sled-backed portfolio store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Sled(#[from] sled::Error),

    #[error("record encoding error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("validation failed: {0}")]
    Validation(String),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Errors raised by a completion provider call.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("completion API key is missing or still the placeholder value")]
    MissingApiKey,

    #[error("completion request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("completion provider returned {0}: {1}")]
    Status(u16, String),

    #[error("completion response parse: {0}")]
    Decode(String),

    /// Raised by non-HTTP clients (fakes, alternative backends).
    #[error("completion provider error: {0}")]
    Provider(String),
}

/// Errors surfaced by the chat responder. Provider diagnostics never cross this boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("Message is required")]
    InvalidInput,

    #[error("AI response unavailable")]
    ProviderFailure,
}
