//! Chat Responder: one stateless question/answer exchange with the completion provider.
//!
//! Every call re-reads the store, sends exactly `[system(context), user(message)]`, and
//! keeps nothing afterwards. Prior turns are never replayed.

use std::sync::Arc;

use crate::completion::{ChatMessage, CompletionClient};
use crate::context::assemble_context;
use crate::error::ChatError;
use crate::store::PortfolioSource;

/// Returned when the provider answers without usable text.
pub const NO_REPLY_FALLBACK: &str = "I couldn't generate a response.";

#[derive(Clone)]
pub struct ChatResponder {
    source: Arc<dyn PortfolioSource>,
    client: Arc<dyn CompletionClient>,
}

impl ChatResponder {
    pub fn new(source: Arc<dyn PortfolioSource>, client: Arc<dyn CompletionClient>) -> Self {
        Self { source, client }
    }

    pub async fn respond(&self, message: &str) -> Result<String, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::InvalidInput);
        }

        let context = assemble_context(self.source.as_ref()).await;
        let messages = [ChatMessage::system(context), ChatMessage::user(message)];

        let candidates = self.client.complete(&messages).await.map_err(|e| {
            tracing::error!(error = %e, "completion provider call failed");
            ChatError::ProviderFailure
        })?;

        let reply = candidates
            .into_iter()
            .next()
            .and_then(|c| c.text)
            .filter(|t| !t.trim().is_empty());
        match reply {
            Some(text) => Ok(text),
            None => {
                tracing::warn!("completion provider returned no usable candidate");
                Ok(NO_REPLY_FALLBACK.to_string())
            }
        }
    }
}
