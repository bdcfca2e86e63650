//! Chat service: the assistant on the public hotel page.
//!
//! ARCHITECTURE
//! ============
//! Replies come from a [`ChatAssistant`] stored in `AppState`. The shipped
//! implementation is [`SimulatedAssistant`], which waits a typing delay and
//! echoes the question back in a canned sentence. Swapping in a real model
//! only needs another implementation of the trait.
//!
//! ERROR HANDLING
//! ==============
//! Each visitor's browser session id is rate-limited, and so is the
//! endpoint as a whole. Limits surface as 429 before the assistant runs.

use std::time::Duration;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::hotel::Hotel;
use super::validate::non_blank;
use crate::error::ErrorCode;
use crate::rate_limit::{RateLimitError, RateLimiter};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("the assistant is not available for this hotel")]
    Disabled,
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),
}

impl ErrorCode for ChatError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Disabled => "E_CHAT_DISABLED",
            Self::EmptyMessage => "E_VALIDATION",
            Self::RateLimited(inner) => inner.error_code(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Disabled => StatusCode::NOT_FOUND,
            Self::EmptyMessage => StatusCode::UNPROCESSABLE_ENTITY,
            Self::RateLimited(inner) => inner.status(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub session_id: Uuid,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub role: &'static str,
    pub content: String,
}

/// Produces assistant replies. Enables swapping the simulation in tests.
#[async_trait::async_trait]
pub trait ChatAssistant: Send + Sync {
    /// Answer a visitor's message about `hotel`.
    ///
    /// # Errors
    ///
    /// Returns a `ChatError` if no reply can be produced.
    async fn reply(&self, hotel: &Hotel, message: &str) -> Result<String, ChatError>;
}

/// Canned assistant that answers after a typing delay.
#[derive(Debug, Clone)]
pub struct SimulatedAssistant {
    delay: Duration,
}

impl SimulatedAssistant {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

/// The canned sentence the simulated assistant answers with.
#[must_use]
pub fn simulated_reply(message: &str) -> String {
    format!("You asked about \"{message}\". Here's a helpful response from the AI.")
}

#[async_trait::async_trait]
impl ChatAssistant for SimulatedAssistant {
    async fn reply(&self, _hotel: &Hotel, message: &str) -> Result<String, ChatError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(simulated_reply(message))
    }
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Answer a chat message on a public hotel page.
///
/// # Errors
///
/// Returns `Disabled` when the hotel has the assistant off, `EmptyMessage`
/// for a blank message, or `RateLimited`.
pub async fn handle_message(
    assistant: &dyn ChatAssistant,
    limiter: &RateLimiter,
    hotel: &Hotel,
    request: &ChatRequest,
) -> Result<ChatReply, ChatError> {
    if !hotel.chatbot_enabled {
        return Err(ChatError::Disabled);
    }
    let message = non_blank(&request.message).ok_or(ChatError::EmptyMessage)?;
    limiter.check_and_record(request.session_id)?;

    tracing::debug!(hotel_id = %hotel.id, session_id = %request.session_id, "chat message received");
    let content = assistant.reply(hotel, &message).await?;
    Ok(ChatReply { role: "assistant", content })
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
