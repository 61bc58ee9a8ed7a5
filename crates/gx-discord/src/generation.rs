//! Shared generation path
//!
//! One request/response exchange against the chat endpoint. History is
//! only appended once the provider call succeeds, so a failure leaves the
//! conversation exactly as it was, which is the property regeneration rollback
//! relies on.

use gx_core::{ChatMessage, ConversationId, ConversationRegistry, Error, Result, XaiClient};
use tracing::info;

/// Result of one completed exchange
pub struct ExchangeOutcome {
    pub response_text: String,
    pub reasoning: Option<String>,
}

/// Run one exchange for an active conversation.
///
/// Builds the request from the conversation's history plus the pending
/// user message, calls the chat endpoint, then appends the completed pair
/// to history.
pub async fn run_exchange(
    client: &XaiClient,
    registry: &ConversationRegistry,
    id: ConversationId,
    user_message: ChatMessage,
) -> Result<ExchangeOutcome> {
    let conversation = registry.get(id).ok_or(Error::ConversationNotFound(id))?;

    let request = conversation.request_with(user_message.clone());
    let response = client.chat(&request).await?;

    let response_text = response.text().unwrap_or("No response.").to_string();
    let reasoning = response.reasoning().map(str::to_string);

    registry.append_exchange(id, user_message, ChatMessage::assistant(&response_text))?;
    info!(
        "Completed exchange for conversation {} ({} history entries)",
        id,
        conversation.message_count() + 2
    );

    Ok(ExchangeOutcome {
        response_text,
        reasoning,
    })
}
