//! Conversation types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tools::ToolKind;
use crate::xai::{models, ChatMessage, ChatRequest};

/// Opaque conversation identifier (the interaction id that started it)
pub type ConversationId = u64;

/// Default response budget when the user does not override it
pub const DEFAULT_MAX_TOKENS: u32 = 16384;

/// Generation parameters fixed at conversation start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatParameters {
    /// Model id
    pub model: String,
    /// Optional system prompt (also seeded into history entry 0)
    pub system: Option<String>,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub presence_penalty: Option<f32>,
}

impl ChatParameters {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
        }
    }

    /// Build a chat request from a full message list and the active tools.
    ///
    /// Reasoning models get `reasoning_effort: "high"` attached; the tool
    /// list is omitted entirely when empty.
    pub fn build_request(&self, messages: Vec<ChatMessage>, tools: &[ToolKind]) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: Some(self.max_tokens),
            temperature: self.temperature,
            top_p: self.top_p,
            frequency_penalty: self.frequency_penalty,
            presence_penalty: self.presence_penalty,
            reasoning_effort: models::is_reasoning_model(&self.model)
                .then(|| "high".to_string()),
            tools: if tools.is_empty() {
                None
            } else {
                Some(tools.iter().map(|tool| tool.spec()).collect())
            },
        }
    }
}

/// A stateful, multi-turn exchange between one user and the model.
///
/// History is append-only except for regeneration, which removes the last
/// request/response pair and restores it if the retry cannot complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    /// User who started the conversation; only they may interact with it
    pub starter: u64,
    /// Channel the conversation lives in
    pub channel: u64,
    pub params: ChatParameters,
    /// Active server-side tools, replaced wholesale by the selector
    pub tools: Vec<ToolKind>,
    /// While paused, follow-up messages are ignored
    pub paused: bool,
    pub history: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new conversation. A configured system prompt becomes the
    /// first history entry.
    pub fn new(id: ConversationId, starter: u64, channel: u64, params: ChatParameters) -> Self {
        let now = Utc::now();
        let mut history = Vec::new();
        if let Some(system) = &params.system {
            history.push(ChatMessage::system(system));
        }
        Self {
            id,
            starter,
            channel,
            params,
            tools: Vec::new(),
            paused: false,
            history,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a request from the current history plus one pending message.
    ///
    /// The pending message is NOT appended to history here; callers append
    /// the full exchange only after generation succeeds.
    pub fn request_with(&self, pending: ChatMessage) -> ChatRequest {
        let mut messages = self.history.clone();
        messages.push(pending);
        self.params.build_request(messages, &self.tools)
    }

    pub fn message_count(&self) -> usize {
        self.history.len()
    }
}

/// A request/response pair removed from history during regeneration,
/// held for re-insertion if the retry fails
#[derive(Debug, Clone)]
pub struct RemovedExchange {
    pub user: ChatMessage,
    pub assistant: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_seeds_history() {
        let mut params = ChatParameters::new("grok-3");
        params.system = Some("Be terse.".to_string());
        let conversation = Conversation::new(1, 10, 20, params);
        assert_eq!(conversation.message_count(), 1);
        assert_eq!(conversation.history[0].text_content(), "Be terse.");
    }

    #[test]
    fn test_no_system_prompt_empty_history() {
        let conversation = Conversation::new(1, 10, 20, ChatParameters::new("grok-3"));
        assert!(conversation.history.is_empty());
    }

    #[test]
    fn test_request_with_does_not_mutate_history() {
        let conversation = Conversation::new(1, 10, 20, ChatParameters::new("grok-3"));
        let request = conversation.request_with(ChatMessage::user_text("hello"));
        assert_eq!(request.messages.len(), 1);
        assert!(conversation.history.is_empty());
    }

    #[test]
    fn test_reasoning_effort_attached_for_reasoning_models() {
        let params = ChatParameters::new("grok-3-mini");
        let request = params.build_request(vec![ChatMessage::user_text("hi")], &[]);
        assert_eq!(request.reasoning_effort.as_deref(), Some("high"));

        let params = ChatParameters::new("grok-3");
        let request = params.build_request(vec![ChatMessage::user_text("hi")], &[]);
        assert!(request.reasoning_effort.is_none());
    }

    #[test]
    fn test_tools_attached_when_selected() {
        let params = ChatParameters::new("grok-3");
        let request = params.build_request(
            vec![ChatMessage::user_text("hi")],
            &[ToolKind::WebSearch, ToolKind::CodeExecution],
        );
        let tools = request.tools.unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].kind, "web_search");

        let request = params.build_request(vec![ChatMessage::user_text("hi")], &[]);
        assert!(request.tools.is_none());
    }
}
