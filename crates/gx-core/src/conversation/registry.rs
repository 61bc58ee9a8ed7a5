//! Conversation registry
//!
//! Mapping from conversation id to conversation state, plus an index from
//! reply message ids back to the conversation they belong to. Mutations
//! are short synchronous critical sections; no guard is held across an
//! await point. At most one handler per conversation runs at a time by
//! user-driven sequencing, which is not enforced here; the create-time
//! uniqueness check re-validates at insert to tolerate interleaving.

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::tools::ToolKind;
use crate::xai::ChatMessage;

use super::types::{Conversation, ConversationId, RemovedExchange};

/// In-memory registry of active conversations
#[derive(Default)]
pub struct ConversationRegistry {
    conversations: DashMap<ConversationId, Conversation>,
    /// Reply message id -> conversation id, so a component interaction on
    /// any reply resolves to its conversation
    replies: DashMap<u64, ConversationId>,
}

impl ConversationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new conversation.
    ///
    /// Fails with `ConversationActive` when the starter already has an
    /// active conversation in the same channel, or when the id is taken.
    pub fn create(&self, conversation: Conversation) -> Result<()> {
        let (starter, channel) = (conversation.starter, conversation.channel);

        if self.active_for(starter, channel) {
            return Err(Error::ConversationActive {
                user: starter,
                channel,
            });
        }

        match self.conversations.entry(conversation.id) {
            Entry::Occupied(_) => Err(Error::ConversationActive {
                user: starter,
                channel,
            }),
            Entry::Vacant(entry) => {
                info!(
                    "Starting conversation {} for user {} in channel {}",
                    conversation.id, starter, channel
                );
                entry.insert(conversation);
                Ok(())
            }
        }
    }

    /// Snapshot of a conversation, or `None` when it is not active
    pub fn get(&self, id: ConversationId) -> Option<Conversation> {
        self.conversations.get(&id).map(|entry| entry.clone())
    }

    /// Remove a conversation and purge its reply-index entries
    pub fn remove(&self, id: ConversationId) -> Option<Conversation> {
        let removed = self.conversations.remove(&id).map(|(_, conversation)| conversation);
        if removed.is_some() {
            self.replies.retain(|_, conversation_id| *conversation_id != id);
            info!("Ended conversation {}", id);
        }
        removed
    }

    /// Whether the user already has an active conversation in the channel
    pub fn active_for(&self, starter: u64, channel: u64) -> bool {
        self.conversations
            .iter()
            .any(|entry| entry.starter == starter && entry.channel == channel)
    }

    /// Route an incoming message to a conversation by author and channel
    pub fn route(&self, author: u64, channel: u64) -> Option<ConversationId> {
        self.conversations
            .iter()
            .find(|entry| entry.starter == author && entry.channel == channel)
            .map(|entry| entry.id)
    }

    /// Append a completed request/response pair to history
    pub fn append_exchange(
        &self,
        id: ConversationId,
        user: ChatMessage,
        assistant: ChatMessage,
    ) -> Result<()> {
        let mut conversation = self
            .conversations
            .get_mut(&id)
            .ok_or(Error::ConversationNotFound(id))?;

        conversation.history.push(user);
        conversation.history.push(assistant);
        conversation.updated_at = Utc::now();
        debug!(
            "Conversation {} history now {} entries",
            id,
            conversation.history.len()
        );
        Ok(())
    }

    /// Remove the last request/response pair for regeneration.
    ///
    /// Fails with `NotEnoughHistory`, without mutating anything, when
    /// history holds fewer than two entries. The returned pair must be
    /// handed back to `restore_exchange` if the retry cannot complete.
    pub fn pop_last_exchange(&self, id: ConversationId) -> Result<RemovedExchange> {
        let mut conversation = self
            .conversations
            .get_mut(&id)
            .ok_or(Error::ConversationNotFound(id))?;

        if conversation.history.len() < 2 {
            return Err(Error::NotEnoughHistory);
        }

        let (Some(assistant), Some(user)) =
            (conversation.history.pop(), conversation.history.pop())
        else {
            return Err(Error::NotEnoughHistory);
        };

        conversation.updated_at = Utc::now();
        Ok(RemovedExchange { user, assistant })
    }

    /// Re-insert a popped pair unchanged, restoring pre-regeneration state
    pub fn restore_exchange(&self, id: ConversationId, exchange: RemovedExchange) -> Result<()> {
        let mut conversation = self
            .conversations
            .get_mut(&id)
            .ok_or(Error::ConversationNotFound(id))?;

        conversation.history.push(exchange.user);
        conversation.history.push(exchange.assistant);
        conversation.updated_at = Utc::now();
        Ok(())
    }

    /// Flip the paused flag; returns the new state
    pub fn toggle_paused(&self, id: ConversationId) -> Result<bool> {
        let mut conversation = self
            .conversations
            .get_mut(&id)
            .ok_or(Error::ConversationNotFound(id))?;

        conversation.paused = !conversation.paused;
        Ok(conversation.paused)
    }

    /// Replace the active tool set
    pub fn set_tools(&self, id: ConversationId, tools: Vec<ToolKind>) -> Result<()> {
        let mut conversation = self
            .conversations
            .get_mut(&id)
            .ok_or(Error::ConversationNotFound(id))?;

        conversation.tools = tools;
        Ok(())
    }

    /// Record that a bot reply belongs to a conversation
    pub fn track_reply(&self, message_id: u64, id: ConversationId) {
        self.replies.insert(message_id, id);
    }

    /// Conversation a reply message belongs to, if tracked
    pub fn conversation_for_reply(&self, message_id: u64) -> Option<ConversationId> {
        self.replies.get(&message_id).map(|entry| *entry)
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::ChatParameters;

    fn conversation(id: ConversationId, starter: u64, channel: u64) -> Conversation {
        Conversation::new(id, starter, channel, ChatParameters::new("grok-3"))
    }

    fn exchange(registry: &ConversationRegistry, id: ConversationId, n: usize) {
        registry
            .append_exchange(
                id,
                ChatMessage::user_text(format!("question {n}")),
                ChatMessage::assistant(format!("answer {n}")),
            )
            .unwrap();
    }

    #[test]
    fn test_create_and_get() {
        let registry = ConversationRegistry::new();
        registry.create(conversation(1, 10, 20)).unwrap();

        let snapshot = registry.get(1).unwrap();
        assert_eq!(snapshot.starter, 10);
        assert_eq!(snapshot.channel, 20);
        assert!(registry.get(2).is_none());
    }

    #[test]
    fn test_second_conversation_same_user_channel_rejected() {
        let registry = ConversationRegistry::new();
        registry.create(conversation(1, 10, 20)).unwrap();

        let error = registry.create(conversation(2, 10, 20)).unwrap_err();
        assert!(matches!(
            error,
            Error::ConversationActive {
                user: 10,
                channel: 20
            }
        ));

        // Same user in another channel, or another user in the same
        // channel, are both fine.
        registry.create(conversation(3, 10, 21)).unwrap();
        registry.create(conversation(4, 11, 20)).unwrap();
    }

    #[test]
    fn test_create_allowed_again_after_remove() {
        let registry = ConversationRegistry::new();
        registry.create(conversation(1, 10, 20)).unwrap();
        registry.remove(1).unwrap();
        registry.create(conversation(2, 10, 20)).unwrap();
    }

    #[test]
    fn test_route_matches_starter_and_channel() {
        let registry = ConversationRegistry::new();
        registry.create(conversation(1, 10, 20)).unwrap();

        assert_eq!(registry.route(10, 20), Some(1));
        assert_eq!(registry.route(10, 21), None);
        assert_eq!(registry.route(11, 20), None);
    }

    #[test]
    fn test_pop_with_short_history_mutates_nothing() {
        let registry = ConversationRegistry::new();
        let mut params = ChatParameters::new("grok-3");
        params.system = Some("sys".to_string());
        registry
            .create(Conversation::new(1, 10, 20, params))
            .unwrap();

        // Only the system entry is present.
        let error = registry.pop_last_exchange(1).unwrap_err();
        assert!(matches!(error, Error::NotEnoughHistory));
        assert_eq!(registry.get(1).unwrap().message_count(), 1);
    }

    #[test]
    fn test_pop_restore_round_trip() {
        let registry = ConversationRegistry::new();
        registry.create(conversation(1, 10, 20)).unwrap();
        exchange(&registry, 1, 1);
        exchange(&registry, 1, 2);

        let before = registry.get(1).unwrap().history;
        let removed = registry.pop_last_exchange(1).unwrap();
        assert_eq!(removed.user.text_content(), "question 2");
        assert_eq!(removed.assistant.text_content(), "answer 2");
        assert_eq!(registry.get(1).unwrap().message_count(), 2);

        registry.restore_exchange(1, removed).unwrap();
        assert_eq!(registry.get(1).unwrap().history, before);
    }

    #[test]
    fn test_pop_targets_last_pair() {
        let registry = ConversationRegistry::new();
        registry.create(conversation(1, 10, 20)).unwrap();
        exchange(&registry, 1, 1);
        exchange(&registry, 1, 2);

        registry.pop_last_exchange(1).unwrap();
        let history = registry.get(1).unwrap().history;
        assert_eq!(history.last().unwrap().text_content(), "answer 1");
    }

    #[test]
    fn test_toggle_paused() {
        let registry = ConversationRegistry::new();
        registry.create(conversation(1, 10, 20)).unwrap();

        assert!(registry.toggle_paused(1).unwrap());
        assert!(registry.get(1).unwrap().paused);
        assert!(!registry.toggle_paused(1).unwrap());
    }

    #[test]
    fn test_set_tools_replaces_set() {
        let registry = ConversationRegistry::new();
        registry.create(conversation(1, 10, 20)).unwrap();

        registry
            .set_tools(1, vec![ToolKind::WebSearch, ToolKind::XSearch])
            .unwrap();
        assert_eq!(registry.get(1).unwrap().tools.len(), 2);

        registry.set_tools(1, Vec::new()).unwrap();
        assert!(registry.get(1).unwrap().tools.is_empty());
    }

    #[test]
    fn test_reply_index_purged_on_remove() {
        let registry = ConversationRegistry::new();
        registry.create(conversation(1, 10, 20)).unwrap();
        registry.create(conversation(2, 11, 20)).unwrap();
        registry.track_reply(100, 1);
        registry.track_reply(101, 1);
        registry.track_reply(200, 2);

        assert_eq!(registry.conversation_for_reply(100), Some(1));

        registry.remove(1);
        assert_eq!(registry.conversation_for_reply(100), None);
        assert_eq!(registry.conversation_for_reply(101), None);
        assert_eq!(registry.conversation_for_reply(200), Some(2));
    }

    #[test]
    fn test_mutators_on_missing_conversation() {
        let registry = ConversationRegistry::new();
        assert!(matches!(
            registry.pop_last_exchange(7),
            Err(Error::ConversationNotFound(7))
        ));
        assert!(matches!(
            registry.toggle_paused(7),
            Err(Error::ConversationNotFound(7))
        ));
        assert!(registry.remove(7).is_none());
    }
}
