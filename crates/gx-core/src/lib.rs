//! gx-core: Grok Gateway Core Library
//!
//! Core functionality for the Grok gateway: the xAI HTTP client and wire
//! types, the in-memory conversation registry, tool selection, and
//! configuration.

pub mod config;
pub mod conversation;
pub mod error;
pub mod tools;
pub mod xai;

pub use config::{Config, DiscordConfig, XaiConfig};
pub use conversation::{
    ChatParameters, Conversation, ConversationId, ConversationRegistry, RemovedExchange,
};
pub use error::{Error, Result};
pub use tools::{ToolKind, ToolSpec};
pub use xai::{ChatMessage, ChatRequest, ChatResponse, ContentPart, XaiClient};
