//! Error types for gx-core

use thiserror::Error;

use crate::conversation::ConversationId;

/// Main error type for gx-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("xAI API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("xAI API error: {0}")]
    Provider(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    #[error("An active conversation already exists for user {user} in channel {channel}")]
    ConversationActive { user: u64, channel: u64 },

    #[error("Not enough history to regenerate")]
    NotEnoughHistory,

    #[error("Video generation timed out after {0} seconds")]
    VideoTimeout(u64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for gx-core
pub type Result<T> = std::result::Result<T, Error>;
