//! Error types for gx-discord

use thiserror::Error;

/// Error type for the Discord surface
#[derive(Error, Debug)]
pub enum DiscordError {
    #[error("Serenity error: {0}")]
    Serenity(#[from] serenity::Error),

    #[error(transparent)]
    Core(#[from] gx_core::Error),
}

/// Result type alias for gx-discord
pub type Result<T> = std::result::Result<T, DiscordError>;
