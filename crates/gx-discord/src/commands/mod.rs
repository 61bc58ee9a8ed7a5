//! Slash commands for the Grok gateway (poise implementation)

mod converse;
mod help;
mod image;
mod permissions;
mod video;

use std::sync::Arc;

use gx_core::{ConversationRegistry, XaiClient};

use converse::converse;
use help::help;
use image::image;
use permissions::check_permissions;
use video::video;

/// User data stored and accessible in all command invocations
#[derive(Clone)]
pub struct Data {
    pub client: Arc<XaiClient>,
    pub registry: Arc<ConversationRegistry>,
}

/// Error type for commands
pub type Error = crate::error::DiscordError;

/// poise context alias
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// xAI Grok commands
#[poise::command(
    slash_command,
    subcommands("converse", "image", "video", "check_permissions", "help")
)]
pub async fn grok(_ctx: Context<'_>) -> Result<(), Error> {
    // Parent of slash subcommands; never invoked directly.
    Ok(())
}

/// Get all commands for registration
pub fn get_commands() -> Vec<poise::Command<Data, Error>> {
    vec![grok()]
}
