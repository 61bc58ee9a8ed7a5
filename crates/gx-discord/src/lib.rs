//! gx-discord: Discord surface for the Grok gateway
//!
//! Bridges Discord slash commands and message components to the xAI API
//! through gx-core. Serenity 0.12 drives the gateway connection; poise
//! defines and registers the slash commands.

pub mod bot;
pub mod commands;
pub mod controls;
pub mod embeds;
pub mod error;
pub mod generation;
pub mod handler;

pub use bot::GrokBot;
pub use error::{DiscordError, Result};
