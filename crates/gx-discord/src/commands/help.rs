//! /grok help command - show usage information

use crate::commands::{Context, Error};

/// Show help information about the bot.
#[poise::command(slash_command, rename = "help")]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let response = r#"**Grok Gateway Bot**

**Slash Commands:**

- `/grok converse <prompt>` - Start a persistent conversation with Grok. Keep talking in the same channel to continue it; attach JPEG/PNG/GIF/WEBP images for vision models.
- `/grok image <prompt>` - Generate an image with Grok Imagine.
- `/grok video <prompt>` - Generate a video with Grok Imagine Video.
- `/grok check_permissions` - Check the bot's permissions in this channel.
- `/grok help` - Show this help.

**Conversation controls** (attached to every reply):

- 🔄 Regenerate the last response
- ⏯ Pause or resume the conversation
- ⏹ End the conversation
- Select menu: toggle Web Search, X Search, Code Execution and Collections Search for future replies

Only the user who started a conversation can use its controls, and each user can run one conversation per channel at a time."#;

    ctx.say(response).await?;
    Ok(())
}
