//! /grok check_permissions command - report channel permissions

use serenity::all::Permissions;

use crate::commands::{Context, Error};

/// Check if the bot has necessary permissions in this channel.
#[poise::command(slash_command, rename = "check_permissions")]
pub async fn check_permissions(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say("Permission checks only apply to server channels.")
            .await?;
        return Ok(());
    };

    let bot_member = guild_id.member(ctx.http(), ctx.framework().bot_id).await?;

    // Resolved from the cache; the guard must not live across an await.
    let permissions = {
        ctx.guild().and_then(|guild| {
            guild
                .channels
                .get(&ctx.channel_id())
                .map(|channel| guild.user_permissions_in(channel, &bot_member))
        })
    };

    let response = match permissions {
        Some(permissions)
            if permissions
                .contains(Permissions::VIEW_CHANNEL | Permissions::READ_MESSAGE_HISTORY) =>
        {
            "Bot has permission to read messages and message history."
        }
        Some(_) => "Bot is missing necessary permissions in this channel.",
        None => "Could not resolve this channel from the cache.",
    };

    ctx.say(response).await?;
    Ok(())
}
