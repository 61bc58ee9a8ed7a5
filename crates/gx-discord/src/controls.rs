//! Interactive conversation controls
//!
//! Every reply in a conversation carries two component rows: the lifecycle
//! buttons (regenerate, pause/resume, stop) and the tool select menu. The
//! conversation a click belongs to is resolved through the registry's
//! reply index; only the conversation starter may use the controls.

use serenity::all::{
    ButtonStyle, ComponentInteraction, ComponentInteractionDataKind, Context, CreateActionRow,
    CreateButton, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, CreateSelectMenu, CreateSelectMenuKind,
    CreateSelectMenuOption, GetMessages,
};
use tracing::{error, info};

use gx_core::{tools, Conversation, ConversationId, Error, RemovedExchange, ToolKind};

use crate::commands::Data;
use crate::error::Result;
use crate::handler::{self, ExchangeStatus};

pub const REGENERATE_ID: &str = "grok:regenerate";
pub const PAUSE_ID: &str = "grok:pause";
pub const STOP_ID: &str = "grok:stop";
pub const TOOLS_ID: &str = "grok:tools";

/// How many recent messages to scan when re-locating the message to
/// regenerate
const REGENERATE_HISTORY_LIMIT: u8 = 10;

/// Build the component rows for a reply, reflecting the active tool set
pub fn components(selected: &[ToolKind]) -> Vec<CreateActionRow> {
    vec![
        CreateActionRow::Buttons(buttons(false)),
        CreateActionRow::SelectMenu(tool_select(selected, false)),
    ]
}

/// Disabled copy of the control rows, applied when a conversation ends
fn disabled_components(selected: &[ToolKind]) -> Vec<CreateActionRow> {
    vec![
        CreateActionRow::Buttons(buttons(true)),
        CreateActionRow::SelectMenu(tool_select(selected, true)),
    ]
}

fn buttons(disabled: bool) -> Vec<CreateButton> {
    vec![
        CreateButton::new(REGENERATE_ID)
            .emoji('🔄')
            .style(ButtonStyle::Success)
            .disabled(disabled),
        CreateButton::new(PAUSE_ID)
            .emoji('⏯')
            .style(ButtonStyle::Secondary)
            .disabled(disabled),
        CreateButton::new(STOP_ID)
            .emoji('⏹')
            .style(ButtonStyle::Primary)
            .disabled(disabled),
    ]
}

fn tool_select(selected: &[ToolKind], disabled: bool) -> CreateSelectMenu {
    let options = ToolKind::ALL
        .iter()
        .map(|tool| {
            CreateSelectMenuOption::new(tool.label(), tool.name())
                .description(tool.description())
                .default_selection(selected.contains(tool))
        })
        .collect();

    CreateSelectMenu::new(TOOLS_ID, CreateSelectMenuKind::String { options })
        .placeholder("Toggle conversation tools")
        .min_values(0)
        .max_values(ToolKind::ALL.len() as u8)
        .disabled(disabled)
}

/// Dispatch a component interaction from the control rows
pub async fn handle_component(ctx: &Context, data: &Data, component: ComponentInteraction) {
    let result = match component.data.custom_id.as_str() {
        REGENERATE_ID => handle_regenerate(ctx, data, &component).await,
        PAUSE_ID => handle_pause(ctx, data, &component).await,
        STOP_ID => handle_stop(ctx, data, &component).await,
        TOOLS_ID => handle_tool_select(ctx, data, &component).await,
        _ => Ok(()),
    };

    if let Err(e) = result {
        error!("Error handling component {}: {e}", component.data.custom_id);
    }
}

/// Conversation the clicked message belongs to, if still active
fn resolve(data: &Data, component: &ComponentInteraction) -> Option<(ConversationId, Conversation)> {
    let id = data
        .registry
        .conversation_for_reply(component.message.id.get())?;
    let conversation = data.registry.get(id)?;
    Some((id, conversation))
}

async fn respond_ephemeral(
    ctx: &Context,
    component: &ComponentInteraction,
    text: &str,
) -> Result<()> {
    component
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content(text)
                    .ephemeral(true),
            ),
        )
        .await?;
    Ok(())
}

async fn followup_ephemeral(
    ctx: &Context,
    component: &ComponentInteraction,
    text: &str,
) -> Result<()> {
    component
        .create_followup(
            &ctx.http,
            CreateInteractionResponseFollowup::new()
                .content(text)
                .ephemeral(true),
        )
        .await?;
    Ok(())
}

/// Regenerate the last response for the conversation.
///
/// Removes the last request/response pair, re-locates the triggering user
/// message in recent channel history, and re-runs generation. The removed
/// pair is restored unchanged on every failure path past the pop.
async fn handle_regenerate(
    ctx: &Context,
    data: &Data,
    component: &ComponentInteraction,
) -> Result<()> {
    info!("Regenerate button clicked.");

    let Some((id, conversation)) = resolve(data, component) else {
        return respond_ephemeral(ctx, component, "No active conversation found.").await;
    };
    if component.user.id.get() != conversation.starter {
        return respond_ephemeral(
            ctx,
            component,
            "You are not allowed to regenerate the response.",
        )
        .await;
    }

    component
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Defer(
                CreateInteractionResponseMessage::new().ephemeral(true),
            ),
        )
        .await?;

    let removed = match data.registry.pop_last_exchange(id) {
        Ok(removed) => removed,
        Err(Error::NotEnoughHistory) => {
            return followup_ephemeral(ctx, component, "Not enough history to regenerate yet.")
                .await;
        }
        Err(e) => {
            followup_ephemeral(ctx, component, "No active conversation found.").await?;
            return Err(e.into());
        }
    };

    // Re-locate the starter's most recent message; it is the request being
    // regenerated.
    let recent = match component
        .channel_id
        .messages(
            &ctx.http,
            GetMessages::new().limit(REGENERATE_HISTORY_LIMIT),
        )
        .await
    {
        Ok(recent) => recent,
        Err(e) => {
            restore(data, id, removed);
            followup_ephemeral(
                ctx,
                component,
                "An error occurred while regenerating the response.",
            )
            .await?;
            return Err(e.into());
        }
    };

    let Some(user_message) = recent
        .iter()
        .find(|message| message.author.id.get() == conversation.starter)
    else {
        restore(data, id, removed);
        return followup_ephemeral(ctx, component, "Couldn't find the message to regenerate.")
            .await;
    };

    match handler::respond_in_conversation(ctx, data, id, user_message).await {
        Ok(ExchangeStatus::Completed) => {
            followup_ephemeral(ctx, component, "Response regenerated.").await
        }
        Ok(ExchangeStatus::Skipped) => {
            restore(data, id, removed);
            followup_ephemeral(ctx, component, "Couldn't regenerate the response.").await
        }
        Err(e) => {
            restore(data, id, removed);
            followup_ephemeral(
                ctx,
                component,
                "An error occurred while regenerating the response.",
            )
            .await?;
            Err(e)
        }
    }
}

fn restore(data: &Data, id: ConversationId, removed: RemovedExchange) {
    if let Err(e) = data.registry.restore_exchange(id, removed) {
        error!("Failed to restore history for conversation {id}: {e}");
    }
}

/// Pause or resume the conversation
async fn handle_pause(ctx: &Context, data: &Data, component: &ComponentInteraction) -> Result<()> {
    let Some((id, conversation)) = resolve(data, component) else {
        return respond_ephemeral(ctx, component, "No active conversation found.").await;
    };
    if component.user.id.get() != conversation.starter {
        return respond_ephemeral(ctx, component, "You are not allowed to pause the conversation.")
            .await;
    }

    match data.registry.toggle_paused(id) {
        Ok(paused) => {
            let status = if paused { "paused" } else { "resumed" };
            respond_ephemeral(
                ctx,
                component,
                &format!("Conversation {status}. Press again to toggle."),
            )
            .await
        }
        Err(_) => respond_ephemeral(ctx, component, "No active conversation found.").await,
    }
}

/// End the conversation and disable the clicked message's controls
async fn handle_stop(ctx: &Context, data: &Data, component: &ComponentInteraction) -> Result<()> {
    let Some((id, conversation)) = resolve(data, component) else {
        return respond_ephemeral(ctx, component, "No active conversation found.").await;
    };
    if component.user.id.get() != conversation.starter {
        return respond_ephemeral(ctx, component, "You are not allowed to end this conversation.")
            .await;
    }

    if data.registry.remove(id).is_none() {
        return respond_ephemeral(ctx, component, "No active conversation found.").await;
    }

    component
        .create_response(
            &ctx.http,
            CreateInteractionResponse::UpdateMessage(
                CreateInteractionResponseMessage::new()
                    .components(disabled_components(&conversation.tools)),
            ),
        )
        .await?;
    followup_ephemeral(ctx, component, "Conversation ended.").await
}

/// Replace the conversation's active tool set from the select menu
async fn handle_tool_select(
    ctx: &Context,
    data: &Data,
    component: &ComponentInteraction,
) -> Result<()> {
    let Some((id, conversation)) = resolve(data, component) else {
        return respond_ephemeral(ctx, component, "No active conversation found.").await;
    };
    if component.user.id.get() != conversation.starter {
        return respond_ephemeral(
            ctx,
            component,
            "You are not allowed to change tools for this conversation.",
        )
        .await;
    }

    let ComponentInteractionDataKind::StringSelect { values } = &component.data.kind else {
        return Ok(());
    };

    // Unknown values are dropped silently.
    let selected = tools::filter_known(values.iter());
    data.registry.set_tools(id, selected.clone())?;
    info!("Conversation {id} tools set to {selected:?}");

    // Update the clicked menu's defaults in place, then confirm.
    component
        .create_response(
            &ctx.http,
            CreateInteractionResponse::UpdateMessage(
                CreateInteractionResponseMessage::new().components(components(&selected)),
            ),
        )
        .await?;

    let confirmation = if selected.is_empty() {
        "Tools disabled for this conversation.".to_string()
    } else {
        let mut names: Vec<&str> = selected.iter().map(|tool| tool.name()).collect();
        names.sort_unstable();
        format!("Tools updated: {}.", names.join(", "))
    };
    followup_ephemeral(ctx, component, &confirmation).await
}
