//! Discord event handler
//!
//! Routes follow-up messages into active conversations and dispatches
//! component interactions coming from the conversation controls.

use serenity::all::{Context, CreateMessage, EventHandler, Interaction, Message, Ready};
use serenity::async_trait;
use tracing::{debug, error, info};

use gx_core::xai::is_supported_image;
use gx_core::{ChatMessage, ContentPart, ConversationId};

use crate::commands::Data;
use crate::controls;
use crate::embeds;
use crate::error::Result;
use crate::generation;

/// Delay between consecutive reply chunks to avoid rate limiting
const CHUNK_SEND_DELAY: std::time::Duration = std::time::Duration::from_millis(500);

/// Whether a routed message actually produced an exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeStatus {
    Completed,
    /// The conversation was paused, gone, or the message had no usable
    /// content; nothing was generated and nothing was mutated
    Skipped,
}

/// Serenity event handler for the gateway
pub struct Handler {
    data: Data,
}

impl Handler {
    pub fn new(data: Data) -> Self {
        Self { data }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Discord bot connected as {}", ready.user.name);
    }

    /// Generate a reply when a new message from a conversation starter
    /// arrives in that conversation's channel
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let Some(conversation_id) = self
            .data
            .registry
            .route(msg.author.id.get(), msg.channel_id.get())
        else {
            return;
        };

        debug!("Routing follow-up message to conversation {conversation_id}");
        if let Err(e) = respond_in_conversation(&ctx, &self.data, conversation_id, &msg).await {
            error!("Error handling follow-up message: {e}");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Component(component) = interaction {
            controls::handle_component(&ctx, &self.data, component).await;
        }
    }
}

/// Generate and send a reply for a user message in an active conversation.
///
/// Used by both the follow-up message path and regeneration. Provider
/// failures are reported in-channel as an error embed and propagated so
/// regeneration can roll back; the paused flag and author mismatches skip
/// silently without mutating anything.
pub async fn respond_in_conversation(
    ctx: &Context,
    data: &Data,
    conversation_id: ConversationId,
    msg: &Message,
) -> Result<ExchangeStatus> {
    let Some(conversation) = data.registry.get(conversation_id) else {
        return Ok(ExchangeStatus::Skipped);
    };
    if conversation.paused || conversation.starter != msg.author.id.get() {
        return Ok(ExchangeStatus::Skipped);
    }

    let mut content = Vec::new();
    if !msg.content.is_empty() {
        content.push(ContentPart::text(&msg.content));
    }
    for attachment in &msg.attachments {
        if attachment
            .content_type
            .as_deref()
            .is_some_and(is_supported_image)
        {
            content.push(ContentPart::image_url(&attachment.url));
        }
    }
    if content.is_empty() {
        return Ok(ExchangeStatus::Skipped);
    }

    let typing = msg.channel_id.start_typing(&ctx.http);
    let outcome = generation::run_exchange(
        &data.client,
        &data.registry,
        conversation_id,
        ChatMessage::user(content),
    )
    .await;
    drop(typing);

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Error in conversation {conversation_id}: {e}");
            let builder = CreateMessage::new()
                .embed(embeds::error_embed(&e.to_string()))
                .reference_message(msg);
            if let Err(send_error) = msg.channel_id.send_message(&ctx.http, builder).await {
                error!("Failed to send error embed: {send_error}");
            }
            return Err(e.into());
        }
    };

    let mut reply_embeds = Vec::new();
    if let Some(embed) = outcome
        .reasoning
        .as_deref()
        .and_then(embeds::reasoning_embed)
    {
        reply_embeds.push(embed);
    }
    reply_embeds.extend(embeds::response_embeds(&outcome.response_text));

    // Re-read the tool set so freshly sent controls show current defaults.
    let tools = data
        .registry
        .get(conversation_id)
        .map(|conversation| conversation.tools)
        .unwrap_or_default();
    let components = controls::components(&tools);

    let total = reply_embeds.len();
    for (index, embed) in reply_embeds.into_iter().enumerate() {
        let mut builder = CreateMessage::new()
            .embed(embed)
            .components(components.clone());
        if index == 0 {
            builder = builder.reference_message(msg);
        }

        let reply = msg.channel_id.send_message(&ctx.http, builder).await?;
        data.registry.track_reply(reply.id.get(), conversation_id);

        if index + 1 < total {
            tokio::time::sleep(CHUNK_SEND_DELAY).await;
        }
    }

    Ok(ExchangeStatus::Completed)
}
