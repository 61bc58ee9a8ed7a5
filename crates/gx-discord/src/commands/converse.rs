//! /grok converse command - start a persistent conversation with Grok

use poise::CreateReply;
use serenity::all::Attachment;
use tracing::{error, info};

use gx_core::xai::is_supported_image;
use gx_core::{ChatMessage, ChatParameters, ContentPart, Conversation};

use crate::commands::{Context, Error};
use crate::controls;
use crate::embeds;

/// Grok models selectable at conversation start
#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum ChatModelChoice {
    #[name = "Grok 4.1 Fast Reasoning"]
    Grok41FastReasoning,
    #[name = "Grok 4.1 Fast Non-Reasoning"]
    Grok41FastNonReasoning,
    #[name = "Grok Code Fast 1"]
    GrokCodeFast1,
    #[name = "Grok 4 Fast Reasoning"]
    Grok4FastReasoning,
    #[name = "Grok 4 Fast Non-Reasoning"]
    Grok4FastNonReasoning,
    #[name = "Grok 4 (0709)"]
    Grok4,
    #[name = "Grok 3 Mini"]
    Grok3Mini,
    #[name = "Grok 3"]
    Grok3,
    #[name = "Grok 2 Vision (1212)"]
    Grok2Vision,
}

impl ChatModelChoice {
    pub fn id(self) -> &'static str {
        match self {
            ChatModelChoice::Grok41FastReasoning => "grok-4-1-fast-reasoning",
            ChatModelChoice::Grok41FastNonReasoning => "grok-4-1-fast-non-reasoning",
            ChatModelChoice::GrokCodeFast1 => "grok-code-fast-1",
            ChatModelChoice::Grok4FastReasoning => "grok-4-fast-reasoning",
            ChatModelChoice::Grok4FastNonReasoning => "grok-4-fast-non-reasoning",
            ChatModelChoice::Grok4 => "grok-4-0709",
            ChatModelChoice::Grok3Mini => "grok-3-mini",
            ChatModelChoice::Grok3 => "grok-3",
            ChatModelChoice::Grok2Vision => "grok-2-vision-1212",
        }
    }
}

/// Starts a conversation with Grok.
#[poise::command(slash_command, rename = "converse")]
#[allow(clippy::too_many_arguments)]
pub async fn converse(
    ctx: Context<'_>,
    #[description = "Prompt"] prompt: String,
    #[description = "Choose a Grok model. (default: Grok 4.1 Fast Reasoning)"] model: Option<
        ChatModelChoice,
    >,
    #[description = "System prompt to set Grok's behavior. (default: not set)"]
    system_prompt: Option<String>,
    #[description = "Attach an image (JPEG, PNG, GIF, WEBP)."] attachment: Option<Attachment>,
    #[description = "Maximum tokens in the response. (default: 16384)"] max_tokens: Option<u32>,
    #[description = "(Advanced) Controls the randomness of the model. 0.0 to 2.0. (default: not set)"]
    #[min = 0.0]
    #[max = 2.0]
    temperature: Option<f32>,
    #[description = "(Advanced) Nucleus sampling. 0.0 to 1.0. (default: not set)"]
    #[min = 0.0]
    #[max = 1.0]
    top_p: Option<f32>,
    #[description = "(Advanced) Controls how much the model should repeat itself. (default: not set)"]
    frequency_penalty: Option<f32>,
    #[description = "(Advanced) Controls how much the model should talk about new topics. (default: not set)"]
    presence_penalty: Option<f32>,
) -> Result<(), Error> {
    ctx.defer().await?;

    let data = ctx.data();
    let starter = ctx.author().id.get();
    let channel = ctx.channel_id().get();

    // One active conversation per user per channel.
    if data.registry.active_for(starter, channel) {
        ctx.send(CreateReply::default().embed(embeds::error_embed(
            "You already have an active conversation in this channel. \
             Please finish it before starting a new one.",
        )))
        .await?;
        return Ok(());
    }

    let model = model.unwrap_or(ChatModelChoice::Grok41FastReasoning);
    let mut params = ChatParameters::new(model.id());
    params.system = system_prompt;
    if let Some(max_tokens) = max_tokens {
        params.max_tokens = max_tokens;
    }
    params.temperature = temperature;
    params.top_p = top_p;
    params.frequency_penalty = frequency_penalty;
    params.presence_penalty = presence_penalty;

    let conversation_id = ctx.id();
    info!(
        "Starting conversation {conversation_id} with model {} for user {starter}",
        params.model
    );

    let mut content = vec![ContentPart::text(&prompt)];
    if let Some(attachment) = &attachment {
        if attachment
            .content_type
            .as_deref()
            .is_some_and(is_supported_image)
        {
            content.push(ContentPart::image_url(&attachment.url));
        }
    }
    let user_message = ChatMessage::user(content);

    let mut conversation = Conversation::new(conversation_id, starter, channel, params);
    let request = conversation.request_with(user_message.clone());

    let typing = ctx.channel_id().start_typing(&ctx.serenity_context().http);
    let result = data.client.chat(&request).await;
    drop(typing);

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            error!("Error in converse: {e}");
            ctx.send(CreateReply::default().embed(embeds::error_embed(&e.to_string())))
                .await?;
            return Ok(());
        }
    };

    let response_text = response.text().unwrap_or("No response.").to_string();
    let reasoning = response.reasoning().unwrap_or_default().to_string();

    conversation.history.push(user_message);
    conversation
        .history
        .push(ChatMessage::assistant(&response_text));

    let mut reply = CreateReply::default()
        .embed(embeds::started_embed(&prompt, &conversation.params))
        .components(controls::components(&conversation.tools));
    if let Some(embed) = embeds::reasoning_embed(&reasoning) {
        reply = reply.embed(embed);
    }
    for embed in embeds::response_embeds(&response_text) {
        reply = reply.embed(embed);
    }

    let handle = ctx.send(reply).await?;
    let message = handle.message().await?;

    // Register only after the reply went out, so a failed send leaves no
    // dangling conversation. A racing duplicate loses here.
    if let Err(e) = data.registry.create(conversation) {
        ctx.send(CreateReply::default().embed(embeds::error_embed(&e.to_string())))
            .await?;
        return Ok(());
    }
    data.registry.track_reply(message.id.get(), conversation_id);

    Ok(())
}
