//! Discord bot bootstrap using serenity + poise

use std::sync::Arc;

use serenity::all::{ClientBuilder, GatewayIntents, GuildId};
use tracing::info;

use gx_core::{Config, ConversationRegistry, XaiClient};

use crate::commands::{self, Data};
use crate::error::Result;
use crate::handler::Handler;

/// Discord bot for the Grok gateway
pub struct GrokBot {
    config: Config,
    data: Data,
}

impl GrokBot {
    /// Create a new bot over shared core state
    pub fn new(
        config: Config,
        client: Arc<XaiClient>,
        registry: Arc<ConversationRegistry>,
    ) -> Self {
        Self {
            config,
            data: Data { client, registry },
        }
    }

    /// Start the Discord client; runs until the gateway connection ends
    pub async fn start(&self) -> Result<()> {
        let token = self.config.discord.token.clone();
        let guild_ids: Vec<GuildId> = self
            .config
            .discord
            .guild_ids
            .iter()
            .copied()
            .map(GuildId::new)
            .collect();

        // - GUILD_MESSAGES: conversation follow-ups in guild channels
        // - DIRECT_MESSAGES: conversations in DMs
        // - MESSAGE_CONTENT: read follow-up message content (privileged intent)
        let intents = GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let setup_data = self.data.clone();
        let framework = poise::Framework::builder()
            .options(poise::FrameworkOptions {
                commands: commands::get_commands(),
                ..Default::default()
            })
            .setup(move |ctx, ready, framework| {
                Box::pin(async move {
                    info!("Logged in as {} (ID: {})", ready.user.name, ready.user.id);

                    // Guild registration is instant; global propagation can
                    // take up to an hour.
                    if guild_ids.is_empty() {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await?;
                        info!("Registered slash commands globally");
                    } else {
                        for guild_id in &guild_ids {
                            poise::builtins::register_in_guild(
                                ctx,
                                &framework.options().commands,
                                *guild_id,
                            )
                            .await?;
                        }
                        info!("Registered slash commands in {} guild(s)", guild_ids.len());
                    }

                    Ok(setup_data)
                })
            })
            .build();

        info!("Starting Discord bot...");

        let mut client = ClientBuilder::new(&token, intents)
            .framework(framework)
            .event_handler(Handler::new(self.data.clone()))
            .await?;

        client.start().await?;

        Ok(())
    }
}
