//! gx-gateway: Grok Gateway Main Binary
//!
//! Main entry point for the Grok gateway Discord bot.
//!
//! Usage:
//!   gx-gateway           - Start the bot
//!   gx-gateway --help    - Show help
//!   gx-gateway --version - Show version

use std::sync::Arc;

use gx_core::{Config, ConversationRegistry, XaiClient};
use gx_discord::GrokBot;
use tracing_subscriber::EnvFilter;

/// Run mode
enum RunMode {
    /// Run the Discord bot
    Run,
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match parse_args() {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("gx-gateway {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Run => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {e}"))?;

    tracing::info!("Starting gx-gateway...");

    let client = Arc::new(
        XaiClient::new(&config).map_err(|e| anyhow::anyhow!("Failed to create xAI client: {e}"))?,
    );
    let registry = Arc::new(ConversationRegistry::new());

    let bot = GrokBot::new(config, client, registry);
    let bot_handle = tokio::spawn(async move {
        if let Err(e) = bot.start().await {
            tracing::error!("Discord bot error: {e}");
        }
    });

    tracing::info!("gx-gateway initialized successfully");
    tracing::info!("Press Ctrl+C to exit");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");

    bot_handle.abort();

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    let args: Vec<String> = std::env::args().collect();

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Run
}

/// Print help message
fn print_help() {
    println!("gx-gateway - Grok Gateway Discord Bot");
    println!();
    println!("Usage:");
    println!("  gx-gateway           Start the Discord bot");
    println!("  gx-gateway --help    Show this help message");
    println!("  gx-gateway --version Show version");
    println!();
    println!("Environment Variables:");
    println!("  XAI_API_KEY          xAI API key (required)");
    println!("  XAI_BASE_URL         Custom API endpoint");
    println!("  DISCORD_BOT_TOKEN    Discord bot token (required)");
    println!("  DISCORD_GUILD_IDS    Comma-separated guild ids for instant command registration");
    println!();
    println!("A grok-gateway.toml file in the working directory is read first;");
    println!("environment variables override file values.");
}
