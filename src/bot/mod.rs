//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for `SmartKharch`, including all slash
//! commands, autocomplete handlers, and bot context management.

/// Discord command implementations (expense, budget, report, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;
/// Argument parsing and text helpers shared by commands
pub mod utils;

use crate::{
    config::app::AppConfig,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Shared data available to all bot commands.
/// This structure holds the database connection and the loaded configuration.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Application settings
    pub config: Arc<AppConfig>,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection.
    #[must_use]
    pub const fn new(database: DatabaseConnection, config: Arc<AppConfig>) -> Self {
        Self { database, config }
    }
}

/// Unwraps `result`, replying with a "❌" message when it holds a user mistake.
///
/// Returns `Ok(None)` after replying so the command can stop; other errors are
/// propagated to the framework error handler.
pub async fn or_reject<T>(
    ctx: poise::Context<'_, BotData, Error>,
    result: Result<T>,
) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_rejection() => {
            ctx.say(format!("❌ {e}")).await?;
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Every command the bot registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::ping(),
        commands::help(),
        commands::expense(),
        commands::budget(),
        commands::alerts(),
        commands::insights(),
        commands::periods(),
        commands::export(),
    ]
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Reads `DISCORD_GUILD_ID` for instant guild registration during development.
fn dev_guild_id() -> Option<serenity::GuildId> {
    let raw = std::env::var("DISCORD_GUILD_ID").ok()?;
    match raw.trim().parse::<u64>() {
        Ok(id) if id != 0 => Some(serenity::GuildId::new(id)),
        _ => {
            warn!(value = %raw, "Ignoring invalid DISCORD_GUILD_ID");
            None
        }
    }
}

/// Starts the bot and runs until the gateway connection ends.
#[instrument(skip(token, config, database))]
pub async fn run_bot(
    token: String,
    config: Arc<AppConfig>,
    database: DatabaseConnection,
) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                if let Some(guild_id) = dev_guild_id() {
                    poise::builtins::register_in_guild(
                        ctx,
                        &framework.options().commands,
                        guild_id,
                    )
                    .await?;
                    info!("Registered commands in guild {guild_id}");
                } else {
                    info!("Registering commands globally...");
                    poise::builtins::register_globally(ctx, &framework.options().commands)
                        .await?;
                }
                Ok(BotData::new(database, config))
            })
        })
        .build();

    // Slash commands need no privileged intents
    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
