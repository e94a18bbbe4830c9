//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the `BomBuddy` application,
//! including all slash commands, autocomplete handlers, and bot context management.

/// Discord command implementations (catalog, finished goods, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{core::costing::LineDefaults, errors::Error};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
/// This structure holds the database connection and the costing defaults
/// applied to newly created finished goods.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Starting values for new finished goods
    pub defaults: LineDefaults,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection and defaults.
    #[must_use]
    pub const fn new(database: DatabaseConnection, defaults: LineDefaults) -> Self {
        Self { database, defaults }
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("❌ An error occurred: {error}")).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Builds the poise framework, registers all commands globally, and runs the client
/// until it shuts down.
///
/// # Errors
/// Returns an error if the client cannot be created or stops with an error.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> crate::errors::Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::catalog(),
                commands::fg(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Registered {} commands globally", framework.options().commands.len());
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Starting bot client...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;
    client.start().await?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
