//! Bot layer - Discord-specific interface and command handlers
//!
//! This module exposes the gate pass lifecycle as slash commands, resolves the
//! invoking Discord user to a student or staff role, and delivers approval
//! notifications as direct messages.

/// Discord command implementations (gate pass, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;
/// Direct-message notifier
pub mod notifier;

use crate::{
    config::hostel::StaffConfig,
    core::{gate_pass::GatePassManager, notify::Notifier},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Gate pass manager as wired up for the bot.
pub type BotManager = GatePassManager<DatabaseConnection, Arc<dyn Notifier>>;

/// Shared data available to all bot commands.
pub struct BotData {
    /// Gate pass lifecycle manager; also exposes the database for queries
    pub manager: BotManager,
    /// Discord users with admin and gate roles
    pub staff: StaffConfig,
}

impl BotData {
    /// Creates a new `BotData` instance.
    #[must_use]
    pub const fn new(manager: BotManager, staff: StaffConfig) -> Self {
        Self { manager, staff }
    }

    /// Database connection for read-only queries.
    #[must_use]
    pub const fn database(&self) -> &DatabaseConnection {
        self.manager.database()
    }
}

pub use commands::*;
pub use handlers::*;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
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

/// Connects to Discord and serves gate pass commands until the client stops.
#[instrument(skip(token, staff, db))]
pub async fn run_bot(token: String, staff: StaffConfig, db: DatabaseConnection) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![commands::gatepass(), commands::ping(), commands::help()],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                let notifier: Arc<dyn Notifier> =
                    Arc::new(notifier::DiscordNotifier::new(Arc::clone(&ctx.http)));
                let manager = GatePassManager::new(db.clone(), db, notifier);
                Ok(BotData::new(manager, staff))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}
