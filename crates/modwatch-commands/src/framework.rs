//! Poise framework setup and command registration logic.

use modwatch_common::UserId;
use modwatch_config::ConfigCache;
use modwatch_tracker::Tracker;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

/// Application data accessible in all commands.
#[derive(Debug)]
pub struct Data {
    /// Mutation port for mutes and activity.
    pub tracker: Tracker,
    /// Current configuration.
    pub config: Arc<ConfigCache>,
    /// When the process started.
    pub started_at: Instant,
}

impl Data {
    /// Bundles the shared handles, marking now as the start time.
    pub fn new(tracker: Tracker, config: Arc<ConfigCache>) -> Self {
        Self {
            tracker,
            config,
            started_at: Instant::now(),
        }
    }
}

/// Application error type for commands.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Command context type.
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Every command the bot registers.
pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        crate::mute::mute(),
        crate::unmute::unmute(),
        crate::activity::activity(),
        crate::config::config(),
        crate::about::about(),
        crate::uptime::uptime(),
    ]
}

/// Framework options with all commands and the shared error handler.
///
/// The binary adds its event handler before building the framework.
pub fn framework_options() -> poise::FrameworkOptions<Data, Error> {
    poise::FrameworkOptions {
        commands: commands(),
        on_error: |error| Box::pin(on_error(error)),
        ..Default::default()
    }
}

/// Global error handler for the framework.
async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command '{}': {:?}", ctx.command().name, error);
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!(
                "Error in event handler for {:?}: {:?}",
                event.snake_case_name(),
                error
            );
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Converts a Discord user into the tracker's member id.
pub fn member_id(user: &serenity::User) -> UserId {
    UserId(user.id.get())
}
