//! Core bot logic using the Poise framework.

use crate::error::BotResult;
use crate::notifier::DiscordNotifier;
use chrono::{DateTime, Utc};
use modwatch_commands::{framework_options, Data, Error};
use modwatch_common::UserId;
use modwatch_config::{Config, ConfigCache};
use modwatch_tracker::{
    JsonFileStore, MuteNotifier, NoopNotifier, SystemClock, TrackerService, TrackingSettings,
};
use poise::serenity_prelude::{self as serenity, GatewayIntents};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Main bot structure.
pub struct ModwatchBot {
    config: Arc<ConfigCache>,
}

impl ModwatchBot {
    /// Creates a new bot instance.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(ConfigCache::new(config)),
        }
    }

    /// Runs the tracker and the Discord client until Ctrl-C or a client error,
    /// then shuts the tracker down so its final state is saved.
    pub async fn run(self) -> BotResult<()> {
        let config = self.config.get();

        let http = Arc::new(serenity::Http::new(&config.discord.token));
        let notifier: Arc<dyn MuteNotifier> =
            match DiscordNotifier::from_config(http, &config.discord) {
                Some(notifier) => Arc::new(notifier),
                None => {
                    warn!("Guild or muted role not configured, mutes are tracked but not enforced");
                    Arc::new(NoopNotifier)
                }
            };

        let service = TrackerService::start(
            TrackingSettings::from(&config.tracking),
            Arc::new(JsonFileStore::new(&config.storage.state_path)),
            notifier,
            Arc::new(SystemClock),
        )
        .await?;

        let data = Data::new(service.tracker().clone(), self.config.clone());
        let guild_id = config.discord.guild_id.get();

        let framework = poise::Framework::builder()
            .options(poise::FrameworkOptions {
                event_handler: |ctx, event, framework, data| {
                    Box::pin(event_handler(ctx, event, framework, data))
                },
                ..framework_options()
            })
            .setup(move |ctx, ready, framework| {
                Box::pin(async move {
                    info!("Bot connected as: {}", ready.user.name);
                    let commands = &framework.options().commands;
                    if guild_id == 0 {
                        poise::builtins::register_globally(ctx, commands).await?;
                        info!("Slash commands registered globally");
                    } else {
                        let guild = serenity::GuildId::new(guild_id);
                        poise::builtins::register_in_guild(ctx, commands, guild).await?;
                        info!("Slash commands registered in guild {}", guild_id);
                    }
                    Ok(data)
                })
            })
            .build();

        let client = serenity::ClientBuilder::new(&config.discord.token, required_intents())
            .framework(framework)
            .await;

        let mut client = match client {
            Ok(client) => client,
            Err(e) => {
                service.shutdown().await?;
                return Err(e.into());
            }
        };

        let shard_manager = client.shard_manager.clone();
        info!("Modwatch is starting up...");

        let client_result = tokio::select! {
            result = client.start() => result,
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    error!("Failed to listen for shutdown signal: {:?}", e);
                }
                info!("Received shutdown signal, starting graceful shutdown");
                shard_manager.shutdown_all().await;
                Ok(())
            }
        };

        if let Err(e) = &client_result {
            error!("Client error: {:?}", e);
        }

        service.shutdown().await?;
        info!("Modwatch has shut down");

        client_result.map_err(Into::into)
    }
}

/// Gateway intents the bot needs: guild membership and message events.
pub fn required_intents() -> GatewayIntents {
    GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES
}

/// Central event handler for Discord events.
async fn event_handler(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            if new_message.author.bot || new_message.guild_id.is_none() {
                return Ok(());
            }
            let seen_at = message_instant(new_message.timestamp.unix_timestamp())
                .unwrap_or_else(|| data.tracker.now());
            data.tracker
                .touch_activity(UserId(new_message.author.id.get()), seen_at);
        }
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("Bot ready event received for: {}", data_about_bot.user.name);
        }
        _ => {}
    }
    Ok(())
}

/// Converts a message's Unix timestamp into an instant.
pub fn message_instant(unix_seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(unix_seconds, 0)
}
