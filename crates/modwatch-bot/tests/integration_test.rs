//! Integration tests for modwatch-bot.
//!
//! These cover the wiring that does not need a gateway connection.

use modwatch_bot::{message_instant, required_intents, BotError, DiscordNotifier};
use modwatch_common::test_utils::{config_fixtures, init_test_logging};
use modwatch_config::{ConfigError, ConfigLoader};
use poise::serenity_prelude as serenity;
use std::sync::Arc;

#[test]
fn test_full_config_enables_discord_notifier() {
    init_test_logging();
    let config = ConfigLoader::parse_yaml(config_fixtures::full_config_yaml()).unwrap();

    let http = Arc::new(serenity::Http::new(&config.discord.token));
    assert!(DiscordNotifier::from_config(http, &config.discord).is_some());
}

#[test]
fn test_config_errors_convert_into_bot_errors() {
    let err: BotError = ConfigError::Validation(Vec::new()).into();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
fn test_intents_and_timestamps() {
    assert!(required_intents().contains(serenity::GatewayIntents::GUILDS));
    assert!(message_instant(0).is_some());
}
