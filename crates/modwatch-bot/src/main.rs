//! Main entry point for Modwatch.

use modwatch_bot::{BotResult, ModwatchBot};
use modwatch_common::init_logging;
use modwatch_config::ConfigLoader;
use tracing::{error, info};

#[tokio::main]
async fn main() -> BotResult<()> {
    let config = ConfigLoader::load()?;
    let _log_guard = init_logging(&config.logging)?;

    info!("Starting Modwatch");

    if let Err(e) = ModwatchBot::new(config).run().await {
        error!("Bot stopped with error: {}", e);
        return Err(e);
    }

    Ok(())
}
