//! Command handlers.

use rolecall::{
    ConfigError, PgReactionRoleStore, RolecallBot, RolecallConfig, RolecallError, RolecallResult,
    establish_connection, run_migrations,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Apply pending embedded migrations.
#[instrument]
pub async fn migrate() -> RolecallResult<()> {
    let applied = tokio::task::spawn_blocking(|| -> RolecallResult<usize> {
        let mut conn = establish_connection()?;
        Ok(run_migrations(&mut conn)?)
    })
    .await
    .map_err(|e| RolecallError::from(ConfigError::new(format!("Migration task failed: {}", e))))??;
    info!(applied, "Database schema up to date");
    Ok(())
}

/// Migrate, then run the bot until it shuts down.
#[instrument(skip(config))]
pub async fn run_bot(config: &RolecallConfig) -> RolecallResult<()> {
    migrate().await?;

    let token = std::env::var("DISCORD_TOKEN")
        .map_err(|_| ConfigError::new("DISCORD_TOKEN environment variable not set"))?;

    let pool_size = config.database.pool_size;
    let store = tokio::task::spawn_blocking(move || PgReactionRoleStore::connect(pool_size))
        .await
        .map_err(|e| RolecallError::from(ConfigError::new(format!("Pool task failed: {}", e))))??;

    let mut bot = RolecallBot::new(
        token,
        Arc::new(store),
        config.engine.settings(),
        config.engine.retry_interval(),
    )
    .await?;
    bot.start().await?;
    Ok(())
}

/// Print the effective configuration.
pub fn show_config(config: &RolecallConfig) -> RolecallResult<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
