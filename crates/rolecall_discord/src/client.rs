//! Discord bot client setup and lifecycle management.

use crate::{RolecallHandler, SerenityGateway};
use rolecall_engine::{EngineSettings, ReactionRoleEngine};
use rolecall_error::{GatewayError, GatewayErrorKind, GatewayResult};
use rolecall_interface::ReactionRoleStore;
use serenity::Client;
use serenity::all::Http;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// Reaction-role bot: the Serenity client plus the engine it drives.
///
/// # Example
/// ```no_run
/// use rolecall_discord::RolecallBot;
/// use rolecall_database::PgReactionRoleStore;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let token = std::env::var("DISCORD_TOKEN")?;
///     let store = Arc::new(PgReactionRoleStore::connect(4)?);
///
///     let mut bot = RolecallBot::new(token, store, Default::default(), Duration::from_secs(60)).await?;
///     bot.start().await?;
///     Ok(())
/// }
/// ```
pub struct RolecallBot {
    client: Client,
    engine: Arc<ReactionRoleEngine>,
}

impl RolecallBot {
    /// Create the bot.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The bot token is invalid
    /// - The Serenity client fails to initialize
    #[instrument(skip(token, store, settings), fields(token_len = token.len()))]
    pub async fn new(
        token: String,
        store: Arc<dyn ReactionRoleStore>,
        settings: EngineSettings,
        retry_interval: Duration,
    ) -> GatewayResult<Self> {
        info!("Initializing Rolecall Discord bot");

        let http = Arc::new(Http::new(&token));
        let gateway = SerenityGateway::for_current_user(http).await?;
        let engine = Arc::new(ReactionRoleEngine::new(store, Arc::new(gateway), settings));

        let handler = RolecallHandler::new(Arc::clone(&engine), retry_interval);
        let intents = RolecallHandler::intents();
        info!("Building Serenity client with intents: {:?}", intents);

        let client = Client::builder(&token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| {
                GatewayError::new(GatewayErrorKind::ConnectionFailed(format!(
                    "Failed to build client: {}",
                    e
                )))
            })?;

        info!("Serenity client built successfully");
        Ok(Self { client, engine })
    }

    /// The engine, for the command layer to apply configuration changes.
    pub fn engine(&self) -> &Arc<ReactionRoleEngine> {
        &self.engine
    }

    /// Connect and process events until the client shuts down.
    ///
    /// # Errors
    /// Returns an error if the client fails to start or encounters a fatal error.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> GatewayResult<()> {
        info!("Starting Discord bot");
        self.client.start().await.map_err(|e| {
            GatewayError::new(GatewayErrorKind::ConnectionFailed(format!(
                "Client error: {}",
                e
            )))
        })
    }
}
