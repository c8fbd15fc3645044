//! Discord integration for Rolecall.
//!
//! This crate connects the reaction-role engine to Discord through Serenity:
//!
//! - **gateway**: [`SerenityGateway`] implements
//!   [`GuildGateway`](rolecall_interface::GuildGateway) over Discord's HTTP API
//! - **handler**: [`RolecallHandler`] translates gateway events into
//!   [`EngineEvent`](rolecall_core::EngineEvent)s
//! - **client**: [`RolecallBot`] owns the Serenity client and the engine
//!
//! # Usage
//!
//! ```rust,ignore
//! use rolecall_discord::RolecallBot;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = std::sync::Arc::new(rolecall_database::PgReactionRoleStore::connect(4)?);
//!     let mut bot = RolecallBot::new(
//!         std::env::var("DISCORD_TOKEN")?,
//!         store,
//!         Default::default(),
//!         std::time::Duration::from_secs(60),
//!     )
//!     .await?;
//!     bot.start().await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod conversions;
mod gateway;
mod handler;

pub use client::RolecallBot;
pub use conversions::{emote_from_reaction, kind_for_status, menu_embed, reaction_type};
pub use gateway::SerenityGateway;
pub use handler::RolecallHandler;
