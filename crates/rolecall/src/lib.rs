//! Rolecall - reaction roles for Discord.
//!
//! Members grant themselves roles by reacting to a designated message. Guild
//! staff configure menus (emote/role pairs, restrictions, shared limits) and
//! Rolecall keeps roles in sync with reactions, repairing its configuration
//! whenever the guild changes underneath it.
//!
//! # Cargo Features
//!
//! - `database` - PostgreSQL persistence (default)
//! - `discord` - Discord bot integration (default)
//!
//! # Architecture
//!
//! - `rolecall_core` - ids, raw configuration model, emotes, events
//! - `rolecall_error` - error types
//! - `rolecall_interface` - store and gateway traits
//! - `rolecall_engine` - hydration, dispatch, limits, decisions, mutations
//! - `rolecall_database` - PostgreSQL store
//! - `rolecall_discord` - Serenity gateway and bot client
//!
//! This crate re-exports everything for convenience and adds configuration
//! loading.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;

pub use config::{DatabaseConfig, EngineConfig, LoggingConfig, RolecallConfig};

// Re-export core crates (always available)
pub use rolecall_core::*;
pub use rolecall_engine::*;
pub use rolecall_error::*;
pub use rolecall_interface::*;

#[cfg(feature = "database")]
pub use rolecall_database::{
    PgPool, PgReactionRoleStore, create_pool, establish_connection, run_migrations,
};

#[cfg(feature = "discord")]
pub use rolecall_discord::{RolecallBot, RolecallHandler, SerenityGateway};
