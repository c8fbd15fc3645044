//! Trait definitions for Rolecall.
//!
//! The engine never talks to Postgres or to the chat platform directly. It
//! goes through two seams:
//! - [`ReactionRoleStore`]: the persistent store, authoritative for configuration
//! - [`GuildGateway`]: live guild state and outbound effects
//!
//! Gateway reads return a [`Lookup`], which keeps "this no longer exists"
//! apart from "the platform could not be reached right now".

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gateway;
mod lookup;
mod store;

pub use gateway::GuildGateway;
pub use lookup::Lookup;
pub use store::{ReactionRoleStore, StoreResult};
