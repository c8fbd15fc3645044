//! PostgreSQL storage for Rolecall.
//!
//! This crate provides the diesel schema, embedded migrations and the
//! [`PgReactionRoleStore`] implementation of
//! [`ReactionRoleStore`](rolecall_interface::ReactionRoleStore).
//!
//! # Example
//!
//! ```rust,ignore
//! use rolecall_database::{PgReactionRoleStore, establish_connection, run_migrations};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut conn = establish_connection()?;
//! run_migrations(&mut conn)?;
//! let store = PgReactionRoleStore::connect(4)?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod connection;
mod models;
mod store;

pub mod schema;

pub use connection::{MIGRATIONS, PgPool, create_pool, establish_connection, run_migrations};
pub use models::{
    ExtraRow, LimitRow, MessageRow, NewGlobalRestriction, NewLimit, NewMessage, NewPair,
    NewPairExtra, NewPairRestriction, NewParticipant, PairRow,
};
pub use store::PgReactionRoleStore;

use rolecall_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
