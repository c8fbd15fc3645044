//! Error types for Rolecall.
//!
//! This crate provides the foundation error types used throughout the Rolecall workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! [`ReactionRoleError`] is the single tagged kind for caller-facing
//! configuration mistakes; [`RolecallError::configuration`] lets the command
//! layer tell it apart from transport and storage failures.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
mod gateway;
mod reaction_role;

pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{RolecallError, RolecallErrorKind, RolecallResult};
pub use gateway::{GatewayError, GatewayErrorKind, GatewayResult};
pub use reaction_role::{ReactionRoleError, ReactionRoleErrorKind};
