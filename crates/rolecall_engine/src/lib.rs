//! Reaction-role engine for Rolecall.
//!
//! Members grant themselves roles by reacting to a designated message. This
//! crate owns everything between the persistent configuration and the chat
//! platform:
//!
//! - **Hydration** ([`Hydrator`]) validates stored rows against live guild
//!   state and emits [`Repair`]s for references that no longer resolve.
//! - **Reconciliation** ([`Reconciler`]) applies those repairs to the store.
//! - **Dispatch** ([`DispatchTable`]) routes reactions on posted messages to
//!   their entity.
//! - **Limits** ([`LimitTracker`]) caps roles held across groups of messages.
//! - **Decisions** ([`decide`]) check a reaction against restrictions.
//! - **Mutations** change configuration on behalf of the command layer.
//!
//! [`ReactionRoleEngine`] ties them together.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod decision;
mod dispatch;
mod engine;
mod entity;
mod events;
mod gate;
mod hydrate;
mod limits;
mod mutation;
mod query;
mod reconcile;
mod render;
mod settings;

pub use decision::{Decision, DecisionInput, Rejection, decide};
pub use dispatch::DispatchTable;
pub use engine::{ReactionRoleEngine, RestoreReport};
pub use entity::{
    EmoteRolePair, FullMenu, MenuState, MessageKind, ReactionRoleMessage, RoleRestrictions,
};
pub use events::EventOutcome;
pub use gate::KeyedGate;
pub use hydrate::{Hydration, Hydrator, Repair};
pub use limits::{LimitSnapshot, LimitTracker};
pub use mutation::{RestrictionKind, RestrictionTarget};
pub use query::MessageSummary;
pub use reconcile::Reconciler;
pub use render::menu_content;
pub use settings::{EngineSettings, EngineSettingsBuilder};
