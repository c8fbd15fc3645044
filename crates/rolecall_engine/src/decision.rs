//! Reaction decision procedure.
//!
//! Pure: everything it needs is copied out of the engine state first, so it
//! never runs under a lock.

use crate::{EmoteRolePair, LimitSnapshot, RoleRestrictions};
use rolecall_core::{ReactionAction, RoleId, Rrid};
use std::collections::HashSet;

/// What a reaction is checked against.
#[derive(Debug, Clone)]
pub struct DecisionInput {
    /// Message the reaction landed on
    pub rrid: Rrid,
    /// Pair triggered by the emote
    pub pair: EmoteRolePair,
    /// Message-wide restrictions
    pub global: RoleRestrictions,
    /// Shared limit, when the message participates in one
    pub limit: Option<LimitSnapshot>,
}

/// Why a reaction did not change any role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Rejection {
    /// The role outranks the bot
    #[display("role outranks the bot")]
    Blocked,
    /// The member already holds as many limited roles as allowed
    #[display("limit reached")]
    LimitReached,
    /// The member holds a globally prohibited role
    #[display("globally prohibited role held")]
    GlobalProhibited,
    /// The member holds a role prohibited for this pair
    #[display("pair prohibited role held")]
    PairProhibited,
    /// The member holds none of the globally allowed roles
    #[display("no globally allowed role held")]
    GlobalAllowedMissing,
    /// The member holds none of the roles allowed for this pair
    #[display("no pair allowed role held")]
    PairAllowedMissing,
}

/// Outcome of the decision procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Give the role
    Grant(RoleId),
    /// Take the role
    Revoke(RoleId),
    /// Leave roles untouched
    Reject(Rejection),
}

/// Decide what a reaction does.
///
/// Adding checks, in order: blocked, limit, global prohibited, pair
/// prohibited, global allowed, pair allowed. Removing only re-checks the
/// pair restrictions.
pub fn decide(
    input: &DecisionInput,
    action: ReactionAction,
    member_roles: &HashSet<RoleId>,
) -> Decision {
    let role = *input.pair.role();
    let pair = input.pair.restrictions();

    match action {
        ReactionAction::Added => {
            if *input.pair.blocked() {
                Decision::Reject(Rejection::Blocked)
            } else if input
                .limit
                .as_ref()
                .is_some_and(|limit| limit.reached(member_roles))
            {
                Decision::Reject(Rejection::LimitReached)
            } else if input.global.prohibits(member_roles) {
                Decision::Reject(Rejection::GlobalProhibited)
            } else if pair.prohibits(member_roles) {
                Decision::Reject(Rejection::PairProhibited)
            } else if input.global.lacks_allowed(member_roles) {
                Decision::Reject(Rejection::GlobalAllowedMissing)
            } else if pair.lacks_allowed(member_roles) {
                Decision::Reject(Rejection::PairAllowedMissing)
            } else {
                Decision::Grant(role)
            }
        }
        ReactionAction::Removed => {
            if pair.prohibits(member_roles) {
                Decision::Reject(Rejection::PairProhibited)
            } else if pair.lacks_allowed(member_roles) {
                Decision::Reject(Rejection::PairAllowedMissing)
            } else {
                Decision::Revoke(role)
            }
        }
    }
}
