//! Allowed and prohibited roles.

use super::{Editing, parse_emote};
use crate::ReactionRoleEngine;
use crate::engine::invalid;
use rolecall_core::{GuildId, MAX_RESTRICTED_ROLES, RestrictionScope, RoleId};
use rolecall_error::{ReactionRoleErrorKind, RolecallResult};
use tracing::{info, instrument};

/// Which restriction list of a message to change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestrictionTarget {
    /// The message-wide lists
    Global,
    /// The lists of the pair using this emote
    Pair(String),
}

/// Allowed or prohibited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RestrictionKind {
    /// Members must hold one of these roles
    #[display("allowed")]
    Allowed,
    /// Members must hold none of these roles
    #[display("prohibited")]
    Prohibited,
}

impl RestrictionKind {
    fn is_allowed(self) -> bool {
        matches!(self, RestrictionKind::Allowed)
    }
}

impl ReactionRoleEngine {
    /// Add a role to an allowed or prohibited list.
    #[instrument(skip(self), fields(guild_id = %guild, role_id = %role))]
    pub async fn add_restriction(
        &self,
        guild: GuildId,
        index: Option<usize>,
        target: RestrictionTarget,
        kind: RestrictionKind,
        role: RoleId,
    ) -> RolecallResult<()> {
        let editing = self.begin(guild, index).await?;
        if !editing.guild.has_role(role) {
            return Err(invalid(ReactionRoleErrorKind::RoleNotFound(role.get())));
        }
        let scope = restriction_scope(&editing, &target)?;

        let existing = self.store.list_restrictions(scope).await?;
        if let Some(current) = existing.iter().find(|record| record.role_id == role) {
            return Err(invalid(if current.allowed == kind.is_allowed() {
                ReactionRoleErrorKind::DuplicateRestriction(role.get())
            } else {
                ReactionRoleErrorKind::ConflictingRestriction(role.get())
            }));
        }
        let same_kind = existing
            .iter()
            .filter(|record| record.allowed == kind.is_allowed())
            .count();
        if same_kind >= MAX_RESTRICTED_ROLES {
            return Err(invalid(ReactionRoleErrorKind::TooManyRestrictions(
                MAX_RESTRICTED_ROLES,
            )));
        }

        self.store
            .add_restriction(scope, role, kind.is_allowed())
            .await?;
        self.commit(&editing).await?;

        info!(rrid = %editing.rrid, ?scope, %kind, "Added role restriction");
        Ok(())
    }

    /// Remove a role from an allowed or prohibited list.
    #[instrument(skip(self), fields(guild_id = %guild, role_id = %role))]
    pub async fn remove_restriction(
        &self,
        guild: GuildId,
        index: Option<usize>,
        target: RestrictionTarget,
        kind: RestrictionKind,
        role: RoleId,
    ) -> RolecallResult<()> {
        let editing = self.begin(guild, index).await?;
        let scope = restriction_scope(&editing, &target)?;

        let existing = self.store.list_restrictions(scope).await?;
        let present = existing
            .iter()
            .any(|record| record.role_id == role && record.allowed == kind.is_allowed());
        if !present {
            return Err(invalid(ReactionRoleErrorKind::RestrictionNotFound(
                role.get(),
            )));
        }

        self.store.remove_restriction(scope, role).await?;
        self.commit(&editing).await?;

        info!(rrid = %editing.rrid, ?scope, %kind, "Removed role restriction");
        Ok(())
    }
}

fn restriction_scope(
    editing: &Editing,
    target: &RestrictionTarget,
) -> RolecallResult<RestrictionScope> {
    match target {
        RestrictionTarget::Global => Ok(RestrictionScope::Global(editing.rrid)),
        RestrictionTarget::Pair(emote) => {
            let emote = parse_emote(emote)?;
            Ok(RestrictionScope::Pair(editing.pair(&emote)?.record.id))
        }
    }
}
