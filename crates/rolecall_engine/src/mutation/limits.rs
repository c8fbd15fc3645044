//! Shared limits.

use crate::ReactionRoleEngine;
use crate::engine::invalid;
use rolecall_core::GuildId;
use rolecall_error::{ReactionRoleErrorKind, RolecallResult};
use tracing::{info, instrument};

impl ReactionRoleEngine {
    /// Cap how many of the message's roles (and those of messages sharing
    /// its limit) one member may hold.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn set_limit(
        &self,
        guild: GuildId,
        index: Option<usize>,
        cap: i64,
    ) -> RolecallResult<()> {
        let editing = self.begin(guild, index).await?;
        let cap = u32::try_from(cap)
            .ok()
            .filter(|cap| *cap >= 1)
            .ok_or_else(|| invalid(ReactionRoleErrorKind::InvalidCap(cap)))?;

        let limit = match editing.raw.record.limit_id {
            Some(limit) => {
                self.store.set_limit_cap(limit, cap).await?;
                limit
            }
            None => {
                let limit = self.store.create_limit(cap).await?;
                self.store.join_limit(editing.rrid, limit).await?;
                limit
            }
        };
        self.refresh_limit(limit).await?;
        self.commit(&editing).await?;

        info!(rrid = %editing.rrid, limit_id = %limit, cap, "Set limit");
        Ok(())
    }

    /// Stop the message from participating in its limit.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn remove_limit(&self, guild: GuildId, index: Option<usize>) -> RolecallResult<()> {
        let editing = self.begin(guild, index).await?;
        if editing.raw.record.limit_id.is_none() {
            return Err(invalid(ReactionRoleErrorKind::NoLimit(editing.ordinal)));
        }

        if let Some(limit) = self.store.leave_limit(editing.rrid).await? {
            self.refresh_limit(limit).await?;
        }
        self.commit(&editing).await?;

        info!(rrid = %editing.rrid, "Removed limit");
        Ok(())
    }

    /// Make the message share the limit of message `other` (1-based index).
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn chain_limit(
        &self,
        guild: GuildId,
        index: Option<usize>,
        other: usize,
    ) -> RolecallResult<()> {
        let editing = self.begin(guild, index).await?;
        let (other_ordinal, other_rrid) = self.resolve(guild, Some(other)).await?;
        if other_rrid == editing.rrid {
            return Err(invalid(ReactionRoleErrorKind::SelfChain));
        }
        let shared = self
            .store
            .get_message(other_rrid)
            .await?
            .and_then(|record| record.limit_id)
            .ok_or_else(|| invalid(ReactionRoleErrorKind::NoLimit(other_ordinal)))?;

        if editing.raw.record.limit_id == Some(shared) {
            return Ok(());
        }
        if let Some(previous) = self.store.leave_limit(editing.rrid).await? {
            self.refresh_limit(previous).await?;
        }
        self.store.join_limit(editing.rrid, shared).await?;
        self.refresh_limit(shared).await?;
        self.commit(&editing).await?;

        info!(rrid = %editing.rrid, limit_id = %shared, "Chained limit");
        Ok(())
    }
}
