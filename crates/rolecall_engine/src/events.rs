//! Inbound event handling.

use crate::{Decision, DecisionInput, ReactionRoleEngine, Rejection, decide};
use rolecall_core::{
    ChannelId, EngineEvent, GuildId, MessageId, ReactionEvent, RoleId, Rrid,
};
use rolecall_error::{GatewayError, RolecallResult};
use rolecall_interface::Lookup;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// What handling an event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Nothing routed to a reaction-role message.
    Ignored,
    /// A role was granted.
    Granted(RoleId),
    /// A role was revoked.
    Revoked(RoleId),
    /// The member was not eligible.
    Rejected(Rejection),
    /// The platform refused or failed; nothing changed.
    Failed,
    /// Configuration and runtime state were brought in line with the guild.
    Reconciled,
}

impl ReactionRoleEngine {
    /// Handle one platform event. Failures are logged, never returned:
    /// the platform has no one to report them to.
    #[instrument(skip(self, event), fields(event = event.name()))]
    pub async fn handle_event(&self, event: EngineEvent) -> EventOutcome {
        let result = match event {
            EngineEvent::Reaction(reaction) => return self.on_reaction(reaction).await,
            EngineEvent::MessageDeleted {
                channel_id,
                message_id,
                ..
            } => self.on_message_deleted(channel_id, message_id).await,
            EngineEvent::ChannelDeleted {
                guild_id,
                channel_id,
            } => self.on_channel_deleted(guild_id, channel_id).await,
            EngineEvent::RoleDeleted { guild_id, role_id } => {
                self.on_role_deleted(guild_id, role_id).await
            }
            EngineEvent::RoleUpdated { guild_id, .. } => self.refresh_guild(guild_id).await,
            EngineEvent::MemberUpdated { guild_id, user_id } => {
                if user_id == self.gateway.bot_user() {
                    self.refresh_guild(guild_id).await
                } else {
                    Ok(EventOutcome::Ignored)
                }
            }
            EngineEvent::GuildLeft { guild_id } => {
                let _gate = self.guild_gates.acquire(guild_id).await;
                self.forget_guild(guild_id)
                    .await
                    .map(|()| EventOutcome::Reconciled)
            }
        };

        result.unwrap_or_else(|err| {
            warn!(error = %err, "Event handling failed");
            EventOutcome::Failed
        })
    }

    async fn on_reaction(&self, event: ReactionEvent) -> EventOutcome {
        if event.user_id == self.gateway.bot_user() {
            return EventOutcome::Ignored;
        }
        let _gate = self.message_gates.acquire(event.message_id).await;

        let input = {
            let state = self.state.lock().await;
            let Some(entity) = state.dispatch.lookup(event.message_id) else {
                return EventOutcome::Ignored;
            };
            let Some(pair) = entity.pair_for(&event.emote) else {
                return EventOutcome::Ignored;
            };
            DecisionInput {
                rrid: *entity.rrid(),
                pair: pair.clone(),
                global: entity.global().clone(),
                limit: (*entity.limit())
                    .and_then(|limit| state.limits.snapshot(limit, &state.dispatch)),
            }
        };

        // A limited pair counts roles granted by earlier reactions, which the
        // event snapshot may predate.
        let _member_gate = if input.limit.is_some() {
            Some(
                self.member_gates
                    .acquire((event.guild_id, event.user_id))
                    .await,
            )
        } else {
            None
        };
        let event_roles = event.member_roles.filter(|_| input.limit.is_none());

        let member_roles: HashSet<RoleId> = match event_roles {
            Some(roles) => roles.into_iter().collect(),
            None => match self.gateway.member_roles(event.guild_id, event.user_id).await {
                Lookup::Found(roles) => roles.into_iter().collect(),
                Lookup::Missing => return EventOutcome::Ignored,
                Lookup::Unavailable(err) => {
                    warn!(user_id = %event.user_id, error = %err, "Could not fetch member roles");
                    return EventOutcome::Failed;
                }
            },
        };

        match decide(&input, event.action, &member_roles) {
            Decision::Grant(role) => {
                match self
                    .gateway
                    .grant_role(event.guild_id, event.user_id, role)
                    .await
                {
                    Ok(()) => {
                        debug!(rrid = %input.rrid, user_id = %event.user_id, role_id = %role, "Granted role");
                        EventOutcome::Granted(role)
                    }
                    Err(err) => {
                        log_role_failure("grant", role, &err);
                        EventOutcome::Failed
                    }
                }
            }
            Decision::Revoke(role) => {
                match self
                    .gateway
                    .revoke_role(event.guild_id, event.user_id, role)
                    .await
                {
                    Ok(()) => {
                        debug!(rrid = %input.rrid, user_id = %event.user_id, role_id = %role, "Revoked role");
                        EventOutcome::Revoked(role)
                    }
                    Err(err) => {
                        log_role_failure("revoke", role, &err);
                        EventOutcome::Failed
                    }
                }
            }
            Decision::Reject(reason) => {
                debug!(
                    rrid = %input.rrid,
                    user_id = %event.user_id,
                    action = %event.action,
                    %reason,
                    "Reaction rejected"
                );
                EventOutcome::Rejected(reason)
            }
        }
    }

    async fn on_message_deleted(
        &self,
        channel: ChannelId,
        message: MessageId,
    ) -> RolecallResult<EventOutcome> {
        let _gate = self.message_gates.acquire(message).await;
        let unbound = self.state.lock().await.dispatch.unregister(message);
        let cleared = self.store.clear_message_bindings(message).await?;

        if unbound.is_none() && cleared == 0 {
            return Ok(EventOutcome::Ignored);
        }
        info!(channel_id = %channel, message_id = %message, "Reaction-role message deleted, unbinding");
        Ok(EventOutcome::Reconciled)
    }

    async fn on_channel_deleted(
        &self,
        guild: GuildId,
        channel: ChannelId,
    ) -> RolecallResult<EventOutcome> {
        let _gate = self.guild_gates.acquire(guild).await;
        let unbound = {
            let mut state = self.state.lock().await;
            let messages = state.dispatch.in_channel(channel);
            messages
                .into_iter()
                .filter_map(|message| state.dispatch.unregister(message))
                .count()
        };
        let cleared = self.store.clear_channel_bindings(channel).await?;

        if unbound == 0 && cleared == 0 {
            return Ok(EventOutcome::Ignored);
        }
        info!(guild_id = %guild, channel_id = %channel, cleared, "Channel deleted, unbinding");
        Ok(EventOutcome::Reconciled)
    }

    async fn on_role_deleted(&self, guild: GuildId, role: RoleId) -> RolecallResult<EventOutcome> {
        let _gate = self.guild_gates.acquire(guild).await;
        let pairs = self.store.delete_pairs_for_role(guild, role).await?;
        let restrictions = self.store.delete_restrictions_for_role(guild, role).await?;

        let changed: Vec<_> = {
            let mut state = self.state.lock().await;
            let mut changed = Vec::new();
            for message in state.dispatch.in_guild(guild) {
                if let Some(entity) = state.dispatch.lookup_mut(message) {
                    let before = entity.clone();
                    if entity.remove_role(role) {
                        changed.push((before, entity.clone()));
                    }
                }
            }
            changed
        };

        if pairs == 0 && restrictions == 0 && changed.is_empty() {
            return Ok(EventOutcome::Ignored);
        }
        info!(guild_id = %guild, role_id = %role, pairs, restrictions, "Role deleted, removing references");

        for (before, after) in &changed {
            if let Err(err) = self.render_changes(Some(before), Some(after)).await {
                warn!(rrid = %after.rrid(), error = %err, "Could not update menu after role deletion");
            }
        }
        Ok(EventOutcome::Reconciled)
    }

    /// Re-hydrate the displayed messages of a guild, picking up changes in
    /// role rank that block or unblock pairs.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn refresh_guild(&self, guild: GuildId) -> RolecallResult<EventOutcome> {
        let _gate = self.guild_gates.acquire(guild).await;

        let displayed: Vec<(Rrid, crate::ReactionRoleMessage)> = {
            let state = self.state.lock().await;
            state
                .dispatch
                .in_guild(guild)
                .into_iter()
                .filter_map(|message| state.dispatch.lookup(message))
                .map(|entity| (*entity.rrid(), entity.clone()))
                .collect()
        };
        if displayed.is_empty() {
            return Ok(EventOutcome::Ignored);
        }

        let snapshot = match self.gateway.guild(guild).await {
            Lookup::Found(snapshot) => snapshot,
            Lookup::Missing => {
                self.forget_guild(guild).await?;
                return Ok(EventOutcome::Reconciled);
            }
            Lookup::Unavailable(err) => return Err(err.into()),
        };

        for (rrid, before) in displayed {
            let after = self.sync_entity(rrid, &snapshot).await?;
            if after.as_ref() != Some(&before) {
                self.render_changes(Some(&before), after.as_ref()).await?;
            }
        }
        Ok(EventOutcome::Reconciled)
    }
}

fn log_role_failure(action: &str, role: RoleId, err: &GatewayError) {
    if err.is_forbidden() {
        info!(action, role_id = %role, error = %err, "Missing permission to change role");
    } else if err.is_not_found() {
        debug!(action, role_id = %role, error = %err, "Member or role vanished before role change");
    } else {
        warn!(action, role_id = %role, error = %err, "Role change failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_equality() {
        assert_eq!(
            EventOutcome::Rejected(Rejection::LimitReached),
            EventOutcome::Rejected(Rejection::LimitReached)
        );
        assert_ne!(EventOutcome::Ignored, EventOutcome::Failed);
    }
}
