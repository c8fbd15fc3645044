//! Read-side operations.

use crate::engine::invalid;
use crate::{MenuState, ReactionRoleEngine, ReactionRoleMessage};
use derive_getters::Getters;
use rolecall_core::{ChannelId, Emote, GuildId, LimitId, MenuKind, MessageId, RoleId, Rrid};
use rolecall_error::{ReactionRoleErrorKind, RolecallResult};
use serde::Serialize;
use std::fmt;
use tracing::instrument;

/// One line of a guild's message listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct MessageSummary {
    /// 1-based position, oldest first
    index: usize,
    /// Message id
    rrid: Rrid,
    /// Custom or full
    kind: MenuKind,
    /// Lifecycle position
    #[serde(skip)]
    state: MenuState,
    /// Full menu title
    name: Option<String>,
    /// Bound channel
    channel: Option<ChannelId>,
    /// Bound posted message
    message: Option<MessageId>,
    /// Number of usable pairs
    pair_count: usize,
    /// Shared limit and its cap
    limit: Option<(LimitId, u32)>,
    /// Pairs whose role outranks the bot
    blocked: Vec<(Emote, RoleId)>,
}

impl fmt::Display for MessageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} [{}] {}", self.index, self.kind, self.state)?;
        if let Some(name) = &self.name {
            write!(f, " \"{name}\"")?;
        }
        write!(f, ", {} pair(s)", self.pair_count)?;
        if let Some(channel) = self.channel {
            write!(f, ", in <#{channel}>")?;
        }
        if let Some((_, cap)) = self.limit {
            write!(f, ", limit {cap}")?;
        }
        if !self.blocked.is_empty() {
            let blocked: Vec<String> = self
                .blocked
                .iter()
                .map(|(emote, role)| format!("{emote} <@&{role}>"))
                .collect();
            write!(f, ", blocked: {}", blocked.join(", "))?;
        }
        Ok(())
    }
}

impl ReactionRoleEngine {
    /// A message as it stands after reconciling it with the guild.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn get_message(
        &self,
        guild: GuildId,
        index: Option<usize>,
    ) -> RolecallResult<ReactionRoleMessage> {
        let _gate = self.guild_gates.acquire(guild).await;
        let snapshot = self.snapshot(guild).await?;
        let (_, rrid) = self.resolve(guild, index).await?;
        self.sync_entity(rrid, &snapshot)
            .await?
            .ok_or_else(|| invalid(ReactionRoleErrorKind::NoMessages))
    }

    /// Every message of a guild, oldest first.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn list_messages(&self, guild: GuildId) -> RolecallResult<Vec<MessageSummary>> {
        let _gate = self.guild_gates.acquire(guild).await;
        let snapshot = self.snapshot(guild).await?;
        let records = self.store.list_messages(guild).await?;

        let mut summaries = Vec::with_capacity(records.len());
        for (position, record) in records.into_iter().enumerate() {
            let Some(entity) = self.sync_entity(record.id, &snapshot).await? else {
                continue;
            };
            let limit = match *entity.limit() {
                Some(id) => self
                    .state
                    .lock()
                    .await
                    .limits
                    .get(id)
                    .map(|limit| (id, limit.cap)),
                None => None,
            };
            summaries.push(summarize(position + 1, &entity, limit));
        }
        Ok(summaries)
    }
}

fn summarize(
    index: usize,
    entity: &ReactionRoleMessage,
    limit: Option<(LimitId, u32)>,
) -> MessageSummary {
    MessageSummary {
        index,
        rrid: *entity.rrid(),
        kind: entity.kind().menu_kind(),
        state: entity.state(),
        name: match entity.kind() {
            crate::MessageKind::Full(menu) => menu.name().clone(),
            crate::MessageKind::Custom => None,
        },
        channel: *entity.channel(),
        message: *entity.message(),
        pair_count: entity.pairs().len(),
        limit,
        blocked: entity
            .blocked_pairs()
            .map(|pair| (pair.emote().clone(), *pair.role()))
            .collect(),
    }
}
