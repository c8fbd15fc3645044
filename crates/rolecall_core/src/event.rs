//! Inbound event shapes.
//!
//! The platform adapter translates its gateway events into these and hands
//! them to the engine.

use crate::{ChannelId, Emote, GuildId, MessageId, RoleId, UserId};

/// Whether a reaction was placed or taken away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ReactionAction {
    /// Reaction placed
    #[display("added")]
    Added,
    /// Reaction removed
    #[display("removed")]
    Removed,
}

/// A member reacting on (or un-reacting from) a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    /// Guild the reaction happened in
    pub guild_id: GuildId,
    /// Channel of the reacted message
    pub channel_id: ChannelId,
    /// Reacted message
    pub message_id: MessageId,
    /// Reacting member
    pub user_id: UserId,
    /// Emote reacted with
    pub emote: Emote,
    /// Added or removed
    pub action: ReactionAction,
    /// Member roles when the platform delivered them with the event.
    pub member_roles: Option<Vec<RoleId>>,
}

/// Everything the engine reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Reaction added or removed.
    Reaction(ReactionEvent),
    /// A message was deleted.
    MessageDeleted {
        /// Guild, when the message was in one
        guild_id: Option<GuildId>,
        /// Channel of the deleted message
        channel_id: ChannelId,
        /// Deleted message
        message_id: MessageId,
    },
    /// A channel was deleted.
    ChannelDeleted {
        /// Owning guild
        guild_id: GuildId,
        /// Deleted channel
        channel_id: ChannelId,
    },
    /// A role was deleted.
    RoleDeleted {
        /// Owning guild
        guild_id: GuildId,
        /// Deleted role
        role_id: RoleId,
    },
    /// A role changed, possibly its rank.
    RoleUpdated {
        /// Owning guild
        guild_id: GuildId,
        /// Changed role
        role_id: RoleId,
    },
    /// The bot left (or was removed from) a guild.
    GuildLeft {
        /// Guild the bot is no longer in
        guild_id: GuildId,
    },
    /// A member's roles or profile changed.
    MemberUpdated {
        /// Guild of the membership
        guild_id: GuildId,
        /// Updated member
        user_id: UserId,
    },
}

impl EngineEvent {
    /// Short name for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            EngineEvent::Reaction(_) => "reaction",
            EngineEvent::MessageDeleted { .. } => "message_deleted",
            EngineEvent::ChannelDeleted { .. } => "channel_deleted",
            EngineEvent::RoleDeleted { .. } => "role_deleted",
            EngineEvent::RoleUpdated { .. } => "role_updated",
            EngineEvent::GuildLeft { .. } => "guild_left",
            EngineEvent::MemberUpdated { .. } => "member_updated",
        }
    }
}
