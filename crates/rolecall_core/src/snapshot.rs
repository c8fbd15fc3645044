//! Snapshots of live guild state.
//!
//! The gateway produces a [`GuildSnapshot`] whenever the engine needs to
//! validate configuration against what currently exists on the platform.

use crate::{ChannelId, EmojiId, GuildId, RoleId};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A role as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RoleInfo {
    /// Role id
    id: RoleId,
    /// Role name
    name: String,
    /// Rank in the role hierarchy; higher outranks lower
    position: u16,
}

impl RoleInfo {
    /// Describe a role.
    pub fn new(id: RoleId, name: impl Into<String>, position: u16) -> Self {
        Self {
            id,
            name: name.into(),
            position,
        }
    }
}

/// Channels, roles and custom emotes of a guild, plus the bot's own rank.
///
/// # Examples
///
/// ```
/// use rolecall_core::{ChannelId, GuildId, GuildSnapshot, RoleId, RoleInfo};
///
/// let guild = GuildSnapshot::new(GuildId::new(1), 5)
///     .with_channel(ChannelId::new(10))
///     .with_role(RoleInfo::new(RoleId::new(20), "member", 2))
///     .with_role(RoleInfo::new(RoleId::new(21), "admin", 9));
///
/// assert!(!guild.outranks_bot(RoleId::new(20)));
/// assert!(guild.outranks_bot(RoleId::new(21)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GuildSnapshot {
    /// Guild id
    id: GuildId,
    /// Text channels that currently exist
    channels: HashSet<ChannelId>,
    /// Roles that currently exist
    roles: HashMap<RoleId, RoleInfo>,
    /// Custom emotes uploaded to the guild
    emojis: HashSet<EmojiId>,
    /// Position of the bot's highest role
    bot_top_position: u16,
}

impl GuildSnapshot {
    /// An empty snapshot of a guild.
    pub fn new(id: GuildId, bot_top_position: u16) -> Self {
        Self {
            id,
            channels: HashSet::new(),
            roles: HashMap::new(),
            emojis: HashSet::new(),
            bot_top_position,
        }
    }

    /// Add a channel.
    pub fn with_channel(mut self, channel: ChannelId) -> Self {
        self.channels.insert(channel);
        self
    }

    /// Add a role.
    pub fn with_role(mut self, role: RoleInfo) -> Self {
        self.roles.insert(role.id, role);
        self
    }

    /// Add a custom emote.
    pub fn with_emoji(mut self, emoji: EmojiId) -> Self {
        self.emojis.insert(emoji);
        self
    }

    /// Whether the channel exists.
    pub fn has_channel(&self, channel: ChannelId) -> bool {
        self.channels.contains(&channel)
    }

    /// Whether the role exists.
    pub fn has_role(&self, role: RoleId) -> bool {
        self.roles.contains_key(&role)
    }

    /// Whether the custom emote belongs to this guild.
    pub fn has_emoji(&self, emoji: EmojiId) -> bool {
        self.emojis.contains(&emoji)
    }

    /// The @everyone role shares the guild's id.
    pub fn everyone_role(&self) -> RoleId {
        RoleId::new(self.id.get())
    }

    /// True when the role sits at or above the bot's highest role, so the
    /// bot cannot grant it.
    pub fn outranks_bot(&self, role: RoleId) -> bool {
        self.roles
            .get(&role)
            .is_some_and(|info| info.position >= self.bot_top_position)
    }
}
