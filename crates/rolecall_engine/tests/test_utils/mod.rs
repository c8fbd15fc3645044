//! Test utilities for engine tests.
//!
//! This module provides in-memory implementations of the store and gateway
//! traits plus a fixture guild.

#![allow(dead_code)]

pub mod memory_store;
pub mod mock_gateway;

#[allow(unused_imports)]
pub use memory_store::MemoryStore;
#[allow(unused_imports)]
pub use mock_gateway::MockGateway;

use rolecall_core::{
    ChannelId, Emote, EmojiId, EngineEvent, GuildId, GuildSnapshot, MenuKind, MessageId,
    ReactionAction, ReactionEvent, RoleId, RoleInfo, UserId,
};
use rolecall_engine::{EngineSettings, EventOutcome, ReactionRoleEngine};
use rolecall_error::{ReactionRoleErrorKind, RolecallResult};
use std::sync::Arc;

pub const GUILD: GuildId = GuildId::new(1_000);
pub const CHANNEL: ChannelId = ChannelId::new(2_000);
pub const OTHER_CHANNEL: ChannelId = ChannelId::new(2_001);

pub const BOT: UserId = UserId::new(9);
pub const MEMBER: UserId = UserId::new(42);

pub const RED: RoleId = RoleId::new(300);
pub const BLUE: RoleId = RoleId::new(301);
pub const GREEN: RoleId = RoleId::new(302);
pub const YELLOW: RoleId = RoleId::new(303);
pub const VIP: RoleId = RoleId::new(310);
pub const MUTED: RoleId = RoleId::new(311);
/// Sits above the bot's highest role.
pub const ADMIN: RoleId = RoleId::new(399);

/// A custom emote uploaded to the fixture guild.
pub const PARTY: EmojiId = EmojiId::new(777);
pub const PARTY_EMOTE: &str = "<:party:777>";
/// A custom emote from some other guild.
pub const FOREIGN_EMOTE: &str = "<:elsewhere:888>";

/// Position of the bot's highest role.
pub const BOT_TOP: u16 = 10;

/// The fixture guild.
pub fn guild_snapshot() -> GuildSnapshot {
    guild_with_channels(&[CHANNEL, OTHER_CHANNEL])
}

/// The fixture guild with only some of its channels.
pub fn guild_with_channels(channels: &[ChannelId]) -> GuildSnapshot {
    channels
        .iter()
        .fold(GuildSnapshot::new(GUILD, BOT_TOP), |guild, channel| {
            guild.with_channel(*channel)
        })
        .with_role(RoleInfo::new(RoleId::new(GUILD.get()), "@everyone", 0))
        .with_role(RoleInfo::new(RED, "red", 1))
        .with_role(RoleInfo::new(BLUE, "blue", 2))
        .with_role(RoleInfo::new(GREEN, "green", 3))
        .with_role(RoleInfo::new(YELLOW, "yellow", 4))
        .with_role(RoleInfo::new(VIP, "vip", 5))
        .with_role(RoleInfo::new(MUTED, "muted", 6))
        .with_role(RoleInfo::new(ADMIN, "admin", 50))
        .with_emoji(PARTY)
}

/// The fixture guild plus `count` low-ranked roles starting at id 5000.
pub fn guild_with_extra_roles(count: u64) -> GuildSnapshot {
    (0..count).fold(guild_snapshot(), |guild, offset| {
        guild.with_role(RoleInfo::new(extra_role(offset), format!("extra-{offset}"), 1))
    })
}

/// The `offset`-th extra role.
pub fn extra_role(offset: u64) -> RoleId {
    RoleId::new(5_000 + offset)
}

/// A distinct unicode emoji per offset.
pub fn numbered_emote(offset: u32) -> String {
    char::from_u32(0x1F600 + offset)
        .expect("emoji code point")
        .to_string()
}

/// The configuration error a call failed with.
pub fn config_error<T: std::fmt::Debug>(result: RolecallResult<T>) -> ReactionRoleErrorKind {
    result
        .expect_err("expected a configuration error")
        .configuration()
        .cloned()
        .expect("error should be a configuration error")
}

/// Engine wired to in-memory collaborators.
pub struct Harness {
    pub engine: ReactionRoleEngine,
    pub store: Arc<MemoryStore>,
    pub gateway: Arc<MockGateway>,
}

/// A harness over the fixture guild with default settings.
pub fn harness() -> Harness {
    harness_with(EngineSettings::default())
}

/// A harness over the fixture guild.
pub fn harness_with(settings: EngineSettings) -> Harness {
    let store = Arc::new(MemoryStore::default());
    let gateway = Arc::new(MockGateway::new(BOT).with_guild(guild_snapshot()));
    let engine = ReactionRoleEngine::new(store.clone(), gateway.clone(), settings);
    Harness {
        engine,
        store,
        gateway,
    }
}

impl Harness {
    /// React as `user`, letting the engine fetch member roles.
    pub async fn react(
        &self,
        message: MessageId,
        emote: &str,
        user: UserId,
        action: ReactionAction,
    ) -> EventOutcome {
        let event = EngineEvent::Reaction(ReactionEvent {
            guild_id: GUILD,
            channel_id: CHANNEL,
            message_id: message,
            user_id: user,
            emote: Emote::parse(emote).expect("test emote"),
            action,
            member_roles: None,
        });
        self.engine.handle_event(event).await
    }

    /// Shorthand for adding a reaction as [`MEMBER`].
    pub async fn add(&self, message: MessageId, emote: &str) -> EventOutcome {
        self.react(message, emote, MEMBER, ReactionAction::Added).await
    }

    /// Shorthand for removing a reaction as [`MEMBER`].
    pub async fn remove(&self, message: MessageId, emote: &str) -> EventOutcome {
        self.react(message, emote, MEMBER, ReactionAction::Removed)
            .await
    }
}

impl Harness {
    /// Create a custom message with pairs and bind it to a freshly posted
    /// message in [`CHANNEL`].
    pub async fn custom_menu(
        &self,
        message: MessageId,
        pairs: &[(&str, RoleId)],
    ) -> RolecallResult<()> {
        self.engine.create_message(GUILD, MenuKind::Custom).await?;
        for (emote, role) in pairs {
            self.engine
                .add_pair(GUILD, None, emote, *role, None)
                .await?;
        }
        self.gateway.post_message(CHANNEL, message);
        self.engine
            .set_target_message(GUILD, None, CHANNEL, message)
            .await
    }

    /// Create a full menu with pairs and display it in [`CHANNEL`].
    pub async fn full_menu(&self, pairs: &[(&str, RoleId)]) -> RolecallResult<MessageId> {
        self.engine.create_message(GUILD, MenuKind::Full).await?;
        for (emote, role) in pairs {
            self.engine
                .add_pair(GUILD, None, emote, *role, None)
                .await?;
        }
        self.engine.display(GUILD, None, Some(CHANNEL)).await
    }
}
