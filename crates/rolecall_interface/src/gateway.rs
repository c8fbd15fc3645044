//! Live guild state and outbound effects.

use crate::Lookup;
use async_trait::async_trait;
use rolecall_core::{
    ChannelId, Emote, GuildId, GuildSnapshot, MenuContent, MessageId, RoleId, UserId,
};
use rolecall_error::GatewayResult;

/// The chat platform as seen by the engine.
///
/// Implementations must report a definitively missing target as a
/// `NotFound` gateway error (or [`Lookup::Missing`]) and everything else
/// (timeouts, rate limits, permission failures) as some other kind, since
/// only "not found" triggers deletion of stored configuration.
#[async_trait]
pub trait GuildGateway: Send + Sync {
    /// The bot's own user id.
    fn bot_user(&self) -> UserId;

    /// Channels, roles, emotes and the bot's rank in a guild.
    async fn guild(&self, guild: GuildId) -> Lookup<GuildSnapshot>;

    /// Whether a message still exists.
    async fn message_exists(&self, channel: ChannelId, message: MessageId) -> Lookup<()>;

    /// Current roles of a member.
    async fn member_roles(&self, guild: GuildId, user: UserId) -> Lookup<Vec<RoleId>>;

    /// Give a role to a member.
    async fn grant_role(&self, guild: GuildId, user: UserId, role: RoleId) -> GatewayResult<()>;

    /// Take a role from a member.
    async fn revoke_role(&self, guild: GuildId, user: UserId, role: RoleId) -> GatewayResult<()>;

    /// Post a rendered full menu, returning the new message id.
    async fn send_menu(&self, channel: ChannelId, menu: &MenuContent) -> GatewayResult<MessageId>;

    /// Re-render an already posted full menu.
    async fn edit_menu(
        &self,
        channel: ChannelId,
        message: MessageId,
        menu: &MenuContent,
    ) -> GatewayResult<()>;

    /// Delete a message the bot posted.
    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> GatewayResult<()>;

    /// React to a message as the bot.
    async fn add_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        emote: &Emote,
    ) -> GatewayResult<()>;

    /// Remove every reaction using an emote from a message.
    async fn clear_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        emote: &Emote,
    ) -> GatewayResult<()>;

    /// Stop members from adding new reactions in a channel while keeping the
    /// bot able to, so only the menu's emotes can be used.
    async fn restrict_reactions(&self, guild: GuildId, channel: ChannelId) -> GatewayResult<()>;
}
