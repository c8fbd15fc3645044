//! [`GuildGateway`] over Discord's HTTP API.

use crate::conversions::{gateway_error, menu_embed, reaction_type};
use async_trait::async_trait;
use rolecall_core::{
    ChannelId, EmojiId, Emote, GuildId, GuildSnapshot, MenuContent, MessageId, RoleId, RoleInfo,
    UserId,
};
use rolecall_error::GatewayResult;
use rolecall_interface::{GuildGateway, Lookup};
use serenity::all::{
    CreateMessage, EditMessage, Http, PermissionOverwrite, PermissionOverwriteType, Permissions,
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Audit log reason attached to role changes.
const AUDIT_REASON: &str = "Reaction role";

fn guild_id(id: GuildId) -> serenity::all::GuildId {
    serenity::all::GuildId::new(id.get())
}

fn channel_id(id: ChannelId) -> serenity::all::ChannelId {
    serenity::all::ChannelId::new(id.get())
}

fn message_id(id: MessageId) -> serenity::all::MessageId {
    serenity::all::MessageId::new(id.get())
}

fn user_id(id: UserId) -> serenity::all::UserId {
    serenity::all::UserId::new(id.get())
}

fn role_id(id: RoleId) -> serenity::all::RoleId {
    serenity::all::RoleId::new(id.get())
}

/// Discord as seen by the engine.
///
/// Holds the HTTP client and the bot's own user id; all reads go to the
/// API so the engine always validates against current state.
#[derive(Clone)]
pub struct SerenityGateway {
    http: Arc<Http>,
    bot_user: UserId,
}

impl std::fmt::Debug for SerenityGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerenityGateway")
            .field("bot_user", &self.bot_user)
            .finish_non_exhaustive()
    }
}

impl SerenityGateway {
    /// Create a gateway for the bot `bot_user`.
    pub fn new(http: Arc<Http>, bot_user: UserId) -> Self {
        Self { http, bot_user }
    }

    /// Resolve the bot's own user id from the token.
    #[instrument(skip(http))]
    pub async fn for_current_user(http: Arc<Http>) -> GatewayResult<Self> {
        let me = http
            .get_current_user()
            .await
            .map_err(|e| gateway_error(e, "current user"))?;
        debug!(bot_id = %me.id, bot_name = %me.name, "Resolved bot user");
        Ok(Self::new(http, UserId::new(me.id.get())))
    }

    async fn fetch_guild(&self, guild: GuildId) -> GatewayResult<GuildSnapshot> {
        let id = guild_id(guild);
        let target = format!("guild {guild}");
        let partial = self
            .http
            .get_guild(id)
            .await
            .map_err(|e| gateway_error(e, &target))?;
        let channels = self
            .http
            .get_channels(id)
            .await
            .map_err(|e| gateway_error(e, &target))?;
        let me = self
            .http
            .get_member(id, user_id(self.bot_user))
            .await
            .map_err(|e| gateway_error(e, &target))?;

        let bot_top_position = me
            .roles
            .iter()
            .filter_map(|role| partial.roles.get(role))
            .map(|role| role.position)
            .max()
            .unwrap_or(0);

        let mut snapshot = GuildSnapshot::new(guild, bot_top_position);
        for channel in &channels {
            snapshot = snapshot.with_channel(ChannelId::new(channel.id.get()));
        }
        for role in partial.roles.values() {
            snapshot = snapshot.with_role(RoleInfo::new(
                RoleId::new(role.id.get()),
                role.name.clone(),
                role.position,
            ));
        }
        for emoji in partial.emojis.keys() {
            snapshot = snapshot.with_emoji(EmojiId::new(emoji.get()));
        }
        Ok(snapshot)
    }
}

#[async_trait]
impl GuildGateway for SerenityGateway {
    fn bot_user(&self) -> UserId {
        self.bot_user
    }

    #[instrument(skip(self), fields(guild_id = %guild))]
    async fn guild(&self, guild: GuildId) -> Lookup<GuildSnapshot> {
        Lookup::from_result(self.fetch_guild(guild).await)
    }

    #[instrument(skip(self), fields(channel_id = %channel, message_id = %message))]
    async fn message_exists(&self, channel: ChannelId, message: MessageId) -> Lookup<()> {
        Lookup::from_result(
            self.http
                .get_message(channel_id(channel), message_id(message))
                .await
                .map(|_| ())
                .map_err(|e| gateway_error(e, format!("message {message}"))),
        )
    }

    #[instrument(skip(self), fields(guild_id = %guild, user_id = %user))]
    async fn member_roles(&self, guild: GuildId, user: UserId) -> Lookup<Vec<RoleId>> {
        Lookup::from_result(
            self.http
                .get_member(guild_id(guild), user_id(user))
                .await
                .map(|member| {
                    member
                        .roles
                        .iter()
                        .map(|role| RoleId::new(role.get()))
                        .collect()
                })
                .map_err(|e| gateway_error(e, format!("member {user}"))),
        )
    }

    #[instrument(skip(self), fields(guild_id = %guild, user_id = %user, role_id = %role))]
    async fn grant_role(&self, guild: GuildId, user: UserId, role: RoleId) -> GatewayResult<()> {
        self.http
            .add_member_role(guild_id(guild), user_id(user), role_id(role), Some(AUDIT_REASON))
            .await
            .map_err(|e| gateway_error(e, format!("role {role}")))
    }

    #[instrument(skip(self), fields(guild_id = %guild, user_id = %user, role_id = %role))]
    async fn revoke_role(&self, guild: GuildId, user: UserId, role: RoleId) -> GatewayResult<()> {
        self.http
            .remove_member_role(guild_id(guild), user_id(user), role_id(role), Some(AUDIT_REASON))
            .await
            .map_err(|e| gateway_error(e, format!("role {role}")))
    }

    #[instrument(skip(self, menu), fields(channel_id = %channel))]
    async fn send_menu(&self, channel: ChannelId, menu: &MenuContent) -> GatewayResult<MessageId> {
        let sent = channel_id(channel)
            .send_message(self.http.as_ref(), CreateMessage::new().embed(menu_embed(menu)))
            .await
            .map_err(|e| gateway_error(e, format!("channel {channel}")))?;
        Ok(MessageId::new(sent.id.get()))
    }

    #[instrument(skip(self, menu), fields(channel_id = %channel, message_id = %message))]
    async fn edit_menu(
        &self,
        channel: ChannelId,
        message: MessageId,
        menu: &MenuContent,
    ) -> GatewayResult<()> {
        channel_id(channel)
            .edit_message(
                self.http.as_ref(),
                message_id(message),
                EditMessage::new().embed(menu_embed(menu)),
            )
            .await
            .map(|_| ())
            .map_err(|e| gateway_error(e, format!("message {message}")))
    }

    #[instrument(skip(self), fields(channel_id = %channel, message_id = %message))]
    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> GatewayResult<()> {
        self.http
            .delete_message(channel_id(channel), message_id(message), None)
            .await
            .map_err(|e| gateway_error(e, format!("message {message}")))
    }

    #[instrument(skip(self), fields(channel_id = %channel, message_id = %message, %emote))]
    async fn add_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        emote: &Emote,
    ) -> GatewayResult<()> {
        self.http
            .create_reaction(channel_id(channel), message_id(message), &reaction_type(emote))
            .await
            .map_err(|e| gateway_error(e, format!("reaction {emote}")))
    }

    #[instrument(skip(self), fields(channel_id = %channel, message_id = %message, %emote))]
    async fn clear_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        emote: &Emote,
    ) -> GatewayResult<()> {
        self.http
            .delete_message_reaction_emoji(
                channel_id(channel),
                message_id(message),
                &reaction_type(emote),
            )
            .await
            .map_err(|e| gateway_error(e, format!("reaction {emote}")))
    }

    #[instrument(skip(self), fields(guild_id = %guild, channel_id = %channel))]
    async fn restrict_reactions(&self, guild: GuildId, channel: ChannelId) -> GatewayResult<()> {
        let target = channel_id(channel);
        let everyone = PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::ADD_REACTIONS,
            kind: PermissionOverwriteType::Role(serenity::all::RoleId::new(guild.get())),
        };
        let bot = PermissionOverwrite {
            allow: Permissions::ADD_REACTIONS,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Member(user_id(self.bot_user)),
        };

        // Allow the bot first so it never loses the permission mid-update.
        target
            .create_permission(&self.http, bot)
            .await
            .map_err(|e| gateway_error(e, format!("channel {channel}")))?;
        target
            .create_permission(&self.http, everyone)
            .await
            .map_err(|e| gateway_error(e, format!("channel {channel}")))
    }
}
