//! Mock platform gateway for testing.
//!
//! Tracks member roles, posted menus and reactions so tests can observe
//! every outbound effect, and can be told to fail like the real platform.

use async_trait::async_trait;
use parking_lot::Mutex;
use rolecall_core::{
    ChannelId, Emote, GuildId, GuildSnapshot, MenuContent, MessageId, RoleId, UserId,
};
use rolecall_error::{GatewayError, GatewayErrorKind, GatewayResult};
use rolecall_interface::{GuildGateway, Lookup};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
struct State {
    guilds: HashMap<GuildId, GuildSnapshot>,
    unavailable: bool,
    messages: HashSet<(ChannelId, MessageId)>,
    members: HashMap<(GuildId, UserId), HashSet<RoleId>>,
    forbidden_roles: HashSet<RoleId>,
    next_message: u64,
    sent: Vec<(ChannelId, MessageId, MenuContent)>,
    edits: Vec<(ChannelId, MessageId, MenuContent)>,
    deleted: Vec<(ChannelId, MessageId)>,
    reactions: Vec<(MessageId, Emote)>,
    cleared: Vec<(MessageId, Emote)>,
    restricted: Vec<ChannelId>,
    grants: Vec<(UserId, RoleId)>,
    revokes: Vec<(UserId, RoleId)>,
}

/// In-memory stand-in for the chat platform.
#[derive(Debug)]
pub struct MockGateway {
    bot: UserId,
    state: Mutex<State>,
}

impl MockGateway {
    /// A platform with no guilds.
    pub fn new(bot: UserId) -> Self {
        Self {
            bot,
            state: Mutex::new(State {
                next_message: 10_000,
                ..State::default()
            }),
        }
    }

    /// Add a guild.
    pub fn with_guild(self, guild: GuildSnapshot) -> Self {
        self.set_guild(guild);
        self
    }

    /// Add or replace a guild.
    pub fn set_guild(&self, guild: GuildSnapshot) {
        self.state.lock().guilds.insert(*guild.id(), guild);
    }

    /// Make a guild disappear.
    pub fn remove_guild(&self, guild: GuildId) {
        self.state.lock().guilds.remove(&guild);
    }

    /// Make every read answer with a transport failure.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unavailable = unavailable;
    }

    /// Post a message somebody else wrote.
    pub fn post_message(&self, channel: ChannelId, message: MessageId) {
        self.state.lock().messages.insert((channel, message));
    }

    /// Delete a message behind the engine's back.
    pub fn remove_message(&self, channel: ChannelId, message: MessageId) {
        self.state.lock().messages.remove(&(channel, message));
    }

    /// Add a member with roles.
    pub fn set_member(&self, guild: GuildId, user: UserId, roles: &[RoleId]) {
        self.state
            .lock()
            .members
            .insert((guild, user), roles.iter().copied().collect());
    }

    /// Current roles of a member.
    pub fn roles_of(&self, guild: GuildId, user: UserId) -> HashSet<RoleId> {
        self.state
            .lock()
            .members
            .get(&(guild, user))
            .cloned()
            .unwrap_or_default()
    }

    /// Make granting a role fail with a permission error.
    pub fn forbid_role(&self, role: RoleId) {
        self.state.lock().forbidden_roles.insert(role);
    }

    /// Menus posted so far.
    pub fn sent(&self) -> Vec<(ChannelId, MessageId, MenuContent)> {
        self.state.lock().sent.clone()
    }

    /// Menu edits so far.
    pub fn edits(&self) -> Vec<(ChannelId, MessageId, MenuContent)> {
        self.state.lock().edits.clone()
    }

    /// Messages deleted by the bot.
    pub fn deleted(&self) -> Vec<(ChannelId, MessageId)> {
        self.state.lock().deleted.clone()
    }

    /// Reactions added by the bot.
    pub fn reactions(&self) -> Vec<(MessageId, Emote)> {
        self.state.lock().reactions.clone()
    }

    /// Emotes whose reactions were cleared.
    pub fn cleared(&self) -> Vec<(MessageId, Emote)> {
        self.state.lock().cleared.clone()
    }

    /// Channels where member reactions were restricted.
    pub fn restricted(&self) -> Vec<ChannelId> {
        self.state.lock().restricted.clone()
    }

    /// Roles granted so far.
    pub fn grants(&self) -> Vec<(UserId, RoleId)> {
        self.state.lock().grants.clone()
    }

    /// Roles revoked so far.
    pub fn revokes(&self) -> Vec<(UserId, RoleId)> {
        self.state.lock().revokes.clone()
    }

    fn transport() -> GatewayError {
        GatewayError::new(GatewayErrorKind::Transport("mock outage".into()))
    }

    fn not_found(what: impl Into<String>) -> GatewayError {
        GatewayError::new(GatewayErrorKind::NotFound(what.into()))
    }
}

#[async_trait]
impl GuildGateway for MockGateway {
    fn bot_user(&self) -> UserId {
        self.bot
    }

    async fn guild(&self, guild: GuildId) -> Lookup<GuildSnapshot> {
        let state = self.state.lock();
        if state.unavailable {
            return Lookup::Unavailable(Self::transport());
        }
        match state.guilds.get(&guild) {
            Some(snapshot) => Lookup::Found(snapshot.clone()),
            None => Lookup::Missing,
        }
    }

    async fn message_exists(&self, channel: ChannelId, message: MessageId) -> Lookup<()> {
        let state = self.state.lock();
        if state.unavailable {
            Lookup::Unavailable(Self::transport())
        } else if state.messages.contains(&(channel, message)) {
            Lookup::Found(())
        } else {
            Lookup::Missing
        }
    }

    async fn member_roles(&self, guild: GuildId, user: UserId) -> Lookup<Vec<RoleId>> {
        let state = self.state.lock();
        if state.unavailable {
            return Lookup::Unavailable(Self::transport());
        }
        match state.members.get(&(guild, user)) {
            Some(roles) => Lookup::Found(roles.iter().copied().collect()),
            None => Lookup::Missing,
        }
    }

    async fn grant_role(&self, guild: GuildId, user: UserId, role: RoleId) -> GatewayResult<()> {
        let mut state = self.state.lock();
        if state.forbidden_roles.contains(&role) {
            return Err(GatewayError::new(GatewayErrorKind::Forbidden(format!(
                "role {role}"
            ))));
        }
        state.members.entry((guild, user)).or_default().insert(role);
        state.grants.push((user, role));
        Ok(())
    }

    async fn revoke_role(&self, guild: GuildId, user: UserId, role: RoleId) -> GatewayResult<()> {
        let mut state = self.state.lock();
        if let Some(roles) = state.members.get_mut(&(guild, user)) {
            roles.remove(&role);
        }
        state.revokes.push((user, role));
        Ok(())
    }

    async fn send_menu(&self, channel: ChannelId, menu: &MenuContent) -> GatewayResult<MessageId> {
        let mut state = self.state.lock();
        state.next_message += 1;
        let message = MessageId::new(state.next_message);
        state.messages.insert((channel, message));
        state.sent.push((channel, message, menu.clone()));
        Ok(message)
    }

    async fn edit_menu(
        &self,
        channel: ChannelId,
        message: MessageId,
        menu: &MenuContent,
    ) -> GatewayResult<()> {
        let mut state = self.state.lock();
        if !state.messages.contains(&(channel, message)) {
            return Err(Self::not_found(format!("message {message}")));
        }
        state.edits.push((channel, message, menu.clone()));
        Ok(())
    }

    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> GatewayResult<()> {
        let mut state = self.state.lock();
        if !state.messages.remove(&(channel, message)) {
            return Err(Self::not_found(format!("message {message}")));
        }
        state.deleted.push((channel, message));
        Ok(())
    }

    async fn add_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        emote: &Emote,
    ) -> GatewayResult<()> {
        let mut state = self.state.lock();
        if !state.messages.contains(&(channel, message)) {
            return Err(Self::not_found(format!("message {message}")));
        }
        state.reactions.push((message, emote.clone()));
        Ok(())
    }

    async fn clear_reaction(
        &self,
        _channel: ChannelId,
        message: MessageId,
        emote: &Emote,
    ) -> GatewayResult<()> {
        self.state.lock().cleared.push((message, emote.clone()));
        Ok(())
    }

    async fn restrict_reactions(&self, _guild: GuildId, channel: ChannelId) -> GatewayResult<()> {
        self.state.lock().restricted.push(channel);
        Ok(())
    }
}
