//! Targets and posting.

use crate::engine::invalid;
use crate::{MessageKind, ReactionRoleEngine, ReactionRoleMessage, menu_content};
use rolecall_core::{ChannelId, Emote, GuildId, MessageId};
use rolecall_error::{ReactionRoleErrorKind, RolecallResult};
use rolecall_interface::Lookup;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

impl ReactionRoleEngine {
    /// Choose the channel a full menu is posted in. A menu already posted
    /// elsewhere is deleted and must be displayed again.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn set_channel(
        &self,
        guild: GuildId,
        index: Option<usize>,
        channel: ChannelId,
    ) -> RolecallResult<()> {
        let editing = self.begin(guild, index).await?;
        editing.require_full()?;
        if !editing.guild.has_channel(channel) {
            return Err(invalid(ReactionRoleErrorKind::ChannelNotFound(channel.get())));
        }
        if *editing.before.channel() == Some(channel) {
            return Ok(());
        }

        if let Some((old_channel, message)) = editing.before.binding() {
            self.discard_menu(old_channel, message).await;
        }
        self.store
            .set_binding(editing.rrid, Some(channel), None)
            .await?;
        self.commit(&editing).await?;
        Ok(())
    }

    /// Attach a custom message to a message somebody else posted. The
    /// message goes live immediately and the bot reacts with every
    /// grantable emote.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn set_target_message(
        &self,
        guild: GuildId,
        index: Option<usize>,
        channel: ChannelId,
        message: MessageId,
    ) -> RolecallResult<()> {
        let editing = self.begin(guild, index).await?;
        editing.require_custom()?;
        if !editing.guild.has_channel(channel) {
            return Err(invalid(ReactionRoleErrorKind::ChannelNotFound(channel.get())));
        }
        match self.gateway.message_exists(channel, message).await {
            Lookup::Found(()) => {}
            Lookup::Missing => {
                return Err(invalid(ReactionRoleErrorKind::TargetMessageNotFound(
                    message.get(),
                )));
            }
            Lookup::Unavailable(err) => return Err(err.into()),
        }
        let bound = self.store.find_by_bound_message(message).await?;
        if bound.is_some_and(|bound| bound.id != editing.rrid) {
            return Err(invalid(ReactionRoleErrorKind::MessageAlreadyBound(
                message.get(),
            )));
        }

        self.store
            .set_binding(editing.rrid, Some(channel), Some(message))
            .await?;
        self.commit(&editing).await?;
        info!(rrid = %editing.rrid, message_id = %message, "Bound custom reaction-role message");
        Ok(())
    }

    /// Make a message live.
    ///
    /// Custom messages get the bot's reactions on their target message.
    /// Full menus are rendered into `channel` (or the configured channel):
    /// an existing menu in that channel is edited in place, one in another
    /// channel is deleted and a new one posted. Returns the posted message.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn display(
        &self,
        guild: GuildId,
        index: Option<usize>,
        channel: Option<ChannelId>,
    ) -> RolecallResult<MessageId> {
        let editing = self.begin(guild, index).await?;
        let entity = &editing.before;
        if entity.pairs().is_empty() {
            return Err(invalid(ReactionRoleErrorKind::NoPairs));
        }

        if let MessageKind::Custom = entity.kind() {
            let (channel, message) = entity
                .binding()
                .ok_or_else(|| invalid(ReactionRoleErrorKind::NoTargetMessage))?;
            self.attach_reactions(channel, message, entity).await?;
            return Ok(message);
        }

        let target = channel
            .or(*entity.channel())
            .ok_or_else(|| invalid(ReactionRoleErrorKind::NoChannel))?;
        if !editing.guild.has_channel(target) {
            return Err(invalid(ReactionRoleErrorKind::ChannelNotFound(target.get())));
        }
        let content = menu_content(entity)
            .ok_or_else(|| invalid(ReactionRoleErrorKind::WrongKind("full")))?;

        let edited = match entity.binding() {
            Some((bound, message)) if bound == target => {
                match self.gateway.edit_menu(bound, message, &content).await {
                    Ok(()) => Some(message),
                    Err(err) if err.is_not_found() => None,
                    Err(err) => return Err(err.into()),
                }
            }
            Some((bound, message)) => {
                self.discard_menu(bound, message).await;
                None
            }
            None => None,
        };

        let message = match edited {
            Some(message) => message,
            None => {
                let message = self.gateway.send_menu(target, &content).await?;
                self.store
                    .set_binding(editing.rrid, Some(target), Some(message))
                    .await?;
                if *self.settings.restrict_reactions() {
                    if let Err(err) = self.gateway.restrict_reactions(guild, target).await {
                        warn!(channel_id = %target, error = %err, "Could not restrict reactions");
                    }
                }
                info!(rrid = %editing.rrid, channel_id = %target, message_id = %message, "Posted menu");
                message
            }
        };

        let after = self
            .sync_entity(editing.rrid, &editing.guild)
            .await?
            .ok_or_else(|| invalid(ReactionRoleErrorKind::NoMessages))?;
        self.attach_reactions(target, message, &after).await?;
        Ok(message)
    }

    /// React with every grantable emote.
    async fn attach_reactions(
        &self,
        channel: ChannelId,
        message: MessageId,
        entity: &ReactionRoleMessage,
    ) -> RolecallResult<()> {
        for pair in entity.pairs().iter().filter(|pair| !pair.blocked()) {
            self.gateway
                .add_reaction(channel, message, pair.emote())
                .await?;
        }
        Ok(())
    }

    /// Best-effort delete of a menu the bot posted.
    pub(crate) async fn discard_menu(&self, channel: ChannelId, message: MessageId) {
        match self.gateway.delete_message(channel, message).await {
            Ok(()) => debug!(channel_id = %channel, message_id = %message, "Deleted old menu"),
            Err(err) if err.is_not_found() => {}
            Err(err) => {
                warn!(channel_id = %channel, message_id = %message, error = %err, "Could not delete old menu")
            }
        }
    }

    /// Bring a posted message in line with a changed entity: re-render full
    /// menus, clear reactions of removed pairs and react with newly
    /// grantable emotes.
    pub(crate) async fn render_changes(
        &self,
        before: Option<&ReactionRoleMessage>,
        after: Option<&ReactionRoleMessage>,
    ) -> RolecallResult<()> {
        let Some(after) = after else {
            return Ok(());
        };
        let Some((channel, message)) = after.binding() else {
            return Ok(());
        };
        // A different posted message starts from scratch.
        let before = before.filter(|before| before.binding() == after.binding());

        if let Some(content) = menu_content(after) {
            if before.and_then(menu_content).as_ref() != Some(&content) {
                self.gateway.edit_menu(channel, message, &content).await?;
            }
        }

        let remaining: HashSet<&Emote> = after.pairs().iter().map(|pair| pair.emote()).collect();
        let was_active: HashSet<&Emote> = before
            .into_iter()
            .flat_map(|before| before.pairs().iter())
            .filter(|pair| !pair.blocked())
            .map(|pair| pair.emote())
            .collect();

        if let Some(before) = before {
            for pair in before.pairs() {
                if !remaining.contains(pair.emote()) {
                    self.gateway
                        .clear_reaction(channel, message, pair.emote())
                        .await?;
                }
            }
        }
        for pair in after.pairs().iter().filter(|pair| !pair.blocked()) {
            if !was_active.contains(pair.emote()) {
                self.gateway
                    .add_reaction(channel, message, pair.emote())
                    .await?;
            }
        }
        Ok(())
    }
}
