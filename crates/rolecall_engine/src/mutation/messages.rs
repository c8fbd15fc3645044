//! Creating, deleting and restyling messages.

use super::check_length;
use crate::engine::invalid;
use crate::{MessageKind, ReactionRoleEngine};
use rolecall_core::{
    GuildId, MAX_MENU_DESCRIPTION_LEN, MAX_MENU_NAME_LEN, MAX_MESSAGES_PER_GUILD, MenuKind,
    MessageExtra, parse_color,
};
use rolecall_error::{ReactionRoleErrorKind, RolecallResult};
use tracing::{info, instrument};

impl ReactionRoleEngine {
    /// Create an empty message, returning its 1-based index.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn create_message(&self, guild: GuildId, kind: MenuKind) -> RolecallResult<usize> {
        let _gate = self.guild_gates.acquire(guild).await;
        self.snapshot(guild).await?;

        let existing = self.store.list_messages(guild).await?.len();
        if existing >= MAX_MESSAGES_PER_GUILD {
            return Err(invalid(ReactionRoleErrorKind::TooManyMessages(
                MAX_MESSAGES_PER_GUILD,
            )));
        }

        let record = self.store.create_message(guild, kind).await?;
        info!(rrid = %record.id, %kind, "Created reaction-role message");
        Ok(existing + 1)
    }

    /// Delete a message with its pairs, restrictions and limit
    /// participation. A posted full menu is deleted too.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn delete_message(&self, guild: GuildId, index: Option<usize>) -> RolecallResult<()> {
        let editing = self.begin(guild, index).await?;

        if let (MessageKind::Full(_), Some((channel, message))) =
            (editing.before.kind(), editing.before.binding())
        {
            self.discard_menu(channel, message).await;
        }

        if let Some(limit) = self.store.leave_limit(editing.rrid).await? {
            self.refresh_limit(limit).await?;
        }
        self.store.delete_message(editing.rrid).await?;
        self.drop_entity(editing.rrid).await;

        info!(rrid = %editing.rrid, "Deleted reaction-role message");
        Ok(())
    }

    /// Switch between custom and full.
    ///
    /// Full → custom discards the rendering data and pair descriptions and
    /// deletes the posted menu. Custom → full keeps the target channel but
    /// drops the borrowed message. Either way the message must be displayed
    /// again.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn set_kind(
        &self,
        guild: GuildId,
        index: Option<usize>,
        kind: MenuKind,
    ) -> RolecallResult<()> {
        let editing = self.begin(guild, index).await?;
        if editing.raw.record.kind == kind {
            return Err(invalid(ReactionRoleErrorKind::AlreadyKind(kind.as_str())));
        }

        match kind {
            MenuKind::Custom => {
                if let Some((channel, message)) = editing.before.binding() {
                    self.discard_menu(channel, message).await;
                }
                if editing.raw.record.channel_id.is_some() {
                    self.store.set_binding(editing.rrid, None, None).await?;
                }
            }
            MenuKind::Full => {
                if editing.raw.record.message_id.is_some() {
                    self.store
                        .set_binding(editing.rrid, *editing.before.channel(), None)
                        .await?;
                }
            }
        }
        self.store.set_kind(editing.rrid, kind).await?;
        self.commit(&editing).await?;

        info!(rrid = %editing.rrid, %kind, "Changed reaction-role message kind");
        Ok(())
    }

    /// Set or clear the title of a full menu.
    #[instrument(skip(self, name), fields(guild_id = %guild))]
    pub async fn set_name(
        &self,
        guild: GuildId,
        index: Option<usize>,
        name: Option<String>,
    ) -> RolecallResult<()> {
        check_length("name", name.as_deref(), MAX_MENU_NAME_LEN)?;
        self.update_extra(guild, index, |extra| extra.name = name)
            .await
    }

    /// Set or clear the body of a full menu.
    #[instrument(skip(self, description), fields(guild_id = %guild))]
    pub async fn set_description(
        &self,
        guild: GuildId,
        index: Option<usize>,
        description: Option<String>,
    ) -> RolecallResult<()> {
        check_length(
            "description",
            description.as_deref(),
            MAX_MENU_DESCRIPTION_LEN,
        )?;
        self.update_extra(guild, index, |extra| extra.description = description)
            .await
    }

    /// Set (`#RRGGBB`) or reset the embed color of a full menu.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn set_color(
        &self,
        guild: GuildId,
        index: Option<usize>,
        color: Option<&str>,
    ) -> RolecallResult<()> {
        let color = color.map(parse_color).transpose()?;
        self.update_extra(guild, index, |extra| extra.color = color)
            .await
    }

    async fn update_extra(
        &self,
        guild: GuildId,
        index: Option<usize>,
        update: impl FnOnce(&mut MessageExtra),
    ) -> RolecallResult<()> {
        let editing = self.begin(guild, index).await?;
        editing.require_full()?;

        let mut extra = editing
            .raw
            .extra
            .clone()
            .unwrap_or_else(|| MessageExtra::empty(editing.rrid));
        update(&mut extra);
        self.store.upsert_extra(&extra).await?;
        self.commit(&editing).await?;
        Ok(())
    }
}
