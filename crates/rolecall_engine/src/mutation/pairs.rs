//! Emote-role pairs.

use super::{check_length, guild_emote, parse_emote};
use crate::engine::invalid;
use crate::ReactionRoleEngine;
use rolecall_core::{GuildId, MAX_PAIR_DESCRIPTION_LEN, MAX_PAIRS_PER_MESSAGE, PairRecord, RoleId};
use rolecall_error::{ReactionRoleErrorKind, RolecallResult};
use tracing::{info, instrument};

impl ReactionRoleEngine {
    /// Bind an emote to a role. Descriptions are only accepted on full
    /// menus.
    #[instrument(skip(self, description), fields(guild_id = %guild, role_id = %role))]
    pub async fn add_pair(
        &self,
        guild: GuildId,
        index: Option<usize>,
        emote: &str,
        role: RoleId,
        description: Option<String>,
    ) -> RolecallResult<()> {
        let editing = self.begin(guild, index).await?;
        let emote = guild_emote(&editing.guild, emote)?;

        if role == editing.guild.everyone_role() {
            return Err(invalid(ReactionRoleErrorKind::RoleNotAssignable(role.get())));
        }
        if !editing.guild.has_role(role) {
            return Err(invalid(ReactionRoleErrorKind::RoleNotFound(role.get())));
        }
        if description.is_some() {
            editing.require_full()?;
            check_length(
                "pair description",
                description.as_deref(),
                MAX_PAIR_DESCRIPTION_LEN,
            )?;
        }
        if editing.raw.pairs.len() >= MAX_PAIRS_PER_MESSAGE {
            return Err(invalid(ReactionRoleErrorKind::TooManyPairs(
                MAX_PAIRS_PER_MESSAGE,
            )));
        }
        if editing.find_pair(&emote).is_some() {
            return Err(invalid(ReactionRoleErrorKind::DuplicateEmote(
                emote.to_string(),
            )));
        }
        if editing
            .raw
            .pairs
            .iter()
            .any(|pair| pair.record.role_id == role)
        {
            return Err(invalid(ReactionRoleErrorKind::DuplicateRole(role.get())));
        }

        let order_index = editing
            .raw
            .pairs
            .iter()
            .map(|pair| pair.record.order_index)
            .max()
            .map_or(0, |max| max + 1);
        let record = self
            .store
            .insert_pair(editing.rrid, &emote.to_string(), role, order_index)
            .await?;
        if let Some(description) = description.as_deref() {
            self.store
                .set_pair_description(record.id, Some(description))
                .await?;
        }
        self.commit(&editing).await?;

        info!(rrid = %editing.rrid, pair_id = %record.id, %emote, "Added emote-role pair");
        Ok(())
    }

    /// Remove the pair using an emote, clearing its reactions from a posted
    /// message.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn remove_pair(
        &self,
        guild: GuildId,
        index: Option<usize>,
        emote: &str,
    ) -> RolecallResult<()> {
        let editing = self.begin(guild, index).await?;
        let emote = parse_emote(emote)?;
        let pair = editing.pair(&emote)?.record.id;

        self.store.delete_pair(pair).await?;
        self.commit(&editing).await?;

        info!(rrid = %editing.rrid, pair_id = %pair, "Removed emote-role pair");
        Ok(())
    }

    /// Replace the emote of a pair, keeping its role and restrictions.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn relabel_pair(
        &self,
        guild: GuildId,
        index: Option<usize>,
        from: &str,
        to: &str,
    ) -> RolecallResult<()> {
        let editing = self.begin(guild, index).await?;
        let from = parse_emote(from)?;
        let to = guild_emote(&editing.guild, to)?;
        let pair = editing.pair(&from)?.record.id;

        if from == to {
            return Ok(());
        }
        if editing.find_pair(&to).is_some() {
            return Err(invalid(ReactionRoleErrorKind::DuplicateEmote(
                to.to_string(),
            )));
        }

        self.store.update_pair_emote(pair, &to.to_string()).await?;
        self.commit(&editing).await?;

        info!(rrid = %editing.rrid, pair_id = %pair, %from, %to, "Relabeled emote-role pair");
        Ok(())
    }

    /// Set or clear the line shown next to a pair in a full menu.
    #[instrument(skip(self, description), fields(guild_id = %guild))]
    pub async fn set_pair_description(
        &self,
        guild: GuildId,
        index: Option<usize>,
        emote: &str,
        description: Option<String>,
    ) -> RolecallResult<()> {
        let editing = self.begin(guild, index).await?;
        editing.require_full()?;
        check_length(
            "pair description",
            description.as_deref(),
            MAX_PAIR_DESCRIPTION_LEN,
        )?;
        let emote = parse_emote(emote)?;
        let pair = editing.pair(&emote)?.record.id;

        self.store
            .set_pair_description(pair, description.as_deref())
            .await?;
        self.commit(&editing).await?;
        Ok(())
    }

    /// Swap the display positions of two pairs.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn swap_pairs(
        &self,
        guild: GuildId,
        index: Option<usize>,
        first: &str,
        second: &str,
    ) -> RolecallResult<()> {
        let editing = self.begin(guild, index).await?;
        let first = editing.pair(&parse_emote(first)?)?.record.id;
        let second = editing.pair(&parse_emote(second)?)?.record.id;
        if first == second {
            return Ok(());
        }

        // Renumber densely so swapping works even when priorities tie.
        let mut order: Vec<&PairRecord> =
            editing.raw.pairs.iter().map(|pair| &pair.record).collect();
        let a = order.iter().position(|pair| pair.id == first);
        let b = order.iter().position(|pair| pair.id == second);
        if let (Some(a), Some(b)) = (a, b) {
            order.swap(a, b);
        }
        for (position, pair) in order.into_iter().enumerate() {
            let position = position as i32;
            if pair.order_index != position {
                self.store.set_pair_order(pair.id, position).await?;
            }
        }
        self.commit(&editing).await?;
        Ok(())
    }
}

