//! Row types for the reaction-role tables.
//!
//! Snowflakes are stored as `BIGINT` by reinterpreting their bits; see
//! [`rolecall_core::GuildId::to_db`].

use crate::schema::{
    emote_role_pairs, emote_role_pairs_extra, global_role_restrictions, limit_participants,
    limits, reaction_role_messages, reaction_role_messages_extra, role_restrictions,
};
use diesel::prelude::*;
use rolecall_core::{
    ChannelId, GuildId, LimitId, MenuKind, MessageExtra, MessageId, MessageRecord, PairId,
    PairRecord, RestrictionRecord, RoleId, Rrid,
};

/// Database row for reaction_role_messages table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = reaction_role_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    pub id: i64,
    pub guild_id: i64,
    pub channel_id: Option<i64>,
    pub message_id: Option<i64>,
    pub limit_id: Option<i64>,
    pub is_custom: bool,
}

impl From<MessageRow> for MessageRecord {
    fn from(row: MessageRow) -> Self {
        MessageRecord {
            id: Rrid::new(row.id),
            guild_id: GuildId::from_db(row.guild_id),
            channel_id: row.channel_id.map(ChannelId::from_db),
            message_id: row.message_id.map(MessageId::from_db),
            limit_id: row.limit_id.map(LimitId::new),
            kind: MenuKind::from_is_custom(row.is_custom),
        }
    }
}

/// Insertable struct for reaction_role_messages table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reaction_role_messages)]
pub struct NewMessage {
    pub guild_id: i64,
    pub is_custom: bool,
}

/// Database row for reaction_role_messages_extra table.
///
/// Doubles as the changeset for upserts; `None` clears a column.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = reaction_role_messages_extra)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct ExtraRow {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<i32>,
}

impl From<ExtraRow> for MessageExtra {
    fn from(row: ExtraRow) -> Self {
        MessageExtra {
            id: Rrid::new(row.id),
            name: row.name,
            description: row.description,
            color: row.color.map(|color| color as u32),
        }
    }
}

impl From<&MessageExtra> for ExtraRow {
    fn from(extra: &MessageExtra) -> Self {
        ExtraRow {
            id: extra.id.get(),
            name: extra.name.clone(),
            description: extra.description.clone(),
            // 24-bit RGB always fits.
            color: extra.color.map(|color| color as i32),
        }
    }
}

/// Database row for emote_role_pairs table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = emote_role_pairs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PairRow {
    pub id: i64,
    pub message_id: i64,
    pub emote: String,
    pub role_id: i64,
    pub order_index: i32,
}

impl PairRow {
    /// Combine with the description from emote_role_pairs_extra.
    pub fn into_record(self, description: Option<String>) -> PairRecord {
        PairRecord {
            id: PairId::new(self.id),
            message_id: Rrid::new(self.message_id),
            emote: self.emote,
            role_id: RoleId::from_db(self.role_id),
            order_index: self.order_index,
            description,
        }
    }
}

/// Insertable struct for emote_role_pairs table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = emote_role_pairs)]
pub struct NewPair<'a> {
    pub message_id: i64,
    pub emote: &'a str,
    pub role_id: i64,
    pub order_index: i32,
}

/// Insertable struct for emote_role_pairs_extra table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = emote_role_pairs_extra)]
pub struct NewPairExtra<'a> {
    pub pair_id: i64,
    pub description: Option<&'a str>,
}

/// Insertable struct for role_restrictions table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = role_restrictions)]
pub struct NewPairRestriction {
    pub pair_id: i64,
    pub role_id: i64,
    pub is_allowed: bool,
}

/// Insertable struct for global_role_restrictions table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = global_role_restrictions)]
pub struct NewGlobalRestriction {
    pub message_id: i64,
    pub role_id: i64,
    pub is_allowed: bool,
}

/// Decode a `(role_id, is_allowed)` pair from either restriction table.
pub fn restriction((role_id, is_allowed): (i64, bool)) -> RestrictionRecord {
    RestrictionRecord {
        role_id: RoleId::from_db(role_id),
        allowed: is_allowed,
    }
}

/// Database row for limits table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = limits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LimitRow {
    pub id: i64,
    pub cap: i32,
}

/// Insertable struct for limits table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = limits)]
pub struct NewLimit {
    pub cap: i32,
}

/// Insertable struct for limit_participants table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = limit_participants)]
pub struct NewParticipant {
    pub limit_id: i64,
    pub message_id: i64,
}
