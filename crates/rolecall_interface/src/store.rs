//! Persistent configuration store.

use async_trait::async_trait;
use rolecall_core::{
    ChannelId, GuildId, LimitId, LimitRecord, MenuKind, MessageExtra, MessageId, MessageRecord,
    PairId, PairRecord, RawPair, RawReactionRoleMessage, RestrictionRecord, RestrictionScope,
    RoleId, Rrid,
};
use rolecall_error::DatabaseError;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, DatabaseError>;

/// The persistent store for reaction-role configuration.
///
/// Deletes are idempotent: removing something that is already gone is not
/// an error. Deleting a message cascades to its extra row, pairs, pair
/// extras, restrictions and limit participation.
#[async_trait]
pub trait ReactionRoleStore: Send + Sync {
    // ------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------

    /// Messages of a guild, oldest first.
    async fn list_messages(&self, guild: GuildId) -> StoreResult<Vec<MessageRecord>>;

    /// A single message.
    async fn get_message(&self, rrid: Rrid) -> StoreResult<Option<MessageRecord>>;

    /// The message currently bound to a posted message, if any.
    async fn find_by_bound_message(&self, message: MessageId)
    -> StoreResult<Option<MessageRecord>>;

    /// Every message with a bound channel and message.
    async fn list_bound_messages(&self) -> StoreResult<Vec<MessageRecord>>;

    /// Create an empty message; full messages also get an empty extra row.
    async fn create_message(&self, guild: GuildId, kind: MenuKind) -> StoreResult<MessageRecord>;

    /// Delete a message and everything hanging off it.
    async fn delete_message(&self, rrid: Rrid) -> StoreResult<()>;

    /// Delete every message of a guild, returning how many were removed.
    async fn delete_guild(&self, guild: GuildId) -> StoreResult<u64>;

    /// Set (or clear) the channel and message a message is bound to.
    async fn set_binding(
        &self,
        rrid: Rrid,
        channel: Option<ChannelId>,
        message: Option<MessageId>,
    ) -> StoreResult<()>;

    /// Clear channel and message bindings pointing into a channel.
    async fn clear_channel_bindings(&self, channel: ChannelId) -> StoreResult<u64>;

    /// Clear the message binding (keeping the channel) of messages bound to
    /// a posted message.
    async fn clear_message_bindings(&self, message: MessageId) -> StoreResult<u64>;

    /// Switch kind. Full → custom drops the extra row and pair descriptions;
    /// custom → full creates an empty extra row.
    async fn set_kind(&self, rrid: Rrid, kind: MenuKind) -> StoreResult<()>;

    /// The extra row of a full message.
    async fn get_extra(&self, rrid: Rrid) -> StoreResult<Option<MessageExtra>>;

    /// Insert or replace the extra row of a full message.
    async fn upsert_extra(&self, extra: &MessageExtra) -> StoreResult<()>;

    // ------------------------------------------------------------------
    // Pairs
    // ------------------------------------------------------------------

    /// Pairs of a message in display order.
    async fn list_pairs(&self, rrid: Rrid) -> StoreResult<Vec<PairRecord>>;

    /// Add a pair.
    async fn insert_pair(
        &self,
        rrid: Rrid,
        emote: &str,
        role: RoleId,
        order_index: i32,
    ) -> StoreResult<PairRecord>;

    /// Delete a pair with its restrictions and description.
    async fn delete_pair(&self, pair: PairId) -> StoreResult<()>;

    /// Replace the emote of a pair.
    async fn update_pair_emote(&self, pair: PairId, emote: &str) -> StoreResult<()>;

    /// Replace the display priority of a pair.
    async fn set_pair_order(&self, pair: PairId, order_index: i32) -> StoreResult<()>;

    /// Set or clear the description of a pair.
    async fn set_pair_description(&self, pair: PairId, description: Option<&str>)
    -> StoreResult<()>;

    /// Delete every pair of a guild targeting a role.
    async fn delete_pairs_for_role(&self, guild: GuildId, role: RoleId) -> StoreResult<u64>;

    // ------------------------------------------------------------------
    // Restrictions
    // ------------------------------------------------------------------

    /// Restrictions in a scope.
    async fn list_restrictions(&self, scope: RestrictionScope)
    -> StoreResult<Vec<RestrictionRecord>>;

    /// Add a restriction.
    async fn add_restriction(
        &self,
        scope: RestrictionScope,
        role: RoleId,
        allowed: bool,
    ) -> StoreResult<()>;

    /// Remove a restriction, returning whether one was removed.
    async fn remove_restriction(&self, scope: RestrictionScope, role: RoleId)
    -> StoreResult<bool>;

    /// Delete every restriction (pair and global) of a guild naming a role.
    async fn delete_restrictions_for_role(&self, guild: GuildId, role: RoleId)
    -> StoreResult<u64>;

    // ------------------------------------------------------------------
    // Limits
    // ------------------------------------------------------------------

    /// A limit with its participants.
    async fn get_limit(&self, limit: LimitId) -> StoreResult<Option<LimitRecord>>;

    /// Create a limit with no participants.
    async fn create_limit(&self, cap: u32) -> StoreResult<LimitId>;

    /// Change the cap of a limit.
    async fn set_limit_cap(&self, limit: LimitId, cap: u32) -> StoreResult<()>;

    /// Make a message participate in a limit.
    async fn join_limit(&self, rrid: Rrid, limit: LimitId) -> StoreResult<()>;

    /// Remove a message from its limit. The limit itself is deleted once it
    /// has no participants. Returns the limit the message left.
    async fn leave_limit(&self, rrid: Rrid) -> StoreResult<Option<LimitId>>;

    // ------------------------------------------------------------------
    // Composite reads
    // ------------------------------------------------------------------

    /// Everything stored about a message.
    async fn load_raw(&self, rrid: Rrid) -> StoreResult<Option<RawReactionRoleMessage>> {
        let Some(record) = self.get_message(rrid).await? else {
            return Ok(None);
        };

        let extra = match record.kind {
            MenuKind::Full => self.get_extra(rrid).await?,
            MenuKind::Custom => None,
        };

        let mut pairs = Vec::new();
        for pair in self.list_pairs(rrid).await? {
            let restrictions = self.list_restrictions(RestrictionScope::Pair(pair.id)).await?;
            pairs.push(RawPair {
                record: pair,
                restrictions,
            });
        }
        pairs.sort_by_key(|pair| pair.record.sort_key());

        let global_restrictions = self.list_restrictions(RestrictionScope::Global(rrid)).await?;

        Ok(Some(RawReactionRoleMessage {
            record,
            extra,
            pairs,
            global_restrictions,
        }))
    }
}
