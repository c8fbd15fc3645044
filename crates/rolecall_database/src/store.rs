//! PostgreSQL implementation of [`ReactionRoleStore`].

use crate::models::{
    ExtraRow, LimitRow, MessageRow, NewGlobalRestriction, NewLimit, NewMessage, NewPair,
    NewPairExtra, NewPairRestriction, NewParticipant, PairRow, restriction,
};
use crate::schema::{
    emote_role_pairs, emote_role_pairs_extra, global_role_restrictions, limit_participants,
    limits, reaction_role_messages, reaction_role_messages_extra, role_restrictions,
};
use crate::{PgPool, create_pool};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use rolecall_core::{
    ChannelId, GuildId, LimitId, LimitRecord, MenuKind, MessageExtra, MessageId, MessageRecord,
    PairId, PairRecord, RestrictionRecord, RestrictionScope, RoleId, Rrid,
};
use rolecall_error::{DatabaseError, DatabaseErrorKind};
use rolecall_interface::{ReactionRoleStore, StoreResult};
use tracing::{debug, instrument};

/// Reaction-role configuration stored in Postgres.
///
/// Diesel is synchronous, so every operation checks a connection out of an
/// r2d2 pool and runs on tokio's blocking thread pool. Multi-statement
/// operations run in a transaction.
///
/// # Example
///
/// ```no_run
/// use rolecall_database::PgReactionRoleStore;
///
/// // Requires DATABASE_URL=postgresql://localhost/rolecall in environment
/// let store = PgReactionRoleStore::connect(4).expect("Failed to connect");
/// ```
#[derive(Debug, Clone)]
pub struct PgReactionRoleStore {
    pool: PgPool,
}

impl PgReactionRoleStore {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a pool of `pool_size` connections to `DATABASE_URL`.
    pub fn connect(pool_size: u32) -> StoreResult<Self> {
        Ok(Self::new(create_pool(pool_size)?))
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn run<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            op(&mut conn)
        })
        .await
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Task(e.to_string())))?
    }
}

/// Remove a message from its limit, deleting the limit once nobody uses it.
fn leave_limit(conn: &mut PgConnection, rrid: i64) -> StoreResult<Option<LimitId>> {
    let limit: Option<i64> = diesel::delete(limit_participants::table.find(rrid))
        .returning(limit_participants::limit_id)
        .get_result(conn)
        .optional()?;
    diesel::update(reaction_role_messages::table.find(rrid))
        .set(reaction_role_messages::limit_id.eq(None::<i64>))
        .execute(conn)?;

    if let Some(limit) = limit {
        let remaining: i64 = limit_participants::table
            .filter(limit_participants::limit_id.eq(limit))
            .count()
            .get_result(conn)?;
        if remaining == 0 {
            diesel::delete(limits::table.find(limit)).execute(conn)?;
            debug!(limit_id = limit, "Deleted unused limit");
        }
    }
    Ok(limit.map(LimitId::new))
}

fn load_messages(
    conn: &mut PgConnection,
    query: reaction_role_messages::BoxedQuery<'static, diesel::pg::Pg>,
) -> StoreResult<Vec<MessageRecord>> {
    let rows = query
        .order(reaction_role_messages::id.asc())
        .select(MessageRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(MessageRecord::from).collect())
}

#[async_trait]
impl ReactionRoleStore for PgReactionRoleStore {
    // ========================================================================
    // Messages
    // ========================================================================

    #[instrument(skip(self), fields(guild_id = %guild))]
    async fn list_messages(&self, guild: GuildId) -> StoreResult<Vec<MessageRecord>> {
        let guild = guild.to_db();
        self.run(move |conn| {
            load_messages(
                conn,
                reaction_role_messages::table
                    .filter(reaction_role_messages::guild_id.eq(guild))
                    .into_boxed(),
            )
        })
        .await
    }

    #[instrument(skip(self), fields(rrid = %rrid))]
    async fn get_message(&self, rrid: Rrid) -> StoreResult<Option<MessageRecord>> {
        let rrid = rrid.get();
        self.run(move |conn| {
            let row = reaction_role_messages::table
                .find(rrid)
                .select(MessageRow::as_select())
                .first(conn)
                .optional()?;
            Ok(row.map(MessageRecord::from))
        })
        .await
    }

    #[instrument(skip(self), fields(message_id = %message))]
    async fn find_by_bound_message(
        &self,
        message: MessageId,
    ) -> StoreResult<Option<MessageRecord>> {
        let message = message.to_db();
        self.run(move |conn| {
            let row = reaction_role_messages::table
                .filter(reaction_role_messages::message_id.eq(message))
                .select(MessageRow::as_select())
                .first(conn)
                .optional()?;
            Ok(row.map(MessageRecord::from))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn list_bound_messages(&self) -> StoreResult<Vec<MessageRecord>> {
        self.run(|conn| {
            load_messages(
                conn,
                reaction_role_messages::table
                    .filter(reaction_role_messages::channel_id.is_not_null())
                    .filter(reaction_role_messages::message_id.is_not_null())
                    .into_boxed(),
            )
        })
        .await
    }

    #[instrument(skip(self), fields(guild_id = %guild, %kind))]
    async fn create_message(&self, guild: GuildId, kind: MenuKind) -> StoreResult<MessageRecord> {
        let new = NewMessage {
            guild_id: guild.to_db(),
            is_custom: kind.is_custom(),
        };
        self.run(move |conn| {
            conn.transaction::<_, DatabaseError, _>(|conn| {
                let row = diesel::insert_into(reaction_role_messages::table)
                    .values(&new)
                    .returning(MessageRow::as_returning())
                    .get_result(conn)?;
                if kind == MenuKind::Full {
                    diesel::insert_into(reaction_role_messages_extra::table)
                        .values(&ExtraRow::from(&MessageExtra::empty(Rrid::new(row.id))))
                        .execute(conn)?;
                }
                Ok(MessageRecord::from(row))
            })
        })
        .await
    }

    #[instrument(skip(self), fields(rrid = %rrid))]
    async fn delete_message(&self, rrid: Rrid) -> StoreResult<()> {
        let rrid = rrid.get();
        self.run(move |conn| {
            conn.transaction::<_, DatabaseError, _>(|conn| {
                leave_limit(conn, rrid)?;
                diesel::delete(reaction_role_messages::table.find(rrid)).execute(conn)?;
                Ok(())
            })
        })
        .await
    }

    #[instrument(skip(self), fields(guild_id = %guild))]
    async fn delete_guild(&self, guild: GuildId) -> StoreResult<u64> {
        let guild = guild.to_db();
        self.run(move |conn| {
            conn.transaction::<_, DatabaseError, _>(|conn| {
                let rrids: Vec<i64> = reaction_role_messages::table
                    .filter(reaction_role_messages::guild_id.eq(guild))
                    .select(reaction_role_messages::id)
                    .load(conn)?;
                for rrid in &rrids {
                    leave_limit(conn, *rrid)?;
                }
                let removed = diesel::delete(
                    reaction_role_messages::table
                        .filter(reaction_role_messages::guild_id.eq(guild)),
                )
                .execute(conn)?;
                Ok(removed as u64)
            })
        })
        .await
    }

    #[instrument(skip(self), fields(rrid = %rrid))]
    async fn set_binding(
        &self,
        rrid: Rrid,
        channel: Option<ChannelId>,
        message: Option<MessageId>,
    ) -> StoreResult<()> {
        let rrid = rrid.get();
        let channel = channel.map(ChannelId::to_db);
        let message = message.map(MessageId::to_db);
        self.run(move |conn| {
            diesel::update(reaction_role_messages::table.find(rrid))
                .set((
                    reaction_role_messages::channel_id.eq(channel),
                    reaction_role_messages::message_id.eq(message),
                ))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self), fields(channel_id = %channel))]
    async fn clear_channel_bindings(&self, channel: ChannelId) -> StoreResult<u64> {
        let channel = channel.to_db();
        self.run(move |conn| {
            let cleared = diesel::update(
                reaction_role_messages::table
                    .filter(reaction_role_messages::channel_id.eq(channel)),
            )
            .set((
                reaction_role_messages::channel_id.eq(None::<i64>),
                reaction_role_messages::message_id.eq(None::<i64>),
            ))
            .execute(conn)?;
            Ok(cleared as u64)
        })
        .await
    }

    #[instrument(skip(self), fields(message_id = %message))]
    async fn clear_message_bindings(&self, message: MessageId) -> StoreResult<u64> {
        let message = message.to_db();
        self.run(move |conn| {
            let cleared = diesel::update(
                reaction_role_messages::table
                    .filter(reaction_role_messages::message_id.eq(message)),
            )
            .set(reaction_role_messages::message_id.eq(None::<i64>))
            .execute(conn)?;
            Ok(cleared as u64)
        })
        .await
    }

    #[instrument(skip(self), fields(rrid = %rrid, %kind))]
    async fn set_kind(&self, rrid: Rrid, kind: MenuKind) -> StoreResult<()> {
        let rrid = rrid.get();
        self.run(move |conn| {
            conn.transaction::<_, DatabaseError, _>(|conn| {
                diesel::update(reaction_role_messages::table.find(rrid))
                    .set(reaction_role_messages::is_custom.eq(kind.is_custom()))
                    .execute(conn)?;
                match kind {
                    MenuKind::Custom => {
                        diesel::delete(reaction_role_messages_extra::table.find(rrid))
                            .execute(conn)?;
                        let pairs = emote_role_pairs::table
                            .filter(emote_role_pairs::message_id.eq(rrid))
                            .select(emote_role_pairs::id);
                        diesel::delete(
                            emote_role_pairs_extra::table
                                .filter(emote_role_pairs_extra::pair_id.eq_any(pairs)),
                        )
                        .execute(conn)?;
                    }
                    MenuKind::Full => {
                        diesel::insert_into(reaction_role_messages_extra::table)
                            .values(&ExtraRow::from(&MessageExtra::empty(Rrid::new(rrid))))
                            .on_conflict_do_nothing()
                            .execute(conn)?;
                    }
                }
                Ok(())
            })
        })
        .await
    }

    #[instrument(skip(self), fields(rrid = %rrid))]
    async fn get_extra(&self, rrid: Rrid) -> StoreResult<Option<MessageExtra>> {
        let rrid = rrid.get();
        self.run(move |conn| {
            let row = reaction_role_messages_extra::table
                .find(rrid)
                .select(ExtraRow::as_select())
                .first(conn)
                .optional()?;
            Ok(row.map(MessageExtra::from))
        })
        .await
    }

    #[instrument(skip(self, extra), fields(rrid = %extra.id))]
    async fn upsert_extra(&self, extra: &MessageExtra) -> StoreResult<()> {
        let row = ExtraRow::from(extra);
        self.run(move |conn| {
            diesel::insert_into(reaction_role_messages_extra::table)
                .values(&row)
                .on_conflict(reaction_role_messages_extra::id)
                .do_update()
                .set(&row)
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    // ========================================================================
    // Pairs
    // ========================================================================

    #[instrument(skip(self), fields(rrid = %rrid))]
    async fn list_pairs(&self, rrid: Rrid) -> StoreResult<Vec<PairRecord>> {
        let rrid = rrid.get();
        self.run(move |conn| {
            let rows: Vec<(PairRow, Option<String>)> = emote_role_pairs::table
                .left_join(emote_role_pairs_extra::table)
                .filter(emote_role_pairs::message_id.eq(rrid))
                .order((
                    emote_role_pairs::order_index.asc(),
                    emote_role_pairs::id.asc(),
                ))
                .select((
                    PairRow::as_select(),
                    emote_role_pairs_extra::description.nullable(),
                ))
                .load(conn)?;
            Ok(rows
                .into_iter()
                .map(|(row, description)| row.into_record(description))
                .collect())
        })
        .await
    }

    #[instrument(skip(self), fields(rrid = %rrid, role_id = %role))]
    async fn insert_pair(
        &self,
        rrid: Rrid,
        emote: &str,
        role: RoleId,
        order_index: i32,
    ) -> StoreResult<PairRecord> {
        let rrid = rrid.get();
        let emote = emote.to_string();
        let role = role.to_db();
        self.run(move |conn| {
            let row = diesel::insert_into(emote_role_pairs::table)
                .values(&NewPair {
                    message_id: rrid,
                    emote: &emote,
                    role_id: role,
                    order_index,
                })
                .returning(PairRow::as_returning())
                .get_result(conn)?;
            Ok(row.into_record(None))
        })
        .await
    }

    #[instrument(skip(self), fields(pair_id = %pair))]
    async fn delete_pair(&self, pair: PairId) -> StoreResult<()> {
        let pair = pair.get();
        self.run(move |conn| {
            diesel::delete(emote_role_pairs::table.find(pair)).execute(conn)?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self), fields(pair_id = %pair))]
    async fn update_pair_emote(&self, pair: PairId, emote: &str) -> StoreResult<()> {
        let pair = pair.get();
        let emote = emote.to_string();
        self.run(move |conn| {
            diesel::update(emote_role_pairs::table.find(pair))
                .set(emote_role_pairs::emote.eq(emote))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self), fields(pair_id = %pair))]
    async fn set_pair_order(&self, pair: PairId, order_index: i32) -> StoreResult<()> {
        let pair = pair.get();
        self.run(move |conn| {
            diesel::update(emote_role_pairs::table.find(pair))
                .set(emote_role_pairs::order_index.eq(order_index))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self, description), fields(pair_id = %pair))]
    async fn set_pair_description(
        &self,
        pair: PairId,
        description: Option<&str>,
    ) -> StoreResult<()> {
        let pair = pair.get();
        let description = description.map(str::to_string);
        self.run(move |conn| {
            match description {
                Some(description) => {
                    diesel::insert_into(emote_role_pairs_extra::table)
                        .values(&NewPairExtra {
                            pair_id: pair,
                            description: Some(&description),
                        })
                        .on_conflict(emote_role_pairs_extra::pair_id)
                        .do_update()
                        .set(emote_role_pairs_extra::description.eq(&description))
                        .execute(conn)?;
                }
                None => {
                    diesel::delete(emote_role_pairs_extra::table.find(pair)).execute(conn)?;
                }
            }
            Ok(())
        })
        .await
    }

    #[instrument(skip(self), fields(guild_id = %guild, role_id = %role))]
    async fn delete_pairs_for_role(&self, guild: GuildId, role: RoleId) -> StoreResult<u64> {
        let guild = guild.to_db();
        let role = role.to_db();
        self.run(move |conn| {
            let messages = reaction_role_messages::table
                .filter(reaction_role_messages::guild_id.eq(guild))
                .select(reaction_role_messages::id);
            let removed = diesel::delete(
                emote_role_pairs::table
                    .filter(emote_role_pairs::role_id.eq(role))
                    .filter(emote_role_pairs::message_id.eq_any(messages)),
            )
            .execute(conn)?;
            Ok(removed as u64)
        })
        .await
    }

    // ========================================================================
    // Restrictions
    // ========================================================================

    #[instrument(skip(self))]
    async fn list_restrictions(
        &self,
        scope: RestrictionScope,
    ) -> StoreResult<Vec<RestrictionRecord>> {
        self.run(move |conn| {
            let rows: Vec<(i64, bool)> = match scope {
                RestrictionScope::Global(rrid) => global_role_restrictions::table
                    .filter(global_role_restrictions::message_id.eq(rrid.get()))
                    .order(global_role_restrictions::role_id.asc())
                    .select((
                        global_role_restrictions::role_id,
                        global_role_restrictions::is_allowed,
                    ))
                    .load(conn)?,
                RestrictionScope::Pair(pair) => role_restrictions::table
                    .filter(role_restrictions::pair_id.eq(pair.get()))
                    .order(role_restrictions::role_id.asc())
                    .select((role_restrictions::role_id, role_restrictions::is_allowed))
                    .load(conn)?,
            };
            Ok(rows.into_iter().map(restriction).collect())
        })
        .await
    }

    #[instrument(skip(self), fields(role_id = %role))]
    async fn add_restriction(
        &self,
        scope: RestrictionScope,
        role: RoleId,
        allowed: bool,
    ) -> StoreResult<()> {
        let role = role.to_db();
        self.run(move |conn| {
            match scope {
                RestrictionScope::Global(rrid) => {
                    diesel::insert_into(global_role_restrictions::table)
                        .values(&NewGlobalRestriction {
                            message_id: rrid.get(),
                            role_id: role,
                            is_allowed: allowed,
                        })
                        .execute(conn)?;
                }
                RestrictionScope::Pair(pair) => {
                    diesel::insert_into(role_restrictions::table)
                        .values(&NewPairRestriction {
                            pair_id: pair.get(),
                            role_id: role,
                            is_allowed: allowed,
                        })
                        .execute(conn)?;
                }
            }
            Ok(())
        })
        .await
    }

    #[instrument(skip(self), fields(role_id = %role))]
    async fn remove_restriction(&self, scope: RestrictionScope, role: RoleId) -> StoreResult<bool> {
        let role = role.to_db();
        self.run(move |conn| {
            let removed = match scope {
                RestrictionScope::Global(rrid) => {
                    diesel::delete(global_role_restrictions::table.find((rrid.get(), role)))
                        .execute(conn)?
                }
                RestrictionScope::Pair(pair) => {
                    diesel::delete(role_restrictions::table.find((pair.get(), role)))
                        .execute(conn)?
                }
            };
            Ok(removed > 0)
        })
        .await
    }

    #[instrument(skip(self), fields(guild_id = %guild, role_id = %role))]
    async fn delete_restrictions_for_role(
        &self,
        guild: GuildId,
        role: RoleId,
    ) -> StoreResult<u64> {
        let guild = guild.to_db();
        let role = role.to_db();
        self.run(move |conn| {
            conn.transaction::<_, DatabaseError, _>(|conn| {
                let pairs = emote_role_pairs::table
                    .inner_join(reaction_role_messages::table)
                    .filter(reaction_role_messages::guild_id.eq(guild))
                    .select(emote_role_pairs::id);
                let pair_scoped = diesel::delete(
                    role_restrictions::table
                        .filter(role_restrictions::role_id.eq(role))
                        .filter(role_restrictions::pair_id.eq_any(pairs)),
                )
                .execute(conn)?;

                let messages = reaction_role_messages::table
                    .filter(reaction_role_messages::guild_id.eq(guild))
                    .select(reaction_role_messages::id);
                let global = diesel::delete(
                    global_role_restrictions::table
                        .filter(global_role_restrictions::role_id.eq(role))
                        .filter(global_role_restrictions::message_id.eq_any(messages)),
                )
                .execute(conn)?;
                Ok((pair_scoped + global) as u64)
            })
        })
        .await
    }

    // ========================================================================
    // Limits
    // ========================================================================

    #[instrument(skip(self), fields(limit_id = %limit))]
    async fn get_limit(&self, limit: LimitId) -> StoreResult<Option<LimitRecord>> {
        let limit = limit.get();
        self.run(move |conn| {
            let Some(row) = limits::table
                .find(limit)
                .select(LimitRow::as_select())
                .first(conn)
                .optional()?
            else {
                return Ok(None);
            };
            let participants: Vec<i64> = limit_participants::table
                .filter(limit_participants::limit_id.eq(limit))
                .order(limit_participants::message_id.asc())
                .select(limit_participants::message_id)
                .load(conn)?;
            Ok(Some(LimitRecord {
                id: LimitId::new(row.id),
                cap: u32::try_from(row.cap).unwrap_or(1),
                participants: participants.into_iter().map(Rrid::new).collect(),
            }))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn create_limit(&self, cap: u32) -> StoreResult<LimitId> {
        let cap = i32::try_from(cap).unwrap_or(i32::MAX);
        self.run(move |conn| {
            let id = diesel::insert_into(limits::table)
                .values(&NewLimit { cap })
                .returning(limits::id)
                .get_result(conn)?;
            Ok(LimitId::new(id))
        })
        .await
    }

    #[instrument(skip(self), fields(limit_id = %limit))]
    async fn set_limit_cap(&self, limit: LimitId, cap: u32) -> StoreResult<()> {
        let limit = limit.get();
        let cap = i32::try_from(cap).unwrap_or(i32::MAX);
        self.run(move |conn| {
            diesel::update(limits::table.find(limit))
                .set(limits::cap.eq(cap))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self), fields(rrid = %rrid, limit_id = %limit))]
    async fn join_limit(&self, rrid: Rrid, limit: LimitId) -> StoreResult<()> {
        let rrid = rrid.get();
        let limit = limit.get();
        self.run(move |conn| {
            conn.transaction::<_, DatabaseError, _>(|conn| {
                diesel::insert_into(limit_participants::table)
                    .values(&NewParticipant {
                        limit_id: limit,
                        message_id: rrid,
                    })
                    .on_conflict(limit_participants::message_id)
                    .do_update()
                    .set(limit_participants::limit_id.eq(limit))
                    .execute(conn)?;
                diesel::update(reaction_role_messages::table.find(rrid))
                    .set(reaction_role_messages::limit_id.eq(Some(limit)))
                    .execute(conn)?;
                Ok(())
            })
        })
        .await
    }

    #[instrument(skip(self), fields(rrid = %rrid))]
    async fn leave_limit(&self, rrid: Rrid) -> StoreResult<Option<LimitId>> {
        let rrid = rrid.get();
        self.run(move |conn| conn.transaction::<_, DatabaseError, _>(|conn| leave_limit(conn, rrid)))
            .await
    }
}
