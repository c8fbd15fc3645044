//! In-memory store for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use rolecall_core::{
    ChannelId, GuildId, LimitId, LimitRecord, MenuKind, MessageExtra, MessageId, MessageRecord,
    PairId, PairRecord, RestrictionRecord, RestrictionScope, RoleId, Rrid,
};
use rolecall_interface::{ReactionRoleStore, StoreResult};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    messages: BTreeMap<Rrid, MessageRecord>,
    extras: BTreeMap<Rrid, MessageExtra>,
    pairs: BTreeMap<PairId, PairRecord>,
    pair_restrictions: BTreeMap<(PairId, RoleId), bool>,
    global_restrictions: BTreeMap<(Rrid, RoleId), bool>,
    limits: BTreeMap<LimitId, u32>,
    participants: BTreeMap<Rrid, LimitId>,
}

impl Tables {
    fn next(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn delete_pair(&mut self, pair: PairId) {
        self.pairs.remove(&pair);
        self.pair_restrictions.retain(|(owner, _), _| *owner != pair);
    }

    fn leave_limit(&mut self, rrid: Rrid) -> Option<LimitId> {
        let limit = self.participants.remove(&rrid)?;
        if !self.participants.values().any(|other| *other == limit) {
            self.limits.remove(&limit);
        }
        Some(limit)
    }

    fn delete_message(&mut self, rrid: Rrid) {
        self.leave_limit(rrid);
        self.messages.remove(&rrid);
        self.extras.remove(&rrid);
        let pairs: Vec<PairId> = self
            .pairs
            .values()
            .filter(|pair| pair.message_id == rrid)
            .map(|pair| pair.id)
            .collect();
        for pair in pairs {
            self.delete_pair(pair);
        }
        self.global_restrictions.retain(|(owner, _), _| *owner != rrid);
    }

    fn in_guild(&self, guild: GuildId) -> Vec<Rrid> {
        self.messages
            .values()
            .filter(|record| record.guild_id == guild)
            .map(|record| record.id)
            .collect()
    }

    fn pair_guild(&self, pair: PairId) -> Option<GuildId> {
        let message = self.pairs.get(&pair)?.message_id;
        self.messages.get(&message).map(|record| record.guild_id)
    }
}

/// Store keeping every table in memory and counting writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Number of write operations issued so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of messages stored for a guild.
    pub fn message_count(&self, guild: GuildId) -> usize {
        self.tables.lock().in_guild(guild).len()
    }

    /// Number of limits stored.
    pub fn limit_count(&self) -> usize {
        self.tables.lock().limits.len()
    }

    fn write(&self) -> parking_lot::MutexGuard<'_, Tables> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.tables.lock()
    }
}

#[async_trait]
impl ReactionRoleStore for MemoryStore {
    async fn list_messages(&self, guild: GuildId) -> StoreResult<Vec<MessageRecord>> {
        let tables = self.tables.lock();
        Ok(tables
            .messages
            .values()
            .filter(|record| record.guild_id == guild)
            .cloned()
            .collect())
    }

    async fn get_message(&self, rrid: Rrid) -> StoreResult<Option<MessageRecord>> {
        Ok(self.tables.lock().messages.get(&rrid).cloned())
    }

    async fn find_by_bound_message(
        &self,
        message: MessageId,
    ) -> StoreResult<Option<MessageRecord>> {
        Ok(self
            .tables
            .lock()
            .messages
            .values()
            .find(|record| record.message_id == Some(message))
            .cloned())
    }

    async fn list_bound_messages(&self) -> StoreResult<Vec<MessageRecord>> {
        Ok(self
            .tables
            .lock()
            .messages
            .values()
            .filter(|record| record.channel_id.is_some() && record.message_id.is_some())
            .cloned()
            .collect())
    }

    async fn create_message(&self, guild: GuildId, kind: MenuKind) -> StoreResult<MessageRecord> {
        let mut tables = self.write();
        let id = Rrid::new(tables.next());
        let record = MessageRecord {
            id,
            guild_id: guild,
            channel_id: None,
            message_id: None,
            limit_id: None,
            kind,
        };
        tables.messages.insert(id, record.clone());
        if kind == MenuKind::Full {
            tables.extras.insert(id, MessageExtra::empty(id));
        }
        Ok(record)
    }

    async fn delete_message(&self, rrid: Rrid) -> StoreResult<()> {
        self.write().delete_message(rrid);
        Ok(())
    }

    async fn delete_guild(&self, guild: GuildId) -> StoreResult<u64> {
        let mut tables = self.write();
        let rrids = tables.in_guild(guild);
        for rrid in &rrids {
            tables.delete_message(*rrid);
        }
        Ok(rrids.len() as u64)
    }

    async fn set_binding(
        &self,
        rrid: Rrid,
        channel: Option<ChannelId>,
        message: Option<MessageId>,
    ) -> StoreResult<()> {
        let mut tables = self.write();
        if let Some(record) = tables.messages.get_mut(&rrid) {
            record.channel_id = channel;
            record.message_id = message;
        }
        Ok(())
    }

    async fn clear_channel_bindings(&self, channel: ChannelId) -> StoreResult<u64> {
        let mut tables = self.write();
        let mut cleared = 0;
        for record in tables.messages.values_mut() {
            if record.channel_id == Some(channel) {
                record.channel_id = None;
                record.message_id = None;
                cleared += 1;
            }
        }
        Ok(cleared)
    }

    async fn clear_message_bindings(&self, message: MessageId) -> StoreResult<u64> {
        let mut tables = self.write();
        let mut cleared = 0;
        for record in tables.messages.values_mut() {
            if record.message_id == Some(message) {
                record.message_id = None;
                cleared += 1;
            }
        }
        Ok(cleared)
    }

    async fn set_kind(&self, rrid: Rrid, kind: MenuKind) -> StoreResult<()> {
        let mut tables = self.write();
        if let Some(record) = tables.messages.get_mut(&rrid) {
            record.kind = kind;
        }
        match kind {
            MenuKind::Custom => {
                tables.extras.remove(&rrid);
                for pair in tables.pairs.values_mut() {
                    if pair.message_id == rrid {
                        pair.description = None;
                    }
                }
            }
            MenuKind::Full => {
                tables
                    .extras
                    .entry(rrid)
                    .or_insert_with(|| MessageExtra::empty(rrid));
            }
        }
        Ok(())
    }

    async fn get_extra(&self, rrid: Rrid) -> StoreResult<Option<MessageExtra>> {
        Ok(self.tables.lock().extras.get(&rrid).cloned())
    }

    async fn upsert_extra(&self, extra: &MessageExtra) -> StoreResult<()> {
        self.write().extras.insert(extra.id, extra.clone());
        Ok(())
    }

    async fn list_pairs(&self, rrid: Rrid) -> StoreResult<Vec<PairRecord>> {
        let mut pairs: Vec<PairRecord> = self
            .tables
            .lock()
            .pairs
            .values()
            .filter(|pair| pair.message_id == rrid)
            .cloned()
            .collect();
        pairs.sort_by_key(PairRecord::sort_key);
        Ok(pairs)
    }

    async fn insert_pair(
        &self,
        rrid: Rrid,
        emote: &str,
        role: RoleId,
        order_index: i32,
    ) -> StoreResult<PairRecord> {
        let mut tables = self.write();
        let record = PairRecord {
            id: PairId::new(tables.next()),
            message_id: rrid,
            emote: emote.to_string(),
            role_id: role,
            order_index,
            description: None,
        };
        tables.pairs.insert(record.id, record.clone());
        Ok(record)
    }

    async fn delete_pair(&self, pair: PairId) -> StoreResult<()> {
        self.write().delete_pair(pair);
        Ok(())
    }

    async fn update_pair_emote(&self, pair: PairId, emote: &str) -> StoreResult<()> {
        if let Some(record) = self.write().pairs.get_mut(&pair) {
            record.emote = emote.to_string();
        }
        Ok(())
    }

    async fn set_pair_order(&self, pair: PairId, order_index: i32) -> StoreResult<()> {
        if let Some(record) = self.write().pairs.get_mut(&pair) {
            record.order_index = order_index;
        }
        Ok(())
    }

    async fn set_pair_description(
        &self,
        pair: PairId,
        description: Option<&str>,
    ) -> StoreResult<()> {
        if let Some(record) = self.write().pairs.get_mut(&pair) {
            record.description = description.map(str::to_string);
        }
        Ok(())
    }

    async fn delete_pairs_for_role(&self, guild: GuildId, role: RoleId) -> StoreResult<u64> {
        let mut tables = self.write();
        let doomed: Vec<PairId> = tables
            .pairs
            .values()
            .filter(|pair| pair.role_id == role)
            .map(|pair| pair.id)
            .filter(|pair| tables.pair_guild(*pair) == Some(guild))
            .collect();
        for pair in &doomed {
            tables.delete_pair(*pair);
        }
        Ok(doomed.len() as u64)
    }

    async fn list_restrictions(
        &self,
        scope: RestrictionScope,
    ) -> StoreResult<Vec<RestrictionRecord>> {
        let tables = self.tables.lock();
        let records = match scope {
            RestrictionScope::Global(rrid) => tables
                .global_restrictions
                .iter()
                .filter(|((owner, _), _)| *owner == rrid)
                .map(|((_, role), allowed)| RestrictionRecord {
                    role_id: *role,
                    allowed: *allowed,
                })
                .collect(),
            RestrictionScope::Pair(pair) => tables
                .pair_restrictions
                .iter()
                .filter(|((owner, _), _)| *owner == pair)
                .map(|((_, role), allowed)| RestrictionRecord {
                    role_id: *role,
                    allowed: *allowed,
                })
                .collect(),
        };
        Ok(records)
    }

    async fn add_restriction(
        &self,
        scope: RestrictionScope,
        role: RoleId,
        allowed: bool,
    ) -> StoreResult<()> {
        let mut tables = self.write();
        match scope {
            RestrictionScope::Global(rrid) => {
                tables.global_restrictions.insert((rrid, role), allowed);
            }
            RestrictionScope::Pair(pair) => {
                tables.pair_restrictions.insert((pair, role), allowed);
            }
        }
        Ok(())
    }

    async fn remove_restriction(&self, scope: RestrictionScope, role: RoleId) -> StoreResult<bool> {
        let mut tables = self.write();
        let removed = match scope {
            RestrictionScope::Global(rrid) => tables.global_restrictions.remove(&(rrid, role)),
            RestrictionScope::Pair(pair) => tables.pair_restrictions.remove(&(pair, role)),
        };
        Ok(removed.is_some())
    }

    async fn delete_restrictions_for_role(
        &self,
        guild: GuildId,
        role: RoleId,
    ) -> StoreResult<u64> {
        let mut tables = self.write();
        let in_guild = tables.in_guild(guild);

        let globals: Vec<(Rrid, RoleId)> = tables
            .global_restrictions
            .keys()
            .filter(|(rrid, restricted)| *restricted == role && in_guild.contains(rrid))
            .copied()
            .collect();
        let pairs: Vec<(PairId, RoleId)> = tables
            .pair_restrictions
            .keys()
            .filter(|(pair, restricted)| {
                *restricted == role && tables.pair_guild(*pair) == Some(guild)
            })
            .copied()
            .collect();

        for key in &globals {
            tables.global_restrictions.remove(key);
        }
        for key in &pairs {
            tables.pair_restrictions.remove(key);
        }
        Ok((globals.len() + pairs.len()) as u64)
    }

    async fn get_limit(&self, limit: LimitId) -> StoreResult<Option<LimitRecord>> {
        let tables = self.tables.lock();
        Ok(tables.limits.get(&limit).map(|cap| LimitRecord {
            id: limit,
            cap: *cap,
            participants: tables
                .participants
                .iter()
                .filter(|(_, joined)| **joined == limit)
                .map(|(rrid, _)| *rrid)
                .collect(),
        }))
    }

    async fn create_limit(&self, cap: u32) -> StoreResult<LimitId> {
        let mut tables = self.write();
        let id = LimitId::new(tables.next());
        tables.limits.insert(id, cap);
        Ok(id)
    }

    async fn set_limit_cap(&self, limit: LimitId, cap: u32) -> StoreResult<()> {
        if let Some(current) = self.write().limits.get_mut(&limit) {
            *current = cap;
        }
        Ok(())
    }

    async fn join_limit(&self, rrid: Rrid, limit: LimitId) -> StoreResult<()> {
        let mut tables = self.write();
        tables.participants.insert(rrid, limit);
        if let Some(record) = tables.messages.get_mut(&rrid) {
            record.limit_id = Some(limit);
        }
        Ok(())
    }

    async fn leave_limit(&self, rrid: Rrid) -> StoreResult<Option<LimitId>> {
        let mut tables = self.write();
        let left = tables.leave_limit(rrid);
        if let Some(record) = tables.messages.get_mut(&rrid) {
            record.limit_id = None;
        }
        Ok(left)
    }
}
