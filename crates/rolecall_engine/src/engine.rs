//! The reaction-role engine.

use crate::{
    DispatchTable, EngineSettings, Hydrator, KeyedGate, LimitTracker, ReactionRoleMessage,
    Reconciler,
};
use derive_getters::Getters;
use rolecall_core::{GuildId, GuildSnapshot, LimitId, MessageId, MessageRecord, Rrid, UserId};
use rolecall_error::{
    ReactionRoleError, ReactionRoleErrorKind, RolecallError, RolecallErrorKind, RolecallResult,
};
use rolecall_interface::{GuildGateway, Lookup, ReactionRoleStore};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// In-memory caches guarded by one async mutex.
///
/// Held only for in-memory work, never across a store or gateway call.
#[derive(Debug, Default)]
pub(crate) struct EngineState {
    pub(crate) dispatch: DispatchTable,
    pub(crate) limits: LimitTracker,
}

/// Outcome of rebuilding or retrying entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters)]
pub struct RestoreReport {
    /// Entities now live in the dispatch table
    restored: usize,
    /// Entities that lost their binding during reconciliation
    unbound: usize,
    /// Entities queued again because the platform did not answer
    pending: usize,
    /// Guilds whose configuration was deleted
    forgotten_guilds: usize,
}

/// Runs reaction-role menus: routes reactions, keeps the store consistent
/// with the guilds, and applies configuration changes.
///
/// Reaction events are serialized per posted message and mutations per
/// guild. Limited reactions are also serialized per member. All of them
/// share the dispatch table and limit cache.
pub struct ReactionRoleEngine {
    pub(crate) store: Arc<dyn ReactionRoleStore>,
    pub(crate) gateway: Arc<dyn GuildGateway>,
    pub(crate) reconciler: Reconciler,
    pub(crate) settings: EngineSettings,
    pub(crate) state: tokio::sync::Mutex<EngineState>,
    pub(crate) message_gates: KeyedGate<MessageId>,
    pub(crate) guild_gates: KeyedGate<GuildId>,
    pub(crate) member_gates: KeyedGate<(GuildId, UserId)>,
    pending: parking_lot::Mutex<HashSet<Rrid>>,
}

impl ReactionRoleEngine {
    /// Create an engine. Call [`rebuild`](Self::rebuild) before routing
    /// events so displayed menus are live again.
    pub fn new(
        store: Arc<dyn ReactionRoleStore>,
        gateway: Arc<dyn GuildGateway>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            reconciler: Reconciler::new(Arc::clone(&store)),
            store,
            gateway,
            settings,
            state: tokio::sync::Mutex::new(EngineState::default()),
            message_gates: KeyedGate::default(),
            guild_gates: KeyedGate::default(),
            member_gates: KeyedGate::default(),
            pending: parking_lot::Mutex::new(HashSet::new()),
        }
    }

    /// Engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// The entity bound to a posted message, if any.
    pub async fn lookup(&self, message: MessageId) -> Option<ReactionRoleMessage> {
        self.state.lock().await.dispatch.lookup(message).cloned()
    }

    /// Number of displayed messages being routed.
    pub async fn displayed_count(&self) -> usize {
        self.state.lock().await.dispatch.len()
    }

    /// Whether a message's limit is reached for a member.
    pub async fn limit_reached(
        &self,
        limit: LimitId,
        member_roles: &HashSet<rolecall_core::RoleId>,
    ) -> bool {
        let state = self.state.lock().await;
        state.limits.limit_reached(limit, &state.dispatch, member_roles)
    }

    /// Messages waiting for a retry.
    pub fn pending(&self) -> Vec<Rrid> {
        let mut pending: Vec<_> = self.pending.lock().iter().copied().collect();
        pending.sort();
        pending
    }

    /// Rebuild the dispatch table from every persisted binding that still
    /// resolves. Unreachable guilds are queued for [`retry_pending`](Self::retry_pending).
    #[instrument(skip(self))]
    pub async fn rebuild(&self) -> RolecallResult<RestoreReport> {
        let records = self.store.list_bound_messages().await?;
        info!(count = records.len(), "Rebuilding dispatch table");
        let report = self.restore(records).await?;
        info!(?report, "Dispatch table rebuilt");
        Ok(report)
    }

    /// Retry entities whose hydration hit a transport failure.
    #[instrument(skip(self))]
    pub async fn retry_pending(&self) -> RolecallResult<RestoreReport> {
        let rrids: Vec<Rrid> = self.pending.lock().drain().collect();
        if rrids.is_empty() {
            return Ok(RestoreReport::default());
        }
        debug!(count = rrids.len(), "Retrying pending entities");

        let mut records = Vec::with_capacity(rrids.len());
        for rrid in &rrids {
            match self.store.get_message(*rrid).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(err) => {
                    self.queue(rrids.iter().copied());
                    return Err(err.into());
                }
            }
        }
        self.restore(records).await
    }

    async fn restore(&self, records: Vec<MessageRecord>) -> RolecallResult<RestoreReport> {
        let mut by_guild: BTreeMap<GuildId, Vec<Rrid>> = BTreeMap::new();
        for record in records {
            by_guild.entry(record.guild_id).or_default().push(record.id);
        }

        let mut report = RestoreReport::default();
        for (guild, rrids) in by_guild {
            let _gate = self.guild_gates.acquire(guild).await;
            match self.gateway.guild(guild).await {
                Lookup::Missing => {
                    self.forget_guild(guild).await?;
                    report.forgotten_guilds += 1;
                }
                Lookup::Unavailable(err) => {
                    warn!(guild_id = %guild, error = %err, "Guild unavailable, queued for retry");
                    report.pending += rrids.len();
                    self.queue(rrids);
                }
                Lookup::Found(snapshot) => {
                    for rrid in rrids {
                        match self.sync_entity(rrid, &snapshot).await {
                            Ok(Some(entity)) if entity.is_displayed() => report.restored += 1,
                            Ok(_) => report.unbound += 1,
                            Err(err) if matches!(err.kind(), RolecallErrorKind::Gateway(_)) => {
                                report.pending += 1;
                            }
                            Err(err) => return Err(err),
                        }
                    }
                }
            }
        }
        Ok(report)
    }

    /// Live state of a guild. A guild that is gone has its configuration
    /// deleted and is reported to the caller as a configuration error.
    pub(crate) async fn snapshot(&self, guild: GuildId) -> RolecallResult<GuildSnapshot> {
        match self.gateway.guild(guild).await {
            Lookup::Found(snapshot) => Ok(snapshot),
            Lookup::Missing => {
                self.forget_guild(guild).await?;
                Err(invalid(ReactionRoleErrorKind::GuildNotFound))
            }
            Lookup::Unavailable(err) => Err(err.into()),
        }
    }

    /// Delete every message of a guild and drop its runtime entries.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub(crate) async fn forget_guild(&self, guild: GuildId) -> RolecallResult<()> {
        let removed = self.store.delete_guild(guild).await?;

        let mut state = self.state.lock().await;
        let mut rrids = HashSet::new();
        for message in state.dispatch.in_guild(guild) {
            if let Some(entity) = state.dispatch.unregister(message) {
                rrids.insert(*entity.rrid());
            }
        }
        state.limits.forget_messages(&rrids);
        drop(state);

        self.pending.lock().retain(|rrid| !rrids.contains(rrid));
        info!(removed, "Forgot guild configuration");
        Ok(())
    }

    /// Reload one message, hydrate it against `guild`, apply repairs, and
    /// bring the dispatch table and limit cache in line.
    ///
    /// A transport failure while checking the bound message leaves the
    /// existing runtime entry alone and queues the message for retry.
    #[instrument(skip(self, guild), fields(rrid = %rrid, guild_id = %guild.id()))]
    pub(crate) async fn sync_entity(
        &self,
        rrid: Rrid,
        guild: &GuildSnapshot,
    ) -> RolecallResult<Option<ReactionRoleMessage>> {
        let Some(raw) = self.store.load_raw(rrid).await? else {
            self.drop_entity(rrid).await;
            return Ok(None);
        };

        let hydration = match self.hydrator().hydrate(raw, Some(guild)).await {
            Ok(hydration) => hydration,
            Err(err) => {
                warn!(error = %err, "Could not verify bound message, queued for retry");
                self.queue([rrid]);
                return Err(err.into());
            }
        };
        self.reconciler.apply(&hydration.repairs).await?;
        self.pending.lock().remove(&rrid);

        let Some(entity) = hydration.message else {
            self.drop_entity(rrid).await;
            return Ok(None);
        };

        let limit = match *entity.limit() {
            Some(id) => Some((id, self.store.get_limit(id).await?)),
            None => None,
        };

        let mut state = self.state.lock().await;
        match entity.binding() {
            Some((_, message)) => {
                state.dispatch.register(message, entity.clone());
            }
            None => {
                state.dispatch.unregister_rrid(rrid);
            }
        }
        if let Some((id, record)) = limit {
            state.limits.replace(id, record);
        }
        Ok(Some(entity))
    }

    /// Reload a limit into the cache.
    pub(crate) async fn refresh_limit(&self, limit: LimitId) -> RolecallResult<()> {
        let record = self.store.get_limit(limit).await?;
        self.state.lock().await.limits.replace(limit, record);
        Ok(())
    }

    /// Drop a deleted message from the runtime caches.
    pub(crate) async fn drop_entity(&self, rrid: Rrid) {
        let mut state = self.state.lock().await;
        state.dispatch.unregister_rrid(rrid);
        state.limits.forget_messages(&HashSet::from([rrid]));
        drop(state);
        self.pending.lock().remove(&rrid);
    }

    pub(crate) fn queue(&self, rrids: impl IntoIterator<Item = Rrid>) {
        self.pending.lock().extend(rrids);
    }

    pub(crate) fn hydrator(&self) -> Hydrator<'_> {
        Hydrator::new(self.gateway.as_ref(), *self.settings.default_color())
    }
}

/// A caller-facing configuration error.
#[track_caller]
pub(crate) fn invalid(kind: ReactionRoleErrorKind) -> RolecallError {
    ReactionRoleError::new(kind).into()
}
