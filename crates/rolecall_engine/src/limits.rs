//! Shared role-grant caps.
//!
//! A limit caps how many of the roles offered by its participating
//! messages one member may hold at once. Only displayed participants count:
//! a message nobody can react to offers nothing.

use crate::DispatchTable;
use rolecall_core::{LimitId, LimitRecord, RoleId, Rrid};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Cached limits, keyed by id.
#[derive(Debug, Default)]
pub struct LimitTracker {
    limits: HashMap<LimitId, LimitRecord>,
}

impl LimitTracker {
    /// Replace the cached copy of a limit with what the store returned.
    /// Missing or participant-less limits are pruned.
    pub fn replace(&mut self, id: LimitId, record: Option<LimitRecord>) {
        match record {
            Some(record) if !record.participants.is_empty() => {
                self.limits.insert(id, record);
            }
            _ => {
                self.limits.remove(&id);
            }
        }
    }

    /// The cached copy of a limit.
    pub fn get(&self, id: LimitId) -> Option<&LimitRecord> {
        self.limits.get(&id)
    }

    /// Drop deleted messages from every limit, pruning emptied limits.
    pub fn forget_messages(&mut self, rrids: &HashSet<Rrid>) {
        for record in self.limits.values_mut() {
            record.participants.retain(|rrid| !rrids.contains(rrid));
        }
        self.limits.retain(|_, record| !record.participants.is_empty());
    }

    /// Cap and offered roles of a limit as they stand right now.
    pub fn snapshot(&self, id: LimitId, dispatch: &DispatchTable) -> Option<LimitSnapshot> {
        let record = self.limits.get(&id)?;
        let offered = record
            .participants
            .iter()
            .filter_map(|rrid| dispatch.entity(*rrid))
            .flat_map(|entity| entity.offered_roles())
            .collect();
        Some(LimitSnapshot {
            cap: record.cap,
            offered,
        })
    }

    /// Whether a member already holds as many limited roles as allowed.
    pub fn limit_reached(
        &self,
        id: LimitId,
        dispatch: &DispatchTable,
        member_roles: &HashSet<RoleId>,
    ) -> bool {
        self.snapshot(id, dispatch)
            .is_some_and(|snapshot| snapshot.reached(member_roles))
    }

    /// Number of cached limits.
    pub fn len(&self) -> usize {
        self.limits.len()
    }

    /// Whether no limit is cached.
    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}

/// A limit copied out of the tracker for one decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitSnapshot {
    cap: u32,
    offered: BTreeSet<RoleId>,
}

impl LimitSnapshot {
    /// Build a snapshot directly.
    pub fn new(cap: u32, offered: impl IntoIterator<Item = RoleId>) -> Self {
        Self {
            cap,
            offered: offered.into_iter().collect(),
        }
    }

    /// Distinct limited roles the member holds.
    pub fn held(&self, member_roles: &HashSet<RoleId>) -> usize {
        self.offered
            .iter()
            .filter(|role| member_roles.contains(role))
            .count()
    }

    /// Whether the member is at (or above) the cap.
    pub fn reached(&self, member_roles: &HashSet<RoleId>) -> bool {
        self.held(member_roles) >= self.cap as usize
    }
}
