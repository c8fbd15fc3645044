//! Self-healing store writes.

use crate::Repair;
use rolecall_interface::{ReactionRoleStore, StoreResult};
use std::sync::Arc;
use tracing::{info, instrument};

/// Applies hydration repairs to the store.
///
/// Every repair is a delete or a clear, so applying the same list twice
/// leaves the store as applying it once.
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn ReactionRoleStore>,
}

impl Reconciler {
    /// A reconciler writing to `store`.
    pub fn new(store: Arc<dyn ReactionRoleStore>) -> Self {
        Self { store }
    }

    /// Apply repairs in order.
    #[instrument(skip(self, repairs), fields(count = repairs.len()))]
    pub async fn apply(&self, repairs: &[Repair]) -> StoreResult<()> {
        for repair in repairs {
            info!(?repair, "Reconciling stale configuration");
            match *repair {
                Repair::ForgetGuild(guild) => {
                    self.store.delete_guild(guild).await?;
                }
                Repair::ClearBinding(rrid) => {
                    self.store.set_binding(rrid, None, None).await?;
                }
                Repair::ClearMessage { rrid, channel } => {
                    self.store.set_binding(rrid, Some(channel), None).await?;
                }
                Repair::DropRestriction { scope, role } => {
                    self.store.remove_restriction(scope, role).await?;
                }
                Repair::DeletePair(pair) => {
                    self.store.delete_pair(pair).await?;
                }
            }
        }
        Ok(())
    }
}
