//! Live message → entity routing.

use crate::ReactionRoleMessage;
use rolecall_core::{ChannelId, GuildId, MessageId, Rrid};
use std::collections::HashMap;

/// Displayed reaction-role messages keyed by the posted message they are
/// bound to.
///
/// An RRID is bound to at most one posted message at a time.
#[derive(Debug, Default)]
pub struct DispatchTable {
    entries: HashMap<MessageId, ReactionRoleMessage>,
    by_rrid: HashMap<Rrid, MessageId>,
}

impl DispatchTable {
    /// Bind a posted message to an entity, dropping any binding the same
    /// RRID had to a different message. Returns the dropped message.
    pub fn register(
        &mut self,
        message: MessageId,
        entity: ReactionRoleMessage,
    ) -> Option<MessageId> {
        let rrid = *entity.rrid();
        let previous = self
            .by_rrid
            .insert(rrid, message)
            .filter(|previous| *previous != message);
        if let Some(previous) = previous {
            self.entries.remove(&previous);
        }
        if let Some(displaced) = self.entries.insert(message, entity) {
            // Another RRID pointed at this message; it no longer does.
            if *displaced.rrid() != rrid {
                self.by_rrid.remove(displaced.rrid());
            }
        }
        previous
    }

    /// Drop the binding of a posted message.
    pub fn unregister(&mut self, message: MessageId) -> Option<ReactionRoleMessage> {
        let entity = self.entries.remove(&message)?;
        self.by_rrid.remove(entity.rrid());
        Some(entity)
    }

    /// Drop whatever binding an RRID has.
    pub fn unregister_rrid(&mut self, rrid: Rrid) -> Option<ReactionRoleMessage> {
        let message = self.by_rrid.remove(&rrid)?;
        self.entries.remove(&message)
    }

    /// The entity bound to a posted message.
    pub fn lookup(&self, message: MessageId) -> Option<&ReactionRoleMessage> {
        self.entries.get(&message)
    }

    /// Mutable access to the entity bound to a posted message.
    pub fn lookup_mut(&mut self, message: MessageId) -> Option<&mut ReactionRoleMessage> {
        self.entries.get_mut(&message)
    }

    /// The displayed entity with an RRID.
    pub fn entity(&self, rrid: Rrid) -> Option<&ReactionRoleMessage> {
        self.by_rrid
            .get(&rrid)
            .and_then(|message| self.entries.get(message))
    }

    /// Posted messages bound by entities of a guild.
    pub fn in_guild(&self, guild: GuildId) -> Vec<MessageId> {
        self.entries
            .iter()
            .filter(|(_, entity)| *entity.guild() == guild)
            .map(|(message, _)| *message)
            .collect()
    }

    /// Posted messages bound inside a channel.
    pub fn in_channel(&self, channel: ChannelId) -> Vec<MessageId> {
        self.entries
            .iter()
            .filter(|(_, entity)| *entity.channel() == Some(channel))
            .map(|(message, _)| *message)
            .collect()
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is displayed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
