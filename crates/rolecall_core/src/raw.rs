//! Raw configuration model.
//!
//! Plain data decoded from storage rows. Nothing here has been checked
//! against live guild state; see the engine's hydration step for that.

use crate::{ChannelId, GuildId, LimitId, MessageId, PairId, RoleId, Rrid};
use serde::{Deserialize, Serialize};

/// Whether a reaction-role message is rendered by the engine or attached to
/// an externally-authored message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum MenuKind {
    /// Reactions are attached to a message somebody else wrote.
    #[display("custom")]
    Custom,
    /// The engine owns the message and renders name, description and color.
    #[display("full")]
    Full,
}

impl MenuKind {
    /// Decode the `is_custom` column.
    pub fn from_is_custom(is_custom: bool) -> Self {
        if is_custom {
            MenuKind::Custom
        } else {
            MenuKind::Full
        }
    }

    /// Encode for the `is_custom` column.
    pub fn is_custom(self) -> bool {
        matches!(self, MenuKind::Custom)
    }

    /// Lowercase name, used in caller-facing errors.
    pub fn as_str(self) -> &'static str {
        match self {
            MenuKind::Custom => "custom",
            MenuKind::Full => "full",
        }
    }
}

/// A `reaction_role_messages` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Row id
    pub id: Rrid,
    /// Owning guild
    pub guild_id: GuildId,
    /// Channel the message is bound to
    pub channel_id: Option<ChannelId>,
    /// Posted message, once displayed or attached
    pub message_id: Option<MessageId>,
    /// Shared limit the message participates in
    pub limit_id: Option<LimitId>,
    /// Custom or full
    pub kind: MenuKind,
}

/// A `reaction_role_messages_extra` row (full kind only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageExtra {
    /// Row id of the owning message
    pub id: Rrid,
    /// Embed title
    pub name: Option<String>,
    /// Embed body
    pub description: Option<String>,
    /// Embed color, `None` for the configured default
    pub color: Option<u32>,
}

impl MessageExtra {
    /// An extra row with every field unset.
    pub fn empty(id: Rrid) -> Self {
        Self {
            id,
            name: None,
            description: None,
            color: None,
        }
    }
}

/// An `emote_role_pairs` row joined with its optional description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRecord {
    /// Row id
    pub id: PairId,
    /// Owning message
    pub message_id: Rrid,
    /// Emote in storage form
    pub emote: String,
    /// Role granted by the emote
    pub role_id: RoleId,
    /// Display position
    pub order_index: i32,
    /// Text shown next to the pair in full menus
    pub description: Option<String>,
}

impl PairRecord {
    /// Display order: `order_index`, ties broken by creation order.
    pub fn sort_key(&self) -> (i32, PairId) {
        (self.order_index, self.id)
    }
}

/// One allowed or prohibited role, per pair or global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RestrictionRecord {
    /// Restricted role
    pub role_id: RoleId,
    /// `true` when the role is required, `false` when it is prohibited
    pub allowed: bool,
}

/// Which restriction table a restriction lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RestrictionScope {
    /// `global_role_restrictions`, applying to every pair of a message.
    Global(Rrid),
    /// `role_restrictions`, applying to a single pair.
    Pair(PairId),
}

/// A `limits` row with its participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitRecord {
    /// Row id
    pub id: LimitId,
    /// Most limited roles a member may hold
    pub cap: u32,
    /// Messages sharing the limit
    pub participants: Vec<Rrid>,
}

/// A pair together with its restrictions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPair {
    /// The pair row
    pub record: PairRecord,
    /// Pair-level restrictions
    pub restrictions: Vec<RestrictionRecord>,
}

/// Everything stored about one reaction-role message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReactionRoleMessage {
    /// The message row
    pub record: MessageRecord,
    /// Render data, present for full menus
    pub extra: Option<MessageExtra>,
    /// Pairs in display order.
    pub pairs: Vec<RawPair>,
    /// Restrictions applying to every pair
    pub global_restrictions: Vec<RestrictionRecord>,
}
