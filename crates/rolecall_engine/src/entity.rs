//! Runtime entity model.
//!
//! Validated, live reaction-role messages. Every reference held here
//! resolved against the guild the last time the entity was hydrated.

use derive_getters::Getters;
use rolecall_core::{
    ChannelId, Emote, GuildId, LimitId, MenuKind, MessageId, PairId, RoleId, Rrid,
};
use std::collections::{BTreeSet, HashSet};

/// Allowed and prohibited roles, for one pair or for a whole message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct RoleRestrictions {
    /// Members must hold at least one of these (when non-empty)
    allowed: BTreeSet<RoleId>,
    /// Members must hold none of these
    prohibited: BTreeSet<RoleId>,
}

impl RoleRestrictions {
    /// Build from explicit sets.
    pub fn new(allowed: BTreeSet<RoleId>, prohibited: BTreeSet<RoleId>) -> Self {
        Self {
            allowed,
            prohibited,
        }
    }

    /// True when the member holds a prohibited role.
    pub fn prohibits(&self, member_roles: &HashSet<RoleId>) -> bool {
        self.prohibited.iter().any(|role| member_roles.contains(role))
    }

    /// True when an allowed list exists and the member holds none of it.
    pub fn lacks_allowed(&self, member_roles: &HashSet<RoleId>) -> bool {
        !self.allowed.is_empty() && !self.allowed.iter().any(|role| member_roles.contains(role))
    }

    /// True when neither check rejects the member.
    pub fn permits(&self, member_roles: &HashSet<RoleId>) -> bool {
        !self.prohibits(member_roles) && !self.lacks_allowed(member_roles)
    }

    /// Whether no restriction is configured.
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty() && self.prohibited.is_empty()
    }

    /// Forget a role from both lists.
    pub fn remove_role(&mut self, role: RoleId) -> bool {
        let allowed = self.allowed.remove(&role);
        let prohibited = self.prohibited.remove(&role);
        allowed || prohibited
    }
}

/// One emote → role binding.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct EmoteRolePair {
    /// Pair id
    id: PairId,
    /// Reaction trigger
    emote: Emote,
    /// Role handed out
    role: RoleId,
    /// Pair-level eligibility
    restrictions: RoleRestrictions,
    /// Menu line text (full kind only)
    description: Option<String>,
    /// The role outranks the bot, so it cannot be granted
    blocked: bool,
}

impl EmoteRolePair {
    /// Assemble a validated pair.
    pub fn new(
        id: PairId,
        emote: Emote,
        role: RoleId,
        restrictions: RoleRestrictions,
        description: Option<String>,
        blocked: bool,
    ) -> Self {
        Self {
            id,
            emote,
            role,
            restrictions,
            description,
            blocked,
        }
    }
}

/// Rendering data owned by full menus.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct FullMenu {
    /// Embed title
    name: Option<String>,
    /// Embed body
    description: Option<String>,
    /// Embed color
    color: u32,
}

impl FullMenu {
    /// Rendering data with explicit fields.
    pub fn new(name: Option<String>, description: Option<String>, color: u32) -> Self {
        Self {
            name,
            description,
            color,
        }
    }
}

/// Custom (externally authored) or full (engine rendered).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    /// Reactions attached to someone else's message
    Custom,
    /// Engine-rendered menu
    Full(FullMenu),
}

impl MessageKind {
    /// The storage flag for this kind.
    pub fn menu_kind(&self) -> MenuKind {
        match self {
            MessageKind::Custom => MenuKind::Custom,
            MessageKind::Full(_) => MenuKind::Full,
        }
    }
}

/// Lifecycle position of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MenuState {
    /// No pairs yet
    #[display("unconfigured")]
    Unconfigured,
    /// Pairs exist but no message is bound
    #[display("undisplayed")]
    Undisplayed,
    /// Bound to a live message
    #[display("displayed")]
    Displayed,
}

/// A validated reaction-role message.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ReactionRoleMessage {
    /// Message id
    rrid: Rrid,
    /// Owning guild
    guild: GuildId,
    /// Bound channel
    channel: Option<ChannelId>,
    /// Bound posted message
    message: Option<MessageId>,
    /// Shared limit
    limit: Option<LimitId>,
    /// Pairs in display order
    pairs: Vec<EmoteRolePair>,
    /// Restrictions applying to every pair
    global: RoleRestrictions,
    /// Custom or full
    kind: MessageKind,
}

impl ReactionRoleMessage {
    /// Assemble a validated message.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rrid: Rrid,
        guild: GuildId,
        channel: Option<ChannelId>,
        message: Option<MessageId>,
        limit: Option<LimitId>,
        pairs: Vec<EmoteRolePair>,
        global: RoleRestrictions,
        kind: MessageKind,
    ) -> Self {
        Self {
            rrid,
            guild,
            channel,
            message,
            limit,
            pairs,
            global,
            kind,
        }
    }

    /// The pair triggered by an emote.
    pub fn pair_for(&self, emote: &Emote) -> Option<&EmoteRolePair> {
        self.pairs.iter().find(|pair| &pair.emote == emote)
    }

    /// Roles this message hands out.
    pub fn offered_roles(&self) -> impl Iterator<Item = RoleId> + '_ {
        self.pairs.iter().map(|pair| pair.role)
    }

    /// The live message, when both channel and message are bound.
    pub fn binding(&self) -> Option<(ChannelId, MessageId)> {
        self.channel.zip(self.message)
    }

    /// Whether the message is bound to a live message.
    pub fn is_displayed(&self) -> bool {
        self.binding().is_some()
    }

    /// Where the message sits in its lifecycle.
    pub fn state(&self) -> MenuState {
        if self.is_displayed() {
            MenuState::Displayed
        } else if self.pairs.is_empty() {
            MenuState::Unconfigured
        } else {
            MenuState::Undisplayed
        }
    }

    /// Pairs whose role outranks the bot.
    pub fn blocked_pairs(&self) -> impl Iterator<Item = &EmoteRolePair> {
        self.pairs.iter().filter(|pair| pair.blocked)
    }

    /// Forget a deleted role: pairs targeting it go, restrictions naming it
    /// are dropped. Returns whether anything changed.
    pub fn remove_role(&mut self, role: RoleId) -> bool {
        let before = self.pairs.len();
        self.pairs.retain(|pair| pair.role != role);
        let mut changed = before != self.pairs.len();

        changed |= self.global.remove_role(role);
        for pair in &mut self.pairs {
            changed |= pair.restrictions.remove_role(role);
        }
        changed
    }
}
