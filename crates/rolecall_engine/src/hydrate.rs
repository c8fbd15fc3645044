//! Hydration: raw rows plus live guild state → validated entity.
//!
//! Every stale reference found along the way turns into a [`Repair`]. The
//! caller applies them through the [`Reconciler`](crate::Reconciler); a second
//! hydration of the repaired rows produces none.

use crate::{EmoteRolePair, FullMenu, MessageKind, ReactionRoleMessage, RoleRestrictions};
use rolecall_core::{
    ChannelId, Emote, GuildId, GuildSnapshot, MenuKind, MessageExtra, PairId, RawPair,
    RawReactionRoleMessage, RestrictionRecord, RestrictionScope, RoleId, Rrid,
};
use rolecall_error::GatewayResult;
use rolecall_interface::{GuildGateway, Lookup};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// A compensating store write for a reference that no longer resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repair {
    /// The guild is gone; delete all its configuration.
    ForgetGuild(GuildId),
    /// The bound channel is gone; clear channel and message.
    ClearBinding(Rrid),
    /// The bound message is gone; keep the channel.
    ClearMessage {
        /// Message to unbind
        rrid: Rrid,
        /// Channel that still exists
        channel: ChannelId,
    },
    /// A restricted role is gone.
    DropRestriction {
        /// Where the restriction lives
        scope: RestrictionScope,
        /// The missing role
        role: RoleId,
    },
    /// The target role of a pair is gone.
    DeletePair(PairId),
}

/// Result of hydrating one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hydration {
    /// The validated entity, unless the guild is gone
    pub message: Option<ReactionRoleMessage>,
    /// Writes that bring the store in line with the guild
    pub repairs: Vec<Repair>,
}

/// Builds runtime entities from raw rows.
pub struct Hydrator<'a> {
    gateway: &'a dyn GuildGateway,
    default_color: u32,
}

impl<'a> Hydrator<'a> {
    /// A hydrator resolving bound messages through `gateway`.
    pub fn new(gateway: &'a dyn GuildGateway, default_color: u32) -> Self {
        Self {
            gateway,
            default_color,
        }
    }

    /// Validate `raw` against `guild` (`None` when the guild is gone).
    ///
    /// Fails only when the bound message could not be checked because the
    /// platform did not answer; nothing should be repaired in that case.
    #[instrument(skip(self, raw, guild), fields(rrid = %raw.record.id, guild_id = %raw.record.guild_id))]
    pub async fn hydrate(
        &self,
        raw: RawReactionRoleMessage,
        guild: Option<&GuildSnapshot>,
    ) -> GatewayResult<Hydration> {
        let record = raw.record;
        let mut repairs = Vec::new();

        let Some(guild) = guild else {
            debug!("Guild is gone");
            return Ok(Hydration {
                message: None,
                repairs: vec![Repair::ForgetGuild(record.guild_id)],
            });
        };

        let mut channel = record.channel_id;
        let mut message = record.message_id;
        match channel {
            Some(bound) if !guild.has_channel(bound) => {
                debug!(channel_id = %bound, "Bound channel is gone");
                repairs.push(Repair::ClearBinding(record.id));
                channel = None;
                message = None;
            }
            Some(bound) => {
                if let Some(posted) = message {
                    match self.gateway.message_exists(bound, posted).await {
                        Lookup::Found(()) => {}
                        Lookup::Missing => {
                            debug!(message_id = %posted, "Bound message is gone");
                            repairs.push(Repair::ClearMessage {
                                rrid: record.id,
                                channel: bound,
                            });
                            message = None;
                        }
                        Lookup::Unavailable(err) => return Err(err),
                    }
                }
            }
            None => message = None,
        }

        let global = resolve_restrictions(
            guild,
            RestrictionScope::Global(record.id),
            &raw.global_restrictions,
            &mut repairs,
        );

        let full = record.kind == MenuKind::Full;
        let pairs = raw
            .pairs
            .into_iter()
            .filter_map(|pair| resolve_pair(guild, pair, full, &mut repairs))
            .collect();

        let kind = match record.kind {
            MenuKind::Custom => MessageKind::Custom,
            MenuKind::Full => {
                let extra = raw.extra.unwrap_or_else(|| MessageExtra::empty(record.id));
                MessageKind::Full(FullMenu::new(
                    extra.name,
                    extra.description,
                    extra.color.unwrap_or(self.default_color),
                ))
            }
        };

        Ok(Hydration {
            message: Some(ReactionRoleMessage::new(
                record.id,
                record.guild_id,
                channel,
                message,
                record.limit_id,
                pairs,
                global,
                kind,
            )),
            repairs,
        })
    }
}

fn resolve_restrictions(
    guild: &GuildSnapshot,
    scope: RestrictionScope,
    records: &[RestrictionRecord],
    repairs: &mut Vec<Repair>,
) -> RoleRestrictions {
    let mut allowed = BTreeSet::new();
    let mut prohibited = BTreeSet::new();
    for record in records {
        if !guild.has_role(record.role_id) {
            repairs.push(Repair::DropRestriction {
                scope,
                role: record.role_id,
            });
        } else if record.allowed {
            allowed.insert(record.role_id);
        } else {
            prohibited.insert(record.role_id);
        }
    }
    RoleRestrictions::new(allowed, prohibited)
}

fn resolve_pair(
    guild: &GuildSnapshot,
    raw: RawPair,
    full: bool,
    repairs: &mut Vec<Repair>,
) -> Option<EmoteRolePair> {
    let record = raw.record;

    // Unusable emotes are skipped but their rows stay for a human to fix.
    let emote = match Emote::parse(&record.emote) {
        Ok(emote) => emote,
        Err(_) => {
            debug!(pair_id = %record.id, emote = %record.emote, "Skipping pair with unparseable emote");
            return None;
        }
    };
    if emote.custom_id().is_some_and(|id| !guild.has_emoji(id)) {
        debug!(pair_id = %record.id, emote = %record.emote, "Skipping pair with foreign emote");
        return None;
    }

    if !guild.has_role(record.role_id) {
        repairs.push(Repair::DeletePair(record.id));
        return None;
    }

    let restrictions = resolve_restrictions(
        guild,
        RestrictionScope::Pair(record.id),
        &raw.restrictions,
        repairs,
    );

    Some(EmoteRolePair::new(
        record.id,
        emote,
        record.role_id,
        restrictions,
        record.description.filter(|_| full),
        guild.outranks_bot(record.role_id),
    ))
}
