//! Configuration changes requested by the command layer.
//!
//! Every operation addresses a message by `(guild, index)`: `None` is the
//! newest message, `Some(n)` the n-th oldest counting from 1. Operations
//! hold the guild's gate for their whole duration, validate against the
//! stored rows, write, then re-hydrate so the dispatch table, limit cache
//! and any posted menu reflect the change.
//!
//! Validation failures are [`ReactionRoleError`](rolecall_error::ReactionRoleError)s
//! and leave the store untouched.

mod display;
mod limits;
mod messages;
mod pairs;
mod restrictions;

pub use restrictions::{RestrictionKind, RestrictionTarget};

use crate::engine::invalid;
use crate::{ReactionRoleEngine, ReactionRoleMessage};
use rolecall_core::{Emote, GuildId, GuildSnapshot, RawPair, RawReactionRoleMessage, Rrid};
use rolecall_error::{ReactionRoleErrorKind, RolecallResult};
use tokio::sync::OwnedMutexGuard;

/// A message opened for editing under its guild's gate.
pub(crate) struct Editing {
    _gate: OwnedMutexGuard<()>,
    /// 1-based position among the guild's messages
    pub(crate) ordinal: usize,
    pub(crate) rrid: Rrid,
    pub(crate) guild: GuildSnapshot,
    /// Hydrated entity before the change
    pub(crate) before: ReactionRoleMessage,
    /// Stored rows after reconciliation
    pub(crate) raw: RawReactionRoleMessage,
}

impl ReactionRoleEngine {
    /// Map `(guild, index)` onto a stored message.
    pub(crate) async fn resolve(
        &self,
        guild: GuildId,
        index: Option<usize>,
    ) -> RolecallResult<(usize, Rrid)> {
        let records = self.store.list_messages(guild).await?;
        let count = records.len();
        if count == 0 {
            return Err(invalid(ReactionRoleErrorKind::NoMessages));
        }

        let ordinal = match index {
            None => count,
            Some(n) if (1..=count).contains(&n) => n,
            Some(n) => {
                return Err(invalid(ReactionRoleErrorKind::IndexOutOfRange {
                    index: n,
                    count,
                }));
            }
        };
        Ok((ordinal, records[ordinal - 1].id))
    }

    /// Take the guild gate, resolve the message and bring it up to date.
    pub(crate) async fn begin(
        &self,
        guild: GuildId,
        index: Option<usize>,
    ) -> RolecallResult<Editing> {
        let gate = self.guild_gates.acquire(guild).await;
        let snapshot = self.snapshot(guild).await?;
        let (ordinal, rrid) = self.resolve(guild, index).await?;

        let before = self
            .sync_entity(rrid, &snapshot)
            .await?
            .ok_or_else(|| invalid(ReactionRoleErrorKind::NoMessages))?;
        let raw = self
            .store
            .load_raw(rrid)
            .await?
            .ok_or_else(|| invalid(ReactionRoleErrorKind::NoMessages))?;

        Ok(Editing {
            _gate: gate,
            ordinal,
            rrid,
            guild: snapshot,
            before,
            raw,
        })
    }

    /// Re-hydrate after a write and update the posted menu.
    pub(crate) async fn commit(
        &self,
        editing: &Editing,
    ) -> RolecallResult<Option<ReactionRoleMessage>> {
        let after = self.sync_entity(editing.rrid, &editing.guild).await?;
        self.render_changes(Some(&editing.before), after.as_ref())
            .await?;
        Ok(after)
    }
}

impl Editing {
    /// Fail unless the message is full.
    #[track_caller]
    pub(crate) fn require_full(&self) -> RolecallResult<()> {
        match self.before.kind() {
            crate::MessageKind::Full(_) => Ok(()),
            crate::MessageKind::Custom => Err(invalid(ReactionRoleErrorKind::WrongKind("full"))),
        }
    }

    /// Fail unless the message is custom.
    #[track_caller]
    pub(crate) fn require_custom(&self) -> RolecallResult<()> {
        match self.before.kind() {
            crate::MessageKind::Custom => Ok(()),
            crate::MessageKind::Full(_) => {
                Err(invalid(ReactionRoleErrorKind::WrongKind("custom")))
            }
        }
    }

    /// The stored pair using an emote. Rows whose emote no longer parses
    /// are never matched.
    pub(crate) fn find_pair(&self, emote: &Emote) -> Option<&RawPair> {
        self.raw
            .pairs
            .iter()
            .find(|pair| Emote::parse(&pair.record.emote).is_ok_and(|stored| &stored == emote))
    }

    /// The stored pair using an emote, or `EmoteNotFound`.
    #[track_caller]
    pub(crate) fn pair(&self, emote: &Emote) -> RolecallResult<&RawPair> {
        self.find_pair(emote)
            .ok_or_else(|| invalid(ReactionRoleErrorKind::EmoteNotFound(emote.to_string())))
    }
}

/// Parse user input as an emote usable in `guild`.
#[track_caller]
pub(crate) fn guild_emote(guild: &GuildSnapshot, input: &str) -> RolecallResult<Emote> {
    let emote = Emote::parse(input)?;
    if emote.custom_id().is_some_and(|id| !guild.has_emoji(id)) {
        return Err(invalid(ReactionRoleErrorKind::ForeignEmote(
            emote.to_string(),
        )));
    }
    Ok(emote)
}

/// Parse a reference to an emote already on a message.
#[track_caller]
pub(crate) fn parse_emote(input: &str) -> RolecallResult<Emote> {
    Ok(Emote::parse(input)?)
}

/// Fail when user text is longer than `max` characters.
#[track_caller]
pub(crate) fn check_length(field: &'static str, text: Option<&str>, max: usize) -> RolecallResult<()> {
    match text {
        Some(text) if text.chars().count() > max => {
            Err(invalid(ReactionRoleErrorKind::TextTooLong { field, max }))
        }
        _ => Ok(()),
    }
}
