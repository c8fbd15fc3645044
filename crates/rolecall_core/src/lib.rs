//! Core data types for Rolecall.
//!
//! This crate holds the plain data shared by every other Rolecall crate:
//! - typed snowflake and row identifiers
//! - the raw configuration model decoded from storage rows
//! - emote parsing
//! - snapshots of live guild state and the inbound event shapes
//! - the render data handed to the platform for full menus

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod caps;
mod emote;
mod event;
mod ids;
mod menu;
mod raw;
mod snapshot;

pub use caps::{
    MAX_MENU_DESCRIPTION_LEN, MAX_MENU_NAME_LEN, MAX_MESSAGES_PER_GUILD, MAX_PAIR_DESCRIPTION_LEN,
    MAX_PAIRS_PER_MESSAGE, MAX_RESTRICTED_ROLES,
};
pub use emote::{Emote, EmoteKey};
pub use event::{EngineEvent, ReactionAction, ReactionEvent};
pub use ids::{ChannelId, EmojiId, GuildId, LimitId, MessageId, PairId, RoleId, Rrid, UserId};
pub use menu::{DEFAULT_MENU_COLOR, MenuContent, MenuLine, parse_color};
pub use raw::{
    LimitRecord, MenuKind, MessageExtra, MessageRecord, PairRecord, RawPair,
    RawReactionRoleMessage, RestrictionRecord, RestrictionScope,
};
pub use snapshot::{GuildSnapshot, RoleInfo};
