//! Hard caps on configuration size.

/// Reaction-role messages a single guild may own.
pub const MAX_MESSAGES_PER_GUILD: usize = 5;

/// Emote-role pairs on a single message.
pub const MAX_PAIRS_PER_MESSAGE: usize = 20;

/// Roles in one allowed or prohibited list (per pair or global).
pub const MAX_RESTRICTED_ROLES: usize = 10;

/// Characters in a full menu's name (embed title limit).
pub const MAX_MENU_NAME_LEN: usize = 256;

/// Characters in a full menu's description.
pub const MAX_MENU_DESCRIPTION_LEN: usize = 2048;

/// Characters in a single pair's description line.
pub const MAX_PAIR_DESCRIPTION_LEN: usize = 200;
