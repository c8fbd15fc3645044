//! Typed identifiers.
//!
//! Platform snowflakes are unsigned 64-bit values; Postgres stores them as
//! `BIGINT`, so every snowflake converts losslessly to and from `i64` by
//! reinterpreting the bits.

use serde::{Deserialize, Serialize};

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize, derive_more::Display, derive_more::From,
        )]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw snowflake.
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// The raw snowflake.
            pub const fn get(self) -> u64 {
                self.0
            }

            /// Decode from a `BIGINT` column.
            pub const fn from_db(id: i64) -> Self {
                Self(id as u64)
            }

            /// Encode for a `BIGINT` column.
            pub const fn to_db(self) -> i64 {
                self.0 as i64
            }
        }
    };
}

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize, derive_more::Display, derive_more::From,
        )]
        pub struct $name(i64);

        impl $name {
            /// Wrap a primary key value.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// The primary key value.
            pub const fn get(self) -> i64 {
                self.0
            }
        }
    };
}

snowflake!(
    /// A guild (community server).
    GuildId
);
snowflake!(
    /// A text channel.
    ChannelId
);
snowflake!(
    /// A posted message.
    MessageId
);
snowflake!(
    /// A role.
    RoleId
);
snowflake!(
    /// A user or member.
    UserId
);
snowflake!(
    /// A custom guild emote.
    EmojiId
);

row_id!(
    /// Reaction-role message id (`RRID`).
    Rrid
);
row_id!(
    /// Emote-role pair id.
    PairId
);
row_id!(
    /// Limit id.
    LimitId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_db_round_trip_above_i64_max() {
        let role = RoleId::new(u64::MAX - 7);
        assert!(role.to_db() < 0);
        assert_eq!(RoleId::from_db(role.to_db()), role);
    }
}
