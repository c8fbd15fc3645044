//! Reaction-role configuration errors.
//!
//! These are the caller-facing failures of the mutation API: the command
//! layer renders [`ReactionRoleErrorKind`] directly to the member who issued
//! the command. They never indicate a fault in the engine and are not logged
//! as failures.

/// Configuration error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ReactionRoleErrorKind {
    /// The guild has no reaction-role messages yet.
    #[display("This server has no reaction-role messages")]
    NoMessages,

    /// The requested ordinal does not name an existing message.
    #[display("Message #{index} does not exist (this server has {count})")]
    IndexOutOfRange {
        /// Requested 1-based ordinal
        index: usize,
        /// Number of messages in the guild
        count: usize,
    },

    /// Creating another message would exceed the per-guild cap.
    #[display("A server can have at most {_0} reaction-role messages")]
    TooManyMessages(usize),

    /// Adding another pair would exceed the per-message cap.
    #[display("A reaction-role message can have at most {_0} emote-role pairs")]
    TooManyPairs(usize),

    /// Adding another role would exceed the restriction list cap.
    #[display("A restriction list can hold at most {_0} roles")]
    TooManyRestrictions(usize),

    /// The emote string is neither a custom emote nor a unicode emoji.
    #[display("'{_0}' is not a valid emote")]
    InvalidEmote(String),

    /// The custom emote does not belong to this guild.
    #[display("The emote {_0} is not from this server")]
    ForeignEmote(String),

    /// The emote is already used by another pair on this message.
    #[display("The emote {_0} is already used on this message")]
    DuplicateEmote(String),

    /// The role is already the target of another pair on this message.
    #[display("The role <@&{_0}> is already used on this message")]
    DuplicateRole(u64),

    /// No pair on this message uses the emote.
    #[display("No pair on this message uses the emote {_0}")]
    EmoteNotFound(String),

    /// The role does not exist in this guild.
    #[display("The role {_0} does not exist in this server")]
    RoleNotFound(u64),

    /// The role cannot be self-assigned (e.g. the @everyone role).
    #[display("The role <@&{_0}> cannot be handed out by reaction")]
    RoleNotAssignable(u64),

    /// The channel does not exist in this guild.
    #[display("The channel {_0} does not exist in this server")]
    ChannelNotFound(u64),

    /// The target message for a custom menu could not be found.
    #[display("The message {_0} could not be found")]
    TargetMessageNotFound(u64),

    /// The message is already bound to another reaction-role message.
    #[display("The message {_0} is already used by another reaction-role message")]
    MessageAlreadyBound(u64),

    /// The role is already in the requested restriction list.
    #[display("The role <@&{_0}> is already restricted this way")]
    DuplicateRestriction(u64),

    /// The role is in the opposite restriction list of the same scope.
    #[display("The role <@&{_0}> is already in the opposite restriction list")]
    ConflictingRestriction(u64),

    /// The role is not in the restriction list it should be removed from.
    #[display("The role <@&{_0}> is not restricted this way")]
    RestrictionNotFound(u64),

    /// Limit caps must be at least one.
    #[display("A limit must be at least 1 (got {_0})")]
    InvalidCap(i64),

    /// The message has no limit to remove or chain onto.
    #[display("Message #{_0} has no limit")]
    NoLimit(usize),

    /// A message cannot chain a limit with itself.
    #[display("A message cannot share a limit with itself")]
    SelfChain,

    /// The operation needs a message of the other kind.
    #[display("This operation requires a {_0} reaction-role message")]
    WrongKind(&'static str),

    /// The message already has the requested kind.
    #[display("This reaction-role message is already {_0}")]
    AlreadyKind(&'static str),

    /// Displaying requires at least one pair.
    #[display("Add at least one emote-role pair before displaying")]
    NoPairs,

    /// A full menu needs a channel before it can be displayed.
    #[display("Choose a channel before displaying this message")]
    NoChannel,

    /// A custom menu needs a target message before it can be displayed.
    #[display("Choose a target message before displaying this message")]
    NoTargetMessage,

    /// User-supplied text exceeds what the platform can render.
    #[display("The {field} can be at most {max} characters long")]
    TextTooLong {
        /// Name of the field
        field: &'static str,
        /// Maximum length in characters
        max: usize,
    },

    /// The color could not be parsed as a hex RGB value.
    #[display("'{_0}' is not a valid hex color")]
    InvalidColor(String),

    /// The guild is no longer reachable; its configuration was removed.
    #[display("This server is no longer available")]
    GuildNotFound,
}

/// Configuration error with location tracking.
///
/// # Examples
///
/// ```
/// use rolecall_error::{ReactionRoleError, ReactionRoleErrorKind};
///
/// let err = ReactionRoleError::new(ReactionRoleErrorKind::TooManyPairs(20));
/// assert_eq!(err.kind().to_string(), "A reaction-role message can have at most 20 emote-role pairs");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Reaction Role Error: {} at line {} in {}", kind, line, file)]
pub struct ReactionRoleError {
    kind: ReactionRoleErrorKind,
    line: u32,
    file: &'static str,
}

impl ReactionRoleError {
    /// Create a new configuration error with caller location tracking.
    #[track_caller]
    pub fn new(kind: ReactionRoleErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ReactionRoleErrorKind {
        &self.kind
    }
}
