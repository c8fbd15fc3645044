//! Top-level error wrapper types.

use crate::{ConfigError, DatabaseError, GatewayError, ReactionRoleError, ReactionRoleErrorKind};

/// Every failure a Rolecall operation can report.
///
/// # Examples
///
/// ```
/// use rolecall_error::{RolecallError, GatewayError, GatewayErrorKind};
///
/// let gateway = GatewayError::new(GatewayErrorKind::Transport("timed out".into()));
/// let err: RolecallError = gateway.into();
/// assert!(format!("{}", err).contains("Transport error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum RolecallErrorKind {
    /// Configuration error surfaced to the caller
    #[from(ReactionRoleError)]
    ReactionRole(ReactionRoleError),
    /// Chat platform error
    #[from(GatewayError)]
    Gateway(GatewayError),
    /// Application configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Persistent store error
    #[from(DatabaseError)]
    Database(DatabaseError),
}

/// Rolecall error with kind discrimination.
///
/// # Examples
///
/// ```
/// use rolecall_error::{RolecallResult, ReactionRoleError, ReactionRoleErrorKind};
///
/// fn create() -> RolecallResult<()> {
///     Err(ReactionRoleError::new(ReactionRoleErrorKind::TooManyMessages(5)))?
/// }
///
/// let err = create().unwrap_err();
/// assert_eq!(err.configuration(), Some(&ReactionRoleErrorKind::TooManyMessages(5)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Rolecall Error: {}", _0)]
pub struct RolecallError(Box<RolecallErrorKind>);

impl RolecallError {
    /// Create a new error from a kind.
    pub fn new(kind: RolecallErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RolecallErrorKind {
        &self.0
    }

    /// The caller-displayable configuration error, if this is one.
    pub fn configuration(&self) -> Option<&ReactionRoleErrorKind> {
        match self.kind() {
            RolecallErrorKind::ReactionRole(err) => Some(err.kind()),
            _ => None,
        }
    }
}

impl<T> From<T> for RolecallError
where
    T: Into<RolecallErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Rolecall operations.
pub type RolecallResult<T> = std::result::Result<T, RolecallError>;
