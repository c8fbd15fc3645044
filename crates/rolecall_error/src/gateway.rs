//! Gateway error types.
//!
//! Errors raised while talking to the chat platform (fetching guild state,
//! granting roles, sending menus). The kind distinguishes a definitive
//! "not found" from authority problems and plain transport failures, which
//! the engine treats very differently.

/// Gateway error conditions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum GatewayErrorKind {
    /// The referenced guild, channel, message, role or member does not exist.
    #[display("Not found: {_0}")]
    NotFound(String),

    /// The bot lacks the permission or role rank for the operation.
    #[display("Forbidden: {_0}")]
    Forbidden(String),

    /// Network failure, timeout, rate limit or unexpected API response.
    #[display("Transport error: {_0}")]
    Transport(String),

    /// Connection to the gateway failed.
    #[display("Connection failed: {_0}")]
    ConnectionFailed(String),

    /// Bot token is invalid or expired.
    #[display("Invalid or expired bot token")]
    InvalidToken,
}

/// Gateway error with source location tracking.
///
/// # Examples
///
/// ```
/// use rolecall_error::{GatewayError, GatewayErrorKind};
///
/// let err = GatewayError::new(GatewayErrorKind::NotFound("message 42".into()));
/// assert!(err.is_not_found());
/// assert!(!err.is_forbidden());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gateway Error: {} at line {} in {}", kind, line, file)]
pub struct GatewayError {
    /// The kind of error that occurred
    pub kind: GatewayErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GatewayError {
    /// Create a new GatewayError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GatewayErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GatewayErrorKind {
        &self.kind
    }

    /// True when the platform definitively reported the target as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, GatewayErrorKind::NotFound(_))
    }

    /// True when the failure was caused by missing permissions or role rank.
    pub fn is_forbidden(&self) -> bool {
        matches!(self.kind, GatewayErrorKind::Forbidden(_))
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
