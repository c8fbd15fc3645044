//! Three-way result of reading external state.

use rolecall_error::{GatewayError, GatewayResult};

/// Outcome of resolving something on the platform.
///
/// # Examples
///
/// ```
/// use rolecall_error::{GatewayError, GatewayErrorKind};
/// use rolecall_interface::Lookup;
///
/// let gone: Lookup<u32> =
///     Lookup::from_result(Err(GatewayError::new(GatewayErrorKind::NotFound("role".into()))));
/// assert!(gone.is_missing());
///
/// let flaky: Lookup<u32> =
///     Lookup::from_result(Err(GatewayError::new(GatewayErrorKind::Transport("timeout".into()))));
/// assert!(matches!(flaky, Lookup::Unavailable(_)));
/// ```
#[derive(Debug, Clone)]
pub enum Lookup<T> {
    /// The thing exists.
    Found(T),
    /// The platform definitively reported it as gone.
    Missing,
    /// The platform could not answer; try again later.
    Unavailable(GatewayError),
}

impl<T> Lookup<T> {
    /// Classify a gateway result: "not found" errors become [`Lookup::Missing`].
    pub fn from_result(result: GatewayResult<T>) -> Self {
        match result {
            Ok(value) => Lookup::Found(value),
            Err(err) if err.is_not_found() => Lookup::Missing,
            Err(err) => Lookup::Unavailable(err),
        }
    }

    /// Whether the value was definitively missing.
    pub fn is_missing(&self) -> bool {
        matches!(self, Lookup::Missing)
    }

    /// Map the found value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::Missing => Lookup::Missing,
            Lookup::Unavailable(err) => Lookup::Unavailable(err),
        }
    }

    /// `Ok(Some)` when found, `Ok(None)` when missing, `Err` when unavailable.
    pub fn into_result(self) -> GatewayResult<Option<T>> {
        match self {
            Lookup::Found(value) => Ok(Some(value)),
            Lookup::Missing => Ok(None),
            Lookup::Unavailable(err) => Err(err),
        }
    }
}
