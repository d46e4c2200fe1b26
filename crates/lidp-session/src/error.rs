//! Session error types.

use std::net::IpAddr;

use lidp_store::StoreError;
use thiserror::Error;

/// Reasons a session or request state could not be resolved.
///
/// These never reach callers of the soft APIs
/// ([`SessionManager::resolve_session`](crate::SessionManager::resolve_session),
/// [`RequestStateManager::load_state`](crate::RequestStateManager::load_state));
/// they are logged and collapsed to "nothing found".
#[derive(Debug, Error)]
pub enum SessionError {
    /// The request carried no cookie for this flow.
    #[error("no {0} cookie on request")]
    MissingCookie(String),

    /// The store had no usable record, or could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The session was created from a different client address.
    #[error("session bound to {recorded:?}, request came from {current:?}")]
    IpMismatch {
        /// Address recorded when the session was created.
        recorded: Option<IpAddr>,
        /// Address derived from the current request.
        current: Option<IpAddr>,
    },
}

impl SessionError {
    /// Checks if this is an ordinary miss (no cookie, or nothing stored).
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::MissingCookie(_) | Self::Store(StoreError::NotFoundOrExpired)
        )
    }

    /// Checks if the session was rejected by the client address check.
    #[must_use]
    pub const fn is_ip_mismatch(&self) -> bool {
        matches!(self, Self::IpMismatch { .. })
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
