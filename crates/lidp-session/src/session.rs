//! Authenticated-user sessions.
//!
//! A session maps an unguessable identifier, carried in the `lidp-user`
//! cookie, to the identity record of a user who already authenticated. The
//! record is bound to the client address it was issued to.
//!
//! ## Lifecycle
//!
//! 1. A request arrives -> [`SessionManager::resolve_session`]
//! 2. Miss -> the authentication flow runs -> [`SessionManager::create_session`]
//! 3. The record disappears when its TTL elapses; it is never deleted
//!
//! Every resolution failure becomes `None`, which sends the user through
//! authentication again. Nothing here produces an error page.

use std::sync::Arc;
use std::time::Duration;

use lidp_store::{ExpiringStore, ExpiringStoreExt};
use tracing::{debug, error, info, warn};

use crate::client_ip::{client_ip, same_client};
use crate::error::{SessionError, SessionResult};
use crate::http::{ClientRequest, ClientResponse, Cookie};
use crate::identifier::{IdentifierSource, RandomIdentifiers};
use crate::identity::BoundIdentity;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "lidp-user";

/// How long a session stays valid: 8 hours.
pub const SESSION_TTL: Duration = Duration::from_secs(8 * 60 * 60);

/// Issues and validates the authenticated-user cookie.
#[derive(Clone)]
pub struct SessionManager {
    cookie_name: String,
    ttl: Duration,
    identifiers: Arc<dyn IdentifierSource>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self {
            cookie_name: SESSION_COOKIE.to_string(),
            ttl: SESSION_TTL,
            identifiers: Arc::new(RandomIdentifiers),
        }
    }
}

impl SessionManager {
    /// Creates a manager with the default cookie name and TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cookie name.
    #[must_use]
    pub fn cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Sets the session lifetime.
    #[must_use]
    pub const fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets the identifier source.
    #[must_use]
    pub fn identifiers(mut self, source: Arc<dyn IdentifierSource>) -> Self {
        self.identifiers = source;
        self
    }

    /// Resolves the session on `request`, if there is a valid one.
    ///
    /// Returns `None` when the cookie is missing, the record is absent,
    /// expired, unreadable, or the store is down, and when the request comes
    /// from a different client address than the one the session was issued
    /// to.
    pub async fn resolve_session<U, R>(&self, request: &R, store: &dyn ExpiringStore) -> Option<U>
    where
        U: BoundIdentity,
        R: ClientRequest + ?Sized,
    {
        match self.try_resolve_session(request, store).await {
            Ok(user) => Some(user),
            Err(err) if err.is_not_found() => {
                debug!(reason = %err, "No session");
                None
            }
            Err(SessionError::IpMismatch { .. }) => None,
            Err(err) => {
                warn!(backend = store.backend(), error = %err, "Session lookup failed");
                None
            }
        }
    }

    /// Like [`resolve_session`](Self::resolve_session), but reports why no
    /// session was found.
    ///
    /// ## Errors
    ///
    /// Returns [`SessionError::MissingCookie`], [`SessionError::Store`] or
    /// [`SessionError::IpMismatch`].
    pub async fn try_resolve_session<U, R>(
        &self,
        request: &R,
        store: &dyn ExpiringStore,
    ) -> SessionResult<U>
    where
        U: BoundIdentity,
        R: ClientRequest + ?Sized,
    {
        let session_id = request
            .cookie(&self.cookie_name)
            .ok_or_else(|| SessionError::MissingCookie(self.cookie_name.clone()))?;

        let user: U = store.retrieve(&session_id).await?;
        debug!(user = user.display_name(), "Using existing session");

        let recorded = user.client_ip();
        let current = client_ip(&request.remote_addr());
        if !same_client(recorded, current) {
            warn!(
                user = user.display_name(),
                recorded = ?recorded,
                current = ?current,
                "Existing session associated with a different IP address"
            );
            return Err(SessionError::IpMismatch { recorded, current });
        }

        Ok(user)
    }

    /// Starts a session for `user` and sets the session cookie.
    ///
    /// A failed store write is logged and otherwise ignored: the response
    /// still carries the cookie, which will simply not resolve, and the user
    /// authenticates again on the next request.
    pub async fn create_session<U, W>(&self, response: &mut W, store: &dyn ExpiringStore, user: &U)
    where
        U: BoundIdentity,
        W: ClientResponse + ?Sized,
    {
        let session_id = self.identifiers.generate();
        response.set_cookie(&Cookie::new(&self.cookie_name, &session_id));

        info!(user = user.display_name(), "Creating a new session");
        if let Err(err) = store.store(&session_id, user, self.ttl).await {
            error!(
                user = user.display_name(),
                backend = store.backend(),
                error = %err,
                "Failed to save session for user"
            );
        }
    }
}
