//! Pending-request state across an external redirect.
//!
//! Federated sign-in sends the user agent to another origin for the identity
//! step. Before that redirect the pending authentication request and its
//! relay state are saved under a fresh identifier carried in the `lidp-rs`
//! cookie; on the return leg they are loaded back.
//!
//! Loading does not delete the record. A second load within the TTL window
//! returns the same state.

use std::sync::Arc;
use std::time::Duration;

use lidp_store::{ExpiringStore, ExpiringStoreExt, StoreResult};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::http::{ClientRequest, ClientResponse, Cookie};
use crate::identifier::{IdentifierSource, RandomIdentifiers};

/// Name of the request-state cookie.
pub const REQUEST_STATE_COOKIE: &str = "lidp-rs";

/// How long saved request state stays valid: 5 minutes.
pub const REQUEST_STATE_TTL: Duration = Duration::from_secs(5 * 60);

/// A pending authentication request and its relay state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestState<R> {
    /// The protocol request awaiting completion.
    pub authn_request: R,
    /// Caller-supplied context echoed back after the redirect.
    pub relay_state: String,
}

/// Borrowed form of [`RequestState`] for writing without cloning.
#[derive(Serialize)]
struct RequestStateRef<'a, R> {
    authn_request: &'a R,
    relay_state: &'a str,
}

/// Issues and validates the request-state cookie.
#[derive(Clone)]
pub struct RequestStateManager {
    cookie_name: String,
    ttl: Duration,
    identifiers: Arc<dyn IdentifierSource>,
}

impl Default for RequestStateManager {
    fn default() -> Self {
        Self {
            cookie_name: REQUEST_STATE_COOKIE.to_string(),
            ttl: REQUEST_STATE_TTL,
            identifiers: Arc::new(RandomIdentifiers),
        }
    }
}

impl RequestStateManager {
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

    /// Sets how long saved state stays valid.
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

    /// Saves the pending request and sets the request-state cookie.
    ///
    /// The cookie is only set once the state is stored.
    ///
    /// ## Errors
    ///
    /// Returns the store error if the write fails. The caller must not
    /// redirect in that case, since the return leg could not be correlated.
    pub async fn save_state<R, W>(
        &self,
        response: &mut W,
        store: &dyn ExpiringStore,
        authn_request: &R,
        relay_state: &str,
    ) -> StoreResult<()>
    where
        R: Serialize + Sync,
        W: ClientResponse + ?Sized,
    {
        let state_id = self.identifiers.generate();
        let state = RequestStateRef {
            authn_request,
            relay_state,
        };

        store.store(&state_id, &state, self.ttl).await?;
        response.set_cookie(&Cookie::new(&self.cookie_name, &state_id));
        debug!(backend = store.backend(), "Saved request state");
        Ok(())
    }

    /// Loads the pending request saved before the redirect.
    ///
    /// Returns `None` when there is no cookie or the state is missing,
    /// expired, unreadable, or the store is down; the caller starts the flow
    /// over.
    pub async fn load_state<R, Q>(
        &self,
        request: &Q,
        store: &dyn ExpiringStore,
    ) -> Option<RequestState<R>>
    where
        R: DeserializeOwned + Send,
        Q: ClientRequest + ?Sized,
    {
        let state_id = request.cookie(&self.cookie_name)?;

        match store.retrieve(&state_id).await {
            Ok(state) => Some(state),
            Err(err) if err.is_not_found() => {
                debug!("Request state not found or expired");
                None
            }
            Err(err) => {
                warn!(backend = store.backend(), error = %err, "Failed to load request state");
                None
            }
        }
    }
}
