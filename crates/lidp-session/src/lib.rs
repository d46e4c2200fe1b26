//! # lidp-session
//!
//! Session and request-state correlation for the lite-idp front end.
//!
//! Two kinds of short-lived state are kept in an [`ExpiringStore`]:
//!
//! - **User sessions** ([`SessionManager`]): the identity of a user who has
//!   authenticated, keyed by the `lidp-user` cookie, valid for 8 hours and
//!   bound to the client address it was issued to.
//! - **Request state** ([`RequestStateManager`]): a pending authentication
//!   request and its relay state, keyed by the `lidp-rs` cookie, valid for
//!   5 minutes across an external redirect.
//!
//! The store is chosen once at startup with [`open_store`]: a Redis server
//! when an address is configured, otherwise a local database file.
//!
//! ```ignore
//! let store = open_store(&StoreConfig::from_env()).await?;
//! let sessions = SessionManager::new();
//!
//! let request = HttpRequest::new(&headers, peer);
//! if let Some(user) = sessions.resolve_session::<AuthenticatedUser, _>(&request, store.as_ref()).await {
//!     // already signed in
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod backend;
pub mod client_ip;
pub mod error;
pub mod http;
pub mod identifier;
pub mod identity;
pub mod request_state;
pub mod session;


pub use backend::{open_store, StoreConfig};
pub use client_ip::{client_ip, same_client};
pub use error::{SessionError, SessionResult};
pub use http::{ClientRequest, ClientResponse, Cookie, HttpRequest};
pub use identifier::{IdentifierSource, RandomIdentifiers};
pub use identity::{AuthenticatedUser, BoundIdentity};
pub use request_state::{
    RequestState, RequestStateManager, REQUEST_STATE_COOKIE, REQUEST_STATE_TTL,
};
pub use session::{SessionManager, SESSION_COOKIE, SESSION_TTL};

pub use lidp_store::{ExpiringStore, ExpiringStoreExt, StoreError, StoreResult};
