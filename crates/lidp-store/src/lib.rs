//! # lidp-store
//!
//! Expiring key/value store abstraction for the lite-idp session layer.
//!
//! This crate defines the interface every session backend implements.
//! Two implementations exist:
//!
//! - `lidp-store-redis` - a remote, TTL-native cache reached through a bounded
//!   connection pool
//! - `lidp-store-local` - a single-file embedded database that tracks expiry
//!   itself
//!
//! ## Store Traits
//!
//! - [`ExpiringStore`] - byte-level `put`/`fetch` with a per-entry time-to-live
//! - [`ExpiringStoreExt`] - typed `store`/`retrieve` on top of any store
//!
//! An entry read after its TTL has elapsed is reported exactly like a key
//! that was never written: `fetch` returns `None` and `retrieve` returns
//! [`StoreError::NotFoundOrExpired`].
//!
//! ## Example
//!
//! ```ignore
//! use lidp_store::{ExpiringStore, ExpiringStoreExt, StoreResult};
//! use std::time::Duration;
//!
//! async fn remember(store: &dyn ExpiringStore, id: &str, user: &User) -> StoreResult<()> {
//!     store.store(id, user, Duration::from_secs(28_800)).await
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod clock;
pub mod error;
pub mod provider;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{StoreError, StoreResult};
pub use provider::{ExpiringStore, ExpiringStoreExt};
