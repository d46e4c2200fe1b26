//! Expiring store traits.

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{StoreError, StoreResult};

/// Key/value persistence with a per-entry time-to-live.
///
/// Implementations must be thread-safe and support concurrent access.
/// The trait is object safe so a single backend can be chosen from
/// configuration at startup and shared as `Arc<dyn ExpiringStore>`.
///
/// Expiry is enforced at read time: once the TTL of an entry has elapsed,
/// `fetch` must return `None`, exactly as for a key that was never written.
#[async_trait]
pub trait ExpiringStore: Send + Sync {
    /// Writes `payload` under `key`, replacing any previous value.
    ///
    /// The entry becomes unreadable once `ttl` has elapsed.
    async fn put(&self, key: &str, payload: &[u8], ttl: Duration) -> StoreResult<()>;

    /// Reads the most recently written payload for `key`.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn fetch(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Short backend name used in log fields.
    fn backend(&self) -> &'static str;
}

/// Typed operations over any [`ExpiringStore`].
///
/// Values are encoded as JSON. This trait is implemented for every store,
/// including `dyn ExpiringStore`, and is not meant to be implemented by hand.
#[async_trait]
pub trait ExpiringStoreExt: ExpiringStore {
    /// Serializes `value` and writes it under `key` for `ttl`.
    async fn store<T>(&self, key: &str, value: &T, ttl: Duration) -> StoreResult<()>
    where
        T: Serialize + Sync,
    {
        let payload =
            serde_json::to_vec(value).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.put(key, &payload, ttl).await
    }

    /// Reads and deserializes the value under `key`.
    ///
    /// Returns [`StoreError::NotFoundOrExpired`] for missing and expired keys
    /// alike, and [`StoreError::Deserialize`] if the payload is malformed.
    async fn retrieve<T>(&self, key: &str) -> StoreResult<T>
    where
        T: DeserializeOwned + Send,
    {
        let payload = self
            .fetch(key)
            .await?
            .ok_or(StoreError::NotFoundOrExpired)?;
        serde_json::from_slice(&payload).map_err(|e| StoreError::Deserialize(e.to_string()))
    }
}

impl<S: ExpiringStore + ?Sized> ExpiringStoreExt for S {}
