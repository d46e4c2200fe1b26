//! Redis expiring store implementation.

use std::time::Duration;

use async_trait::async_trait;
use fred::{prelude::*, types::Expiration};
use lidp_store::{ExpiringStore, StoreResult};
use tracing::debug;

use crate::config::RedisConfig;
use crate::error::from_redis_error;
use crate::pool::ConnectionPool;

/// Redis-based expiring store.
pub struct RedisStore {
    pool: ConnectionPool,
    config: RedisConfig,
}

impl RedisStore {
    /// Connects to the configured Redis server.
    ///
    /// ## Errors
    ///
    /// Returns an error if the configuration is invalid or the connection
    /// cannot be established.
    pub async fn connect(config: RedisConfig) -> StoreResult<Self> {
        let pool = ConnectionPool::connect(&config).await?;
        debug!(
            address = %config.address,
            pool_size = config.pool_size,
            "Connected to Redis"
        );
        Ok(Self { pool, config })
    }

    /// Returns the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    fn key(&self, key: &str) -> String {
        self.config.prefixed_key(key)
    }
}

/// Milliseconds for Redis `PX`, never zero.
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
fn ttl_millis(ttl: Duration) -> i64 {
    ttl.as_millis().clamp(1, i64::MAX as u128) as i64
}

#[async_trait]
impl ExpiringStore for RedisStore {
    async fn put(&self, key: &str, payload: &[u8], ttl: Duration) -> StoreResult<()> {
        let key = self.key(key);
        let conn = self.pool.get().await?;

        conn.client()
            .set::<(), _, _>(
                &key,
                payload.to_vec(),
                Some(Expiration::PX(ttl_millis(ttl))),
                None,
                false,
            )
            .await
            .map_err(from_redis_error)
    }

    async fn fetch(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let key = self.key(key);
        let conn = self.pool.get().await?;

        conn.client().get(&key).await.map_err(from_redis_error)
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
