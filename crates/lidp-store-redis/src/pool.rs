//! Bounded Redis connection pool.
//!
//! `fred` keeps a fixed set of connections and hands them out round-robin,
//! independent of who else is using them. A semaphore with one permit per
//! connection bounds how many store operations are outstanding at once;
//! callers beyond that wait for a permit, up to the acquire timeout, instead
//! of failing.

use std::time::Duration;

use fred::prelude::*;
use lidp_store::{StoreError, StoreResult};
use tokio::sync::{Semaphore, SemaphorePermit};

use crate::config::RedisConfig;
use crate::error::from_redis_error;

/// Connection pool for Redis connections.
pub struct ConnectionPool {
    pool: Pool,
    semaphore: Semaphore,
    acquire_timeout: Duration,
}

impl ConnectionPool {
    /// Connects `config.pool_size` clients to the configured server.
    ///
    /// ## Errors
    ///
    /// Returns [`StoreError::Configuration`] for an invalid address or pool
    /// size, and [`StoreError::Unavailable`] if the server cannot be reached.
    pub async fn connect(config: &RedisConfig) -> StoreResult<Self> {
        if config.pool_size == 0 {
            return Err(StoreError::Configuration(
                "pool size must be at least 1".to_string(),
            ));
        }

        let redis_config = Config::from_url(&config.connection_url())
            .map_err(|e| StoreError::Configuration(e.to_string()))?;

        let pool = Builder::from_config(redis_config)
            .set_policy(ReconnectPolicy::new_exponential(0, 1000, 30_000, 2))
            .build_pool(config.pool_size)
            .map_err(from_redis_error)?;

        pool.init().await.map_err(from_redis_error)?;

        Ok(Self {
            pool,
            semaphore: Semaphore::new(config.pool_size),
            acquire_timeout: config.acquire_timeout(),
        })
    }

    /// Acquires a permit and picks the next client.
    ///
    /// Waits up to the configured acquire timeout when every permit is
    /// taken, then fails with [`StoreError::Unavailable`]. The permit is
    /// returned when the handle is dropped.
    pub async fn get(&self) -> StoreResult<PooledConnection<'_>> {
        let permit = tokio::time::timeout(self.acquire_timeout, self.semaphore.acquire())
            .await
            .map_err(|_| StoreError::Unavailable("connection pool exhausted".to_string()))?
            .map_err(|_| StoreError::Unavailable("connection pool closed".to_string()))?;

        Ok(PooledConnection {
            client: self.pool.next(),
            _permit: permit,
        })
    }

    /// Number of permits currently free.
    #[must_use]
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// A concurrency permit plus the client to run one operation on.
///
/// The permit is what bounds outstanding operations. The client is not
/// exclusive: clients are picked round-robin, so two handles may share one.
pub struct PooledConnection<'a> {
    client: &'a Client,
    _permit: SemaphorePermit<'a>,
}

impl PooledConnection<'_> {
    /// Returns the underlying Redis client.
    #[must_use]
    pub const fn client(&self) -> &Client {
        self.client
    }
}
