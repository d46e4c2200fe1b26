//! Redis connection configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Redis connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Server address, either `host:port` or a `redis://`/`rediss://` URL.
    pub address: String,
    /// Maximum number of connections held by the pool.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    /// How long an operation waits for a free pooled connection, in milliseconds.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_ms: u64,
    /// Key prefix for all store keys.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self::from_address("localhost:6379")
    }
}

impl RedisConfig {
    /// Creates a configuration for `address` with default pool settings.
    #[must_use]
    pub fn from_address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            pool_size: default_pool_size(),
            acquire_timeout_ms: default_acquire_timeout(),
            key_prefix: default_key_prefix(),
        }
    }

    /// Sets the connection pool size.
    #[must_use]
    pub const fn pool_size(mut self, size: usize) -> Self {
        self.pool_size = size;
        self
    }

    /// Sets how long to wait for a pooled connection, in milliseconds.
    #[must_use]
    pub const fn acquire_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.acquire_timeout_ms = timeout_ms;
        self
    }

    /// Sets the key prefix.
    #[must_use]
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Pool acquisition ceiling.
    #[must_use]
    pub const fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }

    /// Builds the Redis connection URL.
    ///
    /// Bare `host:port` addresses get the plain `redis://` scheme.
    #[must_use]
    pub fn connection_url(&self) -> String {
        let address = self.address.trim();
        if address.contains("://") {
            address.to_string()
        } else {
            format!("redis://{address}")
        }
    }

    /// Formats a key with the configured prefix.
    #[must_use]
    pub fn prefixed_key(&self, key: &str) -> String {
        if self.key_prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.key_prefix, key)
        }
    }
}

const fn default_pool_size() -> usize {
    10
}

const fn default_acquire_timeout() -> u64 {
    5000
}

fn default_key_prefix() -> String {
    "lidp".to_string()
}
