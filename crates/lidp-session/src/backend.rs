//! Store backend selection.
//!
//! One configuration string picks the backend: empty selects the local
//! database file, anything else is the address of a Redis server. The store
//! is opened once at startup and passed by reference into every session and
//! request-state call.

use std::path::PathBuf;
use std::sync::Arc;

use lidp_store::{ExpiringStore, StoreResult};
use lidp_store_local::LocalStore;
use lidp_store_redis::{RedisConfig, RedisStore};
use tracing::info;

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Remote cache address; empty selects the local backend.
    pub address: String,
    /// Database file for the local backend.
    pub local_path: PathBuf,
    /// Connection pool size for the networked backend.
    pub pool_size: usize,
    /// Key prefix for the networked backend.
    pub key_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let redis = RedisConfig::default();
        Self {
            address: String::new(),
            local_path: PathBuf::from(lidp_store_local::DEFAULT_PATH),
            pool_size: redis.pool_size,
            key_prefix: redis.key_prefix,
        }
    }
}

impl StoreConfig {
    /// Loads configuration from environment variables.
    ///
    /// Reads `LIDP_STORE_ADDRESS`, `LIDP_STORE_PATH`, `LIDP_STORE_POOL_SIZE`
    /// and `LIDP_STORE_KEY_PREFIX`, after loading a `.env` file if present.
    /// Unset or unparsable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        let address = std::env::var("LIDP_STORE_ADDRESS").unwrap_or_default();

        let local_path = std::env::var("LIDP_STORE_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map_or(defaults.local_path, PathBuf::from);

        let pool_size = std::env::var("LIDP_STORE_POOL_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(defaults.pool_size);

        let key_prefix =
            std::env::var("LIDP_STORE_KEY_PREFIX").unwrap_or(defaults.key_prefix);

        Self {
            address,
            local_path,
            pool_size,
            key_prefix,
        }
    }

    /// Configuration for the local backend at `path`.
    #[must_use]
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            local_path: path.into(),
            ..Self::default()
        }
    }

    /// Configuration for the networked backend at `address`.
    #[must_use]
    pub fn networked(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Checks if this configuration selects the local backend.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.address.trim().is_empty()
    }
}

/// Opens the backend selected by `config`.
///
/// ## Errors
///
/// Returns an error if the local file cannot be opened or the remote server
/// cannot be reached.
pub async fn open_store(config: &StoreConfig) -> StoreResult<Arc<dyn ExpiringStore>> {
    if config.is_local() {
        let store = LocalStore::open(&config.local_path)?;
        info!(path = %config.local_path.display(), "Using local session store");
        return Ok(Arc::new(store));
    }

    let redis = RedisConfig::from_address(config.address.trim())
        .pool_size(config.pool_size)
        .key_prefix(config.key_prefix.clone());
    let store = RedisStore::connect(redis).await?;
    info!(address = %config.address, "Using networked session store");
    Ok(Arc::new(store))
}
