//! Shared fixtures for the end-to-end tests.
//!
//! [`TestEnv`] opens a store through the same [`open_store`] path a server
//! uses, backed either by a temporary database file or by a Redis container
//! started with testcontainers.

#![forbid(unsafe_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};
use lidp_session::{open_store, ExpiringStore, StoreConfig};
use tempfile::TempDir;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::redis::Redis;

/// Whatever keeps the backend alive for the duration of a test.
enum Backing {
    Local(TempDir),
    Redis(ContainerAsync<Redis>),
}

/// A store plus the resources behind it.
pub struct TestEnv {
    /// The opened store.
    pub store: Arc<dyn ExpiringStore>,
    /// Configuration the store was opened with.
    pub config: StoreConfig,
    backing: Backing,
}

impl TestEnv {
    /// Opens a local store in a fresh temporary directory.
    pub async fn local() -> anyhow::Result<Self> {
        init_tracing();

        let dir = tempfile::tempdir()?;
        let config = StoreConfig::local(dir.path().join("lidp.db"));
        let store = open_store(&config).await?;

        Ok(Self {
            store,
            config,
            backing: Backing::Local(dir),
        })
    }

    /// Starts a Redis container and opens a networked store against it.
    pub async fn redis() -> anyhow::Result<Self> {
        let (container, address) = start_redis().await?;
        let config = StoreConfig::networked(address);
        let store = open_store(&config).await?;

        Ok(Self {
            store,
            config,
            backing: Backing::Redis(container),
        })
    }

    /// Closes the store and opens it again, as a restarted process would.
    ///
    /// The local database only allows one open handle, so no clone of
    /// `store` may be alive when this is called.
    pub async fn restart(self) -> anyhow::Result<Self> {
        let Self {
            store,
            config,
            backing,
        } = self;
        drop(store);

        let store = open_store(&config).await?;
        Ok(Self {
            store,
            config,
            backing,
        })
    }

    /// Returns the backend name of the opened store.
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Checks if the store is backed by a Redis container.
    pub const fn is_redis(&self) -> bool {
        matches!(self.backing, Backing::Redis(_))
    }
}

/// Starts a Redis container and returns it with its `host:port` address.
///
/// The server stops when the container handle is dropped.
pub async fn start_redis() -> anyhow::Result<(ContainerAsync<Redis>, String)> {
    init_tracing();

    let container = Redis::default().start().await?;
    let port = container.get_host_port_ipv4(6379).await?;
    Ok((container, format!("127.0.0.1:{port}")))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("lidp_session=debug,lidp_store_local=debug,lidp_store_redis=debug")
        .with_test_writer()
        .try_init();
}

/// Turns the `Set-Cookie` headers of a response into the `Cookie` header a
/// browser would send back.
pub fn returned_cookies(response: &HeaderMap) -> HeaderMap {
    let pairs: Vec<&str> = response
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .collect();

    let mut headers = HeaderMap::new();
    if pairs.is_empty() {
        return headers;
    }
    if let Ok(value) = HeaderValue::from_str(&pairs.join("; ")) {
        headers.insert(COOKIE, value);
    }
    headers
}

/// Parses a peer address, panicking on malformed test input.
pub fn peer(addr: &str) -> SocketAddr {
    addr.parse()
        .unwrap_or_else(|e| panic!("invalid peer address {addr}: {e}"))
}
