//! # lidp-store-redis
//!
//! Networked expiring store for lite-idp, backed by Redis.
//!
//! This crate implements [`lidp_store::ExpiringStore`] on top of the `fred`
//! client. Expiry is delegated to the server's atomic set-with-expiry, so a
//! key past its TTL simply stops existing.
//!
//! ## Features
//!
//! - Bounded connection pool: every operation holds one of `pool_size`
//!   permits for its duration and waits for a free one, up to a timeout,
//!   when all are taken
//! - Automatic reconnection with exponential backoff
//! - TLS via `rediss://` addresses
//! - Key prefixing for shared Redis deployments
//!
//! ## Example
//!
//! ```ignore
//! use lidp_store::ExpiringStoreExt;
//! use lidp_store_redis::{RedisConfig, RedisStore};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = RedisStore::connect(RedisConfig::from_address("localhost:6379")).await?;
//!
//!     store.store("key", &"value", Duration::from_secs(300)).await?;
//!     let value: String = store.retrieve("key").await?;
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod pool;
pub mod provider;

pub use config::RedisConfig;
pub use pool::{ConnectionPool, PooledConnection};
pub use provider::RedisStore;
