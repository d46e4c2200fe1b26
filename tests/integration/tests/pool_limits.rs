//! Connection pool limit tests for the networked backend.

use std::sync::Arc;
use std::time::{Duration, Instant};

use lidp_integration_tests::start_redis;
use lidp_store::{ExpiringStore, StoreError};
use lidp_store_redis::{RedisConfig, RedisStore};

/// Tests that an operation waits for a permit and proceeds once one frees up.
#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_exhausted_pool_blocks_until_released() -> anyhow::Result<()> {
    let (_redis, address) = start_redis().await?;
    let config = RedisConfig::from_address(address)
        .pool_size(1)
        .acquire_timeout_ms(5_000);
    let store = Arc::new(RedisStore::connect(config).await?);

    let held = store.pool().get().await?;
    assert_eq!(store.pool().available(), 0);

    let pending = tokio::spawn({
        let store = Arc::clone(&store);
        async move {
            store
                .put("queued", b"payload", Duration::from_secs(60))
                .await
        }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!pending.is_finished(), "put should wait for a free permit");

    drop(held);
    pending.await??;

    assert_eq!(store.pool().available(), 1);
    assert_eq!(store.fetch("queued").await?, Some(b"payload".to_vec()));
    Ok(())
}

/// Tests that waiting for a permit gives up after the acquire timeout.
#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_exhausted_pool_times_out() -> anyhow::Result<()> {
    let (_redis, address) = start_redis().await?;
    let config = RedisConfig::from_address(address)
        .pool_size(1)
        .acquire_timeout_ms(200);
    let store = RedisStore::connect(config).await?;

    let _held = store.pool().get().await?;

    let started = Instant::now();
    let result = store
        .put("starved", b"payload", Duration::from_secs(60))
        .await;

    assert!(
        matches!(result, Err(StoreError::Unavailable(_))),
        "expected Unavailable, got {result:?}"
    );
    assert!(started.elapsed() >= Duration::from_millis(200));
    Ok(())
}
