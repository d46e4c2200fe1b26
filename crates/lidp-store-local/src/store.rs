//! Expiring store backed by a redb embedded database.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lidp_store::{Clock, ExpiringStore, StoreError, StoreResult, SystemClock};
use redb::{Database, ReadableTableMetadata, TableDefinition};
use tracing::{debug, info, warn};

/// Database file used when no path is configured.
pub const DEFAULT_PATH: &str = "lidp.db";

/// redb table for payloads (key: store key, value: serialized bytes).
const PAYLOADS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("payloads");

/// redb table for expiry (key: store key, value: expiry as Unix milliseconds).
const EXPIRATIONS_TABLE: TableDefinition<&str, i64> = TableDefinition::new("expirations");

/// Expiring store persisted to a single local file.
pub struct LocalStore {
    db: Arc<Database>,
    clock: Arc<dyn Clock>,
    path: PathBuf,
}

impl LocalStore {
    /// Open or create a store at the given path.
    ///
    /// ## Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the file cannot be created or
    /// opened.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::open_with_clock(path, Arc::new(SystemClock))
    }

    /// Open or create a store that reads the time from `clock`.
    ///
    /// ## Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the file cannot be created or
    /// opened.
    pub fn open_with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> StoreResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!(
                    "failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let db = Database::create(&path).map_err(|e| {
            StoreError::Unavailable(format!("failed to open {}: {e}", path.display()))
        })?;

        Self::create_tables(&db).map_err(|e| StoreError::Unavailable(e.to_string()))?;

        info!(
            path = %path.display(),
            "Opened local store; expired entries are not swept and remain on disk until overwritten"
        );

        Ok(Self {
            db: Arc::new(db),
            clock,
            path,
        })
    }

    /// Path of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries on disk, expired ones included.
    ///
    /// ## Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the database cannot be read.
    pub fn entry_count(&self) -> StoreResult<u64> {
        let count = || -> Result<u64, redb::Error> {
            let read_txn = self.db.begin_read()?;
            let table = read_txn.open_table(EXPIRATIONS_TABLE)?;
            Ok(table.len()?)
        };
        count().map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    fn create_tables(db: &Database) -> Result<(), redb::Error> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PAYLOADS_TABLE)?;
            let _ = write_txn.open_table(EXPIRATIONS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Write payload and expiry in one transaction.
    ///
    /// Dropping the transaction before `commit` aborts it, so an error on
    /// either insert leaves both tables untouched.
    fn write_entry(
        db: &Database,
        key: &str,
        payload: &[u8],
        expires_at: i64,
    ) -> Result<(), redb::Error> {
        let write_txn = db.begin_write()?;
        {
            let mut payloads = write_txn.open_table(PAYLOADS_TABLE)?;
            let mut expirations = write_txn.open_table(EXPIRATIONS_TABLE)?;
            payloads.insert(key, payload)?;
            expirations.insert(key, expires_at)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Read a payload if its expiry is still in the future.
    ///
    /// Both lookups happen in the same read transaction, so they see the
    /// same committed write.
    fn read_entry(db: &Database, key: &str, now: i64) -> Result<Option<Vec<u8>>, redb::Error> {
        let read_txn = db.begin_read()?;

        let expirations = read_txn.open_table(EXPIRATIONS_TABLE)?;
        let Some(expires_at) = expirations.get(key)?.map(|v| v.value()) else {
            return Ok(None);
        };
        if now >= expires_at {
            return Ok(None);
        }

        let payloads = read_txn.open_table(PAYLOADS_TABLE)?;
        Ok(payloads.get(key)?.map(|v| v.value().to_vec()))
    }

    fn expiry_millis(&self, ttl: Duration) -> i64 {
        let ttl = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        self.clock.now().timestamp_millis().saturating_add(ttl)
    }
}

#[async_trait]
impl ExpiringStore for LocalStore {
    async fn put(&self, key: &str, payload: &[u8], ttl: Duration) -> StoreResult<()> {
        let db = Arc::clone(&self.db);
        let key = key.to_string();
        let payload = payload.to_vec();
        let expires_at = self.expiry_millis(ttl);

        tokio::task::spawn_blocking(move || Self::write_entry(&db, &key, &payload, expires_at))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .map_err(|e| StoreError::Unavailable(format!("updating database: {e}")))
    }

    async fn fetch(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let db = Arc::clone(&self.db);
        let owned_key = key.to_string();
        let now = self.clock.now().timestamp_millis();

        let result = tokio::task::spawn_blocking(move || Self::read_entry(&db, &owned_key, now))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        match result {
            Ok(Some(payload)) => Ok(Some(payload)),
            Ok(None) => {
                debug!(key, "Local store miss");
                Ok(None)
            }
            Err(e) => {
                warn!(key, error = %e, "Unreadable local store entry, treating as absent");
                Ok(None)
            }
        }
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}
