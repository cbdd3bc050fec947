// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the `RecordStore` and `TokenStore` traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use listwatch_config::model::StorageConfig;
use listwatch_core::types::NotificationRecord;
use listwatch_core::{ListwatchError, RecordStore, TokenStore};

use crate::database::Database;
use crate::queries;

/// SQLite-backed store for notification records and OAuth state.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily opened on the first call to
/// [`SqliteStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the database at the configured path and run migrations.
    pub async fn initialize(&self) -> Result<(), ListwatchError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| ListwatchError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    /// Checkpoint the WAL and flush pending writes.
    pub async fn close(&self) -> Result<(), ListwatchError> {
        self.db()?.close().await
    }

    /// Verify the database answers a trivial query.
    pub async fn health_check(&self) -> Result<(), ListwatchError> {
        self.db()?
            .connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)
    }

    fn db(&self) -> Result<&Database, ListwatchError> {
        self.db.get().ok_or_else(|| ListwatchError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn get(&self, id: &str) -> Result<Option<NotificationRecord>, ListwatchError> {
        queries::records::get_record(self.db()?, id).await
    }

    async fn list(&self) -> Result<Vec<NotificationRecord>, ListwatchError> {
        queries::records::list_records(self.db()?).await
    }

    async fn insert(&self, record: &NotificationRecord) -> Result<(), ListwatchError> {
        queries::records::insert_record(self.db()?, record).await
    }

    async fn update(&self, record: &NotificationRecord) -> Result<(), ListwatchError> {
        queries::records::update_record(self.db()?, record).await
    }

    async fn delete(&self, id: &str) -> Result<(), ListwatchError> {
        queries::records::delete_record(self.db()?, id).await
    }
}

#[async_trait]
impl TokenStore for SqliteStore {
    async fn load_refresh_token(&self) -> Result<Option<String>, ListwatchError> {
        queries::oauth::load_refresh_token(self.db()?).await
    }

    async fn store_refresh_token(&self, token: &str) -> Result<(), ListwatchError> {
        queries::oauth::store_refresh_token(self.db()?, token).await
    }
}
