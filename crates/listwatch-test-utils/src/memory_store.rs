// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store implementations for deterministic testing.
//!
//! `MemoryRecordStore` and `MemoryTokenStore` implement the core storage
//! traits over a plain HashMap, with injectable failures so tests can
//! exercise the reconciliation engine's error branches.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use listwatch_core::types::NotificationRecord;
use listwatch_core::{ListwatchError, RecordStore, TokenStore};

fn injected_failure(what: &str) -> ListwatchError {
    ListwatchError::Storage {
        source: format!("injected {what} failure").into(),
    }
}

/// A record store backed by a HashMap.
///
/// `fail_reads` / `fail_writes` make the corresponding operations return a
/// storage error until cleared.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<String, NotificationRecord>>,
    fail_reads: Mutex<bool>,
    fail_writes: Mutex<bool>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record as if a previous cycle had persisted it.
    pub async fn seed(&self, record: NotificationRecord) {
        self.records.lock().await.insert(record.id.clone(), record);
    }

    /// Make every `get`/`list` call fail until cleared.
    pub async fn fail_reads(&self, fail: bool) {
        *self.fail_reads.lock().await = fail;
    }

    /// Make every `insert`/`update`/`delete` call fail until cleared.
    pub async fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().await = fail;
    }

    /// Snapshot of all stored records, keyed by id.
    pub async fn snapshot(&self) -> HashMap<String, NotificationRecord> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get(&self, id: &str) -> Result<Option<NotificationRecord>, ListwatchError> {
        if *self.fail_reads.lock().await {
            return Err(injected_failure("read"));
        }
        Ok(self.records.lock().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<NotificationRecord>, ListwatchError> {
        if *self.fail_reads.lock().await {
            return Err(injected_failure("read"));
        }
        let mut records: Vec<_> = self.records.lock().await.values().cloned().collect();
        records.sort_by_key(|r| r.modified_on);
        Ok(records)
    }

    async fn insert(&self, record: &NotificationRecord) -> Result<(), ListwatchError> {
        if *self.fail_writes.lock().await {
            return Err(injected_failure("write"));
        }
        self.records
            .lock()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn update(&self, record: &NotificationRecord) -> Result<(), ListwatchError> {
        if *self.fail_writes.lock().await {
            return Err(injected_failure("write"));
        }
        self.records
            .lock()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), ListwatchError> {
        if *self.fail_writes.lock().await {
            return Err(injected_failure("write"));
        }
        self.records.lock().await.remove(id);
        Ok(())
    }
}

/// A token store holding a single refresh token in memory.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a previously persisted token.
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }

    /// Current stored token, if any rotation has been persisted.
    pub async fn current(&self) -> Option<String> {
        self.token.lock().await.clone()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load_refresh_token(&self) -> Result<Option<String>, ListwatchError> {
        Ok(self.token.lock().await.clone())
    }

    async fn store_refresh_token(&self, token: &str) -> Result<(), ListwatchError> {
        *self.token.lock().await = Some(token.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, modified_on: i64) -> NotificationRecord {
        NotificationRecord {
            id: id.to_string(),
            name: "n".into(),
            description: "d".into(),
            created_on: 0,
            modified_on,
            created_by: "a".into(),
            modified_by: "a".into(),
            expires_on: 0,
            has_attachments: false,
            message_refs: vec![],
        }
    }

    #[tokio::test]
    async fn seeded_records_are_retrievable() {
        let store = MemoryRecordStore::new();
        store.seed(record("1", 10)).await;
        assert!(store.get("1").await.unwrap().is_some());
        assert!(store.get("2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_orders_by_modified_on() {
        let store = MemoryRecordStore::new();
        store.seed(record("late", 20)).await;
        store.seed(record("early", 10)).await;
        let all = store.list().await.unwrap();
        assert_eq!(all[0].id, "early");
        assert_eq!(all[1].id, "late");
    }

    #[tokio::test]
    async fn injected_read_failures_clear() {
        let store = MemoryRecordStore::new();
        store.fail_reads(true).await;
        assert!(store.get("1").await.is_err());
        store.fail_reads(false).await;
        assert!(store.get("1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn token_store_rotates() {
        let store = MemoryTokenStore::with_token("old");
        assert_eq!(store.load_refresh_token().await.unwrap().as_deref(), Some("old"));
        store.store_refresh_token("new").await.unwrap();
        assert_eq!(store.current().await.as_deref(), Some("new"));
    }
}
