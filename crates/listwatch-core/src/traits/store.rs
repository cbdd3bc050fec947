// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence traits for notification records and OAuth state.

use async_trait::async_trait;

use crate::error::ListwatchError;
use crate::types::NotificationRecord;

/// CRUD persistence for notification records, keyed by remote identifier.
///
/// "Not found" is an expected outcome that drives the create-vs-update
/// branch in the reconciliation engine, so `get` returns `Option` rather
/// than an error.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<NotificationRecord>, ListwatchError>;

    /// All records, ordered by modification time ascending.
    async fn list(&self) -> Result<Vec<NotificationRecord>, ListwatchError>;

    async fn insert(&self, record: &NotificationRecord) -> Result<(), ListwatchError>;

    async fn update(&self, record: &NotificationRecord) -> Result<(), ListwatchError>;

    async fn delete(&self, id: &str) -> Result<(), ListwatchError>;
}

/// Persistence for the rotated OAuth2 refresh token.
///
/// The token endpoint invalidates the old refresh token on every exchange,
/// so the new one must be stored before the access token is used.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load_refresh_token(&self) -> Result<Option<String>, ListwatchError>;

    async fn store_refresh_token(&self, token: &str) -> Result<(), ListwatchError>;
}
