// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the listwatch crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One remote list item mirrored into the local record store.
///
/// `id` is the stable remote identifier and primary key; it never changes
/// after creation. `modified_on` is compared against the remote value to
/// decide create/update/skip, and is non-decreasing across updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: String,
    pub name: String,
    /// Rich-text body already rendered to simplified markup.
    pub description: String,
    /// Unix timestamps.
    pub created_on: i64,
    pub modified_on: i64,
    /// Display names.
    pub created_by: String,
    pub modified_by: String,
    /// Unix timestamp, clamped to non-negative.
    pub expires_on: i64,
    pub has_attachments: bool,
    /// Ordered message references, one per endpoint that accepted the
    /// initial creation. Endpoints that failed are omitted, not retried.
    pub message_refs: Vec<String>,
}

/// Immutable snapshot of one OAuth2 token exchange.
///
/// The remote endpoint rotates the refresh token on every use; a new
/// snapshot is produced per exchange and the caller persists
/// `refresh_token` before using `access_token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OauthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds of access-token validity reported by the endpoint.
    pub expires_in: u64,
    pub obtained_at: DateTime<Utc>,
}
