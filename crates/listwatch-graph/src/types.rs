// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed response structures for the remote list API and token endpoint.
//!
//! All remote JSON is decoded into explicit structs; missing optional
//! fields decode as their zero value rather than erroring.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One page of the paginated listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPage {
    /// Cursor to the next page; absent or empty signals end of pagination.
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,

    #[serde(default)]
    pub value: Vec<ListItemSummary>,
}

/// Summary entry from the listing endpoint. Listing data may be stale; the
/// detail endpoint is authoritative for modification times.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemSummary {
    pub id: String,

    pub last_modified_date_time: DateTime<Utc>,

    #[serde(default)]
    pub web_url: String,
}

impl ListItemSummary {
    /// Listing-reported modification time as a Unix timestamp.
    pub fn modified_unix(&self) -> i64 {
        self.last_modified_date_time.timestamp()
    }
}

/// Full item payload from the detail endpoint (`?expand=fields`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetail {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub web_url: String,

    #[serde(default)]
    pub created_by: IdentitySet,

    #[serde(default)]
    pub last_modified_by: IdentitySet,

    #[serde(default)]
    pub fields: ItemFields,
}

/// Wrapper the API uses around user identities.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentitySet {
    #[serde(default)]
    pub user: Identity,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default)]
    pub display_name: String,

    #[serde(default)]
    pub email: String,
}

/// The list-specific columns of an item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemFields {
    #[serde(default)]
    pub title: String,

    /// Rich-text (HTML) body.
    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub created: Option<DateTime<Utc>>,

    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,

    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,

    #[serde(default)]
    pub attachments: bool,
}

impl ItemFields {
    pub fn created_unix(&self) -> i64 {
        self.created.map(|t| t.timestamp()).unwrap_or(0)
    }

    pub fn modified_unix(&self) -> i64 {
        self.modified.map(|t| t.timestamp()).unwrap_or(0)
    }

    /// Expiry as a Unix timestamp, clamped to non-negative. Dates before
    /// the epoch (the API's "no expiry" placeholder) become 0.
    pub fn expires_unix_clamped(&self) -> i64 {
        self.expires.map(|t| t.timestamp()).unwrap_or(0).max(0)
    }
}

/// Response of the OAuth2 token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token_type: String,

    #[serde(default)]
    pub scope: String,

    #[serde(default)]
    pub expires_in: u64,

    #[serde(default)]
    pub ext_expires_in: u64,

    pub access_token: String,

    #[serde(default)]
    pub refresh_token: String,
}
