// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the listwatch notifier.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so unrecognized config
//! keys are rejected at startup with actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level listwatch configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; a missing config file is not an error.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ListwatchConfig {
    /// Process-level settings (logging, poll cadence).
    #[serde(default)]
    pub service: ServiceConfig,

    /// Remote list API and OAuth2 settings.
    #[serde(default)]
    pub graph: GraphConfig,

    /// Outbound webhook relay settings.
    #[serde(default)]
    pub relay: RelayConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seconds between reconciliation cycles.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_poll_interval_secs() -> u64 {
    3600 // 1 hour, one cycle per access-token lifetime
}

/// Remote list API and OAuth2 configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GraphConfig {
    /// Base URL of the list API (overridable for tests).
    #[serde(default = "default_graph_base_url")]
    pub graph_base_url: String,

    /// Base URL of the OAuth2 authority (overridable for tests).
    #[serde(default = "default_login_base_url")]
    pub login_base_url: String,

    /// Tenant path segment of the OAuth2 authority.
    #[serde(default = "default_tenant")]
    pub tenant: String,

    /// OAuth2 client id. `None` leaves the watcher unable to authorize.
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth2 client secret.
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Seed refresh token for first start. Rotated tokens are persisted in
    /// the database, which takes precedence over this value.
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Scopes requested on every token exchange.
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Site path segment of the listing endpoint.
    #[serde(default = "default_site")]
    pub site: String,

    /// Identifier of the watched list. Required for `serve`.
    #[serde(default)]
    pub list: Option<String>,

    /// Optional deep-link template with an `{id}` placeholder. When unset,
    /// the item's own web URL from the detail response is used.
    #[serde(default)]
    pub item_url_template: Option<String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            graph_base_url: default_graph_base_url(),
            login_base_url: default_login_base_url(),
            tenant: default_tenant(),
            client_id: None,
            client_secret: None,
            refresh_token: None,
            scope: default_scope(),
            site: default_site(),
            list: None,
            item_url_template: None,
        }
    }
}

fn default_graph_base_url() -> String {
    "https://graph.microsoft.com/v1.0".to_string()
}

fn default_login_base_url() -> String {
    "https://login.microsoftonline.com".to_string()
}

fn default_tenant() -> String {
    "organizations".to_string()
}

fn default_scope() -> String {
    "https://graph.microsoft.com/Files.Read.All https://graph.microsoft.com/Sites.Read.All"
        .to_string()
}

fn default_site() -> String {
    "root".to_string()
}

/// Outbound webhook relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Webhook URLs that receive every new notification.
    #[serde(default)]
    pub endpoints: Vec<String>,

    /// Display name the relay posts under.
    #[serde(default = "default_username")]
    pub username: String,

    /// Avatar URL for relayed messages.
    #[serde(default)]
    pub avatar_url: String,

    /// Plain-content line accompanying the embed.
    #[serde(default = "default_content")]
    pub content: String,

    /// Optional thumbnail shown on every embed.
    #[serde(default)]
    pub thumbnail_url: Option<String>,

    /// 24-bit RGB accent color of the embed.
    #[serde(default = "default_accent_color")]
    pub accent_color: u32,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            username: default_username(),
            avatar_url: String::new(),
            content: default_content(),
            thumbnail_url: None,
            accent_color: default_accent_color(),
        }
    }
}

fn default_username() -> String {
    "listwatch".to_string()
}

fn default_content() -> String {
    "New notice posted".to_string()
}

fn default_accent_color() -> u32 {
    0xE8_DF_CF
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("listwatch").join("listwatch.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("listwatch.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}
