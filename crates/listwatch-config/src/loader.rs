// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./listwatch.toml` > `~/.config/listwatch/listwatch.toml`
//! > `/etc/listwatch/listwatch.toml`, with environment variable overrides via
//! the `LISTWATCH_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ListwatchConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/listwatch/listwatch.toml` (system-wide)
/// 3. `~/.config/listwatch/listwatch.toml` (user XDG config)
/// 4. `./listwatch.toml` (local directory)
/// 5. `LISTWATCH_*` environment variables
pub fn load_config() -> Result<ListwatchConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<ListwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ListwatchConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ListwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ListwatchConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ListwatchConfig::default()))
        .merge(Toml::file("/etc/listwatch/listwatch.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("listwatch/listwatch.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("listwatch.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using an explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `LISTWATCH_GRAPH_CLIENT_ID` must map to
/// `graph.client_id`, not `graph.client.id`.
fn env_provider() -> Env {
    Env::prefixed("LISTWATCH_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped,
        // e.g. LISTWATCH_GRAPH_CLIENT_ID -> "graph_client_id".
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("graph_", "graph.", 1)
            .replacen("relay_", "relay.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
