// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as well-formed endpoint URLs and non-empty paths.

use crate::diagnostic::ConfigError;
use crate::model::ListwatchConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ListwatchConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.service.poll_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "service.poll_interval_secs must be at least 1".to_string(),
        });
    }

    for (i, endpoint) in config.relay.endpoints.iter().enumerate() {
        let trimmed = endpoint.trim();
        if trimmed.is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("relay.endpoints[{i}] must not be empty"),
            });
        } else if !trimmed.starts_with("https://") && !trimmed.starts_with("http://") {
            errors.push(ConfigError::Validation {
                message: format!(
                    "relay.endpoints[{i}] `{trimmed}` is not an http(s) URL"
                ),
            });
        }
    }

    if config.relay.accent_color > 0xFF_FF_FF {
        errors.push(ConfigError::Validation {
            message: format!(
                "relay.accent_color must fit 24-bit RGB, got {}",
                config.relay.accent_color
            ),
        });
    }

    if let Some(template) = &config.graph.item_url_template
        && !template.contains("{id}")
    {
        errors.push(ConfigError::Validation {
            message: "graph.item_url_template must contain an `{id}` placeholder".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
