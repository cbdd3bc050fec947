// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the listwatch notifier.

use thiserror::Error;

/// The primary error type used across all listwatch crates.
#[derive(Debug, Error)]
pub enum ListwatchError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Record store errors (database connection, query failure, serialization).
    /// "Row not found" is NOT an error -- store lookups return `Option`.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Remote list API errors (transport failure, non-success status, bad JSON).
    #[error("api error: {message}")]
    Api {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// OAuth2 token exchange errors.
    #[error("auth error: {message}")]
    Auth {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Relay endpoint errors (transport failure, non-success status).
    /// Surfaces only from relay construction; per-call relay failures are
    /// logged and swallowed inside the relay itself.
    #[error("relay error: {message}")]
    Relay {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_render_their_context() {
        let config = ListwatchError::Config("bad key".into());
        assert!(config.to_string().contains("bad key"));

        let storage = ListwatchError::Storage {
            source: Box::new(std::io::Error::other("disk gone")),
        };
        assert!(storage.to_string().contains("disk gone"));

        let api = ListwatchError::Api {
            message: "listing returned 500".into(),
            source: None,
        };
        assert!(api.to_string().contains("listing returned 500"));

        let auth = ListwatchError::Auth {
            message: "token endpoint unreachable".into(),
            source: None,
        };
        assert!(auth.to_string().contains("token endpoint"));
    }
}
