// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OAuth2 token endpoint client.
//!
//! Exchanges a refresh token or an authorization code for a fresh
//! access+refresh token pair. Every successful exchange yields a new
//! immutable [`OauthSession`] snapshot; the endpoint invalidates the old
//! refresh token on each use, so callers persist the new one before using
//! the access token.

use std::time::Duration;

use chrono::Utc;
use listwatch_config::model::GraphConfig;
use listwatch_core::{ListwatchError, OauthSession};
use tracing::debug;

use crate::types::TokenResponse;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the form-encoded OAuth2 token endpoint.
#[derive(Debug, Clone)]
pub struct TokenClient {
    client: reqwest::Client,
    token_url: String,
    authorize_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
}

impl TokenClient {
    /// Creates a new token client. Requires `graph.client_id` and
    /// `graph.client_secret` to be configured.
    pub fn new(config: &GraphConfig) -> Result<Self, ListwatchError> {
        let client_id = config
            .client_id
            .clone()
            .ok_or_else(|| ListwatchError::Config("graph.client_id is required".into()))?;
        let client_secret = config
            .client_secret
            .clone()
            .ok_or_else(|| ListwatchError::Config("graph.client_secret is required".into()))?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ListwatchError::Auth {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        let authority = format!(
            "{}/{}/oauth2/v2.0",
            config.login_base_url.trim_end_matches('/'),
            config.tenant
        );

        Ok(Self {
            client,
            token_url: format!("{authority}/token"),
            authorize_url: format!("{authority}/authorize"),
            client_id,
            client_secret,
            scope: config.scope.clone(),
        })
    }

    /// The URL a user must visit to grant consent and obtain an
    /// authorization code.
    pub fn authorize_url(&self) -> String {
        let scope = format!("offline_access {}", self.scope).replace(' ', "%20");
        format!(
            "{}?client_id={}&response_type=code&response_mode=query&scope={}",
            self.authorize_url, self.client_id, scope
        )
    }

    /// Exchange a refresh token for a new session snapshot.
    pub async fn refresh(&self, refresh_token: &str) -> Result<OauthSession, ListwatchError> {
        self.exchange(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("scope", self.scope.as_str()),
            ("grant_type", "refresh_token"),
        ])
        .await
    }

    /// Exchange an interactive authorization code for a session snapshot.
    pub async fn exchange_code(&self, code: &str) -> Result<OauthSession, ListwatchError> {
        self.exchange(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("scope", self.scope.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .await
    }

    async fn exchange(&self, form: &[(&str, &str)]) -> Result<OauthSession, ListwatchError> {
        let response = self
            .client
            .post(&self.token_url)
            .form(form)
            .send()
            .await
            .map_err(|e| ListwatchError::Auth {
                message: format!("token request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "token endpoint responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ListwatchError::Auth {
                message: format!("token endpoint returned {status}: {body}"),
                source: None,
            });
        }

        let body = response.text().await.map_err(|e| ListwatchError::Auth {
            message: format!("failed to read token response: {e}"),
            source: Some(Box::new(e)),
        })?;
        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| ListwatchError::Auth {
                message: format!("failed to parse token response: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(OauthSession {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_in: token.expires_in,
            obtained_at: Utc::now(),
        })
    }
}
