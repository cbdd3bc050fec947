// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OAuth2 token lifecycle.
//!
//! The session state machine is `Uninitialized -> Authorizing -> Active`.
//! `ensure_session` drives the refresh path; the interactive authorization
//! step is an explicit out-of-process action (`listwatch authorize`) rather
//! than anything the serve loop blocks on.

use std::sync::Arc;

use listwatch_core::{ListwatchError, OauthSession, TokenStore};
use listwatch_graph::TokenClient;
use tracing::{debug, info, warn};

/// Result of a session check at the start of a cycle.
#[derive(Debug)]
pub enum SessionOutcome {
    /// A fresh session snapshot; its rotated refresh token is already persisted.
    Active(OauthSession),
    /// No refresh token is known. The operator must complete the
    /// authorization flow at the given URL via `listwatch authorize`.
    Authorizing { authorize_url: String },
}

/// Maintains API access across cycles and process restarts.
pub struct TokenManager {
    client: TokenClient,
    store: Arc<dyn TokenStore>,
    /// Refresh token from the config file, used only until the first
    /// rotation has been persisted.
    seed_refresh_token: Option<String>,
}

impl TokenManager {
    pub fn new(
        client: TokenClient,
        store: Arc<dyn TokenStore>,
        seed_refresh_token: Option<String>,
    ) -> Self {
        Self {
            client,
            store,
            seed_refresh_token,
        }
    }

    /// Obtain a session snapshot for the coming cycle.
    ///
    /// The persisted refresh token wins over the configured seed. The
    /// rotated token is persisted before the snapshot is returned; losing
    /// it would invalidate the session permanently. On exchange failure
    /// the caller must skip reconciliation for this cycle -- the outer
    /// loop's fixed sleep is the only retry mechanism.
    pub async fn ensure_session(&self) -> Result<SessionOutcome, ListwatchError> {
        let refresh_token = match self.store.load_refresh_token().await? {
            Some(token) if !token.is_empty() => {
                debug!("using persisted refresh token");
                Some(token)
            }
            _ => self
                .seed_refresh_token
                .clone()
                .filter(|token| !token.is_empty()),
        };

        let Some(refresh_token) = refresh_token else {
            info!("no refresh token known, authorization required");
            return Ok(SessionOutcome::Authorizing {
                authorize_url: self.client.authorize_url(),
            });
        };

        let session = self.client.refresh(&refresh_token).await?;
        self.persist_rotation(&session).await?;
        Ok(SessionOutcome::Active(session))
    }

    /// Complete the interactive authorization flow with the code the user
    /// obtained from the authorization URL.
    pub async fn complete_authorization(
        &self,
        code: &str,
    ) -> Result<OauthSession, ListwatchError> {
        let session = self.client.exchange_code(code.trim()).await?;
        self.persist_rotation(&session).await?;
        info!("authorization complete, refresh token persisted");
        Ok(session)
    }

    /// The URL the operator must visit to obtain an authorization code.
    pub fn authorize_url(&self) -> String {
        self.client.authorize_url()
    }

    async fn persist_rotation(&self, session: &OauthSession) -> Result<(), ListwatchError> {
        if session.refresh_token.is_empty() {
            // The endpoint rotates tokens on every exchange in practice;
            // an absent one means the previous token stays valid.
            warn!("token exchange returned no refresh token, keeping previous");
            return Ok(());
        }
        self.store
            .store_refresh_token(&session.refresh_token)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listwatch_config::model::GraphConfig;
    use listwatch_test_utils::MemoryTokenStore;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn graph_config(login_base: &str) -> GraphConfig {
        GraphConfig {
            login_base_url: login_base.to_string(),
            client_id: Some("client-1".to_string()),
            client_secret: Some("secret-1".to_string()),
            ..GraphConfig::default()
        }
    }

    fn manager(
        login_base: &str,
        store: Arc<MemoryTokenStore>,
        seed: Option<&str>,
    ) -> TokenManager {
        let client = TokenClient::new(&graph_config(login_base)).unwrap();
        TokenManager::new(client, store, seed.map(str::to_string))
    }

    fn token_body(access: &str, refresh: &str) -> serde_json::Value {
        serde_json::json!({
            "token_type": "Bearer",
            "expires_in": 3600,
            "access_token": access,
            "refresh_token": refresh,
        })
    }

    #[tokio::test]
    async fn no_token_anywhere_means_authorizing() {
        let store = Arc::new(MemoryTokenStore::new());
        let manager = manager("https://login.example", store, None);

        match manager.ensure_session().await.unwrap() {
            SessionOutcome::Authorizing { authorize_url } => {
                assert!(authorize_url.contains("client_id=client-1"));
            }
            other => panic!("expected Authorizing, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn seed_token_is_used_and_rotation_persisted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/organizations/oauth2/v2.0/token"))
            .and(body_string_contains("refresh_token=seed-rt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("at-1", "rt-1")))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        let manager = manager(&server.uri(), store.clone(), Some("seed-rt"));

        match manager.ensure_session().await.unwrap() {
            SessionOutcome::Active(session) => {
                assert_eq!(session.access_token, "at-1");
                assert_eq!(session.refresh_token, "rt-1");
            }
            other => panic!("expected Active, got {other:?}"),
        }
        // The rotation is persisted before the snapshot is handed out.
        assert_eq!(store.current().await.as_deref(), Some("rt-1"));
    }

    #[tokio::test]
    async fn persisted_token_wins_over_seed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/organizations/oauth2/v2.0/token"))
            .and(body_string_contains("refresh_token=stored-rt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("at-2", "rt-2")))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::with_token("stored-rt"));
        let manager = manager(&server.uri(), store.clone(), Some("stale-seed"));

        match manager.ensure_session().await.unwrap() {
            SessionOutcome::Active(session) => assert_eq!(session.access_token, "at-2"),
            other => panic!("expected Active, got {other:?}"),
        }
        assert_eq!(store.current().await.as_deref(), Some("rt-2"));
    }

    #[tokio::test]
    async fn exchange_failure_surfaces_and_keeps_stored_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/organizations/oauth2/v2.0/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::with_token("stored-rt"));
        let manager = manager(&server.uri(), store.clone(), None);

        assert!(manager.ensure_session().await.is_err());
        assert_eq!(store.current().await.as_deref(), Some("stored-rt"));
    }

    #[tokio::test]
    async fn missing_rotation_keeps_previous_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/organizations/oauth2/v2.0/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access_token": "at-3"})),
            )
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::with_token("stored-rt"));
        let manager = manager(&server.uri(), store.clone(), None);

        match manager.ensure_session().await.unwrap() {
            SessionOutcome::Active(session) => assert_eq!(session.access_token, "at-3"),
            other => panic!("expected Active, got {other:?}"),
        }
        assert_eq!(store.current().await.as_deref(), Some("stored-rt"));
    }

    #[tokio::test]
    async fn complete_authorization_persists_first_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/organizations/oauth2/v2.0/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=pasted-code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("at-0", "rt-0")))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        let manager = manager(&server.uri(), store.clone(), None);

        // Trailing newline from interactive input is tolerated.
        let session = manager.complete_authorization("pasted-code\n").await.unwrap();
        assert_eq!(session.access_token, "at-0");
        assert_eq!(store.current().await.as_deref(), Some("rt-0"));
    }
}
