// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the remote list API.
//!
//! Provides [`GraphClient`] for the paginated listing endpoint and the
//! per-item detail endpoint. Base URLs come from configuration, so tests
//! point the client at a wiremock server.

use std::time::Duration;

use listwatch_config::model::GraphConfig;
use listwatch_core::ListwatchError;
use tracing::debug;

use crate::types::{ItemDetail, ListPage};

/// Timeout applied to every list/detail request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the bearer-authenticated list API.
#[derive(Debug, Clone)]
pub struct GraphClient {
    client: reqwest::Client,
    base_url: String,
    site: String,
    list: String,
}

impl GraphClient {
    /// Creates a new list API client. Requires `graph.list` to be configured.
    pub fn new(config: &GraphConfig) -> Result<Self, ListwatchError> {
        let list = config
            .list
            .clone()
            .ok_or_else(|| ListwatchError::Config("graph.list is required".into()))?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ListwatchError::Api {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.graph_base_url.trim_end_matches('/').to_string(),
            site: config.site.clone(),
            list,
        })
    }

    /// URL of the first listing page. Subsequent pages come from the
    /// `next_link` cursor verbatim.
    pub fn first_page_url(&self) -> String {
        format!(
            "{}/sites/{}/lists/{}/items",
            self.base_url, self.site, self.list
        )
    }

    /// Fetch one listing page from the given URL.
    pub async fn fetch_page(
        &self,
        access_token: &str,
        url: &str,
    ) -> Result<ListPage, ListwatchError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ListwatchError::Api {
                message: format!("listing request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, url, "listing page received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ListwatchError::Api {
                message: format!("listing returned {status}: {body}"),
                source: None,
            });
        }

        let body = response.text().await.map_err(|e| ListwatchError::Api {
            message: format!("failed to read listing body: {e}"),
            source: Some(Box::new(e)),
        })?;
        serde_json::from_str(&body).map_err(|e| ListwatchError::Api {
            message: format!("failed to parse listing response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Fetch the full detail of one item, including its list columns.
    pub async fn fetch_item(
        &self,
        access_token: &str,
        id: &str,
    ) -> Result<ItemDetail, ListwatchError> {
        let url = format!("{}/{}?expand=fields", self.first_page_url(), id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ListwatchError::Api {
                message: format!("item request failed for {id}: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, id, "item detail received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ListwatchError::Api {
                message: format!("item {id} returned {status}: {body}"),
                source: None,
            });
        }

        let body = response.text().await.map_err(|e| ListwatchError::Api {
            message: format!("failed to read item body for {id}: {e}"),
            source: Some(Box::new(e)),
        })?;
        serde_json::from_str(&body).map_err(|e| ListwatchError::Api {
            message: format!("failed to parse item response for {id}: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> GraphConfig {
        GraphConfig {
            graph_base_url: base_url.to_string(),
            list: Some("list-1".to_string()),
            ..GraphConfig::default()
        }
    }

    #[tokio::test]
    async fn new_requires_list_id() {
        let config = GraphConfig::default();
        assert!(GraphClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn fetch_page_sends_bearer_and_parses_items() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "value": [
                {"id": "1", "lastModifiedDateTime": "2024-03-05T09:30:00Z"},
                {"id": "2", "lastModifiedDateTime": "2024-03-06T10:00:00Z"}
            ]
        });

        Mock::given(method("GET"))
            .and(path("/sites/root/lists/list-1/items"))
            .and(header("authorization", "Bearer token-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let client = GraphClient::new(&test_config(&server.uri())).unwrap();
        let page = client
            .fetch_page("token-abc", &client.first_page_url())
            .await
            .unwrap();

        assert_eq!(page.value.len(), 2);
        assert!(page.next_link.is_none());
    }

    #[tokio::test]
    async fn fetch_page_follows_cursor_url_verbatim() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/continue"))
            .and(query_param("skiptoken", "xyz"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{"id": "3", "lastModifiedDateTime": "2024-03-07T08:00:00Z"}]
            })))
            .mount(&server)
            .await;

        let client = GraphClient::new(&test_config(&server.uri())).unwrap();
        let next = format!("{}/continue?skiptoken=xyz", server.uri());
        let page = client.fetch_page("token-abc", &next).await.unwrap();
        assert_eq!(page.value[0].id, "3");
    }

    #[tokio::test]
    async fn fetch_page_fails_on_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sites/root/lists/list-1/items"))
            .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
            .mount(&server)
            .await;

        let client = GraphClient::new(&test_config(&server.uri())).unwrap();
        let err = client
            .fetch_page("stale", &client.first_page_url())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("401"), "got: {err}");
    }

    #[tokio::test]
    async fn fetch_page_fails_on_malformed_json() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sites/root/lists/list-1/items"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = GraphClient::new(&test_config(&server.uri())).unwrap();
        let err = client
            .fetch_page("token-abc", &client.first_page_url())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("parse"), "got: {err}");
    }

    #[tokio::test]
    async fn fetch_item_expands_fields() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "id": "7",
            "webUrl": "https://example.sharepoint.com/Lists/Board/7",
            "createdBy": {"user": {"displayName": "A. Admin"}},
            "lastModifiedBy": {"user": {"displayName": "A. Admin"}},
            "fields": {
                "Title": "Canteen closed",
                "Body": "<p>See the board</p>",
                "Modified": "2024-03-05T09:30:00Z",
                "Created": "2024-03-01T08:00:00Z"
            }
        });

        Mock::given(method("GET"))
            .and(path("/sites/root/lists/list-1/items/7"))
            .and(query_param("expand", "fields"))
            .and(header("authorization", "Bearer token-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let client = GraphClient::new(&test_config(&server.uri())).unwrap();
        let detail = client.fetch_item("token-abc", "7").await.unwrap();
        assert_eq!(detail.fields.title, "Canteen closed");
        assert_eq!(detail.created_by.user.display_name, "A. Admin");
    }
}
