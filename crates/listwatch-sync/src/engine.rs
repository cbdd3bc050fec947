// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The reconciliation engine.
//!
//! One cycle walks every page of the remote listing and, for each item,
//! decides create / update / skip against the local record store, then
//! dispatches webhook notifications through the relay.

use std::sync::Arc;

use listwatch_core::types::NotificationRecord;
use listwatch_core::{ListwatchError, RecordStore, Relay};
use listwatch_graph::types::ListItemSummary;
use listwatch_graph::GraphClient;
use tracing::{debug, info, warn};

use crate::markup;

/// Counters for one reconciliation cycle, reported in the serve loop logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub pages: u32,
    pub created: u32,
    pub updated: u32,
    pub skipped: u32,
}

enum ItemOutcome {
    Created,
    Updated,
    Skipped,
}

/// How an item failure propagates, per the cycle's failure semantics:
/// store errors skip only the item; remote fetch or render failures
/// abandon the remainder of the current page.
enum ItemFailure {
    SkipItem(ListwatchError),
    AbortPage(ListwatchError),
}

/// Reconciles the remote listing against the local record store.
pub struct SyncEngine {
    graph: GraphClient,
    store: Arc<dyn RecordStore>,
    relay: Arc<dyn Relay>,
    endpoints: Vec<String>,
}

impl SyncEngine {
    pub fn new(
        graph: GraphClient,
        store: Arc<dyn RecordStore>,
        relay: Arc<dyn Relay>,
        endpoints: Vec<String>,
    ) -> Self {
        Self {
            graph,
            store,
            relay,
            endpoints,
        }
    }

    /// Run one full reconciliation cycle.
    ///
    /// Pages are traversed strictly sequentially, following the cursor
    /// until it is absent or empty. A listing fetch/parse failure aborts
    /// the cycle; the next scheduled cycle starts over from page one.
    pub async fn reconcile(&self, access_token: &str) -> Result<CycleStats, ListwatchError> {
        let mut stats = CycleStats::default();
        let mut url = self.graph.first_page_url();

        loop {
            let page = self.graph.fetch_page(access_token, &url).await?;
            stats.pages += 1;
            debug!(page = stats.pages, items = page.value.len(), "processing listing page");

            for summary in &page.value {
                match self.process_item(access_token, summary).await {
                    Ok(ItemOutcome::Created) => stats.created += 1,
                    Ok(ItemOutcome::Updated) => stats.updated += 1,
                    Ok(ItemOutcome::Skipped) => stats.skipped += 1,
                    Err(ItemFailure::SkipItem(e)) => {
                        warn!(id = %summary.id, error = %e, "skipping item this cycle");
                        stats.skipped += 1;
                    }
                    Err(ItemFailure::AbortPage(e)) => {
                        warn!(id = %summary.id, error = %e, "abandoning remainder of page");
                        break;
                    }
                }
            }

            match page.next_link {
                Some(next) if !next.is_empty() => url = next,
                _ => break,
            }
        }

        Ok(stats)
    }

    async fn process_item(
        &self,
        access_token: &str,
        summary: &ListItemSummary,
    ) -> Result<ItemOutcome, ItemFailure> {
        let stored = self
            .store
            .get(&summary.id)
            .await
            .map_err(ItemFailure::SkipItem)?;

        // Listing-level check first; most items are unchanged and never
        // cost a detail fetch.
        if let Some(stored) = &stored
            && stored.modified_on == summary.modified_unix()
        {
            return Ok(ItemOutcome::Skipped);
        }

        let detail = self
            .graph
            .fetch_item(access_token, &summary.id)
            .await
            .map_err(ItemFailure::AbortPage)?;

        // The detail endpoint is authoritative; listing data may be stale.
        let modified_on = detail.fields.modified_unix();
        if let Some(stored) = &stored
            && stored.modified_on == modified_on
        {
            return Ok(ItemOutcome::Skipped);
        }

        let description =
            markup::simplify_body(&detail.fields.body).map_err(ItemFailure::AbortPage)?;
        let expires_on = detail.fields.expires_unix_clamped();

        match stored {
            None => {
                info!(id = %summary.id, "creating new notification");

                let mut record = NotificationRecord {
                    id: summary.id.clone(),
                    name: detail.fields.title.clone(),
                    description,
                    created_on: detail.fields.created_unix(),
                    modified_on,
                    created_by: detail.created_by.user.display_name.clone(),
                    modified_by: detail.last_modified_by.user.display_name.clone(),
                    expires_on,
                    has_attachments: detail.fields.attachments,
                    message_refs: Vec::new(),
                };

                let mut refs = Vec::new();
                for endpoint in &self.endpoints {
                    if let Some(message_ref) = self.relay.post_new(endpoint, &record).await {
                        refs.push(message_ref);
                    }
                }
                record.message_refs = refs;

                self.store
                    .insert(&record)
                    .await
                    .map_err(ItemFailure::SkipItem)?;
                Ok(ItemOutcome::Created)
            }
            Some(mut record) => {
                info!(id = %summary.id, "updating existing notification");

                record.name = detail.fields.title.clone();
                record.description = description;
                record.modified_on = modified_on;
                record.modified_by = detail.last_modified_by.user.display_name.clone();
                record.expires_on = expires_on;
                record.has_attachments = detail.fields.attachments;

                // Persist first: edit failures must never block the update.
                self.store
                    .update(&record)
                    .await
                    .map_err(ItemFailure::SkipItem)?;

                for message_ref in &record.message_refs {
                    self.relay.edit_existing(message_ref, &record).await;
                }
                Ok(ItemOutcome::Updated)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listwatch_config::model::GraphConfig;
    use listwatch_test_utils::{MemoryRecordStore, RecordingRelay};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LIST_PATH: &str = "/sites/root/lists/board/items";

    fn engine_for(
        server: &MockServer,
        store: Arc<MemoryRecordStore>,
        relay: Arc<RecordingRelay>,
        endpoints: &[&str],
    ) -> SyncEngine {
        let config = GraphConfig {
            graph_base_url: server.uri(),
            list: Some("board".to_string()),
            ..GraphConfig::default()
        };
        let graph = GraphClient::new(&config).unwrap();
        SyncEngine::new(
            graph,
            store,
            relay,
            endpoints.iter().map(|e| e.to_string()).collect(),
        )
    }

    fn summary(id: &str, modified: &str) -> serde_json::Value {
        serde_json::json!({"id": id, "lastModifiedDateTime": modified})
    }

    fn detail(id: &str, modified: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "webUrl": format!("https://example.sharepoint.com/Lists/Board/{id}"),
            "createdBy": {"user": {"displayName": "A. Admin"}},
            "lastModifiedBy": {"user": {"displayName": "B. Editor"}},
            "fields": {
                "Title": format!("Notice {id}"),
                "Body": "<p>Details on <a href=\"https://intranet.example/page\">the page</a></p>",
                "Created": "2024-03-01T08:00:00Z",
                "Modified": modified,
                "Expires": "1901-01-01T00:00:00Z",
                "Attachments": false
            }
        })
    }

    fn unix(iso: &str) -> i64 {
        chrono::DateTime::parse_from_rfc3339(iso).unwrap().timestamp()
    }

    fn seeded_record(id: &str, modified_on: i64, refs: &[&str]) -> NotificationRecord {
        NotificationRecord {
            id: id.to_string(),
            name: format!("Notice {id}"),
            description: "old text".to_string(),
            created_on: modified_on - 1000,
            modified_on,
            created_by: "A. Admin".to_string(),
            modified_by: "A. Admin".to_string(),
            expires_on: 0,
            has_attachments: false,
            message_refs: refs.iter().map(|r| r.to_string()).collect(),
        }
    }

    async fn mount_page(server: &MockServer, items: Vec<serde_json::Value>) {
        Mock::given(method("GET"))
            .and(path(LIST_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"value": items})),
            )
            .mount(server)
            .await;
    }

    async fn mount_detail(server: &MockServer, id: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(format!("{LIST_PATH}/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn unseen_item_takes_the_creation_branch() {
        let server = MockServer::start().await;
        mount_page(&server, vec![summary("1", "2024-03-05T09:30:00Z")]).await;
        mount_detail(&server, "1", detail("1", "2024-03-05T09:30:00Z")).await;

        let store = Arc::new(MemoryRecordStore::new());
        let relay = Arc::new(RecordingRelay::new());
        let engine = engine_for(
            &server,
            store.clone(),
            relay.clone(),
            &["https://hooks.test/a", "https://hooks.test/b"],
        );

        let stats = engine.reconcile("token").await.unwrap();
        assert_eq!(stats.created, 1);
        assert_eq!(stats.updated, 0);

        let stored = store.snapshot().await.remove("1").unwrap();
        assert_eq!(stored.name, "Notice 1");
        assert_eq!(stored.modified_on, unix("2024-03-05T09:30:00Z"));
        assert_eq!(stored.created_by, "A. Admin");
        assert_eq!(stored.modified_by, "B. Editor");
        // Pre-epoch expiry clamps to zero.
        assert_eq!(stored.expires_on, 0);
        // Hyperlink destinations are discarded by the markup pass.
        assert!(stored.description.contains("the page"));
        assert!(!stored.description.contains("intranet.example"));
        // One message reference per accepting endpoint, in endpoint order.
        assert_eq!(stored.message_refs.len(), 2);
        assert!(stored.message_refs[0].starts_with("https://hooks.test/a/messages/"));
        assert!(stored.message_refs[1].starts_with("https://hooks.test/b/messages/"));
        assert_eq!(relay.created_count().await, 2);
        assert_eq!(relay.edited_count().await, 0);
    }

    #[tokio::test]
    async fn unchanged_item_is_skipped_without_any_relay_calls() {
        let server = MockServer::start().await;
        let modified = "2024-03-05T09:30:00Z";
        mount_page(&server, vec![summary("1", modified)]).await;
        // The detail endpoint must not be called at all.
        Mock::given(method("GET"))
            .and(path(format!("{LIST_PATH}/1")))
            .respond_with(ResponseTemplate::new(200).set_body_json(detail("1", modified)))
            .expect(0)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryRecordStore::new());
        store.seed(seeded_record("1", unix(modified), &["https://hooks.test/a/messages/1"])).await;
        let relay = Arc::new(RecordingRelay::new());
        let engine = engine_for(&server, store.clone(), relay.clone(), &["https://hooks.test/a"]);

        let stats = engine.reconcile("token").await.unwrap();
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.created + stats.updated, 0);
        assert_eq!(relay.created_count().await, 0);
        assert_eq!(relay.edited_count().await, 0);
    }

    #[tokio::test]
    async fn stale_listing_is_caught_by_the_detail_recheck() {
        let server = MockServer::start().await;
        let stored_modified = "2024-03-05T09:30:00Z";
        // Listing claims a newer timestamp, but the authoritative detail
        // still carries the stored one.
        mount_page(&server, vec![summary("1", "2024-03-06T10:00:00Z")]).await;
        mount_detail(&server, "1", detail("1", stored_modified)).await;

        let store = Arc::new(MemoryRecordStore::new());
        store.seed(seeded_record("1", unix(stored_modified), &[])).await;
        let relay = Arc::new(RecordingRelay::new());
        let engine = engine_for(&server, store.clone(), relay.clone(), &["https://hooks.test/a"]);

        let stats = engine.reconcile("token").await.unwrap();
        assert_eq!(stats.skipped, 1);
        assert_eq!(relay.created_count().await, 0);
        assert_eq!(relay.edited_count().await, 0);
    }

    #[tokio::test]
    async fn advanced_item_takes_the_update_branch_and_edits_refs() {
        let server = MockServer::start().await;
        let old = "2024-03-05T09:30:00Z";
        let new = "2024-03-06T10:00:00Z";
        mount_page(&server, vec![summary("1", new)]).await;
        mount_detail(&server, "1", detail("1", new)).await;

        let store = Arc::new(MemoryRecordStore::new());
        let refs = [
            "https://hooks.test/a/messages/11",
            "https://hooks.test/b/messages/22",
        ];
        store.seed(seeded_record("1", unix(old), &refs)).await;
        let relay = Arc::new(RecordingRelay::new());
        let engine = engine_for(&server, store.clone(), relay.clone(), &["https://hooks.test/a"]);

        let stats = engine.reconcile("token").await.unwrap();
        assert_eq!(stats.updated, 1);

        // modified_on advanced, never decreased.
        let stored = store.snapshot().await.remove("1").unwrap();
        assert_eq!(stored.modified_on, unix(new));
        assert!(stored.modified_on > unix(old));
        assert_eq!(stored.modified_by, "B. Editor");
        // Refs are edited in stored order and never re-collected.
        let edited = relay.edited().await;
        assert_eq!(edited.len(), 2);
        assert_eq!(edited[0].0, refs[0]);
        assert_eq!(edited[1].0, refs[1]);
        assert_eq!(stored.message_refs.len(), 2);
        assert_eq!(relay.created_count().await, 0);
    }

    #[tokio::test]
    async fn second_reconcile_of_same_state_is_all_skips() {
        let server = MockServer::start().await;
        let modified = "2024-03-05T09:30:00Z";
        mount_page(&server, vec![summary("1", modified)]).await;
        mount_detail(&server, "1", detail("1", modified)).await;

        let store = Arc::new(MemoryRecordStore::new());
        let relay = Arc::new(RecordingRelay::new());
        let engine = engine_for(&server, store.clone(), relay.clone(), &["https://hooks.test/a"]);

        let first = engine.reconcile("token").await.unwrap();
        assert_eq!(first.created, 1);
        let modified_after_first = store.snapshot().await["1"].modified_on;

        let second = engine.reconcile("token").await.unwrap();
        assert_eq!(second.created, 0);
        assert_eq!(second.skipped, 1);
        // Zero further relay calls for the unchanged id.
        assert_eq!(relay.created_count().await, 1);
        assert_eq!(relay.edited_count().await, 0);
        assert_eq!(store.snapshot().await["1"].modified_on, modified_after_first);
    }

    #[tokio::test]
    async fn failing_endpoint_is_omitted_from_message_refs() {
        let server = MockServer::start().await;
        mount_page(&server, vec![summary("1", "2024-03-05T09:30:00Z")]).await;
        mount_detail(&server, "1", detail("1", "2024-03-05T09:30:00Z")).await;

        let store = Arc::new(MemoryRecordStore::new());
        let relay = Arc::new(RecordingRelay::new());
        relay.fail_endpoint("https://hooks.test/b").await;
        let engine = engine_for(
            &server,
            store.clone(),
            relay.clone(),
            &["https://hooks.test/a", "https://hooks.test/b", "https://hooks.test/c"],
        );

        engine.reconcile("token").await.unwrap();

        let stored = store.snapshot().await.remove("1").unwrap();
        assert_eq!(stored.message_refs.len(), 2);
        assert!(stored.message_refs.iter().all(|r| !r.contains("/b/")));
        // All three endpoints were attempted.
        assert_eq!(relay.created_count().await, 3);
    }

    #[tokio::test]
    async fn store_read_failure_skips_the_item_only() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            vec![
                summary("1", "2024-03-05T09:30:00Z"),
                summary("2", "2024-03-05T09:30:00Z"),
            ],
        )
        .await;

        let store = Arc::new(MemoryRecordStore::new());
        store.fail_reads(true).await;
        let relay = Arc::new(RecordingRelay::new());
        let engine = engine_for(&server, store.clone(), relay.clone(), &["https://hooks.test/a"]);

        let stats = engine.reconcile("token").await.unwrap();
        assert_eq!(stats.skipped, 2);
        assert_eq!(relay.created_count().await, 0);
    }

    #[tokio::test]
    async fn detail_failure_abandons_the_rest_of_the_page() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            vec![
                summary("1", "2024-03-05T09:30:00Z"),
                summary("2", "2024-03-05T09:30:00Z"),
            ],
        )
        .await;
        Mock::given(method("GET"))
            .and(path(format!("{LIST_PATH}/1")))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        // Item 2's detail must never be requested after item 1 failed.
        Mock::given(method("GET"))
            .and(path(format!("{LIST_PATH}/2")))
            .respond_with(ResponseTemplate::new(200).set_body_json(detail("2", "2024-03-05T09:30:00Z")))
            .expect(0)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryRecordStore::new());
        let relay = Arc::new(RecordingRelay::new());
        let engine = engine_for(&server, store.clone(), relay.clone(), &["https://hooks.test/a"]);

        let stats = engine.reconcile("token").await.unwrap();
        assert_eq!(stats.created, 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn listing_failure_aborts_the_cycle() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LIST_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryRecordStore::new());
        let relay = Arc::new(RecordingRelay::new());
        let engine = engine_for(&server, store, relay, &["https://hooks.test/a"]);

        assert!(engine.reconcile("token").await.is_err());
    }

    #[tokio::test]
    async fn pagination_follows_the_cursor_to_completion() {
        let server = MockServer::start().await;

        let next = format!("{}{}?page=2", server.uri(), LIST_PATH);
        // Mount the more specific page-2 mock first; wiremock picks the
        // first mock whose matchers all pass.
        Mock::given(method("GET"))
            .and(path(LIST_PATH))
            .and(wiremock::matchers::query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                // Empty cursor ends the traversal.
                "@odata.nextLink": "",
                "value": [summary("2", "2024-03-06T10:00:00Z")]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(LIST_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "@odata.nextLink": next,
                "value": [summary("1", "2024-03-05T09:30:00Z")]
            })))
            .mount(&server)
            .await;
        mount_detail(&server, "1", detail("1", "2024-03-05T09:30:00Z")).await;
        mount_detail(&server, "2", detail("2", "2024-03-06T10:00:00Z")).await;

        let store = Arc::new(MemoryRecordStore::new());
        let relay = Arc::new(RecordingRelay::new());
        let engine = engine_for(&server, store.clone(), relay, &["https://hooks.test/a"]);

        let stats = engine.reconcile("token").await.unwrap();
        assert_eq!(stats.pages, 2);
        assert_eq!(stats.created, 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn insert_failure_after_relay_does_not_abort_the_page() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            vec![
                summary("1", "2024-03-05T09:30:00Z"),
                summary("2", "2024-03-06T10:00:00Z"),
            ],
        )
        .await;
        mount_detail(&server, "1", detail("1", "2024-03-05T09:30:00Z")).await;
        mount_detail(&server, "2", detail("2", "2024-03-06T10:00:00Z")).await;

        let store = Arc::new(MemoryRecordStore::new());
        store.fail_writes(true).await;
        let relay = Arc::new(RecordingRelay::new());
        let engine = engine_for(&server, store.clone(), relay.clone(), &["https://hooks.test/a"]);

        let stats = engine.reconcile("token").await.unwrap();
        assert_eq!(stats.created, 0);
        assert_eq!(stats.skipped, 2);
        // Both items were still attempted against the relay.
        assert_eq!(relay.created_count().await, 2);
        assert!(store.is_empty().await);
    }
}
