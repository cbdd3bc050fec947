// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording relay for deterministic testing.
//!
//! `RecordingRelay` implements `Relay` without any network I/O: create
//! calls are captured and answered with synthetic message references,
//! edit calls are captured verbatim. Individual endpoints can be marked
//! as failing to exercise the partial-success paths.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::Mutex;

use listwatch_core::Relay;
use listwatch_core::types::NotificationRecord;

/// A relay that records every call instead of talking to a webhook.
#[derive(Default)]
pub struct RecordingRelay {
    created: Mutex<Vec<(String, NotificationRecord)>>,
    edited: Mutex<Vec<(String, NotificationRecord)>>,
    failing_endpoints: Mutex<HashSet<String>>,
    next_id: Mutex<u64>,
}

impl RecordingRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `post_new` against this endpoint return `None`, as a transport
    /// failure would.
    pub async fn fail_endpoint(&self, endpoint: &str) {
        self.failing_endpoints
            .lock()
            .await
            .insert(endpoint.to_string());
    }

    /// All `(endpoint, record)` pairs passed to `post_new`, including ones
    /// that were answered with a failure.
    pub async fn created(&self) -> Vec<(String, NotificationRecord)> {
        self.created.lock().await.clone()
    }

    /// All `(message_ref, record)` pairs passed to `edit_existing`.
    pub async fn edited(&self) -> Vec<(String, NotificationRecord)> {
        self.edited.lock().await.clone()
    }

    pub async fn created_count(&self) -> usize {
        self.created.lock().await.len()
    }

    pub async fn edited_count(&self) -> usize {
        self.edited.lock().await.len()
    }
}

#[async_trait]
impl Relay for RecordingRelay {
    async fn post_new(&self, endpoint: &str, record: &NotificationRecord) -> Option<String> {
        self.created
            .lock()
            .await
            .push((endpoint.to_string(), record.clone()));

        if self.failing_endpoints.lock().await.contains(endpoint) {
            return None;
        }

        let mut next_id = self.next_id.lock().await;
        *next_id += 1;
        Some(format!("{endpoint}/messages/{next_id}"))
    }

    async fn edit_existing(&self, message_ref: &str, record: &NotificationRecord) {
        self.edited
            .lock()
            .await
            .push((message_ref.to_string(), record.clone()));
    }
}
