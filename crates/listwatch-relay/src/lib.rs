// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook notification relay for the listwatch notifier.
//!
//! Implements [`Relay`] over Discord-style webhook endpoints: POST to
//! create a message (collecting the acknowledged message id), PATCH a
//! previously returned message reference to edit it in place. All
//! transport and status anomalies are logged and treated as non-fatal.

pub mod payload;

use std::time::Duration;

use async_trait::async_trait;
use listwatch_config::model::RelayConfig;
use listwatch_core::types::NotificationRecord;
use listwatch_core::{ListwatchError, Relay};
use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::payload::build_payload;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Acknowledgement returned by a create-mode webhook call.
#[derive(Debug, Deserialize)]
struct CreateAck {
    id: String,
}

/// Webhook relay posting formatted notification embeds.
pub struct WebhookRelay {
    client: reqwest::Client,
    settings: RelayConfig,
    /// Deep-link template with an `{id}` placeholder; no link when unset.
    item_url_template: Option<String>,
}

impl WebhookRelay {
    pub fn new(
        settings: RelayConfig,
        item_url_template: Option<String>,
    ) -> Result<Self, ListwatchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ListwatchError::Relay {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            settings,
            item_url_template,
        })
    }

    fn item_url(&self, record: &NotificationRecord) -> Option<String> {
        self.item_url_template
            .as_ref()
            .map(|template| template.replace("{id}", &record.id))
    }
}

#[async_trait]
impl Relay for WebhookRelay {
    async fn post_new(&self, endpoint: &str, record: &NotificationRecord) -> Option<String> {
        let body = build_payload(record, &self.settings, self.item_url(record));
        // wait=true makes the endpoint return the created message instead
        // of an empty 204, so the message id can be captured.
        let url = format!("{endpoint}?wait=true");

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(endpoint, error = %e, "failed to post to webhook");
                return None;
            }
        };

        let status = response.status();
        debug!(endpoint, status = %status, "webhook create responded");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(endpoint, status = %status, body, "webhook rejected create");
            return None;
        }

        let ack: CreateAck = match response.json().await {
            Ok(ack) => ack,
            Err(e) => {
                error!(endpoint, error = %e, "could not parse webhook acknowledgement");
                return None;
            }
        };

        Some(format!("{endpoint}/messages/{}", ack.id))
    }

    async fn edit_existing(&self, message_ref: &str, record: &NotificationRecord) {
        let body = build_payload(record, &self.settings, self.item_url(record));

        let response = match self.client.patch(message_ref).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(message_ref, error = %e, "failed to edit webhook message");
                return;
            }
        };

        let status = response.status();
        debug!(message_ref, status = %status, "webhook edit responded");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(message_ref, status = %status, body, "webhook rejected edit");
        }
    }
}
