// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound notification relay trait.

use async_trait::async_trait;

use crate::types::NotificationRecord;

/// Webhook-style relay that posts a formatted message for a record, or
/// edits a previously posted one.
///
/// All transport and status-code anomalies are logged inside the
/// implementation and treated as non-fatal: `post_new` reports failure as
/// `None`, `edit_existing` reports nothing at all.
#[async_trait]
pub trait Relay: Send + Sync {
    /// Posts a new message to `endpoint` and returns the message reference
    /// (`"<endpoint>/messages/<id>"`), or `None` on any failure.
    async fn post_new(&self, endpoint: &str, record: &NotificationRecord) -> Option<String>;

    /// Re-sends the formatted content to a previously returned reference.
    /// Fire-and-forget: failures are logged and dropped.
    async fn edit_existing(&self, message_ref: &str, record: &NotificationRecord);
}
