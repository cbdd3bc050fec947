// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook payload construction: embed layout, description truncation, and
//! timestamp formatting.

use chrono::DateTime;
use listwatch_config::model::RelayConfig;
use listwatch_core::types::NotificationRecord;
use serde::Serialize;

/// Maximum description length the relay target renders.
pub const MAX_DESCRIPTION_CHARS: usize = 4096;

/// JSON body posted to a webhook endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    pub username: String,
    pub avatar_url: String,
    pub content: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Embed {
    pub author: EmbedAuthor,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedThumbnail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedAuthor {
    pub name: String,
    pub url: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedThumbnail {
    pub url: String,
}

/// Build the webhook body for a record. The same body is used for create
/// and edit; only the HTTP method and target URL differ.
pub fn build_payload(
    record: &NotificationRecord,
    settings: &RelayConfig,
    item_url: Option<String>,
) -> WebhookPayload {
    let created = format_timestamp(record.created_on);
    let modified = format_timestamp(record.modified_on);

    WebhookPayload {
        username: settings.username.clone(),
        avatar_url: settings.avatar_url.clone(),
        content: settings.content.clone(),
        embeds: vec![Embed {
            author: EmbedAuthor {
                name: record.created_by.clone(),
                url: String::new(),
                icon_url: String::new(),
            },
            title: record.name.clone(),
            url: item_url,
            description: truncate_description(&record.description),
            color: settings.accent_color,
            fields: vec![
                EmbedField {
                    name: "Created".to_string(),
                    value: format!("`{created}`"),
                    inline: true,
                },
                EmbedField {
                    name: "Last modified".to_string(),
                    value: format!("`{modified}`"),
                    inline: true,
                },
                EmbedField {
                    name: "Modified by".to_string(),
                    value: format!("`{}`", record.modified_by),
                    inline: true,
                },
            ],
            thumbnail: settings
                .thumbnail_url
                .clone()
                .map(|url| EmbedThumbnail { url }),
        }],
    }
}

/// Cut a description exceeding the display limit to `limit - 3` characters
/// and append an ellipsis. Counted in characters, not bytes.
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() <= MAX_DESCRIPTION_CHARS {
        return description.to_string();
    }
    let mut cut: String = description
        .chars()
        .take(MAX_DESCRIPTION_CHARS - 3)
        .collect();
    cut.push_str("...");
    cut
}

/// Render a Unix timestamp for the embed fields.
fn format_timestamp(unix: i64) -> String {
    DateTime::from_timestamp(unix, 0)
        .map(|t| t.format("%d %b %Y %H:%M UTC").to_string())
        .unwrap_or_else(|| unix.to_string())
}
