// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row mapping for storage entities.
//!
//! The canonical domain types live in `listwatch-core::types`; this module
//! re-exports them and provides the SQLite row/column codecs, including the
//! JSON encoding of the `message_refs` column.

pub use listwatch_core::types::NotificationRecord;

use listwatch_core::ListwatchError;

/// Column list shared by every record SELECT, in `record_from_row` order.
pub(crate) const RECORD_COLUMNS: &str = "id, name, description, created_on, modified_on, \
     created_by, modified_by, expires_on, has_attachments, message_refs";

/// Map a row (selected via [`RECORD_COLUMNS`]) into a `NotificationRecord`.
pub(crate) fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<NotificationRecord> {
    let refs_json: String = row.get(9)?;
    let message_refs: Vec<String> = serde_json::from_str(&refs_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(9, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(NotificationRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_on: row.get(3)?,
        modified_on: row.get(4)?,
        created_by: row.get(5)?,
        modified_by: row.get(6)?,
        expires_on: row.get(7)?,
        has_attachments: row.get(8)?,
        message_refs,
    })
}

/// Encode message references as the JSON array stored in the TEXT column.
pub(crate) fn encode_refs(refs: &[String]) -> Result<String, ListwatchError> {
    serde_json::to_string(refs)
        .map_err(|e| ListwatchError::Internal(format!("failed to encode message refs: {e}")))
}
