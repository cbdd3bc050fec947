// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification record CRUD operations.

use listwatch_core::ListwatchError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{NotificationRecord, RECORD_COLUMNS, encode_refs, record_from_row};

/// Get a record by its remote identifier. Returns `None` when absent.
pub async fn get_record(
    db: &Database,
    id: &str,
) -> Result<Option<NotificationRecord>, ListwatchError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RECORD_COLUMNS} FROM notification_records WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], record_from_row);
            match result {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All records, ordered by modification time ascending.
pub async fn list_records(db: &Database) -> Result<Vec<NotificationRecord>, ListwatchError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RECORD_COLUMNS} FROM notification_records ORDER BY modified_on ASC"
            ))?;
            let rows = stmt.query_map([], record_from_row)?;
            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            Ok(records)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert a new record.
pub async fn insert_record(
    db: &Database,
    record: &NotificationRecord,
) -> Result<(), ListwatchError> {
    let record = record.clone();
    let refs_json = encode_refs(&record.message_refs)?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO notification_records
                     (id, name, description, created_on, modified_on,
                      created_by, modified_by, expires_on, has_attachments, message_refs)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    record.id,
                    record.name,
                    record.description,
                    record.created_on,
                    record.modified_on,
                    record.created_by,
                    record.modified_by,
                    record.expires_on,
                    record.has_attachments,
                    refs_json,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update the mutable fields of an existing record. The `id` and
/// `created_on`/`created_by` columns are immutable after creation.
pub async fn update_record(
    db: &Database,
    record: &NotificationRecord,
) -> Result<(), ListwatchError> {
    let record = record.clone();
    let refs_json = encode_refs(&record.message_refs)?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE notification_records SET
                     name = ?1,
                     description = ?2,
                     modified_on = ?3,
                     modified_by = ?4,
                     expires_on = ?5,
                     has_attachments = ?6,
                     message_refs = ?7
                 WHERE id = ?8",
                params![
                    record.name,
                    record.description,
                    record.modified_on,
                    record.modified_by,
                    record.expires_on,
                    record.has_attachments,
                    refs_json,
                    record.id,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a record by id. Deleting an absent id is not an error.
pub async fn delete_record(db: &Database, id: &str) -> Result<(), ListwatchError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM notification_records WHERE id = ?1", params![id])?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
