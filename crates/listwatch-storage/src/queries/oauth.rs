// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OAuth refresh-token state operations.
//!
//! The `oauth_state` table holds exactly one row: the most recently rotated
//! refresh token. The old token is invalid the moment the endpoint issues a
//! new one, so there is nothing worth keeping a history of.

use listwatch_core::ListwatchError;
use rusqlite::params;

use crate::database::Database;

/// Load the stored refresh token, if any rotation has been persisted yet.
pub async fn load_refresh_token(db: &Database) -> Result<Option<String>, ListwatchError> {
    db.connection()
        .call(|conn| {
            let result = conn.query_row(
                "SELECT refresh_token FROM oauth_state WHERE id = 1",
                [],
                |row| row.get::<_, String>(0),
            );
            match result {
                Ok(token) => Ok(Some(token)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Persist a newly rotated refresh token, replacing any previous one.
pub async fn store_refresh_token(db: &Database, token: &str) -> Result<(), ListwatchError> {
    let token = token.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO oauth_state (id, refresh_token, rotated_at)
                 VALUES (1, ?1, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                 ON CONFLICT(id) DO UPDATE SET
                     refresh_token = excluded.refresh_token,
                     rotated_at = excluded.rotated_at",
                params![token],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
