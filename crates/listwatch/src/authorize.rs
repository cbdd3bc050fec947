// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `listwatch authorize` command implementation.
//!
//! The explicit out-of-process authorization step: prints the consent URL,
//! reads the authorization code from stdin, exchanges it, and persists the
//! resulting refresh token. After this, `serve` refreshes on its own.

use std::io::Write;
use std::sync::Arc;

use listwatch_config::model::ListwatchConfig;
use listwatch_core::{ListwatchError, TokenStore};
use listwatch_graph::TokenClient;
use listwatch_storage::SqliteStore;
use listwatch_sync::TokenManager;

/// Runs the `listwatch authorize` command.
pub async fn run_authorize(config: ListwatchConfig) -> Result<(), ListwatchError> {
    let storage = Arc::new(SqliteStore::new(config.storage.clone()));
    storage.initialize().await?;

    let token_client = TokenClient::new(&config.graph)?;
    let manager = TokenManager::new(
        token_client,
        storage.clone() as Arc<dyn TokenStore>,
        config.graph.refresh_token.clone(),
    );

    println!("Visit this URL and grant access:");
    println!();
    println!("  {}", manager.authorize_url());
    println!();
    print!("Paste the authorization code: ");
    std::io::stdout()
        .flush()
        .map_err(|e| ListwatchError::Internal(format!("failed to flush stdout: {e}")))?;

    let mut code = String::new();
    std::io::stdin()
        .read_line(&mut code)
        .map_err(|e| ListwatchError::Internal(format!("failed to read input: {e}")))?;

    if code.trim().is_empty() {
        return Err(ListwatchError::Auth {
            message: "no authorization code entered".into(),
            source: None,
        });
    }

    manager.complete_authorization(&code).await?;
    storage.close().await?;

    println!("Authorization complete. `listwatch serve` can now refresh on its own.");
    Ok(())
}
