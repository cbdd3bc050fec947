// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `listwatch serve` command implementation.
//!
//! Wires storage, the token manager, the reconciliation engine, and the
//! webhook relay, then runs one cycle per poll interval until a shutdown
//! signal arrives. One sequential worker does everything; there is no
//! concurrency beyond the signal handler.

use std::sync::Arc;
use std::time::Duration;

use listwatch_config::model::ListwatchConfig;
use listwatch_core::{ListwatchError, RecordStore, TokenStore};
use listwatch_graph::{GraphClient, TokenClient};
use listwatch_relay::WebhookRelay;
use listwatch_storage::SqliteStore;
use listwatch_sync::{SessionOutcome, SyncEngine, TokenManager};
use tracing::{error, info, warn};

use crate::shutdown;

/// Runs the `listwatch serve` command.
pub async fn run_serve(config: ListwatchConfig) -> Result<(), ListwatchError> {
    init_tracing(&config.service.log_level);

    info!("starting listwatch serve");

    let storage = Arc::new(SqliteStore::new(config.storage.clone()));
    storage.initialize().await?;

    let token_client = TokenClient::new(&config.graph)?;
    let token_manager = TokenManager::new(
        token_client,
        storage.clone() as Arc<dyn TokenStore>,
        config.graph.refresh_token.clone(),
    );

    let graph = GraphClient::new(&config.graph)?;
    let relay = Arc::new(WebhookRelay::new(
        config.relay.clone(),
        config.graph.item_url_template.clone(),
    )?);

    if config.relay.endpoints.is_empty() {
        warn!("no relay endpoints configured; changes will be recorded but not announced");
    }

    let engine = SyncEngine::new(
        graph,
        storage.clone() as Arc<dyn RecordStore>,
        relay,
        config.relay.endpoints.clone(),
    );

    let cancel = shutdown::install_signal_handler();
    let interval = Duration::from_secs(config.service.poll_interval_secs);
    info!(
        interval_secs = config.service.poll_interval_secs,
        endpoints = config.relay.endpoints.len(),
        "entering reconciliation loop"
    );

    loop {
        run_cycle(&token_manager, &engine).await;

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = cancel.cancelled() => break,
        }
    }

    storage.close().await?;
    info!("listwatch serve shutdown complete");
    Ok(())
}

/// One token refresh + reconciliation pass. Every failure is terminal for
/// this cycle only; the fixed sleep is the sole retry mechanism.
async fn run_cycle(token_manager: &TokenManager, engine: &SyncEngine) {
    match token_manager.ensure_session().await {
        Ok(SessionOutcome::Active(session)) => {
            match engine.reconcile(&session.access_token).await {
                Ok(stats) => info!(
                    pages = stats.pages,
                    created = stats.created,
                    updated = stats.updated,
                    skipped = stats.skipped,
                    "reconciliation cycle complete"
                ),
                Err(e) => error!(error = %e, "reconciliation cycle aborted"),
            }
        }
        Ok(SessionOutcome::Authorizing { authorize_url }) => {
            warn!(
                authorize_url = authorize_url.as_str(),
                "no session available; visit the URL and run `listwatch authorize`"
            );
        }
        Err(e) => {
            error!(error = %e, "token refresh failed, skipping this cycle");
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("listwatch={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
