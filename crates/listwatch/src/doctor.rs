// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `listwatch doctor` command implementation.
//!
//! Runs diagnostic checks against the environment: configuration,
//! database, OAuth state, and relay settings.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use listwatch_config::model::ListwatchConfig;
use listwatch_core::{ListwatchError, TokenStore};
use listwatch_storage::SqliteStore;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

fn check(name: &str, status: CheckStatus, message: String, start: Instant) -> CheckResult {
    CheckResult {
        name: name.to_string(),
        status,
        message,
        duration: start.elapsed(),
    }
}

/// Run the `listwatch doctor` command. With `--plain`, disables colors.
pub async fn run_doctor(config: &ListwatchConfig, plain: bool) -> Result<(), ListwatchError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = vec![
        check_config().await,
        check_graph_settings(config),
        check_relay_endpoints(config),
        check_database(config).await,
    ];

    println!();
    println!("  listwatch doctor");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    let mut warn_count = 0;

    for result in &results {
        let duration_ms = result.duration.as_millis();
        let line = match result.status {
            CheckStatus::Pass => {
                if use_color {
                    use colored::Colorize;
                    format!(
                        "    {} {:<16} {} ({duration_ms}ms)",
                        "✓".green(),
                        result.name,
                        result.message
                    )
                } else {
                    format!(
                        "    [OK]   {:<16} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
            CheckStatus::Warn => {
                warn_count += 1;
                if use_color {
                    use colored::Colorize;
                    format!(
                        "    {} {:<16} {} ({duration_ms}ms)",
                        "!".yellow(),
                        result.name,
                        result.message.yellow()
                    )
                } else {
                    format!(
                        "    [WARN] {:<16} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
            CheckStatus::Fail => {
                fail_count += 1;
                if use_color {
                    use colored::Colorize;
                    format!(
                        "    {} {:<16} {} ({duration_ms}ms)",
                        "✗".red(),
                        result.name,
                        result.message.red()
                    )
                } else {
                    format!(
                        "    [FAIL] {:<16} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
        };
        println!("{line}");
    }

    println!();
    if fail_count > 0 || warn_count > 0 {
        let issues = fail_count + warn_count;
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(())
}

/// Configuration loads and validates.
async fn check_config() -> CheckResult {
    let start = Instant::now();
    match listwatch_config::load_and_validate() {
        Ok(_) => check("Configuration", CheckStatus::Pass, "valid".into(), start),
        Err(errors) => check(
            "Configuration",
            CheckStatus::Fail,
            format!("{} error(s)", errors.len()),
            start,
        ),
    }
}

/// The remote list is actually addressable with the configured settings.
fn check_graph_settings(config: &ListwatchConfig) -> CheckResult {
    let start = Instant::now();
    let mut missing = Vec::new();
    if config.graph.client_id.is_none() {
        missing.push("client_id");
    }
    if config.graph.client_secret.is_none() {
        missing.push("client_secret");
    }
    if config.graph.list.is_none() {
        missing.push("list");
    }

    if missing.is_empty() {
        check(
            "List API",
            CheckStatus::Pass,
            format!("site `{}` configured", config.graph.site),
            start,
        )
    } else {
        check(
            "List API",
            CheckStatus::Fail,
            format!("graph.{} not set", missing.join(", graph.")),
            start,
        )
    }
}

/// At least one relay endpoint is configured.
fn check_relay_endpoints(config: &ListwatchConfig) -> CheckResult {
    let start = Instant::now();
    let count = config.relay.endpoints.len();
    if count == 0 {
        check(
            "Relay",
            CheckStatus::Warn,
            "no endpoints configured, nothing will be announced".into(),
            start,
        )
    } else {
        check(
            "Relay",
            CheckStatus::Pass,
            format!("{count} endpoint(s) configured"),
            start,
        )
    }
}

/// Database opens, answers queries, and holds OAuth state.
async fn check_database(config: &ListwatchConfig) -> CheckResult {
    let start = Instant::now();
    let path = std::path::Path::new(&config.storage.database_path);

    if !path.exists() {
        return check(
            "Database",
            CheckStatus::Warn,
            format!(
                "not found: {} (will be created on first run)",
                config.storage.database_path
            ),
            start,
        );
    }

    let store = SqliteStore::new(config.storage.clone());
    if let Err(e) = store.initialize().await {
        return check("Database", CheckStatus::Fail, format!("cannot open: {e}"), start);
    }
    if let Err(e) = store.health_check().await {
        return check("Database", CheckStatus::Fail, format!("unhealthy: {e}"), start);
    }

    let message = match store.load_refresh_token().await {
        Ok(Some(_)) => "ok, session authorized".to_string(),
        Ok(None) => {
            let has_seed = config
                .graph
                .refresh_token
                .as_deref()
                .is_some_and(|t| !t.is_empty());
            if has_seed {
                "ok, will use configured seed token".to_string()
            } else {
                "ok, but no session -- run `listwatch authorize`".to_string()
            }
        }
        Err(e) => return check("Database", CheckStatus::Fail, format!("query failed: {e}"), start),
    };

    check("Database", CheckStatus::Pass, message, start)
}
