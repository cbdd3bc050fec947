// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! listwatch - watches a remote document list and relays changes to
//! webhook endpoints.
//!
//! This is the binary entry point.

mod authorize;
mod doctor;
mod serve;
mod shutdown;

use clap::{Parser, Subcommand};

/// Watch a remote document list and relay changes to webhook endpoints.
#[derive(Parser, Debug)]
#[command(name = "listwatch", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the reconciliation loop (the default).
    Serve,
    /// Complete the interactive OAuth2 authorization flow.
    Authorize,
    /// Run diagnostic checks against the environment.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup; config errors are fatal.
    let config = match listwatch_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            listwatch_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Authorize) => authorize::run_authorize(config).await,
        Some(Commands::Doctor { plain }) => doctor::run_doctor(&config, plain).await,
        Some(Commands::Serve) | None => serve::run_serve(config).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::parse_from(["listwatch", "serve"]);
        assert!(matches!(cli.command, Some(Commands::Serve)));

        let cli = Cli::parse_from(["listwatch", "authorize"]);
        assert!(matches!(cli.command, Some(Commands::Authorize)));

        let cli = Cli::parse_from(["listwatch", "doctor", "--plain"]);
        assert!(matches!(cli.command, Some(Commands::Doctor { plain: true })));
    }

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::parse_from(["listwatch"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = listwatch_config::load_and_validate()
            .expect("default config should be valid");
        assert_eq!(config.service.poll_interval_secs, 3600);
    }
}
