// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! deskhand entry point: CLI parsing, config validation, TUI launch.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use deskhand::api::ApiClient;
use deskhand::config::{self, Settings};
use deskhand::{telemetry, tui};

/// deskhand - browse, answer, and grab GLPI tickets from the terminal.
#[derive(Parser)]
#[command(name = "deskhand")]
#[command(author, version, about = "Terminal client for the GLPI helpdesk", long_about = None)]
struct Cli {
    /// Base URL of the GLPI high-level API (e.g. https://glpi.example.com/api.php)
    #[arg(long, env = "GLPI_BASE_URL")]
    base_url: Option<String>,

    /// OAuth client id for the password grant
    #[arg(long, env = "GLPI_CLIENT_ID")]
    client_id: Option<String>,

    /// OAuth client secret for the password grant
    #[arg(long, env = "GLPI_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// GLPI account username
    #[arg(long, env = "GLPI_USER")]
    username: Option<String>,

    /// GLPI account password
    #[arg(long, env = "GLPI_PASS", hide_env_values = true)]
    password: Option<String>,

    /// Write debug-level logs
    #[arg(long)]
    debug: bool,

    /// Log file path (stdout belongs to the TUI)
    #[arg(long, env = "DESKHAND_LOG")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(cli.debug, cli.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let settings = Settings {
        base_url: cli.base_url,
        client_id: cli.client_id,
        client_secret: cli.client_secret,
        username: cli.username,
        password: cli.password,
    };
    let config = match config::resolve(settings) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            eprintln!("Set the GLPI_* environment variables or pass the matching flags.");
            return ExitCode::FAILURE;
        }
    };

    let client = Arc::new(ApiClient::new(config));
    match tui::run(client).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Terminal error: {e}");
            ExitCode::FAILURE
        }
    }
}
