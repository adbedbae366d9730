// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! deskhand - a terminal client for the GLPI helpdesk.
//!
//! Browse tickets, read conversations, post replies, and self-assign
//! tickets without leaving your shell.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`config`] - Connection settings collection and validation
//! - [`error`] - Error types and result aliases
//! - [`domain`] - Ticket, actor, and followup entities with formatting
//! - [`api`] - Authenticated HTTP client for the GLPI high-level API
//! - [`telemetry`] - Tracing initialization
//! - [`tui`] - ratatui interface: state machine, event pump, rendering
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use deskhand::{api::ApiClient, config};
//!
//! let settings = config::Settings { /* from CLI/env */ ..Default::default() };
//! let client = Arc::new(ApiClient::new(config::resolve(settings)?));
//! deskhand::tui::run(client).await?;
//! ```

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod telemetry;
pub mod tui;

// Re-export commonly used types at crate root
pub use api::ApiClient;
pub use config::{Config, Settings};
pub use domain::{clean_content, format_date, Followup, Ticket, TicketActor};
pub use error::{ApiError, ConfigError, Result};

/// deskhand version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_public_exports() {
        // Verify key types are accessible
        let _err = ApiError::NotAuthenticated;
        let _settings = Settings::default();
    }
}
