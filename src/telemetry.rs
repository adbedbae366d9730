// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tracing initialization.
//!
//! The alternate screen owns stdout, so logs go to a file when one is
//! configured and to stderr otherwise (visible after the TUI exits or
//! when stderr is redirected). `RUST_LOG` overrides the default filter.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::Result;

/// Default filter directive when `RUST_LOG` is not set.
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "deskhand=debug"
    } else {
        "deskhand=warn"
    }
}

/// Install the global tracing subscriber.
pub fn init(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_target(true)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "deskhand=warn");
        assert_eq!(default_directive(true), "deskhand=debug");
    }

    #[test]
    fn test_init_with_log_file() {
        // Only one global subscriber per process; this also covers the
        // file-writer branch for the stderr case run elsewhere.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deskhand.log");
        init(true, Some(&path)).unwrap();
        tracing::warn!("telemetry test line");
        assert!(path.exists());
    }
}
