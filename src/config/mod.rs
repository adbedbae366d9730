// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration loading and validation.
//!
//! Credentials come in through CLI flags or their `GLPI_*` environment
//! variables (bound by clap in `main`). This module only validates the
//! collected values; every field is required before the client can start.

pub mod loader;

pub use loader::{resolve, Config, Settings};
