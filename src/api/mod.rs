// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! GLPI API client: session state plus the ticket operations.

pub mod client;
pub mod types;

pub use client::ApiClient;
