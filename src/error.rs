// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types for the deskhand helpdesk client.
//!
//! This module provides strongly-typed errors for different parts of the
//! application, using `thiserror` for ergonomic error definitions and
//! `anyhow` for error propagation.

use thiserror::Error;

/// Errors that can occur when talking to the GLPI API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication failed (HTTP {status}): {body}")]
    Auth { status: u16, body: String },

    #[error("Not authenticated: no bearer token stored")]
    NotAuthenticated,

    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Response decoding error: {0}")]
    Decode(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("{0}")]
    Precondition(String),
}

impl ApiError {
    /// Create an API error from a non-success status and response body.
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Create an authentication error from the token endpoint response.
    pub fn auth(status: u16, body: impl Into<String>) -> Self {
        Self::Auth {
            status,
            body: body.into(),
        }
    }

    /// Whether this error ends the session (login or data-load failure)
    /// as opposed to a transient precondition message.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Precondition(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias using anyhow for flexible error handling.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::api(503, "maintenance");
        let display = format!("{}", err);
        assert!(display.contains("503"));
        assert!(display.contains("maintenance"));
    }

    #[test]
    fn test_auth_error_display() {
        let err = ApiError::auth(401, "bad credentials");
        assert!(format!("{}", err).contains("401"));
    }

    #[test]
    fn test_precondition_is_not_fatal() {
        assert!(!ApiError::Precondition("profile not loaded".into()).is_fatal());
        assert!(ApiError::NotAuthenticated.is_fatal());
        assert!(ApiError::api(500, "boom").is_fatal());
        assert!(ApiError::Decode("bad json".into()).is_fatal());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingVar("GLPI_BASE_URL");
        assert!(format!("{}", err).contains("GLPI_BASE_URL"));
    }
}
