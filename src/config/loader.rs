// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Settings resolution for the GLPI connection.

use crate::error::ConfigError;

/// Validated connection settings. All fields are required.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the GLPI high-level API, without a trailing slash.
    pub base_url: String,
    /// OAuth client id for the password grant.
    pub client_id: String,
    /// OAuth client secret for the password grant.
    pub client_secret: String,
    /// GLPI account username.
    pub username: String,
    /// GLPI account password.
    pub password: String,
}

/// Raw settings as collected from CLI flags and environment variables,
/// before validation.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub base_url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Validate raw settings into a [`Config`].
///
/// Every field is required; the error names the environment variable the
/// user would set to fix it. The base URL is normalized to drop a trailing
/// slash so endpoint paths can be joined with a plain `format!`.
pub fn resolve(settings: Settings) -> Result<Config, ConfigError> {
    let base_url = require(settings.base_url, "GLPI_BASE_URL")?;
    let base_url = base_url.trim_end_matches('/').to_string();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::InvalidValue {
            field: "GLPI_BASE_URL".to_string(),
            message: "must start with http:// or https://".to_string(),
        });
    }

    Ok(Config {
        base_url,
        client_id: require(settings.client_id, "GLPI_CLIENT_ID")?,
        client_secret: require(settings.client_secret, "GLPI_CLIENT_SECRET")?,
        username: require(settings.username, "GLPI_USER")?,
        password: require(settings.password, "GLPI_PASS")?,
    })
}

fn require(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_settings() -> Settings {
        Settings {
            base_url: Some("https://helpdesk.example.com/api.php".to_string()),
            client_id: Some("client".to_string()),
            client_secret: Some("secret".to_string()),
            username: Some("tech".to_string()),
            password: Some("hunter2".to_string()),
        }
    }

    #[test]
    fn test_resolve_complete() {
        let config = resolve(full_settings()).unwrap();
        assert_eq!(config.base_url, "https://helpdesk.example.com/api.php");
        assert_eq!(config.username, "tech");
    }

    #[test]
    fn test_resolve_trims_trailing_slash() {
        let mut settings = full_settings();
        settings.base_url = Some("https://helpdesk.example.com/api.php/".to_string());
        let config = resolve(settings).unwrap();
        assert_eq!(config.base_url, "https://helpdesk.example.com/api.php");
    }

    #[test]
    fn test_resolve_missing_base_url() {
        let mut settings = full_settings();
        settings.base_url = None;
        let err = resolve(settings).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("GLPI_BASE_URL")));
    }

    #[test]
    fn test_resolve_blank_credential_is_missing() {
        let mut settings = full_settings();
        settings.password = Some("   ".to_string());
        let err = resolve(settings).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("GLPI_PASS")));
    }

    #[test]
    fn test_resolve_rejects_bare_host() {
        let mut settings = full_settings();
        settings.base_url = Some("helpdesk.example.com".to_string());
        let err = resolve(settings).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
