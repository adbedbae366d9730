// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Wire-format request and response types for the GLPI high-level API.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::domain::{Followup, STATUS_PROCESSING};

/// Password-grant body for the token endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub grant_type: &'static str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub scope: &'static str,
}

impl<'a> LoginRequest<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            grant_type: "password",
            client_id: &config.client_id,
            client_secret: &config.client_secret,
            username: &config.username,
            password: &config.password,
            scope: "api user",
        }
    }
}

/// Response from the token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Response from `Administration/User/Me`.
#[derive(Debug, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
}

/// Envelope element on the timeline sub-resource: each followup arrives
/// wrapped under a type tag. Only the inner item is of interest.
#[derive(Debug, Deserialize)]
pub struct TimelineItem {
    #[serde(default, rename = "type")]
    pub item_type: String,
    pub item: Followup,
}

/// Body for creating a followup on the timeline.
#[derive(Debug, Serialize)]
pub struct FollowupPayload {
    pub content: String,
    pub requesttypes_id: i64,
    pub items_id: i64,
    pub itemtype: &'static str,
}

impl FollowupPayload {
    /// Wrap plain text in minimal paragraph markup; GLPI's rich-text
    /// validation can drop bare text.
    pub fn new(ticket_id: i64, text: &str) -> Self {
        Self {
            content: format!("<p>{}</p>", text),
            requesttypes_id: 1, // Helpdesk request type
            items_id: ticket_id,
            itemtype: "Ticket",
        }
    }
}

/// Partial-update envelope for PATCHing a ticket.
#[derive(Debug, Serialize)]
pub struct TicketUpdate {
    pub input: TicketUpdateInput,
}

#[derive(Debug, Serialize)]
pub struct TicketUpdateInput {
    pub status: i64,
    pub users_id_assign: i64,
}

impl TicketUpdate {
    /// Assign the ticket to `user_id` and move it to processing, without
    /// touching the full team array.
    pub fn assign(user_id: i64) -> Self {
        Self {
            input: TicketUpdateInput {
                status: STATUS_PROCESSING,
                users_id_assign: user_id,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> Config {
        Config {
            base_url: "https://helpdesk.example.com/api.php".to_string(),
            client_id: "cid".to_string(),
            client_secret: "csecret".to_string(),
            username: "tech".to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[test]
    fn test_login_request_body() {
        let config = config();
        let body = serde_json::to_value(LoginRequest::new(&config)).unwrap();
        assert_eq!(
            body,
            json!({
                "grant_type": "password",
                "client_id": "cid",
                "client_secret": "csecret",
                "username": "tech",
                "password": "hunter2",
                "scope": "api user"
            })
        );
    }

    #[test]
    fn test_token_response_decodes() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token": "abc123", "token_type": "Bearer"}"#).unwrap();
        assert_eq!(token.access_token, "abc123");
    }

    #[test]
    fn test_timeline_envelope_unwraps() {
        let json = r#"[
            {"type": "ITILFollowup", "item": {"id": 3, "date": "2024-01-30 10:00:00",
             "content": "<p>first</p>", "user": {"id": 7, "name": "Ana"}}},
            {"type": "ITILFollowup", "item": {"id": 1, "content": "<p>second</p>"}}
        ]"#;
        let items: Vec<TimelineItem> = serde_json::from_str(json).unwrap();
        let followups: Vec<Followup> = items.into_iter().map(|w| w.item).collect();
        assert_eq!(followups.len(), 2);
        assert_eq!(followups[0].id, 3);
        assert_eq!(followups[0].user.name, "Ana");
        assert_eq!(followups[1].id, 1);
    }

    #[test]
    fn test_followup_payload_wraps_paragraph() {
        let body = serde_json::to_value(FollowupPayload::new(42, "on my way")).unwrap();
        assert_eq!(
            body,
            json!({
                "content": "<p>on my way</p>",
                "requesttypes_id": 1,
                "items_id": 42,
                "itemtype": "Ticket"
            })
        );
    }

    #[test]
    fn test_assign_envelope() {
        let body = serde_json::to_value(TicketUpdate::assign(9)).unwrap();
        assert_eq!(body, json!({"input": {"status": 2, "users_id_assign": 9}}));
    }

    #[test]
    fn test_current_user_decodes() {
        let user: CurrentUser =
            serde_json::from_str(r#"{"id": 12, "name": "tech"}"#).unwrap();
        assert_eq!(user.id, 12);
    }
}
