// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Domain entities for the GLPI helpdesk: tickets, actors, followups.
//!
//! Deserialization targets the high-level `Assistance/Ticket` schema.
//! Formatting helpers (status badges, priority labels, dates, cleaned
//! content) live on the entities so the UI layer stays declarative.

pub mod content;

pub use content::clean_content;

use chrono::{DateTime, NaiveDateTime};
use ratatui::style::Color;
use serde::Deserialize;

/// GLPI ticket status ids (the well-known lifecycle set).
pub const STATUS_NEW: i64 = 1;
pub const STATUS_PROCESSING: i64 = 2;
pub const STATUS_PLANNED: i64 = 3;
pub const STATUS_PENDING: i64 = 4;
pub const STATUS_SOLVED: i64 = 5;
pub const STATUS_CLOSED: i64 = 6;

/// Actor role strings as returned by the TeamMember sub-resource.
pub const ROLE_REQUESTER: &str = "requester";
pub const ROLE_ASSIGNED: &str = "assigned";

/// Status object as returned by the high-level API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketStatus {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// Organizational entity scoping a ticket. Required context for writes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketEntity {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// A person, group, or supplier attached to a ticket in a given role.
///
/// `kind` is one of `User`, `Group`, `Supplier`; `role` is one of
/// `requester`, `assigned`, `observer`. Kept as strings: the API owns the
/// vocabulary and unknown values must not break decoding.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketActor {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub role: String,
}

/// Author block on a timeline followup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FollowupAuthor {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// A timestamped message on a ticket's conversation timeline.
#[derive(Debug, Clone, Deserialize)]
pub struct Followup {
    pub id: i64,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub user: FollowupAuthor,
}

impl Followup {
    /// Followup body with HTML stripped.
    pub fn clean_content(&self) -> String {
        clean_content(&self.content)
    }

    /// Creation date in `dd/mm/yy HH:MM`, or the raw string if unparsable.
    pub fn formatted_date(&self) -> String {
        format_date(&self.date)
    }
}

/// A support ticket.
///
/// `actors` and `followups` are populated lazily by the controller:
/// `None` means not fetched yet, `Some` is always a complete fetched list.
#[derive(Debug, Clone, Deserialize)]
pub struct Ticket {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub status: TicketStatus,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub entity: TicketEntity,

    #[serde(skip)]
    pub actors: Option<Vec<TicketActor>>,
    #[serde(skip)]
    pub followups: Option<Vec<Followup>>,
}

impl Ticket {
    /// Status label and badge color.
    ///
    /// Ids outside the known lifecycle set fall back to the API-provided
    /// name, then to a synthetic `Status N`. Never empty.
    pub fn status_label(&self) -> (String, Color) {
        match self.status.id {
            STATUS_NEW => ("New".to_string(), Color::Green),
            STATUS_PROCESSING => ("Processing".to_string(), Color::Blue),
            STATUS_PLANNED => ("Planned".to_string(), Color::Yellow),
            STATUS_PENDING => ("Pending".to_string(), Color::LightRed),
            STATUS_SOLVED => ("Solved".to_string(), Color::Gray),
            STATUS_CLOSED => ("Closed".to_string(), Color::DarkGray),
            other => {
                let name = if self.status.name.is_empty() {
                    format!("Status {}", other)
                } else {
                    self.status.name.clone()
                };
                (name, Color::Gray)
            }
        }
    }

    /// Human label for the 1..=6 priority scale.
    pub fn priority_label(&self) -> String {
        match self.priority {
            1 => "Very low".to_string(),
            2 => "Low".to_string(),
            3 => "Medium".to_string(),
            4 => "High".to_string(),
            5 => "Very high".to_string(),
            6 => "Major".to_string(),
            other => other.to_string(),
        }
    }

    /// Opening date in `dd/mm/yy HH:MM`, or the raw string if unparsable.
    pub fn formatted_date(&self) -> String {
        format_date(&self.date)
    }

    /// Ticket description with HTML stripped.
    pub fn clean_content(&self) -> String {
        clean_content(&self.content)
    }

    /// Joined requester names, or `N/A` while empty.
    pub fn requesters(&self) -> String {
        self.actor_names(ROLE_REQUESTER)
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// Joined assigned-technician names, or `Unassigned` while empty.
    pub fn technicians(&self) -> String {
        self.actor_names(ROLE_ASSIGNED)
            .unwrap_or_else(|| "Unassigned".to_string())
    }

    fn actor_names(&self, role: &str) -> Option<String> {
        let names: Vec<&str> = self
            .actors
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(|actor| actor.role == role)
            .map(|actor| actor.name.as_str())
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(names.join(", "))
        }
    }
}

/// Parse the API's date strings and render `dd/mm/yy HH:MM`.
///
/// Accepts RFC 3339 (`2024-01-30T10:00:00-03:00`) and the bare SQL
/// datetime (`2024-01-30 10:00:00`). Anything else passes through
/// unchanged rather than hiding the timestamp.
pub fn format_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%d/%m/%y %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return dt.format("%d/%m/%y %H:%M").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket_with_status(id: i64, name: &str) -> Ticket {
        Ticket {
            id: 1,
            name: "test".to_string(),
            content: String::new(),
            date: String::new(),
            status: TicketStatus {
                id,
                name: name.to_string(),
            },
            priority: 3,
            entity: TicketEntity::default(),
            actors: None,
            followups: None,
        }
    }

    #[test]
    fn test_known_status_labels() {
        assert_eq!(ticket_with_status(1, "").status_label().0, "New");
        assert_eq!(ticket_with_status(6, "").status_label().0, "Closed");
    }

    #[test]
    fn test_unknown_status_uses_api_name() {
        let (label, _) = ticket_with_status(9, "Escalated").status_label();
        assert_eq!(label, "Escalated");
    }

    #[test]
    fn test_unknown_status_synthesizes_label() {
        for id in [0, 7, 42, -1] {
            let (label, _) = ticket_with_status(id, "").status_label();
            assert_eq!(label, format!("Status {}", id));
            assert!(!label.is_empty());
        }
    }

    #[test]
    fn test_priority_labels() {
        let mut ticket = ticket_with_status(1, "");
        ticket.priority = 6;
        assert_eq!(ticket.priority_label(), "Major");
        ticket.priority = 9;
        assert_eq!(ticket.priority_label(), "9");
    }

    #[test]
    fn test_format_date_rfc3339_and_sql() {
        assert_eq!(format_date("2024-01-30T10:00:00-03:00"), "30/01/24 10:00");
        assert_eq!(format_date("2024-01-30 10:00:00"), "30/01/24 10:00");
    }

    #[test]
    fn test_format_date_passthrough() {
        assert_eq!(format_date("yesterday-ish"), "yesterday-ish");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_actor_groupings() {
        let mut ticket = ticket_with_status(1, "");
        assert_eq!(ticket.requesters(), "N/A");
        assert_eq!(ticket.technicians(), "Unassigned");

        ticket.actors = Some(vec![
            TicketActor {
                id: 1,
                name: "Ana".to_string(),
                kind: "User".to_string(),
                role: "requester".to_string(),
            },
            TicketActor {
                id: 2,
                name: "Bruno".to_string(),
                kind: "User".to_string(),
                role: "assigned".to_string(),
            },
            TicketActor {
                id: 3,
                name: "Carla".to_string(),
                kind: "User".to_string(),
                role: "assigned".to_string(),
            },
        ]);
        assert_eq!(ticket.requesters(), "Ana");
        assert_eq!(ticket.technicians(), "Bruno, Carla");
    }

    #[test]
    fn test_fetched_but_empty_actor_list_still_has_fallback() {
        let mut ticket = ticket_with_status(1, "");
        ticket.actors = Some(Vec::new());
        assert_eq!(ticket.requesters(), "N/A");
    }

    #[test]
    fn test_ticket_decodes_from_api_shape() {
        let json = r#"{
            "id": 42,
            "name": "Printer on fire",
            "content": "<p>It is &amp; really burning</p>",
            "date": "2024-01-30 10:00:00",
            "status": {"id": 2, "name": "Processing (assigned)"},
            "priority": 4,
            "entity": {"id": 0, "name": "Root entity"}
        }"#;
        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.id, 42);
        assert_eq!(ticket.status.id, 2);
        assert_eq!(ticket.entity.id, 0);
        assert!(ticket.actors.is_none());
        assert!(ticket.followups.is_none());
        assert_eq!(ticket.clean_content(), "It is & really burning");
    }
}
