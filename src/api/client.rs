// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Authenticated HTTP client for the GLPI high-level REST API.
//!
//! One network round trip per operation, a fixed request timeout, no
//! retry or backoff. The bearer token and the authenticated user id are
//! written once per login/profile fetch and read-only afterwards; the
//! `RwLock` exists because command tasks share the client through an
//! `Arc`, not because concurrent writes are expected.

use std::sync::RwLock;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use crate::config::Config;
use crate::domain::{Followup, Ticket, TicketActor};
use crate::error::ApiError;

use super::types::{
    CurrentUser, FollowupPayload, LoginRequest, TicketUpdate, TimelineItem, TokenResponse,
};

/// Fixed per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fixed page size for the ticket list.
const TICKET_PAGE_LIMIT: &str = "20";

/// Ticket list ordering: most recently modified first.
const TICKET_SORT: &str = "date_mod:desc";

/// Entity-context header required by ticket write operations.
const ENTITY_HEADER: &str = "GLPI-Entity";

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user_id: Option<i64>,
}

/// Stateful API wrapper: base URL, credentials, bearer token, user id.
pub struct ApiClient {
    config: Config,
    http: Client,
    session: RwLock<SessionState>,
}

impl ApiClient {
    /// Create a client from validated settings.
    pub fn new(config: Config) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            config,
            http,
            session: RwLock::new(SessionState::default()),
        }
    }

    /// The authenticated user id, once `fetch_my_id` has run.
    pub fn user_id(&self) -> Option<i64> {
        self.session.read().expect("session lock poisoned").user_id
    }

    fn bearer_token(&self) -> Result<String, ApiError> {
        self.session
            .read()
            .expect("session lock poisoned")
            .token
            .clone()
            .ok_or(ApiError::NotAuthenticated)
    }

    /// Submit password-grant credentials to the token endpoint and store
    /// the bearer token. One attempt, no retry.
    pub async fn login(&self) -> Result<(), ApiError> {
        let url = format!("{}/token", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .json(&LoginRequest::new(&self.config))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::auth(status.as_u16(), body));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        self.session.write().expect("session lock poisoned").token = Some(token.access_token);
        debug!("login succeeded");
        Ok(())
    }

    /// Fetch the most recently modified tickets, fixed page size.
    pub async fn list_tickets(&self) -> Result<Vec<Ticket>, ApiError> {
        let token = self.bearer_token()?;
        let url = format!("{}/Assistance/Ticket", self.config.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("limit", TICKET_PAGE_LIMIT), ("sort", TICKET_SORT)])
            .header("Accept", "application/json")
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = read_success(response, &[200, 206]).await?;
        let tickets: Vec<Ticket> = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        debug!(count = tickets.len(), "ticket list loaded");
        Ok(tickets)
    }

    /// Fetch the team members (requesters, technicians, observers) of a
    /// ticket.
    pub async fn ticket_actors(&self, ticket_id: i64) -> Result<Vec<TicketActor>, ApiError> {
        let token = self.bearer_token()?;
        let url = format!(
            "{}/Assistance/Ticket/{}/TeamMember",
            self.config.base_url, ticket_id
        );
        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = read_success(response, &[200, 206]).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Fetch a ticket's followup timeline.
    ///
    /// The endpoint returns an envelope list where each followup is
    /// wrapped under a type tag; the tag is discarded here. The expand
    /// flag is what makes the author object carry a name.
    pub async fn ticket_followups(&self, ticket_id: i64) -> Result<Vec<Followup>, ApiError> {
        let token = self.bearer_token()?;
        let url = format!(
            "{}/Assistance/Ticket/{}/Timeline/Followup",
            self.config.base_url, ticket_id
        );
        let response = self
            .http
            .get(&url)
            .query(&[("expand_dropdowns", "true")])
            .header("Accept", "application/json")
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = read_success(response, &[200, 206]).await?;
        let items: Vec<TimelineItem> = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(items.into_iter().map(|wrapper| wrapper.item).collect())
    }

    /// Post a plain-text reply to a ticket's timeline.
    pub async fn create_followup(&self, ticket_id: i64, text: &str) -> Result<(), ApiError> {
        let token = self.bearer_token()?;
        let url = format!(
            "{}/Assistance/Ticket/{}/Timeline/Followup",
            self.config.base_url, ticket_id
        );
        let response = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .bearer_auth(&token)
            .json(&FollowupPayload::new(ticket_id, text))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        read_success(response, &[200, 201]).await?;
        debug!(ticket_id, "followup created");
        Ok(())
    }

    /// Resolve and store the authenticated user's numeric id.
    /// Required before [`Self::assign_to_me`].
    pub async fn fetch_my_id(&self) -> Result<i64, ApiError> {
        let token = self.bearer_token()?;
        let url = format!("{}/Administration/User/Me", self.config.base_url);
        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = read_success(response, &[200]).await?;
        let user: CurrentUser = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        self.session.write().expect("session lock poisoned").user_id = Some(user.id);
        debug!(user_id = user.id, "resolved authenticated user");
        Ok(user.id)
    }

    /// PATCH the ticket to assign it to the authenticated user and move
    /// it to processing. The entity-context header is mandatory for
    /// write operations on the ticket resource.
    pub async fn assign_to_me(&self, ticket_id: i64, entity_id: i64) -> Result<(), ApiError> {
        let user_id = self.user_id().ok_or_else(|| {
            ApiError::Precondition("user profile not loaded yet, try again shortly".to_string())
        })?;

        let token = self.bearer_token()?;
        let url = format!("{}/Assistance/Ticket/{}", self.config.base_url, ticket_id);
        let response = self
            .http
            .patch(&url)
            .header("Accept", "application/json")
            .header(ENTITY_HEADER, entity_id.to_string())
            .bearer_auth(&token)
            .json(&TicketUpdate::assign(user_id))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        read_success(response, &[200, 204]).await?;
        debug!(ticket_id, user_id, "ticket assigned");
        Ok(())
    }
}

/// Map a non-accepted status into `ApiError::Api` carrying the body.
async fn read_success(response: Response, accepted: &[u16]) -> Result<Response, ApiError> {
    let status = response.status().as_u16();
    if accepted.contains(&status) {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::api(status, body))
    }
}
